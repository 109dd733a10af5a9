// Application layer - View session and dataset repository seam
pub mod astronomy_repository;
pub mod session;
