// Library root - layered gateway and playback engine
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
