// Domain layer - Dataset and playback models
pub mod dataset;
pub mod playback;
