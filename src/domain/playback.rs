// Playback state machine and frame sampling
use super::dataset::PositionsDataset;

/// Frame cursor and play/stop flag for one view session.
///
/// Holds `0 <= frame_index < frame_count` whenever the dataset is non-empty.
/// With an empty dataset the machine stays stopped and the index stays 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub frame_index: usize,
    pub playing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Play,
    Pause,
    Tick,
    DatasetReplaced,
}

impl PlaybackState {
    /// Pure transition: fold one event into the state given the frame count
    /// of the active dataset.
    pub fn apply(self, event: PlaybackEvent, frame_count: usize) -> Self {
        match event {
            PlaybackEvent::Play if frame_count > 0 => Self {
                playing: true,
                ..self
            },
            // Nothing to play over an empty dataset.
            PlaybackEvent::Play => self,
            PlaybackEvent::Pause => Self {
                playing: false,
                ..self
            },
            PlaybackEvent::Tick if self.playing && frame_count > 0 => Self {
                frame_index: (self.frame_index + 1) % frame_count,
                playing: true,
            },
            PlaybackEvent::Tick => self,
            PlaybackEvent::DatasetReplaced => Self::default(),
        }
    }
}

/// One body's renderable slice: the full historical trail plus the sample
/// under the frame cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyFrame<'a> {
    pub name: &'a str,
    pub trail_x: &'a [f64],
    pub trail_y: &'a [f64],
    pub current: (f64, f64),
}

/// Everything a map surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledFrame<'a> {
    pub timestamp: &'a str,
    pub bodies: Vec<BodyFrame<'a>>,
}

/// Derive the renderable slice for `frame_index`.
///
/// Callers uphold `frame_index < dataset.frame_count()`; no clamping or
/// wrapping happens here.
pub fn sample_frame(dataset: &PositionsDataset, frame_index: usize) -> SampledFrame<'_> {
    debug_assert!(frame_index < dataset.frame_count());

    let bodies = dataset
        .bodies
        .iter()
        .map(|(name, series)| BodyFrame {
            name,
            trail_x: &series.x,
            trail_y: &series.y,
            current: (series.x[frame_index], series.y[frame_index]),
        })
        .collect();

    SampledFrame {
        timestamp: &dataset.timestamps[frame_index],
        bodies,
    }
}
