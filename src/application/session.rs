// View session - dataset ownership and the playback clock
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::application::astronomy_repository::AstronomyRepository;
use crate::domain::dataset::PositionsDataset;
use crate::domain::playback::{PlaybackEvent, PlaybackState, SampledFrame, sample_frame};

/// State shared between the session handle and its ticker task.
#[derive(Debug, Default)]
struct SessionCore {
    dataset: Option<Arc<PositionsDataset>>,
    state: PlaybackState,
}

impl SessionCore {
    fn frame_count(&self) -> usize {
        self.dataset.as_ref().map_or(0, |d| d.frame_count())
    }

    fn apply(&mut self, event: PlaybackEvent) {
        self.state = self.state.apply(event, self.frame_count());
    }
}

/// Cheap handle onto the frame under the cursor. Holds the dataset alive so
/// trails can be borrowed without copying the series.
#[derive(Debug, Clone)]
pub struct FrameView {
    dataset: Arc<PositionsDataset>,
    frame_index: usize,
}

impl FrameView {
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn sample(&self) -> SampledFrame<'_> {
        sample_frame(&self.dataset, self.frame_index)
    }
}

/// The single active view session: owns the installed dataset and the
/// playback state, and drives the recurring tick task.
///
/// Datasets are replaced wholesale, never mutated in place. Replacement
/// halts playback and rewinds. At most one ticker exists at a time; pause,
/// replacement, and drop all abort it.
pub struct ViewSession {
    repository: Arc<dyn AstronomyRepository>,
    core: Arc<Mutex<SessionCore>>,
    ticker: Option<JoinHandle<()>>,
    tick_period: Duration,
}

impl ViewSession {
    pub fn new(repository: Arc<dyn AstronomyRepository>, tick_period: Duration) -> Self {
        Self {
            repository,
            core: Arc::new(Mutex::new(SessionCore::default())),
            ticker: None,
            tick_period,
        }
    }

    /// Fetch a positions dataset and install it. On failure the session
    /// keeps whatever dataset it already had.
    pub async fn load_positions(&mut self, days: u32, steps: u32) -> anyhow::Result<()> {
        let dataset = self.repository.fetch_positions(days, steps).await?;
        tracing::debug!(
            frames = dataset.frame_count(),
            bodies = dataset.bodies.len(),
            "installing positions dataset"
        );
        self.install_dataset(dataset);
        Ok(())
    }

    /// Replace the active dataset, halting playback and rewinding to frame 0.
    pub fn install_dataset(&mut self, dataset: PositionsDataset) {
        self.cancel_ticker();
        let mut core = self.core.lock();
        core.dataset = Some(Arc::new(dataset));
        core.apply(PlaybackEvent::DatasetReplaced);
    }

    /// Drop the active dataset, returning to the no-data state.
    pub fn clear_dataset(&mut self) {
        self.cancel_ticker();
        let mut core = self.core.lock();
        core.dataset = None;
        core.apply(PlaybackEvent::DatasetReplaced);
    }

    /// Start playback. No-op when already playing or when there is nothing
    /// to play.
    pub fn play(&mut self) {
        {
            let mut core = self.core.lock();
            let was_playing = core.state.playing;
            core.apply(PlaybackEvent::Play);
            if !core.state.playing || was_playing {
                return;
            }
        }
        self.spawn_ticker();
    }

    /// Stop playback, cancelling the ticker. The frame cursor stays put.
    pub fn pause(&mut self) {
        self.cancel_ticker();
        self.core.lock().apply(PlaybackEvent::Pause);
    }

    pub fn is_playing(&self) -> bool {
        self.core.lock().state.playing
    }

    /// The frame under the cursor, or `None` in the no-data state (no
    /// dataset installed, or an empty one).
    pub fn current_frame(&self) -> Option<FrameView> {
        let core = self.core.lock();
        let dataset = core.dataset.as_ref()?;
        if dataset.is_empty() {
            return None;
        }
        Some(FrameView {
            dataset: Arc::clone(dataset),
            frame_index: core.state.frame_index,
        })
    }

    fn spawn_ticker(&mut self) {
        let core = Arc::clone(&self.core);
        let period = self.tick_period;
        self.ticker = Some(tokio::spawn(async move {
            // First tick lands one full period after play.
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                core.lock().apply(PlaybackEvent::Tick);
            }
        }));
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for ViewSession {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::WeatherDataset;
    use async_trait::async_trait;
    use serde_json::json;

    struct StubRepository {
        positions: Option<PositionsDataset>,
    }

    #[async_trait]
    impl AstronomyRepository for StubRepository {
        async fn fetch_positions(&self, _days: u32, _steps: u32) -> anyhow::Result<PositionsDataset> {
            self.positions
                .clone()
                .ok_or_else(|| anyhow::anyhow!("backend unreachable"))
        }

        async fn fetch_weather(&self) -> anyhow::Result<WeatherDataset> {
            Ok(WeatherDataset::default())
        }
    }

    fn dataset(frames: usize) -> PositionsDataset {
        let timestamps: Vec<String> = (0..frames)
            .map(|i| format!("2026-01-01T{:02}:00:00Z", i % 24))
            .collect();
        PositionsDataset::from_payload(json!({
            "timestamps": timestamps,
            "bodies": {
                "earth": {
                    "x": vec![1.0; frames],
                    "y": vec![0.5; frames]
                }
            }
        }))
        .unwrap()
    }

    fn session_with(positions: Option<PositionsDataset>) -> ViewSession {
        let repository = Arc::new(StubRepository { positions });
        ViewSession::new(repository, Duration::from_millis(30))
    }

    fn frame_index(session: &ViewSession) -> Option<usize> {
        session.current_frame().map(|f| f.frame_index())
    }

    async fn advance(period: Duration) {
        // Let a freshly spawned ticker reach its timer before moving the
        // clock, then let it observe the expiry.
        tokio::task::yield_now().await;
        time::advance(period).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test]
    async fn test_no_dataset_reports_no_data() {
        let session = session_with(None);
        assert!(session.current_frame().is_none());
        assert!(!session.is_playing());
    }

    #[tokio::test]
    async fn test_empty_dataset_refuses_to_play() {
        let mut session = session_with(None);
        session.install_dataset(dataset(0));

        session.play();
        assert!(!session.is_playing());
        assert!(session.current_frame().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_prior_dataset() {
        let mut session = session_with(None);
        session.install_dataset(dataset(4));

        let result = session.load_positions(365, 50).await;
        assert!(result.is_err());
        assert_eq!(frame_index(&session), Some(0));
    }

    #[tokio::test]
    async fn test_load_success_installs_and_rewinds() {
        let mut session = session_with(Some(dataset(6)));
        session.load_positions(365, 50).await.unwrap();

        assert_eq!(frame_index(&session), Some(0));
        assert!(!session.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_advance_and_wrap() {
        let period = Duration::from_millis(30);
        let mut session = session_with(None);
        session.install_dataset(dataset(3));
        session.play();
        assert!(session.is_playing());

        // No advance before the first full period elapses.
        assert_eq!(frame_index(&session), Some(0));

        advance(period).await;
        assert_eq!(frame_index(&session), Some(1));
        advance(period).await;
        assert_eq!(frame_index(&session), Some(2));
        advance(period).await;
        assert_eq!(frame_index(&session), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancels_ticker() {
        let period = Duration::from_millis(30);
        let mut session = session_with(None);
        session.install_dataset(dataset(5));
        session.play();

        advance(period).await;
        assert_eq!(frame_index(&session), Some(1));

        session.pause();
        assert!(!session.is_playing());

        advance(period * 10).await;
        assert_eq!(frame_index(&session), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacement_during_playback_stops_and_rewinds() {
        let period = Duration::from_millis(30);
        let mut session = session_with(None);
        session.install_dataset(dataset(8));
        session.play();

        advance(period).await;
        advance(period).await;
        assert_eq!(frame_index(&session), Some(2));

        session.install_dataset(dataset(4));
        assert!(!session.is_playing());
        assert_eq!(frame_index(&session), Some(0));

        // The old ticker must be gone.
        advance(period * 5).await;
        assert_eq!(frame_index(&session), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_is_idempotent_while_playing() {
        let period = Duration::from_millis(30);
        let mut session = session_with(None);
        session.install_dataset(dataset(100));
        session.play();
        session.play();

        advance(period).await;
        // A doubled ticker would advance twice per period.
        assert_eq!(frame_index(&session), Some(1));
    }

    #[tokio::test]
    async fn test_clear_dataset_returns_to_no_data() {
        let mut session = session_with(None);
        session.install_dataset(dataset(3));
        assert!(session.current_frame().is_some());

        session.clear_dataset();
        assert!(session.current_frame().is_none());
        assert!(!session.is_playing());
    }
}
