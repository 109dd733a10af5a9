// Headless playback probe - drives the fetch/install/play path end to end
//
// Fetches a positions dataset through a running gateway, installs it into a
// view session, and logs the sampled frame each tick. Stands in for the
// rendering surface when checking a deployment.
use std::sync::Arc;
use std::time::Duration;

use celestial_gateway::application::astronomy_repository::AstronomyRepository;
use celestial_gateway::application::session::ViewSession;
use celestial_gateway::domain::dataset::WeatherMetric;
use celestial_gateway::infrastructure::backend_repository::BackendRepository;
use celestial_gateway::infrastructure::config::load_probe_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = load_probe_config()?;
    let repository = Arc::new(BackendRepository::new(config.gateway_url.clone()));
    let tick_period = Duration::from_millis(config.tick_ms);

    // Space weather first: a single fetch, chart-shaped, no playback.
    match repository.fetch_weather().await {
        Ok(weather) if weather.is_empty() => println!("No space weather data available."),
        Ok(weather) => {
            println!("Space weather records: {}", weather.len());
            for metric in WeatherMetric::ALL {
                println!(
                    "  {}: {} samples",
                    metric.name(),
                    weather.metric_series(metric).len()
                );
            }
        }
        Err(err) => {
            tracing::error!("space weather fetch failed: {err:#}");
            println!("No space weather data available.");
        }
    }

    // Positions playback.
    let mut session = ViewSession::new(repository, tick_period);
    if let Err(err) = session.load_positions(config.days, config.steps).await {
        tracing::error!("positions fetch failed: {err:#}");
        println!("No position data available.");
        return Ok(());
    }

    session.play();
    if !session.is_playing() {
        println!("No position data available.");
        return Ok(());
    }

    for _ in 0..config.frames {
        tokio::time::sleep(tick_period).await;
        if let Some(view) = session.current_frame() {
            let frame = view.sample();
            let positions: Vec<String> = frame
                .bodies
                .iter()
                .map(|body| format!("{}=({:.2}, {:.2})", body.name, body.current.0, body.current.1))
                .collect();
            println!("[{:>4}] {} {}", view.frame_index(), frame.timestamp, positions.join(" "));
        }
    }

    session.pause();
    Ok(())
}
