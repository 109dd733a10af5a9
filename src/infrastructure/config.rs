use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    /// Internal service URL including its `/api` prefix,
    /// e.g. `http://backend:8000/api`. Reachable only inside the
    /// deployment network.
    pub base_url: String,
}

/// Settings for the headless playback probe.
#[derive(Debug, Deserialize, Clone)]
pub struct ProbeConfig {
    /// Gateway URL the probe fetches through, including `/api`.
    pub gateway_url: String,
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default = "default_steps")]
    pub steps: u32,
    /// How many frames to log before exiting.
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_tick_ms() -> u64 {
    30
}

fn default_days() -> u32 {
    365
}

fn default_steps() -> u32 {
    50
}

fn default_frames() -> u32 {
    120
}

pub fn load_gateway_config() -> anyhow::Result<GatewayConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/gateway"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_probe_config() -> anyhow::Result<ProbeConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/probe"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
