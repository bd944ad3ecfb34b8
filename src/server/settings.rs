use config::{Config, ConfigError, File};
use serde::Deserialize;

use std::path::Path;

// For explanation, see issue: https://github.com/serde-rs/serde/issues/368
fn default_count_threshold() -> u64 {
    512
}
fn default_tick_threshold_secs() -> u64 {
    16
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_model_dimension() -> usize {
    16
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Endpoint the node listens on and registers under, `host:port`.
    pub listener_ip: String,
    /// Cluster type component of the registry path.
    pub service_type: String,
    /// Cluster name component of the registry path.
    pub service_name: String,
    /// Seed peers for the bundled registry backend, `host:port` each.
    #[serde(default)]
    pub seed_peers: Vec<String>,
    /// Local updates before an automatic mix; 0 disables the trigger.
    #[serde(default = "default_count_threshold")]
    pub count_threshold: u64,
    /// Seconds between automatic mixes; 0 disables the trigger.
    #[serde(default = "default_tick_threshold_secs")]
    pub tick_threshold_secs: u64,
    /// Per-call bound on peer RPCs.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// When set, mix with this many random peers per round instead of all.
    #[serde(default)]
    pub mix_candidates: Option<usize>,
    /// Weight vector dimension of the bundled averaging model.
    #[serde(default = "default_model_dimension")]
    pub model_dimension: usize,
}

impl Settings {
    pub fn new(home: &Path) -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_ENV").unwrap_or_else(|_| "Development".into());
        let settings = Config::builder()
            .add_source(File::from(home.join("Default.json")))
            .add_source(File::from(home.join(format!("{}.json", env))).required(false))
            .build()?
            .try_deserialize();

        settings
    }
}
