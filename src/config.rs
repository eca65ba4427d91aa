use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecognitionConfig {
    /// Locale passed to the engine when none is given (e.g. "en-US")
    #[serde(default)]
    pub default_locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    /// Reported availability of the simulated engine
    pub available: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { available: true }
    }
}

impl Config {
    /// Load from `path` (extension optional), then `VOICE_SESSION__*` env overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("VOICE_SESSION").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        settings
            .try_deserialize()
            .context("Invalid voice session config")
    }
}
