use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use revi_client::DEFAULT_BASE_URL;
use serde::Deserialize;

use crate::theme::ThemeMode;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub theme: ThemeMode,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_prefix: String,
    pub format: LogFormat,
}

impl Settings {
    /// Defaults, then `config/settings.*` (or `path`), then `REVI__*` env vars.
    pub fn load(path: Option<&str>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(p) => File::with_name(p).required(true),
            None => File::with_name("config/settings").required(false),
        };

        let config = Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.timeout_seconds", 60)?
            .set_default("ui.theme", "dark")?
            .set_default("logging.directory", "logs")?
            .set_default("logging.file_prefix", "revi")?
            .set_default("logging.format", "pretty")?
            .add_source(file)
            .add_source(
                Environment::with_prefix("REVI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }
}
