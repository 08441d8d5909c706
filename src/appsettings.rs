use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ClockSettings {
    pub timezone: Option<String>,
}

impl ClockSettings {
    pub fn timezone(&self) -> anyhow::Result<Option<chrono_tz::Tz>> {
        match &self.timezone {
            Some(name) => {
                let tz = name
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Unknown timezone {name}: {e}"))?;
                Ok(Some(tz))
            }
            None => Ok(None),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PollerSettings {
    pub enabled: bool,
    pub interactive: bool,
    pub server_url: String,
    pub active_from_hour: u32,
    pub active_until_hour: u32,
    pub fallback_path: PathBuf,
    pub request_timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub server: ServerSettings,
    #[serde(default)]
    pub clock: ClockSettings,
    pub poller: PollerSettings,
}

impl AppSettings {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("poller.enabled", false)?
            .set_default("poller.interactive", false)?
            .set_default("poller.server_url", "http://127.0.0.1:5000")?
            .set_default("poller.active_from_hour", 9)?
            .set_default("poller.active_until_hour", 22)?
            .set_default("poller.fallback_path", "taskminder-state.json")?
            .set_default("poller.request_timeout_secs", 10)?
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
