#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;

use super::Config;
use super::ConfigKey;
use crate::domain::models::ResponseMode;

/// Typed session configuration handed to the engine and its collaborators at
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub ollama_url: String,
    pub model: Option<String>,
    pub response_mode: ResponseMode,
    pub health_check_timeout: Duration,
    pub generate_timeout: Duration,
    pub settle_delay: Duration,
    pub service_command: String,
    pub service_log: PathBuf,
    pub typing_delay: Duration,
}

fn parse_millis(config: &Config, key: ConfigKey) -> Result<Duration> {
    let raw = config.get(key);
    let millis = raw
        .trim()
        .parse::<u64>()
        .with_context(|| return format!("'{key}' must be a number of milliseconds, got '{raw}'"))?;

    return Ok(Duration::from_millis(millis));
}

impl Settings {
    pub fn from_config(config: &Config) -> Result<Settings> {
        let model = config.get(ConfigKey::Model).trim().to_string();
        let response_mode_str = config.get(ConfigKey::ResponseMode);
        let response_mode = ResponseMode::from_str(&response_mode_str).with_context(|| {
            return format!("'{}' is not a valid response mode", response_mode_str);
        })?;

        return Ok(Settings {
            ollama_url: config
                .get(ConfigKey::OllamaURL)
                .trim_end_matches('/')
                .to_string(),
            model: if model.is_empty() { None } else { Some(model) },
            response_mode,
            health_check_timeout: parse_millis(config, ConfigKey::HealthCheckTimeout)?,
            generate_timeout: parse_millis(config, ConfigKey::GenerateTimeout)?,
            settle_delay: parse_millis(config, ConfigKey::SettleDelay)?,
            service_command: config.get(ConfigKey::ServiceCommand),
            service_log: PathBuf::from(config.get(ConfigKey::ServiceLog)),
            typing_delay: parse_millis(config, ConfigKey::TypingDelay)?,
        });
    }
}

impl Default for Settings {
    fn default() -> Settings {
        return Settings {
            ollama_url: Config::default_value(ConfigKey::OllamaURL),
            model: None,
            response_mode: ResponseMode::Incremental,
            health_check_timeout: Duration::from_secs(5),
            generate_timeout: Duration::from_secs(240),
            settle_delay: Duration::from_secs(5),
            service_command: Config::default_value(ConfigKey::ServiceCommand),
            service_log: PathBuf::from(Config::default_value(ConfigKey::ServiceLog)),
            typing_delay: Duration::from_millis(10),
        };
    }
}
