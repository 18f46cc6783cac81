//! Runtime configuration loaded from `~/.fx-hud/config.toml`.
//!
//! Every key is optional. A missing file means defaults; a file that exists but
//! does not parse is an error.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::ViewerZone;
use crate::error::{Result, SessionError};
use crate::ticker::TickerConfig;

const DATA_DIR_NAME: &str = ".fx-hud";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub ticks: TickConfig,
    #[serde(default)]
    pub prompts: PromptConfig,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ClockConfig {
    /// IANA zone used for "local" times. Host zone when unset.
    #[serde(default)]
    pub viewer_timezone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TickConfig {
    #[serde(default = "default_clock_interval_ms")]
    pub clock_interval_ms: u64,
    #[serde(default = "default_prompt_interval_ms")]
    pub prompt_interval_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            clock_interval_ms: default_clock_interval_ms(),
            prompt_interval_ms: default_prompt_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PromptConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How long a display keeps a prompt on screen.
    #[serde(default = "default_display_secs")]
    pub display_secs: u64,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            display_secs: default_display_secs(),
        }
    }
}

fn default_clock_interval_ms() -> u64 {
    1000
}

fn default_prompt_interval_ms() -> u64 {
    5000
}

fn default_display_secs() -> u64 {
    7
}

fn default_true() -> bool {
    true
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ticks.clock_interval_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "ticks.clock_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.ticks.prompt_interval_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "ticks.prompt_interval_ms must be greater than zero".to_string(),
            ));
        }
        self.viewer_zone()?;
        Ok(())
    }

    pub fn viewer_zone(&self) -> Result<ViewerZone> {
        match self.clock.viewer_timezone.as_deref() {
            Some(name) if !name.trim().is_empty() => ViewerZone::parse(name),
            _ => Ok(ViewerZone::System),
        }
    }

    pub fn ticker_config(&self) -> TickerConfig {
        TickerConfig {
            clock_interval: Duration::from_millis(self.ticks.clock_interval_ms),
            prompt_interval: Duration::from_millis(self.ticks.prompt_interval_ms),
            prompts_enabled: self.prompts.enabled,
        }
    }

    pub fn prompt_display(&self) -> Duration {
        Duration::from_secs(self.prompts.display_secs)
    }
}

/// Returns `~/.fx-hud`.
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(DATA_DIR_NAME))
}

pub fn default_config_path() -> Result<PathBuf> {
    data_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .ok_or_else(|| SessionError::InvalidConfig("Home directory not found".to_string()))
}

pub fn load_config(path: Option<PathBuf>) -> Result<RuntimeConfig> {
    let config_path = match path {
        Some(path) => path,
        None => default_config_path()?,
    };

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config file; using defaults");
        return Ok(RuntimeConfig::default());
    }

    let content = fs_err::read_to_string(&config_path).map_err(|source| SessionError::Io {
        context: format!("Failed to read config {}", config_path.display()),
        source,
    })?;
    let config: RuntimeConfig =
        toml::from_str(&content).map_err(|err| SessionError::ConfigMalformed {
            path: config_path.clone(),
            details: err.to_string(),
        })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_defaults_when_file_missing() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let config = load_config(Some(temp_dir.path().join("missing.toml"))).expect("load config");

        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.ticks.clock_interval_ms, 1000);
        assert_eq!(config.ticks.prompt_interval_ms, 5000);
        assert!(config.prompts.enabled);
        assert_eq!(config.prompt_display(), Duration::from_secs(7));
        assert_eq!(config.viewer_zone().unwrap(), ViewerZone::System);
    }

    #[test]
    fn load_config_parses_all_sections() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("config.toml");
        fs_err::write(
            &path,
            r#"
[clock]
viewer_timezone = "Europe/Berlin"

[ticks]
clock_interval_ms = 250
prompt_interval_ms = 2000

[prompts]
enabled = false
display_secs = 3
"#,
        )
        .expect("write config");

        let config = load_config(Some(path)).expect("load config");
        assert_eq!(
            config.viewer_zone().unwrap(),
            ViewerZone::Named(chrono_tz::Europe::Berlin)
        );
        let ticker = config.ticker_config();
        assert_eq!(ticker.clock_interval, Duration::from_millis(250));
        assert_eq!(ticker.prompt_interval, Duration::from_secs(2));
        assert!(!ticker.prompts_enabled);
        assert_eq!(config.prompt_display(), Duration::from_secs(3));
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: RuntimeConfig = toml::from_str("[ticks]\nclock_interval_ms = 500\n").unwrap();
        assert_eq!(config.ticks.clock_interval_ms, 500);
        assert_eq!(config.ticks.prompt_interval_ms, 5000);
        assert_eq!(config.prompts, PromptConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("config.toml");
        fs_err::write(&path, "[ticks\nclock_interval_ms = ").expect("write config");

        assert!(matches!(
            load_config(Some(path)),
            Err(SessionError::ConfigMalformed { .. })
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("config.toml");
        fs_err::write(&path, "[ticks]\nprompt_interval_ms = 0\n").expect("write config");

        assert!(matches!(
            load_config(Some(path)),
            Err(SessionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let config = RuntimeConfig {
            clock: ClockConfig {
                viewer_timezone: Some("Atlantis/Capital".to_string()),
            },
            ..RuntimeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SessionError::UnknownTimezone(_))
        ));
    }
}
