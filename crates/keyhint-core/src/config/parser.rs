// Keyhint Config Parser - TOML with Serde
// Parses configuration from TOML files

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::event_log::DEFAULT_LOG_FILE;
use crate::key::key_from_name;
use crate::suggestion::GeneratorConfig;
use crate::VirtualKey;

/// Largest accepted inter-key delay
pub const MAX_KEY_DELAY_MS: u64 = 1000;

/// Configuration parser errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Root TOML table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    #[serde(default)]
    pub log: Option<LogConfig>,

    #[serde(default)]
    pub injection: Option<InjectionConfig>,

    #[serde(default)]
    pub special_keys: Option<SpecialKeysConfig>,

    #[serde(default)]
    pub generator: Option<GeneratorToml>,

    #[serde(default)]
    pub devices: Option<DevicesConfig>,
}

/// Event log settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
}

/// Text injection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InjectionConfig {
    /// Pause between synthetic key transitions (milliseconds, 0 disables)
    pub key_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecialKeysConfig {
    /// Key names, e.g. "CTRL"
    pub keys: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorToml {
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
    pub working_dir: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
}

/// Capture device settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevicesConfig {
    /// Explicit device names/paths to capture (empty = all keyboards and pointers)
    #[serde(default)]
    pub only: Vec<String>,
    /// Bounds for the tracked cursor position
    pub screen_width: Option<i32>,
    pub screen_height: Option<i32>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_file: PathBuf,
    pub key_delay_ms: u64,
    /// Monitored special keys, in registration order
    pub special_keys: Vec<VirtualKey>,
    pub generator: GeneratorConfig,
    pub device_filter: Vec<String>,
    pub screen_size: (i32, i32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            key_delay_ms: 10,
            special_keys: vec![VirtualKey::CONTROL, VirtualKey::SHIFT, VirtualKey::MENU],
            generator: GeneratorConfig::default(),
            device_filter: Vec::new(),
            screen_size: (1920, 1080),
        }
    }
}

impl Config {
    /// Parse a TOML configuration file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let toml_config: ConfigToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;
        toml_config.to_config()
    }

    /// `~/.config/keyhint/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("keyhint").join("config.toml"))
    }

    /// Load the default config file, or built-in defaults if it does not exist
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                log::info!("Loading config from {}", path.display());
                Self::from_toml_path(path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn key_delay(&self) -> Duration {
        Duration::from_millis(self.key_delay_ms)
    }
}

fn parse_key(name: &str) -> Result<VirtualKey, ConfigError> {
    key_from_name(name).ok_or_else(|| ConfigError::InvalidKey(name.to_string()))
}

impl ConfigToml {
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::default();

        if let Some(file) = self.log.as_ref().and_then(|l| l.file.clone()) {
            config.log_file = file;
        }

        if let Some(delay) = self.injection.as_ref().and_then(|i| i.key_delay_ms) {
            if delay > MAX_KEY_DELAY_MS {
                return Err(ConfigError::InvalidValue(format!(
                    "key_delay_ms {} exceeds {}",
                    delay, MAX_KEY_DELAY_MS
                )));
            }
            config.key_delay_ms = delay;
        }

        if let Some(names) = self.special_keys.as_ref().and_then(|s| s.keys.as_ref()) {
            let mut keys = Vec::with_capacity(names.len());
            for name in names {
                let key = parse_key(name)?;
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
            config.special_keys = keys;
        }

        if let Some(generator) = &self.generator {
            let target = &mut config.generator;
            if let Some(command) = &generator.command {
                if command.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(
                        "generator command is empty".to_string(),
                    ));
                }
                target.command = command.clone();
            }
            if let Some(args) = &generator.args {
                target.args = args.clone();
            }
            if generator.working_dir.is_some() {
                target.working_dir = generator.working_dir.clone();
            }
            if let Some(output_file) = &generator.output_file {
                target.output_file = output_file.clone();
            }
            if let Some(timeout_ms) = generator.timeout_ms {
                if timeout_ms == 0 {
                    return Err(ConfigError::InvalidValue(
                        "generator timeout_ms must be positive".to_string(),
                    ));
                }
                target.timeout = Duration::from_millis(timeout_ms);
            }
            if let Some(poll_ms) = generator.poll_interval_ms {
                target.poll_interval = Duration::from_millis(poll_ms.max(1));
            }
        }

        if let Some(devices) = &self.devices {
            config.device_filter = devices.only.clone();
            let width = devices.screen_width.unwrap_or(config.screen_size.0);
            let height = devices.screen_height.unwrap_or(config.screen_size.1);
            if width <= 0 || height <= 0 {
                return Err(ConfigError::InvalidValue(format!(
                    "screen size {}x{} must be positive",
                    width, height
                )));
            }
            config.screen_size = (width, height);
        }

        Ok(config)
    }
}

/// Commented template matching the built-in defaults
pub fn default_config_content() -> &'static str {
    r#"# keyhint configuration

[log]
# JSON-lines event log, cleared at startup and read by the generator
file = "input_events.txt"

[injection]
# Pause between synthetic key transitions in milliseconds (0 disables)
key_delay_ms = 10

[special_keys]
# Keys whose solo tap is a gesture
keys = ["CTRL", "SHIFT", "ALT"]

[generator]
command = "python"
args = ["process_input.py"]
# working_dir = "/path/to/scripts"
output_file = "python_output.txt"
timeout_ms = 30000
poll_interval_ms = 50

[devices]
# Restrict capture to these device names or paths
only = []
screen_width = 1920
screen_height = 1080
"#
}
