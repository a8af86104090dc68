// Keyhint Config API
// TOML configuration for logging, injection, special keys and the generator

pub mod parser;

pub use parser::{default_config_content, Config, ConfigError, MAX_KEY_DELAY_MS};
