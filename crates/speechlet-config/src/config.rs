//! Daemon configuration, persisted as JSON under the base directory.

use serde::{Deserialize, Serialize};
use speechlet_core::{DispatchConfig, DEFAULT_NO_HANDLER_MESSAGE};
use std::path::Path;

use crate::error::ConfigResult;
use crate::paths::Paths;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variables recognized at load time.
const ENV_LOG_LEVEL: &str = "SPEECHLET_LOG_LEVEL";
const ENV_SIGNING_KEY: &str = "SPEECHLET_SIGNING_KEY";
const ENV_DISABLE_SIGNATURE_CHECK: &str = "SPEECHLET_DISABLE_SIGNATURE_CHECK";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Spoken on launch when no launch handler is registered. Empty means
    /// the skill greets with silence.
    #[serde(default)]
    pub default_launch_message: String,

    /// Spoken when no registered handler supports an intent.
    #[serde(default = "default_no_handler_message")]
    pub no_handler_message: String,

    /// Verify HMAC signatures on `skill.invoke` frames. Disable only for
    /// development setups on trusted sockets.
    #[serde(default = "default_true")]
    pub verify_signatures: bool,

    /// Base64-encoded HMAC-SHA256 key shared with the connector. Required
    /// while `verify_signatures` is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_key: Option<String>,

    /// Register the built-in Stop/Cancel and Help handlers on startup.
    #[serde(default = "default_true")]
    pub builtin_intents: bool,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_no_handler_message() -> String {
    DEFAULT_NO_HANDLER_MESSAGE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_launch_message: String::new(),
            no_handler_message: default_no_handler_message(),
            verify_signatures: true,
            signing_key: None,
            builtin_intents: true,
        }
    }
}

impl Config {
    /// Load from the config file under `paths`, falling back to defaults
    /// when the file does not exist, then apply environment overrides.
    ///
    /// The daemon calls this before logging is initialized (the loaded
    /// `log_level` feeds the subscriber), so no tracing happens here.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        let config_path = paths.config_file();
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self, paths: &Paths) -> ConfigResult<()> {
        paths.ensure_dirs()?;
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), contents)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Ok(key) = std::env::var(ENV_SIGNING_KEY) {
            self.signing_key = Some(key);
        }
        if env_flag(ENV_DISABLE_SIGNATURE_CHECK) {
            self.verify_signatures = false;
        }
    }

    /// The dispatcher-facing slice of this configuration.
    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            default_launch_message: self.default_launch_message.clone(),
            no_handler_message: self.no_handler_message.clone(),
        }
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).ok().as_deref(),
        Some("1") | Some("true") | Some("TRUE") | Some("yes")
    )
}

// ============================================================================
// Tests
// ============================================================================
