//! File system paths for the daemon's runtime files.

use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};

/// Config filename under the base runtime directory.
const CONFIG_NAME: &str = "config.json";
/// Gateway socket filename under the base runtime directory.
const SOCKET_NAME: &str = "gateway.sock";
/// PID filename under the base runtime directory.
const PID_NAME: &str = "daemon.pid";

/// Manages file system paths for the daemon.
///
/// All runtime files live under one base directory, `~/.speechlet` by
/// default.
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.speechlet`.
    pub fn new() -> ConfigResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| ConfigError::Path("could not determine home directory".to_string()))?;
        Ok(Self {
            base_dir: home.join(".speechlet"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.speechlet).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.speechlet/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(CONFIG_NAME)
    }

    /// Get the gateway socket path (~/.speechlet/gateway.sock).
    pub fn socket_file(&self) -> PathBuf {
        self.base_dir.join(SOCKET_NAME)
    }

    /// Get the PID file path (~/.speechlet/daemon.pid).
    pub fn pid_file(&self) -> PathBuf {
        self.base_dir.join(PID_NAME)
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> ConfigResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
