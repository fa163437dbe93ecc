//! Daemon startup wiring.

use std::sync::Arc;

use anyhow::{bail, Context};
use speechlet_config::{Config, Paths};
use speechlet_core::Dispatcher;
use speechlet_gateway::{GatewayClient, GatewayServer, SignatureVerifier};
use tracing::info;

use crate::handlers;

/// Bring the daemon up and serve until shutdown.
///
/// Singleton enforcement goes through the socket: a health probe decides
/// whether an existing socket file belongs to a live daemon or is stale.
pub async fn run_daemon(config: Config, paths: Paths) -> anyhow::Result<()> {
    let socket_path = paths.socket_file();

    if socket_path.exists() {
        let probe = GatewayClient::new(&socket_path);
        if probe.is_running().await {
            bail!("daemon is already running; use 'speechlet-daemon stop' first");
        }
        info!("Removing stale socket file");
        let _ = std::fs::remove_file(&socket_path);
    }

    info!("Starting speechlet daemon");
    info!(
        path = %paths.config_file().display(),
        log_level = %config.log_level,
        "Configuration loaded"
    );

    // Refuse to start before touching any runtime files.
    let verifier = build_verifier(&config)?;

    paths.ensure_dirs().context("failed to create base directory")?;

    let pid = std::process::id();
    std::fs::write(paths.pid_file(), pid.to_string()).context("failed to write pid file")?;
    info!(pid = pid, "Daemon started");

    let dispatcher = Arc::new(Dispatcher::new(config.dispatch_config()));
    if config.builtin_intents {
        handlers::register_builtin_handlers(dispatcher.registry());
    }
    info!(
        intent_handlers = dispatcher.registry().intent_handler_count(),
        "Handlers registered"
    );

    let server = GatewayServer::new(&socket_path, dispatcher, verifier);
    let result = server.run().await;

    let _ = std::fs::remove_file(paths.pid_file());
    info!("Daemon stopped");
    result.map_err(Into::into)
}

fn build_verifier(config: &Config) -> anyhow::Result<SignatureVerifier> {
    if !config.verify_signatures {
        return Ok(SignatureVerifier::disabled());
    }
    match &config.signing_key {
        Some(key) => Ok(SignatureVerifier::new(key)?),
        None => bail!(
            "signature verification is enabled but no signing key is configured; \
             set signing_key in config.json or SPEECHLET_DISABLE_SIGNATURE_CHECK=1"
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================
