//! speechlet-daemon: hosts voice skill handlers behind a Unix socket gateway.

mod app;
mod handlers;

use clap::{Parser, Subcommand};
use speechlet_config::{init_logging, Config, Paths};
use std::path::PathBuf;

/// Speechlet daemon command-line interface.
#[derive(Parser)]
#[command(name = "speechlet-daemon")]
#[command(about = "Voice skill dispatch daemon")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for runtime files; defaults to ~/.speechlet
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon attached to the terminal
    Start,
    /// Stop a running daemon
    Stop,
    /// Check whether the daemon is running
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base_dir) => Paths::with_base_dir(base_dir),
        None => Paths::new()?,
    };
    let config = Config::load(&paths)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level);

    match cli.command {
        Some(Commands::Start) | None => app::run_daemon(config, paths).await?,
        Some(Commands::Stop) => app::stop_daemon(&paths).await?,
        Some(Commands::Status) => app::check_status(&paths).await?,
    }

    Ok(())
}
