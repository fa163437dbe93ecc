//! Daemon application wiring.

mod init;
mod lifecycle;

pub use init::run_daemon;
pub use lifecycle::{check_status, stop_daemon};
