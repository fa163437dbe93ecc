//! Built-in intent handlers shipped with the daemon.
//!
//! These cover the universal navigation intents so a bare daemon answers
//! sensibly. Embedding programs register their own handlers through
//! `Dispatcher::registry()` alongside or instead of these.

mod core_intents;

pub use core_intents::{HelpIntentHandler, StopIntentHandler};

use speechlet_core::HandlerRegistry;
use std::sync::Arc;
use tracing::info;

pub fn register_builtin_handlers(registry: &HandlerRegistry) {
    registry.register(Arc::new(StopIntentHandler));
    registry.register(Arc::new(HelpIntentHandler));
    info!("Registered built-in intent handlers");
}

// ============================================================================
// Tests
// ============================================================================
