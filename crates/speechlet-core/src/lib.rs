//! Dispatch core for the speechlet daemon.
//!
//! Handlers implement the capability traits, live in a [`HandlerRegistry`],
//! and get invoked by the [`Dispatcher`], which applies the resolution
//! policy: the first registered supporting handler wins, fallback messages
//! cover the no-handler paths, and handler failures propagate to the
//! transport untouched.

mod dispatcher;
mod handler;
mod registry;

pub use dispatcher::{DispatchConfig, Dispatcher, DEFAULT_NO_HANDLER_MESSAGE};
pub use handler::{
    HandlerError, HandlerResult, IntentHandler, LaunchHandler, SessionEndedHandler,
    SessionStartedHandler,
};
pub use registry::HandlerRegistry;
