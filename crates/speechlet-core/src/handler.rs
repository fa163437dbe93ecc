//! Handler capability contracts.
//!
//! A handler implements whichever of these traits it cares about and gets
//! registered once. Intent handlers additionally declare which intents they
//! support; the other three kinds are single-slot.

use async_trait::async_trait;
use speechlet_protocol_types::{
    IntentRequest, LaunchRequest, Response, Session, SessionEndedRequest, SessionStartedRequest,
};

/// Error raised by handler logic.
///
/// Dispatch never retries or suppresses these. They travel unchanged to the
/// transport layer, which reports them as internal errors.
pub type HandlerError = anyhow::Error;

/// Result of a response-producing handler invocation.
pub type HandlerResult = Result<Response, HandlerError>;

/// Handles recognized intents.
#[async_trait]
pub trait IntentHandler: Send + Sync {
    /// Whether this handler implements the named intent.
    ///
    /// Called during resolution for every inbound intent request, so it
    /// should be a cheap predicate over the name.
    fn supports_intent(&self, intent_name: &str) -> bool;

    /// Produce the spoken response for an intent this handler supports.
    async fn handle_intent(&self, session: &Session, request: &IntentRequest) -> HandlerResult;
}

/// Handles requests that start the skill without naming an intent.
#[async_trait]
pub trait LaunchHandler: Send + Sync {
    async fn handle_launch(&self, session: &Session, request: &LaunchRequest) -> HandlerResult;
}

/// Notified when a new session begins. Produces no response.
#[async_trait]
pub trait SessionStartedHandler: Send + Sync {
    async fn handle_session_started(
        &self,
        session: &Session,
        request: &SessionStartedRequest,
    ) -> Result<(), HandlerError>;
}

/// Notified when a session ends. Produces no response.
///
/// Not invoked when a handler already ended the session through its own
/// response flag; the connector only sends `session_ended` for sessions it
/// tears down itself.
#[async_trait]
pub trait SessionEndedHandler: Send + Sync {
    async fn handle_session_ended(
        &self,
        session: &Session,
        request: &SessionEndedRequest,
    ) -> Result<(), HandlerError>;
}
