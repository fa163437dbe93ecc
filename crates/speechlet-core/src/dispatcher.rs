//! Routes each inbound speech request to at most one handler.

use std::sync::Arc;

use async_trait::async_trait;
use speechlet_protocol_types::{
    IntentRequest, LaunchRequest, RequestEnvelope, Response, Session, SessionEndedRequest,
    SessionStartedRequest, SpeechRequest,
};
use tracing::{debug, info, warn};

use crate::handler::{HandlerError, HandlerResult, IntentHandler};
use crate::registry::HandlerRegistry;

/// Spoken when no registered handler supports an intent.
pub const DEFAULT_NO_HANDLER_MESSAGE: &str =
    "I'm sorry - there is no implementation for this request.";

/// Messages spoken on the dispatcher's own fallback paths.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Spoken on launch when no launch handler is registered. Empty by
    /// default: a skill without a launch handler greets with silence.
    pub default_launch_message: String,
    /// Spoken when no registered handler supports an intent.
    pub no_handler_message: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_launch_message: String::new(),
            no_handler_message: DEFAULT_NO_HANDLER_MESSAGE.to_string(),
        }
    }
}

/// Terminal fallback used when resolution finds no intent handler. Supports
/// every intent and answers with the configured no-handler message.
struct NoHandlerFallback {
    message: String,
}

#[async_trait]
impl IntentHandler for NoHandlerFallback {
    fn supports_intent(&self, _intent_name: &str) -> bool {
        true
    }

    async fn handle_intent(&self, _session: &Session, _request: &IntentRequest) -> HandlerResult {
        Ok(Response::tell(self.message.clone()))
    }
}

/// Resolves each request against the registry and invokes the winner.
///
/// Resolution is deterministic: the first registered handler that supports
/// an intent wins, and ties are logged. Handler failures propagate to the
/// caller unchanged. No registry lock is held while a handler runs.
pub struct Dispatcher {
    registry: HandlerRegistry,
    config: DispatchConfig,
    fallback: Arc<dyn IntentHandler>,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        let fallback = Arc::new(NoHandlerFallback {
            message: config.no_handler_message.clone(),
        });
        Self {
            registry: HandlerRegistry::new(),
            config,
            fallback,
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Route one envelope to the entry point for its request kind.
    ///
    /// Notifications (`session_started`, `session_ended`) yield `None`;
    /// `launch` and `intent` always yield a response on success.
    pub async fn dispatch(
        &self,
        envelope: &RequestEnvelope,
    ) -> Result<Option<Response>, HandlerError> {
        let session = &envelope.session;
        match &envelope.request {
            SpeechRequest::SessionStarted(request) => {
                self.on_session_started(session, request).await?;
                Ok(None)
            }
            SpeechRequest::Launch(request) => Ok(Some(self.on_launch(session, request).await?)),
            SpeechRequest::Intent(request) => Ok(Some(self.on_intent(session, request).await?)),
            SpeechRequest::SessionEnded(request) => {
                self.on_session_ended(session, request).await?;
                Ok(None)
            }
        }
    }

    pub async fn on_session_started(
        &self,
        session: &Session,
        request: &SessionStartedRequest,
    ) -> Result<(), HandlerError> {
        info!(session_id = %session.id, "session started");
        match self.registry.session_started_handler() {
            Some(handler) => handler.handle_session_started(session, request).await,
            None => {
                debug!("no session started handler registered");
                Ok(())
            }
        }
    }

    pub async fn on_launch(&self, session: &Session, request: &LaunchRequest) -> HandlerResult {
        info!(session_id = %session.id, "launch request");
        match self.registry.launch_handler() {
            Some(handler) => handler.handle_launch(session, request).await,
            None => Ok(Response::tell(self.config.default_launch_message.clone())),
        }
    }

    pub async fn on_intent(&self, session: &Session, request: &IntentRequest) -> HandlerResult {
        let intent_name = request.intent.name.as_str();
        info!(session_id = %session.id, intent = %intent_name, "processing intent request");

        let matched = self.registry.matching(intent_name);
        if matched.len() > 1 {
            warn!(
                intent = %intent_name,
                handlers = matched.len(),
                "multiple handlers support intent, using the first registered"
            );
        }
        let handler = matched
            .into_iter()
            .next()
            .unwrap_or_else(|| Arc::clone(&self.fallback));

        handler.handle_intent(session, request).await
    }

    pub async fn on_session_ended(
        &self,
        session: &Session,
        request: &SessionEndedRequest,
    ) -> Result<(), HandlerError> {
        info!(session_id = %session.id, reason = ?request.reason, "session ended");
        match self.registry.session_ended_handler() {
            Some(handler) => handler.handle_session_ended(session, request).await,
            None => {
                debug!("no session ended handler registered");
                Ok(())
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
