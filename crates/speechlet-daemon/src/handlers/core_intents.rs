//! Stop/Cancel and Help handlers.

use async_trait::async_trait;
use speechlet_core::{HandlerResult, IntentHandler};
use speechlet_protocol_types::{IntentRequest, Response, Session};

const STOP_MESSAGE: &str = "Goodbye.";
const HELP_MESSAGE: &str = "You can ask me anything this skill supports, or say stop to exit.";
const HELP_REPROMPT: &str = "What would you like to do?";

/// Ends the session on Stop or Cancel.
pub struct StopIntentHandler;

#[async_trait]
impl IntentHandler for StopIntentHandler {
    fn supports_intent(&self, intent_name: &str) -> bool {
        matches!(intent_name, "Stop" | "Cancel")
    }

    async fn handle_intent(&self, _session: &Session, _request: &IntentRequest) -> HandlerResult {
        Ok(Response::tell(STOP_MESSAGE))
    }
}

/// Answers Help with a prompt and keeps the session open.
pub struct HelpIntentHandler;

#[async_trait]
impl IntentHandler for HelpIntentHandler {
    fn supports_intent(&self, intent_name: &str) -> bool {
        intent_name == "Help"
    }

    async fn handle_intent(&self, _session: &Session, _request: &IntentRequest) -> HandlerResult {
        Ok(Response::ask(HELP_MESSAGE, HELP_REPROMPT))
    }
}

// ============================================================================
// Tests
// ============================================================================
