//! Speech request envelope: session state plus one of the four request kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Version of the envelope format spoken by the gateway.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Conversation state carried with every request.
///
/// `new` is true only for the first request of a session. `attributes` is an
/// opaque bag the connector round-trips between turns; the daemon never
/// interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub new: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            new: false,
            attributes: None,
        }
    }

    /// A session on its first request.
    pub fn started(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            new: true,
            attributes: None,
        }
    }
}

/// One filled slot of an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A recognized user intent with its slot values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: HashMap::new(),
        }
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.slots.insert(
            name.clone(),
            Slot {
                name,
                value: Some(value.into()),
            },
        );
        self
    }

    /// Value of the named slot, if present and filled.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots.get(name).and_then(|s| s.value.as_deref())
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEndReason {
    UserInitiated,
    Error,
    ExceededMaxReprompts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStartedRequest {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchRequest {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRequest {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub intent: Intent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEndedRequest {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub reason: SessionEndReason,
}

/// The four request kinds a connector can deliver.
///
/// `session_started` and `session_ended` are notifications and produce no
/// spoken response; `launch` and `intent` always do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpeechRequest {
    SessionStarted(SessionStartedRequest),
    Launch(LaunchRequest),
    Intent(IntentRequest),
    SessionEnded(SessionEndedRequest),
}

impl SpeechRequest {
    /// Build an intent request with a fresh id and the current time.
    pub fn intent(intent: Intent) -> Self {
        Self::Intent(IntentRequest {
            request_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            intent,
        })
    }

    pub fn launch() -> Self {
        Self::Launch(LaunchRequest {
            request_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
        })
    }

    pub fn session_started() -> Self {
        Self::SessionStarted(SessionStartedRequest {
            request_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
        })
    }

    pub fn session_ended(reason: SessionEndReason) -> Self {
        Self::SessionEnded(SessionEndedRequest {
            request_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            reason,
        })
    }

    pub fn request_id(&self) -> &str {
        match self {
            Self::SessionStarted(r) => &r.request_id,
            Self::Launch(r) => &r.request_id,
            Self::Intent(r) => &r.request_id,
            Self::SessionEnded(r) => &r.request_id,
        }
    }

    /// Request kind as a wire-stable label, mainly for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionStarted(_) => "session_started",
            Self::Launch(_) => "launch",
            Self::Intent(_) => "intent",
            Self::SessionEnded(_) => "session_ended",
        }
    }
}

/// Everything the connector sends for one turn of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub version: String,
    pub session: Session,
    pub request: SpeechRequest,
}

impl RequestEnvelope {
    pub fn new(session: Session, request: SpeechRequest) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            session,
            request,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
