//! NDJSON frame types exchanged over the gateway socket.
//!
//! Each line is one frame. Requests carry the method, an optional signature,
//! and raw params; responses carry either a result or an error, never both.
//! `skill.invoke` params stay as raw JSON so signatures are computed over the
//! exact bytes the connector sent, not a re-serialization.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use uuid::Uuid;

use crate::envelope::RequestEnvelope;

/// Methods the gateway understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Deliver one speech request envelope for dispatch.
    #[serde(rename = "skill.invoke")]
    SkillInvoke,
    /// Liveness and version probe.
    Health,
    /// Ask the daemon to shut down gracefully.
    Shutdown,
}

/// One request frame.
#[derive(Debug, Serialize, Deserialize)]
pub struct WireRequest {
    pub id: String,
    pub method: Method,
    /// Base64 HMAC-SHA256 tag over the raw `params` bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Box<RawValue>>,
}

impl WireRequest {
    pub fn new(method: Method) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            method,
            signature: None,
            params: None,
        }
    }

    /// A `skill.invoke` frame carrying the given envelope, unsigned.
    pub fn invoke(envelope: &RequestEnvelope) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            method: Method::SkillInvoke,
            signature: None,
            params: Some(serde_json::value::to_raw_value(envelope)?),
        })
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Raw params bytes, exactly as they appear on the wire.
    pub fn params_bytes(&self) -> Option<&[u8]> {
        self.params.as_deref().map(|p| p.get().as_bytes())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// One response frame. Either `result` or `error` is set, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl WireResponse {
    pub fn success(id: &str, result: serde_json::Value) -> Self {
        Self {
            id: id.to_string(),
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: &str, code: u16, message: &str) -> Self {
        Self {
            id: id.to_string(),
            result: None,
            error: Some(ErrorInfo {
                code,
                message: message.to_string(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Error details attached to a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u16,
    pub message: String,
}

/// Status codes carried in [`ErrorInfo::code`].
pub mod status {
    /// Malformed frame, malformed envelope, or rejected signature.
    pub const BAD_REQUEST: u16 = 400;
    /// Handler invocation or encoding failure.
    pub const INTERNAL_ERROR: u16 = 500;
}

// ============================================================================
// Tests
// ============================================================================
