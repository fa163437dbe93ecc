//! Request signature verification.
//!
//! Connectors sign the raw `params` bytes of every `skill.invoke` frame with
//! HMAC-SHA256 under a shared key and send the tag base64-encoded in the
//! frame's `signature` field. The daemon verifies against the same bytes it
//! received, so re-serialization differences can never invalidate a tag.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{GatewayError, GatewayResult};

type HmacSha256 = Hmac<Sha256>;

/// Checks `skill.invoke` signatures against the shared key.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: Option<Vec<u8>>,
}

impl SignatureVerifier {
    /// Verifier backed by a base64-encoded key.
    pub fn new(key_base64: &str) -> GatewayResult<Self> {
        let key = BASE64
            .decode(key_base64)
            .map_err(|e| GatewayError::Signature(format!("invalid signing key: {e}")))?;
        if key.is_empty() {
            return Err(GatewayError::Signature("signing key is empty".to_string()));
        }
        Ok(Self { key: Some(key) })
    }

    /// Verification switched off. Every request passes regardless of
    /// signature. Only for development setups on trusted sockets.
    pub fn disabled() -> Self {
        Self { key: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    /// Check a signature over the raw payload bytes.
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> GatewayResult<()> {
        let Some(key) = self.key.as_deref() else {
            return Ok(());
        };
        let Some(signature) = signature else {
            return Err(GatewayError::Signature("missing signature".to_string()));
        };
        let tag = BASE64
            .decode(signature)
            .map_err(|e| GatewayError::Signature(format!("invalid signature encoding: {e}")))?;

        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|e| GatewayError::Signature(e.to_string()))?;
        mac.update(payload);
        mac.verify_slice(&tag)
            .map_err(|_| GatewayError::Signature("signature mismatch".to_string()))
    }
}

/// Sign payload bytes with a base64-encoded key. Connector-side counterpart
/// of [`SignatureVerifier::verify`].
pub fn sign(payload: &[u8], key_base64: &str) -> GatewayResult<String> {
    let key = BASE64
        .decode(key_base64)
        .map_err(|e| GatewayError::Signature(format!("invalid signing key: {e}")))?;
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| GatewayError::Signature(e.to_string()))?;
    mac.update(payload);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

// ============================================================================
// Tests
// ============================================================================
