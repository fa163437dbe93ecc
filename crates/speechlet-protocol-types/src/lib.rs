//! Wire protocol types for the speechlet gateway.
//!
//! Everything a connector and the daemon exchange over the gateway socket is
//! defined here: the speech request envelope, the response shapes, and the
//! NDJSON frame types that carry them. This crate does no I/O and has no
//! async surface so it can be shared by servers, clients, and tests alike.

mod envelope;
mod response;
mod wire;

pub use envelope::{
    Intent, IntentRequest, LaunchRequest, RequestEnvelope, Session, SessionEndReason,
    SessionEndedRequest, SessionStartedRequest, Slot, SpeechRequest, PROTOCOL_VERSION,
};
pub use response::{OutputSpeech, Response};
pub use wire::{status, ErrorInfo, Method, WireRequest, WireResponse};
