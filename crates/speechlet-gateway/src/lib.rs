//! Socket transport for the speechlet daemon.
//!
//! The gateway owns the conversation with connectors: it frames requests and
//! responses as NDJSON over a Unix domain socket, verifies request
//! signatures, decodes envelopes, and hands them to the dispatch core.
//! Payload problems and rejected signatures come back as code 400 frames,
//! handler failures as code 500 frames.

mod error;
mod server;
pub mod signature;

pub use error::{GatewayError, GatewayResult};
pub use server::{GatewayClient, GatewayServer};
pub use signature::SignatureVerifier;

// Re-export the wire types so connectors only need this crate.
pub use speechlet_protocol_types::{
    status, ErrorInfo, Method, RequestEnvelope, WireRequest, WireResponse,
};
