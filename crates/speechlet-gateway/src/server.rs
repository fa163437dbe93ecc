//! Gateway server and client for Unix domain socket communication.
//!
//! Frames are newline-delimited JSON, one request and one response per line.
//! Connections are long-lived; a connector can deliver any number of frames
//! over one stream, and a malformed line fails only that frame.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use speechlet_core::Dispatcher;
use speechlet_protocol_types::{status, Method, RequestEnvelope, WireRequest, WireResponse};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::signature::{sign, SignatureVerifier};

/// Gateway server that listens on a Unix domain socket.
pub struct GatewayServer {
    socket_path: PathBuf,
    dispatcher: Arc<Dispatcher>,
    verifier: SignatureVerifier,
    shutdown_tx: broadcast::Sender<()>,
}

impl GatewayServer {
    /// Create a new gateway server.
    pub fn new(
        socket_path: impl Into<PathBuf>,
        dispatcher: Arc<Dispatcher>,
        verifier: SignatureVerifier,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            socket_path: socket_path.into(),
            dispatcher,
            verifier,
            shutdown_tx,
        }
    }

    /// The dispatcher this server feeds, for handler registration.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Get a shutdown receiver.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Get a shutdown sender (for anything that needs to trigger shutdown).
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Trigger shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Start the server and listen for connections.
    pub async fn run(&self) -> GatewayResult<()> {
        // Remove existing socket file
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        // Ensure parent directory exists
        if let Some(parent) = self.socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        info!(path = %self.socket_path.display(), "Gateway listening");
        if !self.verifier.is_enabled() {
            warn!("Request signature verification is DISABLED");
        }

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, _)) => {
                            let dispatcher = Arc::clone(&self.dispatcher);
                            let verifier = self.verifier.clone();
                            let shutdown_tx = self.shutdown_tx.clone();
                            tokio::spawn(async move {
                                if let Err(e) =
                                    handle_connection(stream, dispatcher, verifier, shutdown_tx)
                                        .await
                                {
                                    error!(error = %e, "Connection error");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "Accept error");
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Gateway shutting down");
                    break;
                }
            }
        }

        // Cleanup socket file
        let _ = std::fs::remove_file(&self.socket_path);

        Ok(())
    }
}

/// Handle a single connector connection.
async fn handle_connection(
    stream: UnixStream,
    dispatcher: Arc<Dispatcher>,
    verifier: SignatureVerifier,
    shutdown_tx: broadcast::Sender<()>,
) -> GatewayResult<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    debug!("Connector connected");

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            debug!("Connector disconnected");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!(request = %trimmed, "Received request");

        let request = match WireRequest::from_json(trimmed) {
            Ok(req) => req,
            Err(e) => {
                warn!(error = %e, "Failed to parse request");
                let response =
                    WireResponse::error("", status::BAD_REQUEST, &format!("Parse error: {}", e));
                let response_json = response.to_json()?;
                writer.write_all(response_json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
                continue;
            }
        };

        let response = handle_request(request, &dispatcher, &verifier, &shutdown_tx).await;

        let response_json = response.to_json()?;
        debug!(response = %response_json, "Sending response");

        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Handle one parsed frame and produce the frame to write back.
///
/// Never returns an error: every failure becomes an error frame so the
/// connection stays usable for the next request.
async fn handle_request(
    request: WireRequest,
    dispatcher: &Dispatcher,
    verifier: &SignatureVerifier,
    shutdown_tx: &broadcast::Sender<()>,
) -> WireResponse {
    match request.method {
        Method::Health => WireResponse::success(
            &request.id,
            serde_json::json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            }),
        ),
        Method::Shutdown => {
            info!("Shutdown requested over the gateway");
            let _ = shutdown_tx.send(());
            WireResponse::success(&request.id, serde_json::json!({"status": "shutting_down"}))
        }
        Method::SkillInvoke => {
            let Some(params) = request.params.as_deref() else {
                return WireResponse::error(&request.id, status::BAD_REQUEST, "params is required");
            };
            let raw = params.get();

            if let Err(e) = verifier.verify(raw.as_bytes(), request.signature.as_deref()) {
                warn!(request_id = %request.id, error = %e, "Rejecting request");
                return WireResponse::error(&request.id, status::BAD_REQUEST, &e.to_string());
            }

            let envelope: RequestEnvelope = match serde_json::from_str(raw) {
                Ok(envelope) => envelope,
                Err(e) => {
                    return WireResponse::error(
                        &request.id,
                        status::BAD_REQUEST,
                        &format!("malformed envelope: {}", e),
                    );
                }
            };

            debug!(
                kind = %envelope.request.kind(),
                request_id = %envelope.request.request_id(),
                "Dispatching"
            );
            match dispatcher.dispatch(&envelope).await {
                Ok(Some(speech)) => match serde_json::to_value(&speech) {
                    Ok(value) => WireResponse::success(&request.id, value),
                    Err(e) => WireResponse::error(
                        &request.id,
                        status::INTERNAL_ERROR,
                        &format!("failed to encode response: {}", e),
                    ),
                },
                // Notifications have no speech to return, only an ack.
                Ok(None) => {
                    WireResponse::success(&request.id, serde_json::json!({"status": "ok"}))
                }
                Err(e) => {
                    error!(
                        request_id = %envelope.request.request_id(),
                        error = %e,
                        "Handler failed"
                    );
                    WireResponse::error(&request.id, status::INTERNAL_ERROR, &e.to_string())
                }
            }
        }
    }
}

/// Gateway client for connecting to the daemon.
///
/// Opens one connection per call. When a signing key is set, `skill.invoke`
/// frames are signed automatically.
pub struct GatewayClient {
    socket_path: PathBuf,
    signing_key: Option<String>,
}

impl GatewayClient {
    /// Create a new gateway client.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            signing_key: None,
        }
    }

    /// Sign outgoing `skill.invoke` frames with this base64-encoded key.
    pub fn with_signing_key(mut self, key_base64: impl Into<String>) -> Self {
        self.signing_key = Some(key_base64.into());
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send a request and wait for response.
    pub async fn call(&self, request: WireRequest) -> GatewayResult<WireResponse> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| GatewayError::Socket(format!("Failed to connect: {}", e)))?;

        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        // Send request
        let request_json = request.to_json()?;
        writer.write_all(request_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        // Read response
        let mut line = String::new();
        reader.read_line(&mut line).await?;

        if line.is_empty() {
            return Err(GatewayError::ConnectionClosed);
        }

        let response = WireResponse::from_json(line.trim())?;
        Ok(response)
    }

    /// Deliver one speech request envelope, signing it when a key is set.
    pub async fn invoke(&self, envelope: &RequestEnvelope) -> GatewayResult<WireResponse> {
        let mut request = WireRequest::invoke(envelope)?;
        if let Some(key) = &self.signing_key {
            let payload = request.params_bytes().unwrap_or_default().to_vec();
            request = request.with_signature(sign(&payload, key)?);
        }
        self.call(request).await
    }

    pub async fn health(&self) -> GatewayResult<WireResponse> {
        self.call(WireRequest::new(Method::Health)).await
    }

    pub async fn shutdown(&self) -> GatewayResult<WireResponse> {
        self.call(WireRequest::new(Method::Shutdown)).await
    }

    /// Check if a gateway answers health probes on this socket.
    pub async fn is_running(&self) -> bool {
        self.health().await.is_ok()
    }
}

// ============================================================================
// Tests
// ============================================================================
