//! Round trips over a real gateway socket.

use async_trait::async_trait;
use speechlet_core::{Dispatcher, HandlerResult, IntentHandler, DEFAULT_NO_HANDLER_MESSAGE};
use speechlet_gateway::{
    status, GatewayClient, GatewayServer, Method, RequestEnvelope, SignatureVerifier, WireRequest,
    WireResponse,
};
use speechlet_protocol_types::{Intent, IntentRequest, Response, Session, SpeechRequest};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

const KEY: &str = "c3BlZWNobGV0LXRlc3Qta2V5";
const WRONG_KEY: &str = "YW4tZW50aXJlbHktb3RoZXIta2V5";

struct EchoHandler;

#[async_trait]
impl IntentHandler for EchoHandler {
    fn supports_intent(&self, intent_name: &str) -> bool {
        intent_name == "Echo"
    }

    async fn handle_intent(&self, _session: &Session, request: &IntentRequest) -> HandlerResult {
        let text = request.intent.slot_value("text").unwrap_or("nothing");
        Ok(Response::tell(format!("you said {text}")))
    }
}

struct ExplodingHandler;

#[async_trait]
impl IntentHandler for ExplodingHandler {
    fn supports_intent(&self, intent_name: &str) -> bool {
        intent_name == "Explode"
    }

    async fn handle_intent(&self, _session: &Session, _request: &IntentRequest) -> HandlerResult {
        Err(anyhow::anyhow!("kaboom"))
    }
}

struct TestGateway {
    _dir: tempfile::TempDir,
    socket: PathBuf,
    server: tokio::task::JoinHandle<()>,
}

impl TestGateway {
    async fn start(verifier: SignatureVerifier) -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let socket = dir.path().join("gateway.sock");

        let dispatcher = Arc::new(Dispatcher::default());
        dispatcher.registry().register(Arc::new(EchoHandler));
        dispatcher.registry().register(Arc::new(ExplodingHandler));

        let server = GatewayServer::new(&socket, dispatcher, verifier);
        let server = tokio::spawn(async move {
            server.run().await.expect("gateway server failed");
        });

        let gateway = Self {
            _dir: dir,
            socket,
            server,
        };
        gateway.wait_until_up().await;
        gateway
    }

    async fn wait_until_up(&self) {
        let client = self.client();
        for _ in 0..50 {
            if client.is_running().await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("gateway did not come up");
    }

    fn client(&self) -> GatewayClient {
        GatewayClient::new(&self.socket)
    }

    fn signed_client(&self, key: &str) -> GatewayClient {
        GatewayClient::new(&self.socket).with_signing_key(key)
    }

    async fn stop(self) {
        self.client().shutdown().await.expect("shutdown call failed");
        tokio::time::timeout(Duration::from_secs(5), self.server)
            .await
            .expect("server did not stop")
            .expect("server task panicked");
    }
}

fn echo_envelope(text: &str) -> RequestEnvelope {
    RequestEnvelope::new(
        Session::new("sess-1"),
        SpeechRequest::intent(Intent::named("Echo").with_slot("text", text)),
    )
}

fn speech_response(response: WireResponse) -> Response {
    serde_json::from_value(response.result.expect("expected a result"))
        .expect("result was not a speech response")
}

#[tokio::test]
async fn invoke_round_trip() {
    let gateway = TestGateway::start(SignatureVerifier::disabled()).await;

    let response = gateway
        .client()
        .invoke(&echo_envelope("hello"))
        .await
        .expect("invoke failed");
    assert!(response.is_success());

    let speech = speech_response(response);
    assert_eq!(speech.speech_content(), "you said hello");
    assert!(speech.should_end_session);

    gateway.stop().await;
}

#[tokio::test]
async fn unsupported_intent_answers_the_fallback_message() {
    let gateway = TestGateway::start(SignatureVerifier::disabled()).await;

    let envelope = RequestEnvelope::new(
        Session::new("sess-1"),
        SpeechRequest::intent(Intent::named("OrderPizza")),
    );
    let response = gateway
        .client()
        .invoke(&envelope)
        .await
        .expect("invoke failed");

    let speech = speech_response(response);
    assert_eq!(speech.speech_content(), DEFAULT_NO_HANDLER_MESSAGE);

    gateway.stop().await;
}

#[tokio::test]
async fn handler_failure_maps_to_internal_error() {
    let gateway = TestGateway::start(SignatureVerifier::disabled()).await;

    let envelope = RequestEnvelope::new(
        Session::new("sess-1"),
        SpeechRequest::intent(Intent::named("Explode")),
    );
    let response = gateway
        .client()
        .invoke(&envelope)
        .await
        .expect("invoke failed");

    let error = response.error.expect("expected an error frame");
    assert_eq!(error.code, status::INTERNAL_ERROR);
    assert!(error.message.contains("kaboom"));

    gateway.stop().await;
}

#[tokio::test]
async fn signed_requests_pass_and_unsigned_are_rejected() {
    let gateway = TestGateway::start(SignatureVerifier::new(KEY).expect("bad key")).await;

    let unsigned = gateway
        .client()
        .invoke(&echo_envelope("hello"))
        .await
        .expect("invoke failed");
    let error = unsigned.error.expect("expected a rejection");
    assert_eq!(error.code, status::BAD_REQUEST);

    let signed = gateway
        .signed_client(KEY)
        .invoke(&echo_envelope("hello"))
        .await
        .expect("invoke failed");
    assert!(signed.is_success());
    assert_eq!(speech_response(signed).speech_content(), "you said hello");

    gateway.stop().await;
}

#[tokio::test]
async fn wrong_key_signatures_are_rejected() {
    let gateway = TestGateway::start(SignatureVerifier::new(KEY).expect("bad key")).await;

    let response = gateway
        .signed_client(WRONG_KEY)
        .invoke(&echo_envelope("hello"))
        .await
        .expect("invoke failed");

    let error = response.error.expect("expected a rejection");
    assert_eq!(error.code, status::BAD_REQUEST);
    assert!(error.message.contains("signature mismatch"));

    gateway.stop().await;
}

#[tokio::test]
async fn malformed_line_fails_without_killing_the_connection() {
    let gateway = TestGateway::start(SignatureVerifier::disabled()).await;

    let stream = UnixStream::connect(&gateway.socket)
        .await
        .expect("connect failed");
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    writer.write_all(b"this is not json\n").await.unwrap();
    writer.flush().await.unwrap();
    reader.read_line(&mut line).await.unwrap();

    let response = WireResponse::from_json(line.trim()).expect("unparseable response");
    let error = response.error.expect("expected an error frame");
    assert_eq!(error.code, status::BAD_REQUEST);
    assert_eq!(response.id, "");

    // The same connection must still serve well-formed frames.
    let request = WireRequest::new(Method::Health);
    writer
        .write_all((request.to_json().unwrap() + "\n").as_bytes())
        .await
        .unwrap();
    writer.flush().await.unwrap();
    line.clear();
    reader.read_line(&mut line).await.unwrap();

    let response = WireResponse::from_json(line.trim()).expect("unparseable response");
    assert!(response.is_success());
    assert_eq!(response.id, request.id);

    gateway.stop().await;
}

#[tokio::test]
async fn notifications_are_acked_without_speech() {
    let gateway = TestGateway::start(SignatureVerifier::disabled()).await;

    let envelope =
        RequestEnvelope::new(Session::started("sess-1"), SpeechRequest::session_started());
    let response = gateway
        .client()
        .invoke(&envelope)
        .await
        .expect("invoke failed");

    assert!(response.is_success());
    let result = response.result.expect("expected an ack");
    assert_eq!(result["status"], "ok");
    assert!(result.get("output_speech").is_none());

    gateway.stop().await;
}

#[tokio::test]
async fn shutdown_stops_the_server_and_removes_the_socket() {
    let gateway = TestGateway::start(SignatureVerifier::disabled()).await;
    let socket = gateway.socket.clone();
    let client = gateway.client();

    assert!(client.is_running().await);
    gateway.stop().await;

    assert!(!socket.exists(), "socket file should be removed on shutdown");
    assert!(!client.is_running().await);
}
