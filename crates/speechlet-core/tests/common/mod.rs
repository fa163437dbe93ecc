//! Shared handler fixtures for dispatch tests.
#![allow(dead_code)]

use async_trait::async_trait;
use speechlet_core::{
    HandlerError, HandlerResult, IntentHandler, LaunchHandler, SessionEndedHandler,
    SessionStartedHandler,
};
use speechlet_protocol_types::{
    Intent, IntentRequest, LaunchRequest, Response, Session, SessionEndedRequest,
    SessionStartedRequest, SpeechRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Answers a fixed reply for a fixed set of intents and counts invocations.
pub struct ScriptedHandler {
    supported: Vec<String>,
    reply: String,
    invocations: AtomicUsize,
}

impl ScriptedHandler {
    pub fn new(supported: &[&str], reply: &str) -> Arc<Self> {
        Arc::new(Self {
            supported: supported.iter().map(|s| s.to_string()).collect(),
            reply: reply.to_string(),
            invocations: AtomicUsize::new(0),
        })
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntentHandler for ScriptedHandler {
    fn supports_intent(&self, intent_name: &str) -> bool {
        self.supported.iter().any(|s| s == intent_name)
    }

    async fn handle_intent(&self, _session: &Session, _request: &IntentRequest) -> HandlerResult {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(Response::tell(self.reply.clone()))
    }
}

/// Fails every invocation with the given message.
pub struct FailingHandler {
    supported: String,
    message: String,
}

impl FailingHandler {
    pub fn new(supported: &str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            supported: supported.to_string(),
            message: message.to_string(),
        })
    }
}

#[async_trait]
impl IntentHandler for FailingHandler {
    fn supports_intent(&self, intent_name: &str) -> bool {
        intent_name == self.supported
    }

    async fn handle_intent(&self, _session: &Session, _request: &IntentRequest) -> HandlerResult {
        Err(HandlerError::msg(self.message.clone()))
    }
}

/// Launch handler with a fixed greeting.
pub struct Greeter {
    greeting: String,
}

impl Greeter {
    pub fn new(greeting: &str) -> Arc<Self> {
        Arc::new(Self {
            greeting: greeting.to_string(),
        })
    }
}

#[async_trait]
impl LaunchHandler for Greeter {
    async fn handle_launch(&self, _session: &Session, _request: &LaunchRequest) -> HandlerResult {
        Ok(Response::ask(self.greeting.clone(), "Still there?"))
    }
}

/// Records session lifecycle notifications.
#[derive(Default)]
pub struct SessionProbe {
    started: AtomicUsize,
    ended: AtomicUsize,
}

impl SessionProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn started_count(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn ended_count(&self) -> usize {
        self.ended.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStartedHandler for SessionProbe {
    async fn handle_session_started(
        &self,
        _session: &Session,
        _request: &SessionStartedRequest,
    ) -> Result<(), HandlerError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SessionEndedHandler for SessionProbe {
    async fn handle_session_ended(
        &self,
        _session: &Session,
        _request: &SessionEndedRequest,
    ) -> Result<(), HandlerError> {
        self.ended.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn intent_request(name: &str) -> IntentRequest {
    match SpeechRequest::intent(Intent::named(name)) {
        SpeechRequest::Intent(request) => request,
        _ => unreachable!(),
    }
}

pub fn launch_request() -> LaunchRequest {
    match SpeechRequest::launch() {
        SpeechRequest::Launch(request) => request,
        _ => unreachable!(),
    }
}
