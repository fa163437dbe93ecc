//! Registry of currently available handlers.

use std::sync::{Arc, RwLock};

use crate::handler::{IntentHandler, LaunchHandler, SessionEndedHandler, SessionStartedHandler};

/// Compare two shared handlers by allocation identity.
///
/// Data pointers are compared rather than `Arc::ptr_eq` so two fat pointers
/// to the same allocation always agree even if their vtables differ.
fn same_instance<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Live set of registered handlers.
///
/// Handlers come and go at runtime while requests are in flight. All reads
/// return snapshots: the lock is released before the caller invokes any
/// handler, so slow handler logic never blocks registration, and a removed
/// handler may still finish an invocation that had already resolved to it.
#[derive(Default)]
pub struct HandlerRegistry {
    intent_handlers: RwLock<Vec<Arc<dyn IntentHandler>>>,
    launch: RwLock<Option<Arc<dyn LaunchHandler>>>,
    session_started: RwLock<Option<Arc<dyn SessionStartedHandler>>>,
    session_ended: RwLock<Option<Arc<dyn SessionEndedHandler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an intent handler at the end of the resolution order.
    ///
    /// Registering the same instance again is a no-op, so a handler bound
    /// twice is never consulted twice for one request.
    pub fn register(&self, handler: Arc<dyn IntentHandler>) {
        let mut handlers = self.intent_handlers.write().unwrap();
        if handlers.iter().any(|h| same_instance(h, &handler)) {
            return;
        }
        handlers.push(handler);
    }

    /// Remove an intent handler by instance identity.
    ///
    /// Quietly does nothing when the instance was never registered.
    pub fn unregister(&self, handler: &Arc<dyn IntentHandler>) {
        let mut handlers = self.intent_handlers.write().unwrap();
        handlers.retain(|h| !same_instance(h, handler));
    }

    /// Every registered handler that supports the intent, in registration
    /// order. Operates on a snapshot taken under the lock; the predicate
    /// runs after the lock is released.
    pub fn matching(&self, intent_name: &str) -> Vec<Arc<dyn IntentHandler>> {
        let snapshot: Vec<_> = self.intent_handlers.read().unwrap().clone();
        snapshot
            .into_iter()
            .filter(|h| h.supports_intent(intent_name))
            .collect()
    }

    pub fn intent_handler_count(&self) -> usize {
        self.intent_handlers.read().unwrap().len()
    }

    /// Set or clear the launch handler. The latest registration wins.
    pub fn set_launch_handler(&self, handler: Option<Arc<dyn LaunchHandler>>) {
        *self.launch.write().unwrap() = handler;
    }

    pub fn launch_handler(&self) -> Option<Arc<dyn LaunchHandler>> {
        self.launch.read().unwrap().clone()
    }

    /// Set or clear the session started handler. The latest registration wins.
    pub fn set_session_started_handler(&self, handler: Option<Arc<dyn SessionStartedHandler>>) {
        *self.session_started.write().unwrap() = handler;
    }

    pub fn session_started_handler(&self) -> Option<Arc<dyn SessionStartedHandler>> {
        self.session_started.read().unwrap().clone()
    }

    /// Set or clear the session ended handler. The latest registration wins.
    pub fn set_session_ended_handler(&self, handler: Option<Arc<dyn SessionEndedHandler>>) {
        *self.session_ended.write().unwrap() = handler;
    }

    pub fn session_ended_handler(&self) -> Option<Arc<dyn SessionEndedHandler>> {
        self.session_ended.read().unwrap().clone()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerResult;
    use async_trait::async_trait;
    use speechlet_protocol_types::{IntentRequest, Response, Session};

    struct FixedIntentHandler {
        supported: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl IntentHandler for FixedIntentHandler {
        fn supports_intent(&self, intent_name: &str) -> bool {
            intent_name == self.supported
        }

        async fn handle_intent(
            &self,
            _session: &Session,
            _request: &IntentRequest,
        ) -> HandlerResult {
            Ok(Response::tell(self.reply))
        }
    }

    fn handler(supported: &'static str, reply: &'static str) -> Arc<dyn IntentHandler> {
        Arc::new(FixedIntentHandler { supported, reply })
    }

    #[test]
    fn test_register_and_match() {
        let registry = HandlerRegistry::new();
        registry.register(handler("Play", "playing"));
        registry.register(handler("Stop", "stopped"));

        assert_eq!(registry.intent_handler_count(), 2);
        assert_eq!(registry.matching("Play").len(), 1);
        assert_eq!(registry.matching("Pause").len(), 0);
    }

    #[test]
    fn test_duplicate_registration_is_noop() {
        let registry = HandlerRegistry::new();
        let play = handler("Play", "playing");

        registry.register(Arc::clone(&play));
        registry.register(Arc::clone(&play));

        assert_eq!(registry.intent_handler_count(), 1);
        assert_eq!(registry.matching("Play").len(), 1);
    }

    #[test]
    fn test_distinct_instances_both_registered() {
        let registry = HandlerRegistry::new();
        registry.register(handler("Play", "first"));
        registry.register(handler("Play", "second"));

        // Same intent, different instances: both stay, in registration order.
        let matched = registry.matching("Play");
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_unregister_by_identity() {
        let registry = HandlerRegistry::new();
        let play = handler("Play", "playing");
        let stop = handler("Stop", "stopped");

        registry.register(Arc::clone(&play));
        registry.register(Arc::clone(&stop));
        registry.unregister(&play);

        assert_eq!(registry.intent_handler_count(), 1);
        assert!(registry.matching("Play").is_empty());
        assert_eq!(registry.matching("Stop").len(), 1);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let registry = HandlerRegistry::new();
        registry.register(handler("Play", "playing"));

        let never_registered = handler("Play", "other");
        registry.unregister(&never_registered);

        assert_eq!(registry.intent_handler_count(), 1);
    }

    #[test]
    fn test_matching_preserves_registration_order() {
        let registry = HandlerRegistry::new();
        let first = handler("Play", "first");
        let second = handler("Play", "second");
        registry.register(Arc::clone(&first));
        registry.register(Arc::clone(&second));

        let matched = registry.matching("Play");
        assert!(same_instance(&matched[0], &first));
        assert!(same_instance(&matched[1], &second));
    }

    #[test]
    fn test_single_slot_latest_wins() {
        struct Launch;

        #[async_trait]
        impl crate::handler::LaunchHandler for Launch {
            async fn handle_launch(
                &self,
                _session: &Session,
                _request: &speechlet_protocol_types::LaunchRequest,
            ) -> HandlerResult {
                Ok(Response::tell("welcome"))
            }
        }

        let registry = HandlerRegistry::new();
        assert!(registry.launch_handler().is_none());

        let first: Arc<dyn crate::handler::LaunchHandler> = Arc::new(Launch);
        let second: Arc<dyn crate::handler::LaunchHandler> = Arc::new(Launch);
        registry.set_launch_handler(Some(Arc::clone(&first)));
        registry.set_launch_handler(Some(Arc::clone(&second)));

        let current = registry.launch_handler().unwrap();
        assert!(same_instance(&current, &second));

        registry.set_launch_handler(None);
        assert!(registry.launch_handler().is_none());
    }
}
