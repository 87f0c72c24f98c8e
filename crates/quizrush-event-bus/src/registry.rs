//! Immutable map from event name to ordered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use quizrush_core::handler::EventHandler;

/// Collects handlers before the registry is frozen.
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    handlers: HashMap<&'static str, Vec<Arc<dyn EventHandler>>>,
}

impl HandlerRegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `handler` to every event name it declares. Handlers for the
    /// same name run in the order they were registered.
    #[must_use]
    pub fn register(mut self, handler: Arc<dyn EventHandler>) -> Self {
        for &event_type in handler.subscriptions() {
            self.handlers
                .entry(event_type)
                .or_default()
                .push(Arc::clone(&handler));
        }
        self
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            handlers: self.handlers,
        }
    }
}

/// Read-only handler lookup, shared by every publisher.
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Vec<Arc<dyn EventHandler>>>,
}

impl HandlerRegistry {
    /// Starts a new registry.
    #[must_use]
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::new()
    }

    /// Handlers subscribed to `event_type`, in registration order.
    #[must_use]
    pub fn handlers_for(&self, event_type: &str) -> &[Arc<dyn EventHandler>] {
        self.handlers
            .get(event_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of the handlers subscribed to `event_type`, in order.
    #[must_use]
    pub fn handler_names(&self, event_type: &str) -> Vec<&'static str> {
        self.handlers_for(event_type)
            .iter()
            .map(|handler| handler.handler_name())
            .collect()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (event_type, handlers) in &self.handlers {
            let names: Vec<&str> = handlers.iter().map(|h| h.handler_name()).collect();
            map.entry(event_type, &names);
        }
        map.finish()
    }
}
