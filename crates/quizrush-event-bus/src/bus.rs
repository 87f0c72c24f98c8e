//! Sequential in-process dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use quizrush_core::error::DomainError;
use quizrush_core::event::GameEvent;
use quizrush_core::handler::EventPublisher;
use tracing::{debug, error};

use crate::registry::HandlerRegistry;

/// Publishes events to the handlers in a [`HandlerRegistry`].
///
/// Each handler is awaited before the next one starts. Events a handler
/// publishes are dispatched immediately, before the bus returns to the
/// remaining handlers of the outer event. The first failure stops the
/// dispatch and is returned; nothing is retried or kept for later.
#[derive(Debug, Clone)]
pub struct InProcessEventBus {
    registry: Arc<HandlerRegistry>,
}

impl InProcessEventBus {
    /// Creates a bus over a frozen registry.
    #[must_use]
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this bus dispatches through.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }
}

#[async_trait]
impl EventPublisher for InProcessEventBus {
    async fn publish_all(&self, events: Vec<GameEvent>) -> Result<(), DomainError> {
        for event in events {
            let event_type = event.metadata.event_type.as_str();
            for handler in self.registry.handlers_for(event_type) {
                debug!(
                    event_type,
                    event_id = %event.metadata.event_id,
                    correlation_id = %event.metadata.correlation_id,
                    handler = handler.handler_name(),
                    "dispatching event"
                );
                handler.handle(&event, self).await.inspect_err(|err| {
                    error!(
                        event_type,
                        event_id = %event.metadata.event_id,
                        handler = handler.handler_name(),
                        error = %err,
                        "event handler failed"
                    );
                })?;
            }
        }
        Ok(())
    }
}
