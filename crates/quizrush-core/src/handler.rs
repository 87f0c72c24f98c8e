//! Publish/subscribe seams between bounded contexts.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::event::GameEvent;

/// Publishes domain events to every subscribed handler.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes `events` in order, awaiting each event's handlers before
    /// moving to the next event.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a handler; remaining handlers and
    /// events are not dispatched.
    async fn publish_all(&self, events: Vec<GameEvent>) -> Result<(), DomainError>;
}

/// A choreography reaction to one or more event names.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Name used in logs.
    fn handler_name(&self) -> &'static str;

    /// Exact event names this handler subscribes to.
    fn subscriptions(&self) -> &'static [&'static str];

    /// Reacts to `event`, publishing any events its own aggregate produced
    /// through `publisher`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` when the reaction fails. Nothing is rolled back.
    async fn handle(
        &self,
        event: &GameEvent,
        publisher: &dyn EventPublisher,
    ) -> Result<(), DomainError>;
}

/// Error for a handler invoked with an event it does not subscribe to.
#[must_use]
pub fn unexpected_event(handler_name: &str, event: &GameEvent) -> DomainError {
    DomainError::Infrastructure(format!(
        "{handler_name} received unexpected event {}",
        event.metadata.event_type
    ))
}
