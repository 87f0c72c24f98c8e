//! Aggregate root abstraction.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::event::GameEvent;

/// Trait for aggregate roots that buffer the events their mutations produce.
///
/// Handlers persist the aggregate first, then publish the buffered events
/// and clear the buffer.
pub trait AggregateRoot: Send + Sync {
    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns uncommitted events produced by command handling.
    fn uncommitted_events(&self) -> &[GameEvent];

    /// Clears uncommitted events after publication.
    fn clear_uncommitted_events(&mut self);

    /// Drains the buffer, returning the events in production order.
    fn take_uncommitted_events(&mut self) -> Vec<GameEvent> {
        let events = self.uncommitted_events().to_vec();
        self.clear_uncommitted_events();
        events
    }
}

/// An aggregate owned one-per-user and created lazily on first access.
///
/// The user is referenced only by identifier, never by holding another
/// aggregate.
pub trait UserAggregate: AggregateRoot + Clone + 'static {
    /// Returns the owning user's identifier.
    fn user_id(&self) -> Uuid;

    /// Builds the default aggregate for a user seen for the first time.
    fn new_for_user(id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Self;
}
