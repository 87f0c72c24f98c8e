//! Repository abstractions.
//!
//! Repositories load and store one aggregate at a time. Saving never
//! touches another aggregate; there is no cross-aggregate transaction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::aggregate::{AggregateRoot, UserAggregate};
use crate::clock::Clock;
use crate::error::DomainError;

/// Load/store contract shared by every aggregate repository.
#[async_trait]
pub trait Repository<A>: Send + Sync
where
    A: AggregateRoot + Clone + 'static,
{
    /// Loads an aggregate by its identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<A>, DomainError>;

    /// Persists the aggregate's current state. Buffered events are not stored.
    async fn save(&self, aggregate: &A) -> Result<(), DomainError>;
}

/// Repository for aggregates that exist once per user.
#[async_trait]
pub trait UserRepository<A>: Repository<A>
where
    A: UserAggregate,
{
    /// Loads the aggregate owned by `user_id`.
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<A>, DomainError>;

    /// Loads the user's aggregate, creating and persisting the default one
    /// if none exists yet.
    ///
    /// Check-then-create is not atomic; two concurrent first accesses may
    /// both create.
    async fn get_or_create(&self, user_id: Uuid, clock: &dyn Clock) -> Result<A, DomainError> {
        if let Some(existing) = self.find_by_user_id(user_id).await? {
            return Ok(existing);
        }
        let aggregate = A::new_for_user(Uuid::new_v4(), user_id, clock.now());
        self.save(&aggregate).await?;
        Ok(aggregate)
    }
}
