//! Test repositories: in-memory `UserRepository` doubles for handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use quizrush_core::aggregate::{AggregateRoot, UserAggregate};
use quizrush_core::error::DomainError;
use quizrush_core::repository::{Repository, UserRepository};
use uuid::Uuid;

/// A per-user repository backed by a map. Saved snapshots have their event
/// buffers cleared, like a real adapter.
#[derive(Debug)]
pub struct InMemoryUserRepository<A> {
    aggregates: Mutex<HashMap<Uuid, A>>,
    saves: Mutex<usize>,
}

impl<A> Default for InMemoryUserRepository<A> {
    fn default() -> Self {
        Self {
            aggregates: Mutex::new(HashMap::new()),
            saves: Mutex::new(0),
        }
    }
}

impl<A: UserAggregate> InMemoryUserRepository<A> {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository already holding `aggregate`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with(aggregate: A) -> Self {
        let repo = Self::default();
        repo.aggregates
            .lock()
            .unwrap()
            .insert(aggregate.aggregate_id(), aggregate);
        repo
    }

    /// Returns the stored aggregate for `user_id`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn stored_for(&self, user_id: Uuid) -> Option<A> {
        self.aggregates
            .lock()
            .unwrap()
            .values()
            .find(|a| a.user_id() == user_id)
            .cloned()
    }

    /// Snapshot of every stored aggregate, in no particular order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn all(&self) -> Vec<A> {
        self.aggregates.lock().unwrap().values().cloned().collect()
    }

    /// Number of stored aggregates.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn len(&self) -> usize {
        self.aggregates.lock().unwrap().len()
    }

    /// Whether nothing has been stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `save` calls so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl<A: UserAggregate> Repository<A> for InMemoryUserRepository<A> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<A>, DomainError> {
        Ok(self.aggregates.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, aggregate: &A) -> Result<(), DomainError> {
        let mut stored = aggregate.clone();
        stored.clear_uncommitted_events();
        self.aggregates
            .lock()
            .unwrap()
            .insert(stored.aggregate_id(), stored);
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

#[async_trait]
impl<A: UserAggregate> UserRepository<A> for InMemoryUserRepository<A> {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<A>, DomainError> {
        Ok(self.stored_for(user_id))
    }
}
