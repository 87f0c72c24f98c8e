//! Test publishers: `EventPublisher` implementations for handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use quizrush_core::error::DomainError;
use quizrush_core::event::GameEvent;
use quizrush_core::handler::EventPublisher;

/// A publisher that records every published batch and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<GameEvent>>,
}

impl RecordingPublisher {
    /// Create an empty recording publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all events published so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published_events(&self) -> Vec<GameEvent> {
        self.published.lock().unwrap().clone()
    }

    /// Returns the names of all events published so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published_types(&self) -> Vec<String> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|event| event.metadata.event_type.clone())
            .collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish_all(&self, events: Vec<GameEvent>) -> Result<(), DomainError> {
        self.published.lock().unwrap().extend(events);
        Ok(())
    }
}

/// A publisher whose subscribers always fail. Useful for testing that a
/// handler propagates downstream failures.
#[derive(Debug)]
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish_all(&self, _events: Vec<GameEvent>) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("subscriber failed".into()))
    }
}
