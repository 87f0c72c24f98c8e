//! Map-backed repository usable for every aggregate type.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quizrush_core::aggregate::{AggregateRoot, UserAggregate};
use quizrush_core::error::DomainError;
use quizrush_core::repository::{Repository, UserRepository};
use quizrush_leaderboard::domain::ranking::PlayerRanking;
use quizrush_leaderboard::domain::repositories::RankingRepository;
use quizrush_quiz::domain::question::Question;
use quizrush_quiz::domain::repositories::{QuestionRepository, QuizSessionRepository};
use quizrush_quiz::domain::session::{QuizSession, SessionStatus};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Aggregates keyed by their identifier.
#[derive(Debug)]
pub struct InMemoryRepository<A> {
    aggregates: RwLock<HashMap<Uuid, A>>,
}

impl<A> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self {
            aggregates: RwLock::new(HashMap::new()),
        }
    }
}

impl<A: Clone> InMemoryRepository<A> {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored aggregates.
    pub async fn len(&self) -> usize {
        self.aggregates.read().await.len()
    }

    /// Whether nothing has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.aggregates.read().await.is_empty()
    }

    async fn snapshot_where(&self, keep: impl Fn(&A) -> bool + Send) -> Vec<A> {
        self.aggregates
            .read()
            .await
            .values()
            .filter(|aggregate| keep(aggregate))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl<A> Repository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + Clone + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<A>, DomainError> {
        Ok(self.aggregates.read().await.get(&id).cloned())
    }

    async fn save(&self, aggregate: &A) -> Result<(), DomainError> {
        let mut stored = aggregate.clone();
        stored.clear_uncommitted_events();
        let id = stored.aggregate_id();
        self.aggregates.write().await.insert(id, stored);
        debug!(aggregate_id = %id, "aggregate saved");
        Ok(())
    }
}

#[async_trait]
impl<A: UserAggregate> UserRepository<A> for InMemoryRepository<A> {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<A>, DomainError> {
        Ok(self
            .aggregates
            .read()
            .await
            .values()
            .find(|aggregate| aggregate.user_id() == user_id)
            .cloned())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository<Question> {
    async fn find_published(
        &self,
        difficulty_id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<Vec<Question>, DomainError> {
        let mut found = self
            .snapshot_where(|question| {
                question.is_published()
                    && question.difficulty_id() == difficulty_id
                    && category_id.is_none_or(|category| question.category_id() == category)
            })
            .await;
        found.sort_by_key(|question| (question.created_at(), question.id()));
        Ok(found)
    }
}

#[async_trait]
impl QuizSessionRepository for InMemoryRepository<QuizSession> {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<QuizSession>, DomainError> {
        let mut found = self
            .snapshot_where(|session| session.user_id() == user_id)
            .await;
        found.sort_by_key(|session| Reverse(session.started_at()));
        Ok(found)
    }

    async fn find_active_by_user_id(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<QuizSession>, DomainError> {
        Ok(self
            .snapshot_where(|session| {
                session.user_id() == user_id
                    && session.status() == SessionStatus::InProgress
                    && now <= session.expires_at()
            })
            .await
            .into_iter()
            .max_by_key(QuizSession::started_at))
    }
}

#[async_trait]
impl RankingRepository for InMemoryRepository<PlayerRanking> {
    async fn find_all(&self) -> Result<Vec<PlayerRanking>, DomainError> {
        Ok(self.snapshot_where(|_| true).await)
    }
}
