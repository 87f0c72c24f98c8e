//! Repository contracts for the Quiz context.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quizrush_core::error::DomainError;
use quizrush_core::repository::Repository;
use uuid::Uuid;

use crate::domain::question::Question;
use crate::domain::session::QuizSession;

/// Storage for questions.
#[async_trait]
pub trait QuestionRepository: Repository<Question> {
    /// Published questions for a difficulty, optionally narrowed to one
    /// category, in a stable order (oldest first).
    async fn find_published(
        &self,
        difficulty_id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<Vec<Question>, DomainError>;
}

/// Storage for quiz sessions.
#[async_trait]
pub trait QuizSessionRepository: Repository<QuizSession> {
    /// All of a user's sessions, newest first.
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<QuizSession>, DomainError>;

    /// The user's session that is in progress and not expired at `now`.
    async fn find_active_by_user_id(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<QuizSession>, DomainError>;
}
