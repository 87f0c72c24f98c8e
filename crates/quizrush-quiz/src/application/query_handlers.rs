//! Query handlers for the Quiz context.
//!
//! Load aggregates from their repositories and return read-only views.

use chrono::{DateTime, Utc};
use quizrush_core::error::DomainError;
use quizrush_core::repository::Repository;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::question::{Question, QuestionStatus};
use crate::domain::repositories::{QuestionRepository, QuizSessionRepository};
use crate::domain::session::{QuizSession, SessionAnswer, SessionStatus};

/// An answer option as shown to a player: no correctness flag.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOptionView {
    /// Answer identifier.
    pub id: Uuid,
    /// Answer wording.
    pub text: String,
}

/// A question as handed out at session start.
#[derive(Debug, Clone, Serialize)]
pub struct PlayableQuestionView {
    /// Question identifier.
    pub id: Uuid,
    /// Question wording.
    pub text: String,
    /// Optional image reference.
    pub image_url: Option<String>,
    /// Options in authoring order.
    pub answers: Vec<AnswerOptionView>,
}

impl From<&Question> for PlayableQuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id(),
            text: question.text().as_str().to_owned(),
            image_url: question.image_url().map(str::to_owned),
            answers: question
                .answers()
                .iter()
                .map(|answer| AnswerOptionView {
                    id: answer.id(),
                    text: answer.text().to_owned(),
                })
                .collect(),
        }
    }
}

/// Full view of an answer, correctness included.
#[derive(Debug, Serialize)]
pub struct AnswerView {
    /// Answer identifier.
    pub id: Uuid,
    /// Answer wording.
    pub text: String,
    /// Whether this is the correct answer.
    pub is_correct: bool,
}

/// Full view of a question for authors.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    /// Question identifier.
    pub question_id: Uuid,
    /// Question wording.
    pub text: String,
    /// Explanation shown after answering.
    pub explanation: String,
    /// Optional image reference.
    pub image_url: Option<String>,
    /// Category identifier.
    pub category_id: Uuid,
    /// Difficulty identifier.
    pub difficulty_id: Uuid,
    /// Lifecycle status.
    pub status: QuestionStatus,
    /// Author identifier.
    pub created_by_id: Uuid,
    /// Options in authoring order.
    pub answers: Vec<AnswerView>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Read-only view of a quiz session.
#[derive(Debug, Serialize)]
pub struct QuizSessionView {
    /// Session identifier.
    pub session_id: Uuid,
    /// The player.
    pub user_id: Uuid,
    /// Optional category filter.
    pub category_id: Option<Uuid>,
    /// Difficulty tier.
    pub difficulty_id: Uuid,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Running score.
    pub score: u64,
    /// Recorded answers in submission order.
    pub answers: Vec<SessionAnswer>,
    /// Number of correct recorded answers.
    pub correct_answers: u32,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session was completed or abandoned.
    pub completed_at: Option<DateTime<Utc>>,
    /// Submission deadline.
    pub expires_at: DateTime<Utc>,
}

impl From<&QuizSession> for QuizSessionView {
    fn from(session: &QuizSession) -> Self {
        Self {
            session_id: session.id(),
            user_id: session.user_id(),
            category_id: session.category_id(),
            difficulty_id: session.difficulty_id(),
            status: session.status(),
            score: session.score(),
            answers: session.answers().to_vec(),
            correct_answers: session.correct_answers(),
            started_at: session.started_at(),
            completed_at: session.completed_at(),
            expires_at: session.expires_at(),
        }
    }
}

/// Retrieves a question by its identifier.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no such question exists.
pub async fn get_question_by_id(
    question_id: Uuid,
    repo: &dyn QuestionRepository,
) -> Result<QuestionView, DomainError> {
    let question = repo
        .find_by_id(question_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(question_id))?;

    Ok(QuestionView {
        question_id,
        text: question.text().as_str().to_owned(),
        explanation: question.explanation().as_str().to_owned(),
        image_url: question.image_url().map(str::to_owned),
        category_id: question.category_id(),
        difficulty_id: question.difficulty_id(),
        status: question.status(),
        created_by_id: question.created_by_id(),
        answers: question
            .answers()
            .iter()
            .map(|answer| AnswerView {
                id: answer.id(),
                text: answer.text().to_owned(),
                is_correct: answer.is_correct(),
            })
            .collect(),
        created_at: question.created_at(),
        updated_at: question.updated_at(),
    })
}

/// Retrieves a quiz session by its identifier.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no such session exists.
pub async fn get_session_by_id(
    session_id: Uuid,
    repo: &dyn QuizSessionRepository,
) -> Result<QuizSessionView, DomainError> {
    let session = repo
        .find_by_id(session_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(session_id))?;
    Ok(QuizSessionView::from(&session))
}

/// Lists a user's sessions, newest first. An unknown user has none.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
pub async fn list_sessions_for_user(
    user_id: Uuid,
    repo: &dyn QuizSessionRepository,
) -> Result<Vec<QuizSessionView>, DomainError> {
    let sessions = repo.find_by_user_id(user_id).await?;
    Ok(sessions.iter().map(QuizSessionView::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::command_handlers::tests::{
        InMemoryQuestions, InMemorySessions, sample_question,
    };
    use quizrush_core::event::Causation;
    use quizrush_test_support::{FixedClock, fixed_now};

    #[tokio::test]
    async fn test_get_question_by_id_returns_full_view() {
        // Arrange
        let repo = InMemoryQuestions::default();
        let question = sample_question(Uuid::new_v4(), None);
        repo.save(&question).await.unwrap();

        // Act
        let view = get_question_by_id(question.id(), &repo).await.unwrap();

        // Assert
        assert_eq!(view.question_id, question.id());
        assert_eq!(view.status, QuestionStatus::Draft);
        assert_eq!(view.answers.len(), 4);
        assert_eq!(view.answers.iter().filter(|a| a.is_correct).count(), 1);
    }

    #[tokio::test]
    async fn test_get_question_by_id_reports_missing_question() {
        let repo = InMemoryQuestions::default();
        let missing = Uuid::new_v4();

        let result = get_question_by_id(missing, &repo).await;

        assert_eq!(result.unwrap_err(), DomainError::AggregateNotFound(missing));
    }

    #[tokio::test]
    async fn test_get_session_by_id_returns_view() {
        // Arrange
        let repo = InMemorySessions::default();
        let session = QuizSession::create(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            Uuid::new_v4(),
            30,
            Causation::root(Uuid::new_v4()),
            &FixedClock(fixed_now()),
        );
        repo.save(&session).await.unwrap();

        // Act
        let view = get_session_by_id(session.id(), &repo).await.unwrap();

        // Assert
        assert_eq!(view.session_id, session.id());
        assert_eq!(view.status, SessionStatus::InProgress);
        assert_eq!(view.score, 0);
        assert_eq!(view.expires_at, session.expires_at());
    }

    #[tokio::test]
    async fn test_list_sessions_for_unknown_user_is_empty() {
        let repo = InMemorySessions::default();

        let views = list_sessions_for_user(Uuid::new_v4(), &repo).await.unwrap();

        assert!(views.is_empty());
    }

    #[test]
    fn test_playable_view_hides_correctness() {
        let question = sample_question(Uuid::new_v4(), None);

        let view = PlayableQuestionView::from(&question);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(view.answers.len(), 4);
        assert!(json["answers"][0].get("is_correct").is_none());
    }
}
