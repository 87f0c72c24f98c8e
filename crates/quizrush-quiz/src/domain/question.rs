//! The `Question` aggregate and its value objects.

use chrono::{DateTime, Utc};
use quizrush_core::aggregate::AggregateRoot;
use quizrush_core::clock::Clock;
use quizrush_core::error::DomainError;
use quizrush_core::event::{Causation, GameEvent, GameEventKind, QuestionCreated};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fewest answers a question may offer.
pub const MIN_ANSWERS: usize = 2;
/// Most answers a question may offer.
pub const MAX_ANSWERS: usize = 6;

const QUESTION_TEXT_MIN: usize = 10;
const QUESTION_TEXT_MAX: usize = 1000;
const EXPLANATION_MIN: usize = 20;
const EXPLANATION_MAX: usize = 2000;
const ANSWER_TEXT_MAX: usize = 255;

/// Trims `raw` and checks its length in characters.
fn bounded_text(raw: &str, label: &str, min: usize, max: usize) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{label} cannot be empty")));
    }
    let len = trimmed.chars().count();
    if len < min {
        return Err(DomainError::validation(format!(
            "{label} must be at least {min} characters"
        )));
    }
    if len > max {
        return Err(DomainError::validation(format!(
            "{label} must not exceed {max} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Question wording, trimmed, 10 to 1000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionText(String);

impl QuestionText {
    /// Validates and wraps question text.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the trimmed text is empty or out
    /// of bounds.
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        bounded_text(raw, "Question text", QUESTION_TEXT_MIN, QUESTION_TEXT_MAX).map(Self)
    }

    /// Returns the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Explanation shown after answering, trimmed, 20 to 2000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation(String);

impl Explanation {
    /// Validates and wraps an explanation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the trimmed text is empty or out
    /// of bounds.
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        bounded_text(raw, "Explanation", EXPLANATION_MIN, EXPLANATION_MAX).map(Self)
    }

    /// Returns the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A possible answer. Owned exclusively by its `Question`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    id: Uuid,
    text: String,
    is_correct: bool,
}

impl Answer {
    /// Creates an answer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the trimmed text is empty or
    /// longer than 255 characters.
    pub fn new(id: Uuid, text: &str, is_correct: bool) -> Result<Self, DomainError> {
        let text = bounded_text(text, "Answer text", 1, ANSWER_TEXT_MAX)?;
        Ok(Self {
            id,
            text,
            is_correct,
        })
    }

    /// Answer identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Answer wording.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this is the correct answer.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

/// Publication lifecycle of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionStatus {
    /// Authored, not yet playable.
    Draft,
    /// Playable.
    Published,
    /// Retired. Terminal.
    Archived,
}

/// The aggregate root for a quiz question.
#[derive(Debug, Clone)]
pub struct Question {
    id: Uuid,
    text: QuestionText,
    explanation: Explanation,
    image_url: Option<String>,
    category_id: Uuid,
    difficulty_id: Uuid,
    status: QuestionStatus,
    created_by_id: Uuid,
    answers: Vec<Answer>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Uncommitted events pending publication.
    uncommitted_events: Vec<GameEvent>,
}

impl Question {
    /// Creates a draft question, producing a `QuestionCreated` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless there are 2 to 6 answers
    /// with exactly one marked correct.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        id: Uuid,
        text: QuestionText,
        explanation: Explanation,
        category_id: Uuid,
        difficulty_id: Uuid,
        created_by_id: Uuid,
        answers: Vec<Answer>,
        image_url: Option<String>,
        cause: Causation,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        if !(MIN_ANSWERS..=MAX_ANSWERS).contains(&answers.len()) {
            return Err(DomainError::validation(format!(
                "Question must have between {MIN_ANSWERS} and {MAX_ANSWERS} answers"
            )));
        }
        if answers.iter().filter(|a| a.is_correct).count() != 1 {
            return Err(DomainError::validation(
                "Question must have exactly one correct answer",
            ));
        }

        let now = clock.now();
        let event = GameEvent::new(
            id,
            cause,
            now,
            GameEventKind::QuestionCreated(QuestionCreated {
                question_id: id,
                category_id,
                difficulty_id,
                created_by_id,
            }),
        );

        Ok(Self {
            id,
            text,
            explanation,
            image_url,
            category_id,
            difficulty_id,
            status: QuestionStatus::Draft,
            created_by_id,
            answers,
            created_at: now,
            updated_at: now,
            uncommitted_events: vec![event],
        })
    }

    /// Makes the question playable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if the question is already
    /// published or has been archived.
    pub fn publish(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        match self.status {
            QuestionStatus::Published => {
                Err(DomainError::invariant("Question is already published"))
            }
            QuestionStatus::Archived => {
                Err(DomainError::invariant("Cannot publish archived question"))
            }
            QuestionStatus::Draft => {
                self.status = QuestionStatus::Published;
                self.updated_at = clock.now();
                Ok(())
            }
        }
    }

    /// Retires the question from any non-archived status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if already archived.
    pub fn archive(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.status == QuestionStatus::Archived {
            return Err(DomainError::invariant("Question is already archived"));
        }
        self.status = QuestionStatus::Archived;
        self.updated_at = clock.now();
        Ok(())
    }

    /// Question identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Question wording.
    #[must_use]
    pub fn text(&self) -> &QuestionText {
        &self.text
    }

    /// Explanation shown after answering.
    #[must_use]
    pub fn explanation(&self) -> &Explanation {
        &self.explanation
    }

    /// Optional image reference.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Category identifier.
    #[must_use]
    pub fn category_id(&self) -> Uuid {
        self.category_id
    }

    /// Difficulty identifier.
    #[must_use]
    pub fn difficulty_id(&self) -> Uuid {
        self.difficulty_id
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> QuestionStatus {
        self.status
    }

    /// Whether the question is playable.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == QuestionStatus::Published
    }

    /// Author identifier.
    #[must_use]
    pub fn created_by_id(&self) -> Uuid {
        self.created_by_id
    }

    /// Offered answers, in authoring order.
    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Looks up one of this question's answers.
    #[must_use]
    pub fn answer(&self, answer_id: Uuid) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id == answer_id)
    }

    /// The single correct answer.
    #[must_use]
    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|a| a.is_correct)
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl AggregateRoot for Question {
    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn uncommitted_events(&self) -> &[GameEvent] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
