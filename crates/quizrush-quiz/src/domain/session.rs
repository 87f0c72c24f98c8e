//! The `QuizSession` aggregate: a timed, per-user quiz run.
//!
//! ```text
//! IN_PROGRESS --complete()--> COMPLETED
//!      |
//!      +------abandon()-----> ABANDONED
//! ```
//!
//! Both exits are terminal. Expiry is not a state of its own: it is checked
//! against the clock on submission, which abandons the session.

use chrono::{DateTime, Duration, Utc};
use quizrush_core::aggregate::AggregateRoot;
use quizrush_core::clock::Clock;
use quizrush_core::error::DomainError;
use quizrush_core::event::{
    Causation, GameEvent, GameEventKind, QuizSessionCompleted, QuizSessionStarted,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Accepting answers until `expires_at`.
    InProgress,
    /// Finished by the player.
    Completed,
    /// Given up, or expired on submission.
    Abandoned,
}

/// One recorded answer. At most one per question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAnswer {
    /// Question answered.
    pub question_id: Uuid,
    /// Answer chosen.
    pub answer_id: Uuid,
    /// Whether the chosen answer was correct.
    pub is_correct: bool,
    /// Time the player took, in milliseconds.
    pub time_spent_ms: u64,
    /// Base points awarded.
    pub points_earned: u32,
    /// Speed bonus awarded.
    pub time_bonus: u32,
}

impl SessionAnswer {
    fn total_points(&self) -> u64 {
        u64::from(self.points_earned) + u64::from(self.time_bonus)
    }
}

/// The aggregate root for a quiz run.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    user_id: Uuid,
    category_id: Option<Uuid>,
    difficulty_id: Uuid,
    status: SessionStatus,
    score: u64,
    answers: Vec<SessionAnswer>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    expires_at: DateTime<Utc>,
    /// Uncommitted events pending publication.
    uncommitted_events: Vec<GameEvent>,
}

impl QuizSession {
    /// Starts a session that expires `duration_minutes` from now, producing
    /// a `QuizSessionStarted` event.
    #[must_use]
    pub fn create(
        id: Uuid,
        user_id: Uuid,
        category_id: Option<Uuid>,
        difficulty_id: Uuid,
        duration_minutes: u32,
        cause: Causation,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        let event = GameEvent::new(
            id,
            cause,
            now,
            GameEventKind::QuizSessionStarted(QuizSessionStarted {
                session_id: id,
                user_id,
                category_id,
                difficulty_id,
            }),
        );

        Self {
            id,
            user_id,
            category_id,
            difficulty_id,
            status: SessionStatus::InProgress,
            score: 0,
            answers: Vec::new(),
            started_at: now,
            completed_at: None,
            expires_at: now + Duration::minutes(i64::from(duration_minutes)),
            uncommitted_events: vec![event],
        }
    }

    /// Records an answer and adds its points to the score.
    ///
    /// A submission after `expires_at` abandons the session and is not
    /// recorded. The caller must persist the session even on that error.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if the session is not in
    /// progress, has expired, or already holds an answer for the question.
    pub fn submit_answer(
        &mut self,
        answer: SessionAnswer,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.status != SessionStatus::InProgress {
            return Err(DomainError::invariant("Session is not in progress"));
        }
        if self.is_expired(clock) {
            self.abandon(clock)?;
            return Err(DomainError::invariant("Session has expired"));
        }
        if self
            .answers
            .iter()
            .any(|recorded| recorded.question_id == answer.question_id)
        {
            return Err(DomainError::invariant(
                "Answer already submitted for this question",
            ));
        }

        self.score += answer.total_points();
        self.answers.push(answer);
        Ok(())
    }

    /// Finishes the session, producing a `QuizSessionCompleted` event with
    /// the run's totals.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if the session is not in
    /// progress.
    pub fn complete(&mut self, cause: Causation, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.status != SessionStatus::InProgress {
            return Err(DomainError::invariant("Session is not in progress"));
        }

        let now = clock.now();
        self.status = SessionStatus::Completed;
        self.completed_at = Some(now);

        let correct_answers = self.correct_answers();
        let total_questions = self.total_questions();
        let event = GameEvent::new(
            self.id,
            cause,
            now,
            GameEventKind::QuizSessionCompleted(QuizSessionCompleted {
                session_id: self.id,
                user_id: self.user_id,
                category_id: self.category_id,
                difficulty_id: self.difficulty_id,
                score: self.score,
                total_questions,
                correct_answers,
                total_points: self.total_points(),
                is_perfect_score: correct_answers == total_questions,
            }),
        );
        self.uncommitted_events.push(event);
        Ok(())
    }

    /// Gives up the session. No event is produced.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if the session is not in
    /// progress.
    pub fn abandon(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.status != SessionStatus::InProgress {
            return Err(DomainError::invariant("Session is not in progress"));
        }
        self.status = SessionStatus::Abandoned;
        self.completed_at = Some(clock.now());
        Ok(())
    }

    /// Whether the clock has passed `expires_at`. Does not change state.
    #[must_use]
    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        clock.now() > self.expires_at
    }

    /// In progress and not yet expired.
    #[must_use]
    pub fn is_in_progress(&self, clock: &dyn Clock) -> bool {
        self.status == SessionStatus::InProgress && !self.is_expired(clock)
    }

    /// Number of correct recorded answers.
    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        count_u32(self.answers.iter().filter(|a| a.is_correct).count())
    }

    /// Number of recorded answers.
    #[must_use]
    pub fn total_questions(&self) -> u32 {
        count_u32(self.answers.len())
    }

    /// Sum of base points and bonuses over all recorded answers.
    #[must_use]
    pub fn total_points(&self) -> u64 {
        self.answers.iter().map(SessionAnswer::total_points).sum()
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The player.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Optional category filter.
    #[must_use]
    pub fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }

    /// Difficulty tier.
    #[must_use]
    pub fn difficulty_id(&self) -> Uuid {
        self.difficulty_id
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Running score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Recorded answers in submission order.
    #[must_use]
    pub fn answers(&self) -> &[SessionAnswer] {
        &self.answers
    }

    /// When the session started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the session was completed or abandoned.
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Submission deadline.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl AggregateRoot for QuizSession {
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
