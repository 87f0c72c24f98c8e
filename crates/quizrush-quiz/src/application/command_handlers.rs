//! Command handlers for the Quiz context.
//!
//! Each handler loads the aggregate, executes the command, persists the new
//! state and then publishes the buffered events. Publication runs every
//! downstream reaction before the handler returns.

use chrono::{DateTime, Utc};
use quizrush_core::aggregate::AggregateRoot;
use quizrush_core::clock::Clock;
use quizrush_core::command::Command;
use quizrush_core::error::DomainError;
use quizrush_core::event::GameEvent;
use quizrush_core::handler::EventPublisher;
use quizrush_core::rng::DeterministicRng;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::application::query_handlers::PlayableQuestionView;
use crate::domain::commands::{
    AbandonQuizSession, ArchiveQuestion, CompleteQuizSession, CreateQuestion, PublishQuestion,
    StartQuizSession, SubmitAnswer,
};
use crate::domain::question::{Answer, Explanation, Question, QuestionText};
use crate::domain::repositories::{QuestionRepository, QuizSessionRepository};
use crate::domain::scoring::score_answer;
use crate::domain::session::{QuizSession, SessionAnswer, SessionStatus};

/// Tunables for starting sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Minutes until a new session expires.
    pub duration_minutes: u32,
    /// Questions drawn for every session.
    pub questions_per_session: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_minutes: 30,
            questions_per_session: 10,
        }
    }
}

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct QuizCommandResult {
    /// The aggregate ID affected by the command.
    pub aggregate_id: Uuid,
    /// IDs of the events the command published.
    pub event_ids: Vec<Uuid>,
}

/// Result of starting a session.
#[derive(Debug)]
pub struct StartedQuizSession {
    /// The new session.
    pub session_id: Uuid,
    /// The player.
    pub user_id: Uuid,
    /// Difficulty tier.
    pub difficulty_id: Uuid,
    /// Optional category filter.
    pub category_id: Option<Uuid>,
    /// Drawn questions, without correctness flags.
    pub questions: Vec<PlayableQuestionView>,
    /// Submission deadline.
    pub expires_at: DateTime<Utc>,
}

/// Result of answering a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitAnswerResult {
    /// The session.
    pub session_id: Uuid,
    /// The question answered.
    pub question_id: Uuid,
    /// The chosen answer.
    pub answer_id: Uuid,
    /// Whether the chosen answer was correct.
    pub is_correct: bool,
    /// Base points awarded.
    pub points_earned: u32,
    /// Speed bonus awarded.
    pub time_bonus: u32,
    /// The question's correct answer.
    pub correct_answer_id: Uuid,
}

/// Summary of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedQuizSession {
    /// The session.
    pub session_id: Uuid,
    /// The player.
    pub user_id: Uuid,
    /// Final score.
    pub score: u64,
    /// Number of recorded answers.
    pub total_questions: u32,
    /// Number of correct answers.
    pub correct_answers: u32,
    /// Completion timestamp.
    pub completed_at: DateTime<Utc>,
}

fn event_ids(events: &[GameEvent]) -> Vec<Uuid> {
    events.iter().map(|event| event.metadata.event_id).collect()
}

async fn load_question(
    repo: &dyn QuestionRepository,
    question_id: Uuid,
) -> Result<Question, DomainError> {
    repo.find_by_id(question_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(question_id))
}

async fn load_session(
    repo: &dyn QuizSessionRepository,
    session_id: Uuid,
) -> Result<QuizSession, DomainError> {
    repo.find_by_id(session_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(session_id))
}

/// Picks `count` questions from `pool` with a partial Fisher-Yates shuffle.
fn draw_questions(
    mut pool: Vec<Question>,
    count: usize,
    rng: &mut dyn DeterministicRng,
) -> Vec<Question> {
    let len = pool.len();
    if len == 0 {
        return pool;
    }
    let last = u32::try_from(len - 1).unwrap_or(u32::MAX);
    for i in 0..count.min(len) {
        let low = u32::try_from(i).unwrap_or(last);
        let pick = rng.next_u32_range(low, last).clamp(low, last) as usize;
        pool.swap(i, pick);
    }
    pool.truncate(count);
    pool
}

/// Handles the `CreateQuestion` command: validates the input, creates a
/// draft question, persists it and publishes `QuestionCreated`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for out-of-bounds text or an invalid
/// answer set, or any repository/publication error.
#[instrument(skip(command, clock, repo, publisher), fields(category_id = %command.category_id))]
pub async fn handle_create_question(
    command: &CreateQuestion,
    clock: &dyn Clock,
    repo: &dyn QuestionRepository,
    publisher: &dyn EventPublisher,
) -> Result<QuizCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling create_question command");

    let answers = command
        .answers
        .iter()
        .map(|input| Answer::new(Uuid::new_v4(), &input.text, input.is_correct))
        .collect::<Result<Vec<_>, _>>()?;

    let mut question = Question::create(
        Uuid::new_v4(),
        QuestionText::new(&command.text)?,
        Explanation::new(&command.explanation)?,
        command.category_id,
        command.difficulty_id,
        command.created_by_id,
        answers,
        command.image_url.clone(),
        command.causation(),
        clock,
    )?;

    let events = question.take_uncommitted_events();
    repo.save(&question).await?;
    let ids = event_ids(&events);
    publisher.publish_all(events).await?;

    Ok(QuizCommandResult {
        aggregate_id: question.id(),
        event_ids: ids,
    })
}

/// Handles the `PublishQuestion` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown question and
/// `DomainError::InvariantViolation` if it is already published or archived.
#[instrument(skip(command, clock, repo), fields(question_id = %command.question_id))]
pub async fn handle_publish_question(
    command: &PublishQuestion,
    clock: &dyn Clock,
    repo: &dyn QuestionRepository,
) -> Result<QuizCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling publish_question command");

    let mut question = load_question(repo, command.question_id).await?;
    question.publish(clock)?;
    repo.save(&question).await?;

    Ok(QuizCommandResult {
        aggregate_id: command.question_id,
        event_ids: Vec::new(),
    })
}

/// Handles the `ArchiveQuestion` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown question and
/// `DomainError::InvariantViolation` if it is already archived.
#[instrument(skip(command, clock, repo), fields(question_id = %command.question_id))]
pub async fn handle_archive_question(
    command: &ArchiveQuestion,
    clock: &dyn Clock,
    repo: &dyn QuestionRepository,
) -> Result<QuizCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling archive_question command");

    let mut question = load_question(repo, command.question_id).await?;
    question.archive(clock)?;
    repo.save(&question).await?;

    Ok(QuizCommandResult {
        aggregate_id: command.question_id,
        event_ids: Vec::new(),
    })
}

/// Handles the `StartQuizSession` command: draws the questions, creates and
/// persists the session, then publishes `QuizSessionStarted`.
///
/// The session is saved before publication. If a subscriber fails (for
/// example no lives are left) the error is returned but the session stays
/// persisted as started.
///
/// # Errors
///
/// Returns `DomainError::InvariantViolation` if the user already has an
/// active session, `DomainError::Validation` if fewer published questions
/// exist than a session needs, or the first subscriber error.
#[allow(clippy::too_many_arguments)]
#[instrument(
    skip(command, settings, clock, rng, questions, sessions, publisher),
    fields(user_id = %command.user_id, difficulty_id = %command.difficulty_id)
)]
pub async fn handle_start_quiz_session(
    command: &StartQuizSession,
    settings: SessionSettings,
    clock: &dyn Clock,
    rng: &mut dyn DeterministicRng,
    questions: &dyn QuestionRepository,
    sessions: &dyn QuizSessionRepository,
    publisher: &dyn EventPublisher,
) -> Result<StartedQuizSession, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling start_quiz_session command");

    if sessions
        .find_active_by_user_id(command.user_id, clock.now())
        .await?
        .is_some()
    {
        return Err(DomainError::invariant(
            "User already has an active quiz session",
        ));
    }

    let pool = questions
        .find_published(command.difficulty_id, command.category_id)
        .await?;
    if pool.len() < settings.questions_per_session {
        return Err(DomainError::validation(
            "Not enough questions available for this difficulty/category",
        ));
    }
    let drawn = draw_questions(pool, settings.questions_per_session, rng);

    let mut session = QuizSession::create(
        Uuid::new_v4(),
        command.user_id,
        command.category_id,
        command.difficulty_id,
        settings.duration_minutes,
        command.causation(),
        clock,
    );
    let events = session.take_uncommitted_events();
    sessions.save(&session).await?;
    if let Err(error) = publisher.publish_all(events).await {
        warn!(session_id = %session.id(), %error, "session started but a subscriber failed");
        return Err(error);
    }

    Ok(StartedQuizSession {
        session_id: session.id(),
        user_id: command.user_id,
        difficulty_id: command.difficulty_id,
        category_id: command.category_id,
        questions: drawn.iter().map(PlayableQuestionView::from).collect(),
        expires_at: session.expires_at(),
    })
}

/// Handles the `SubmitAnswer` command: checks the answer belongs to the
/// question, scores it and records it on the session.
///
/// A submission that finds the session expired abandons it; the abandoned
/// state is persisted before the error is returned.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown session or
/// question, `DomainError::Validation` if the answer is not one of the
/// question's options, and `DomainError::InvariantViolation` for a session
/// that is not in progress, has expired, or already holds this question.
#[instrument(
    skip(command, clock, questions, sessions),
    fields(session_id = %command.session_id, question_id = %command.question_id)
)]
pub async fn handle_submit_answer(
    command: &SubmitAnswer,
    clock: &dyn Clock,
    questions: &dyn QuestionRepository,
    sessions: &dyn QuizSessionRepository,
) -> Result<SubmitAnswerResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling submit_answer command");

    let mut session = load_session(sessions, command.session_id).await?;
    let question = load_question(questions, command.question_id).await?;

    let answer = question
        .answer(command.answer_id)
        .ok_or_else(|| DomainError::validation("Invalid answer for question"))?;
    let correct_answer_id = question
        .correct_answer()
        .map(Answer::id)
        .ok_or_else(|| DomainError::invariant("Question has no correct answer"))?;

    let is_correct = answer.is_correct();
    let score = score_answer(is_correct, command.time_spent_ms);
    let record = SessionAnswer {
        question_id: command.question_id,
        answer_id: command.answer_id,
        is_correct,
        time_spent_ms: command.time_spent_ms,
        points_earned: score.points_earned,
        time_bonus: score.time_bonus,
    };

    let was_in_progress = session.status() == SessionStatus::InProgress;
    if let Err(error) = session.submit_answer(record, clock) {
        if was_in_progress && session.status() == SessionStatus::Abandoned {
            warn!(session_id = %command.session_id, "session expired on submission");
            sessions.save(&session).await?;
        }
        return Err(error);
    }
    sessions.save(&session).await?;

    Ok(SubmitAnswerResult {
        session_id: command.session_id,
        question_id: command.question_id,
        answer_id: command.answer_id,
        is_correct,
        points_earned: score.points_earned,
        time_bonus: score.time_bonus,
        correct_answer_id,
    })
}

/// Handles the `CompleteQuizSession` command: completes the session,
/// persists it and publishes `QuizSessionCompleted`, which triggers coin,
/// XP and ranking updates.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown session,
/// `DomainError::InvariantViolation` if it is not in progress, or the first
/// subscriber error.
#[instrument(skip(command, clock, sessions, publisher), fields(session_id = %command.session_id))]
pub async fn handle_complete_quiz_session(
    command: &CompleteQuizSession,
    clock: &dyn Clock,
    sessions: &dyn QuizSessionRepository,
    publisher: &dyn EventPublisher,
) -> Result<CompletedQuizSession, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling complete_quiz_session command");

    let mut session = load_session(sessions, command.session_id).await?;
    session.complete(command.causation(), clock)?;

    let events = session.take_uncommitted_events();
    sessions.save(&session).await?;
    publisher.publish_all(events).await?;

    Ok(CompletedQuizSession {
        session_id: session.id(),
        user_id: session.user_id(),
        score: session.score(),
        total_questions: session.total_questions(),
        correct_answers: session.correct_answers(),
        completed_at: session.completed_at().unwrap_or_else(|| clock.now()),
    })
}

/// Handles the `AbandonQuizSession` command. Nothing is published.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown session or
/// `DomainError::InvariantViolation` if it is not in progress.
#[instrument(skip(command, clock, sessions), fields(session_id = %command.session_id))]
pub async fn handle_abandon_quiz_session(
    command: &AbandonQuizSession,
    clock: &dyn Clock,
    sessions: &dyn QuizSessionRepository,
) -> Result<QuizCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling abandon_quiz_session command");

    let mut session = load_session(sessions, command.session_id).await?;
    session.abandon(clock)?;
    sessions.save(&session).await?;

    Ok(QuizCommandResult {
        aggregate_id: command.session_id,
        event_ids: Vec::new(),
    })
}
