//! Commands for the Quiz context.

use quizrush_core::command::Command;
use uuid::Uuid;

/// One answer option supplied when authoring a question.
#[derive(Debug, Clone)]
pub struct AnswerInput {
    /// Answer wording.
    pub text: String,
    /// Whether this option is the correct one.
    pub is_correct: bool,
}

/// Command to author a new draft question.
#[derive(Debug, Clone)]
pub struct CreateQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Question wording.
    pub text: String,
    /// Explanation shown after answering.
    pub explanation: String,
    /// Category identifier.
    pub category_id: Uuid,
    /// Difficulty identifier.
    pub difficulty_id: Uuid,
    /// Author identifier.
    pub created_by_id: Uuid,
    /// Answer options, in display order.
    pub answers: Vec<AnswerInput>,
    /// Optional image reference.
    pub image_url: Option<String>,
}

impl Command for CreateQuestion {
    fn command_type(&self) -> &'static str {
        "quiz.create_question"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to make a draft question playable.
#[derive(Debug, Clone)]
pub struct PublishQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The question identifier.
    pub question_id: Uuid,
}

impl Command for PublishQuestion {
    fn command_type(&self) -> &'static str {
        "quiz.publish_question"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to retire a question.
#[derive(Debug, Clone)]
pub struct ArchiveQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The question identifier.
    pub question_id: Uuid,
}

impl Command for ArchiveQuestion {
    fn command_type(&self) -> &'static str {
        "quiz.archive_question"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to start a quiz run.
#[derive(Debug, Clone)]
pub struct StartQuizSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player.
    pub user_id: Uuid,
    /// Difficulty to draw questions from.
    pub difficulty_id: Uuid,
    /// Optional category filter.
    pub category_id: Option<Uuid>,
}

impl Command for StartQuizSession {
    fn command_type(&self) -> &'static str {
        "quiz.start_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to answer one question of a running session.
#[derive(Debug, Clone)]
pub struct SubmitAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
    /// The question being answered.
    pub question_id: Uuid,
    /// The chosen answer.
    pub answer_id: Uuid,
    /// Time the player took, in milliseconds.
    pub time_spent_ms: u64,
}

impl Command for SubmitAnswer {
    fn command_type(&self) -> &'static str {
        "quiz.submit_answer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to finish a session and trigger rewards.
#[derive(Debug, Clone)]
pub struct CompleteQuizSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
}

impl Command for CompleteQuizSession {
    fn command_type(&self) -> &'static str {
        "quiz.complete_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to give up a session.
#[derive(Debug, Clone)]
pub struct AbandonQuizSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
}

impl Command for AbandonQuizSession {
    fn command_type(&self) -> &'static str {
        "quiz.abandon_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
