//! Shared test helpers for saga integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use quizrush_app::{AppConfig, QuizRushApp};
use quizrush_core::clock::Clock;
use quizrush_economy::domain::shop::{ShopItem, ShopItemKind};
use quizrush_quiz::application::command_handlers::{CompletedQuizSession, StartedQuizSession};
use quizrush_quiz::domain::commands::{
    AbandonQuizSession, AnswerInput, CompleteQuizSession, CreateQuestion, PublishQuestion,
    StartQuizSession, SubmitAnswer,
};
use quizrush_store::InMemoryShopCatalog;
use quizrush_test_support::{FixedClock, MockRng, fixed_now};
use uuid::Uuid;

/// Shop item granting one life.
pub const EXTRA_LIFE_ID: Uuid = Uuid::from_u128(0x11);
/// Price of [`EXTRA_LIFE_ID`].
pub const EXTRA_LIFE_PRICE: i64 = 100;
/// Shop item that is listed but not for sale.
pub const RETIRED_ITEM_ID: Uuid = Uuid::from_u128(0x22);

/// A clock frozen at the shared test instant.
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixed_now()))
}

fn catalog() -> InMemoryShopCatalog {
    InMemoryShopCatalog::new([
        ShopItem {
            id: EXTRA_LIFE_ID,
            name: "Extra life".to_owned(),
            price: EXTRA_LIFE_PRICE,
            kind: ShopItemKind::Life,
            available: true,
        },
        ShopItem {
            id: RETIRED_ITEM_ID,
            name: "Golden whisk".to_owned(),
            price: 10,
            kind: ShopItemKind::Cosmetic,
            available: false,
        },
    ])
}

/// Builds a backend with default settings, a keep-order RNG and the test
/// catalogue.
pub fn build_app(clock: Arc<dyn Clock>) -> QuizRushApp {
    QuizRushApp::new(
        &AppConfig::default(),
        clock,
        Box::new(MockRng),
        Arc::new(catalog()),
    )
}

/// Registers a fresh user and returns their ID.
pub async fn register(app: &QuizRushApp, username: &str) -> Uuid {
    let user_id = Uuid::new_v4();
    app.on_user_registered(user_id, &format!("{username}@example.com"), username)
        .await
        .unwrap();
    user_id
}

/// Creates and publishes `count` questions for `difficulty_id`.
pub async fn seed_questions(app: &QuizRushApp, difficulty_id: Uuid, count: usize) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(count);
    for n in 0..count {
        let created = app
            .create_question(&CreateQuestion {
                correlation_id: Uuid::new_v4(),
                text: format!("Which step comes first in recipe number {n}?"),
                explanation: "Mise en place always comes before cooking.".to_owned(),
                category_id: Uuid::from_u128(0xCA7),
                difficulty_id,
                created_by_id: Uuid::new_v4(),
                answers: vec![
                    AnswerInput {
                        text: "Mise en place".to_owned(),
                        is_correct: true,
                    },
                    AnswerInput {
                        text: "Plating".to_owned(),
                        is_correct: false,
                    },
                    AnswerInput {
                        text: "Tasting".to_owned(),
                        is_correct: false,
                    },
                ],
                image_url: None,
            })
            .await
            .unwrap();
        app.publish_question(&PublishQuestion {
            correlation_id: Uuid::new_v4(),
            question_id: created.aggregate_id,
        })
        .await
        .unwrap();
        ids.push(created.aggregate_id);
    }
    ids
}

/// Starts a session for `user_id`.
pub async fn start(app: &QuizRushApp, user_id: Uuid, difficulty_id: Uuid) -> StartedQuizSession {
    app.start_quiz_session(&StartQuizSession {
        correlation_id: Uuid::new_v4(),
        user_id,
        difficulty_id,
        category_id: None,
    })
    .await
    .unwrap()
}

/// Answers every drawn question, correctly or not, spending
/// `time_spent_ms` on each.
pub async fn answer_all(
    app: &QuizRushApp,
    started: &StartedQuizSession,
    correctly: bool,
    time_spent_ms: u64,
) {
    for question in &started.questions {
        let view = app.question(question.id).await.unwrap();
        let chosen = view
            .answers
            .iter()
            .find(|answer| answer.is_correct == correctly)
            .unwrap();
        app.submit_answer(&SubmitAnswer {
            correlation_id: Uuid::new_v4(),
            session_id: started.session_id,
            question_id: question.id,
            answer_id: chosen.id,
            time_spent_ms,
        })
        .await
        .unwrap();
    }
}

/// Completes a session.
pub async fn complete(app: &QuizRushApp, session_id: Uuid) -> CompletedQuizSession {
    app.complete_quiz_session(&CompleteQuizSession {
        correlation_id: Uuid::new_v4(),
        session_id,
    })
    .await
    .unwrap()
}

/// Abandons a session.
pub async fn abandon(app: &QuizRushApp, session_id: Uuid) {
    app.abandon_quiz_session(&AbandonQuizSession {
        correlation_id: Uuid::new_v4(),
        session_id,
    })
    .await
    .unwrap();
}

/// Plays one full quiz. With 1000 ms per answer each correct answer is
/// worth 100 points plus a 40 point time bonus.
pub async fn play_quiz(
    app: &QuizRushApp,
    user_id: Uuid,
    difficulty_id: Uuid,
    correctly: bool,
) -> CompletedQuizSession {
    let started = start(app, user_id, difficulty_id).await;
    answer_all(app, &started, correctly, 1000).await;
    complete(app, started.session_id).await
}
