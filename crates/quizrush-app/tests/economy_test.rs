//! Integration tests for purchases and lives regeneration.

mod common;

use std::sync::Arc;

use chrono::Duration;
use quizrush_app::AppError;
use quizrush_core::clock::Clock;
use quizrush_core::error::DomainError;
use quizrush_economy::domain::commands::PurchaseItem;
use quizrush_test_support::{SteppingClock, fixed_now};
use uuid::Uuid;

fn purchase(user_id: Uuid, item_id: Uuid) -> PurchaseItem {
    PurchaseItem {
        correlation_id: Uuid::new_v4(),
        user_id,
        item_id,
    }
}

#[tokio::test]
async fn test_shop_lists_only_items_on_sale() {
    let app = common::build_app(common::fixed_clock());

    let items = app.shop_items().await.unwrap();

    let ids: Vec<Uuid> = items.iter().map(|item| item.item_id).collect();
    assert_eq!(ids, vec![common::EXTRA_LIFE_ID]);
    assert_eq!(items[0].price, common::EXTRA_LIFE_PRICE);
}

#[tokio::test]
async fn test_quiz_rewards_pay_for_an_extra_life() {
    // Arrange
    let app = common::build_app(common::fixed_clock());
    let difficulty_id = Uuid::new_v4();
    common::seed_questions(&app, difficulty_id, 10).await;
    let user_id = common::register(&app, "ada").await;
    common::play_quiz(&app, user_id, difficulty_id, true).await;

    // Act
    let result = app
        .purchase_item(&purchase(user_id, common::EXTRA_LIFE_ID))
        .await
        .unwrap();

    // Assert
    assert_eq!(result.price, common::EXTRA_LIFE_PRICE);
    assert_eq!(result.balance_after, 50);
    assert_eq!(result.lives_remaining, Some(5));
    let wallet = app.wallet(user_id).await.unwrap();
    assert_eq!(wallet.lifetime_spent, 100);
    assert_eq!(app.lives(user_id).await.unwrap().current_lives, 5);
}

#[tokio::test]
async fn test_purchase_without_coins_changes_nothing() {
    let app = common::build_app(common::fixed_clock());
    let user_id = common::register(&app, "ada").await;

    let result = app
        .purchase_item(&purchase(user_id, common::EXTRA_LIFE_ID))
        .await;

    assert!(matches!(
        result,
        Err(AppError::Domain(DomainError::InvariantViolation(ref msg)))
            if msg == "Insufficient balance"
    ));
    assert_eq!(app.wallet(user_id).await.unwrap().balance, 0);
    assert_eq!(app.lives(user_id).await.unwrap().current_lives, 5);
}

#[tokio::test]
async fn test_unavailable_and_unknown_items_are_rejected() {
    let app = common::build_app(common::fixed_clock());
    let user_id = common::register(&app, "ada").await;

    let retired = app
        .purchase_item(&purchase(user_id, common::RETIRED_ITEM_ID))
        .await;
    let unknown_id = Uuid::new_v4();
    let unknown = app.purchase_item(&purchase(user_id, unknown_id)).await;

    assert!(matches!(
        retired,
        Err(AppError::Domain(DomainError::Validation(_)))
    ));
    assert!(matches!(
        unknown,
        Err(AppError::Domain(DomainError::AggregateNotFound(id))) if id == unknown_id
    ));
}

#[tokio::test]
async fn test_lives_regenerate_one_per_half_hour_on_read() {
    // Arrange
    let stepping = Arc::new(SteppingClock::new(fixed_now()));
    let clock: Arc<dyn Clock> = stepping.clone();
    let app = common::build_app(clock);
    let difficulty_id = Uuid::new_v4();
    common::seed_questions(&app, difficulty_id, 10).await;
    let user_id = common::register(&app, "ada").await;
    for _ in 0..3 {
        let started = common::start(&app, user_id, difficulty_id).await;
        common::abandon(&app, started.session_id).await;
    }

    // Act
    stepping.advance(Duration::minutes(45));
    let after_one_interval = app.lives(user_id).await.unwrap();
    stepping.advance(Duration::minutes(15));
    let after_two_intervals = app.lives(user_id).await.unwrap();

    // Assert
    assert_eq!(after_one_interval.current_lives, 3);
    assert_eq!(
        after_one_interval.next_regen_at,
        Some(fixed_now() + Duration::minutes(60))
    );
    assert_eq!(after_two_intervals.current_lives, 4);
    assert_eq!(
        after_two_intervals.last_regen_at,
        Some(fixed_now() + Duration::minutes(60))
    );
}
