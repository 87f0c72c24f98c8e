//! Query handlers for the Economy context.
//!
//! The wallet and lives queries create the player's aggregate on first
//! access. Reading the lives also applies any pending regeneration.

use chrono::{DateTime, Utc};
use quizrush_core::aggregate::AggregateRoot;
use quizrush_core::clock::Clock;
use quizrush_core::error::DomainError;
use quizrush_core::event::Causation;
use quizrush_core::handler::EventPublisher;
use quizrush_core::repository::UserRepository;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::domain::lives::Lives;
use crate::domain::shop::{ShopCatalog, ShopItemKind};
use crate::domain::wallet::Wallet;

/// Read-only view of a wallet.
#[derive(Debug, Serialize)]
pub struct WalletView {
    /// Wallet identifier.
    pub wallet_id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Current balance.
    pub balance: i64,
    /// Total coins ever credited.
    pub lifetime_earned: i64,
    /// Total coins ever debited.
    pub lifetime_spent: i64,
}

/// Read-only view of a player's lives.
#[derive(Debug, Serialize)]
pub struct LivesView {
    /// Owner.
    pub user_id: Uuid,
    /// Lives left.
    pub current_lives: u32,
    /// Regeneration cap.
    pub max_lives: u32,
    /// Anchor of the regeneration timer.
    pub last_regen_at: Option<DateTime<Utc>>,
    /// When the next life regenerates.
    pub next_regen_at: Option<DateTime<Utc>>,
}

/// Read-only view of a shop item on sale.
#[derive(Debug, Serialize)]
pub struct ShopItemView {
    /// Item identifier.
    pub item_id: Uuid,
    /// Display name.
    pub name: String,
    /// Effect of the purchase.
    pub kind: ShopItemKind,
    /// Price in coins.
    pub price: i64,
}

/// Lists the items that can currently be bought. Unavailable items are
/// left out.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the catalogue fails.
pub async fn get_shop_items(catalog: &dyn ShopCatalog) -> Result<Vec<ShopItemView>, DomainError> {
    let items = catalog.list_available().await?;
    Ok(items
        .into_iter()
        .map(|item| ShopItemView {
            item_id: item.id,
            name: item.name,
            kind: item.kind,
            price: item.price,
        })
        .collect())
}

/// Returns the user's wallet, creating an empty one on first access.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
pub async fn get_wallet(
    user_id: Uuid,
    clock: &dyn Clock,
    repo: &dyn UserRepository<Wallet>,
) -> Result<WalletView, DomainError> {
    let wallet = repo.get_or_create(user_id, clock).await?;
    Ok(WalletView {
        wallet_id: wallet.id(),
        user_id,
        balance: wallet.balance(),
        lifetime_earned: wallet.lifetime_earned(),
        lifetime_spent: wallet.lifetime_spent(),
    })
}

/// Returns the user's lives after applying pending regeneration. Restored
/// lives are persisted and their `LifeRestored` event published.
///
/// # Errors
///
/// Returns `DomainError` if the repository or a subscriber fails.
pub async fn get_lives(
    user_id: Uuid,
    clock: &dyn Clock,
    repo: &dyn UserRepository<Lives>,
    publisher: &dyn EventPublisher,
) -> Result<LivesView, DomainError> {
    let mut lives = repo.get_or_create(user_id, clock).await?;

    let restored = lives.regenerate_lives(Causation::root(Uuid::new_v4()), clock);
    if restored > 0 {
        debug!(%user_id, restored, "lives regenerated on read");
        let events = lives.take_uncommitted_events();
        repo.save(&lives).await?;
        publisher.publish_all(events).await?;
    }

    Ok(LivesView {
        user_id,
        current_lives: lives.current_lives(),
        max_lives: lives.max_lives(),
        last_regen_at: lives.last_regen_at(),
        next_regen_at: lives.next_regen_at(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use quizrush_core::aggregate::UserAggregate;
    use quizrush_core::event::LIFE_RESTORED_EVENT_TYPE;
    use quizrush_test_support::{FixedClock, InMemoryUserRepository, RecordingPublisher, fixed_now};

    use super::*;
    use crate::application::command_handlers::tests::{Catalog, item};

    #[tokio::test]
    async fn test_get_shop_items_leaves_out_unavailable_items() {
        // Arrange
        let on_sale = item(ShopItemKind::Life, 100, true);
        let retired = item(ShopItemKind::Cosmetic, 10, false);
        let catalog = Catalog(vec![on_sale.clone(), retired]);

        // Act
        let items = get_shop_items(&catalog).await.unwrap();

        // Assert
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_id, on_sale.id);
        assert_eq!(items[0].kind, ShopItemKind::Life);
        assert_eq!(items[0].price, 100);
    }

    #[tokio::test]
    async fn test_get_wallet_creates_empty_wallet_on_first_access() {
        // Arrange
        let repo = InMemoryUserRepository::<Wallet>::new();
        let user_id = Uuid::new_v4();

        // Act
        let view = get_wallet(user_id, &FixedClock(fixed_now()), &repo).await.unwrap();
        let again = get_wallet(user_id, &FixedClock(fixed_now()), &repo).await.unwrap();

        // Assert
        assert_eq!(view.balance, 0);
        assert_eq!(view.lifetime_earned, 0);
        assert_eq!(view.wallet_id, again.wallet_id);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_get_lives_regenerates_persists_and_publishes() {
        // Arrange
        let user_id = Uuid::new_v4();
        let start = FixedClock(fixed_now());
        let mut lives = Lives::new_for_user(Uuid::new_v4(), user_id, fixed_now());
        for _ in 0..3 {
            lives.consume_life(Causation::root(Uuid::new_v4()), &start).unwrap();
        }
        lives.clear_uncommitted_events();
        let repo = InMemoryUserRepository::with(lives);
        let publisher = RecordingPublisher::new();
        let later = FixedClock(fixed_now() + Duration::minutes(65));

        // Act
        let view = get_lives(user_id, &later, &repo, &publisher).await.unwrap();

        // Assert
        assert_eq!(view.current_lives, 4);
        assert_eq!(view.last_regen_at, Some(fixed_now() + Duration::minutes(60)));
        assert_eq!(view.next_regen_at, Some(fixed_now() + Duration::minutes(90)));
        assert_eq!(repo.stored_for(user_id).unwrap().current_lives(), 4);
        assert_eq!(publisher.published_types(), vec![LIFE_RESTORED_EVENT_TYPE]);
    }

    #[tokio::test]
    async fn test_get_lives_without_regeneration_saves_only_on_creation() {
        let repo = InMemoryUserRepository::<Lives>::new();
        let publisher = RecordingPublisher::new();
        let user_id = Uuid::new_v4();

        let view = get_lives(user_id, &FixedClock(fixed_now()), &repo, &publisher)
            .await
            .unwrap();
        get_lives(user_id, &FixedClock(fixed_now()), &repo, &publisher)
            .await
            .unwrap();

        assert_eq!(view.current_lives, 5);
        assert_eq!(view.max_lives, 5);
        assert!(view.next_regen_at.is_none());
        assert_eq!(repo.save_count(), 1);
        assert!(publisher.published_events().is_empty());
    }
}
