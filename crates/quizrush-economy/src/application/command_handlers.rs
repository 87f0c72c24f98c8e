//! Command handlers for the Economy context.

use quizrush_core::aggregate::AggregateRoot;
use quizrush_core::clock::Clock;
use quizrush_core::command::Command;
use quizrush_core::error::DomainError;
use quizrush_core::handler::EventPublisher;
use quizrush_core::repository::UserRepository;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::commands::PurchaseItem;
use crate::domain::lives::Lives;
use crate::domain::shop::{ShopCatalog, ShopItemKind};
use crate::domain::wallet::Wallet;

/// Source recorded on coins spent in the shop.
pub const SHOP_PURCHASE_SOURCE: &str = "shop_purchase";

/// Result of a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseResult {
    /// The item bought.
    pub item_id: Uuid,
    /// Its display name.
    pub item_name: String,
    /// Coins paid.
    pub price: i64,
    /// Wallet balance after paying.
    pub balance_after: i64,
    /// Lives after the effect, for items that grant a life.
    pub lives_remaining: Option<u32>,
}

/// Handles the `PurchaseItem` command: charges the wallet, then applies the
/// item's effect.
///
/// The wallet and the lives are separate aggregates, each persisted and
/// published on its own; there is no transaction spanning both.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown item,
/// `DomainError::Validation` for an unavailable one, and
/// `DomainError::InvariantViolation` if the balance does not cover the price.
#[instrument(
    skip(command, clock, catalog, wallets, lives, publisher),
    fields(user_id = %command.user_id, item_id = %command.item_id)
)]
pub async fn handle_purchase_item(
    command: &PurchaseItem,
    clock: &dyn Clock,
    catalog: &dyn ShopCatalog,
    wallets: &dyn UserRepository<Wallet>,
    lives: &dyn UserRepository<Lives>,
    publisher: &dyn EventPublisher,
) -> Result<PurchaseResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling purchase_item command");

    let item = catalog
        .find_item(command.item_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(command.item_id))?;
    if !item.available {
        return Err(DomainError::validation("Item is not available for purchase"));
    }

    let cause = command.causation();
    let description = format!("Purchased {}", item.name);
    let mut wallet = wallets.get_or_create(command.user_id, clock).await?;
    wallet.spend_coins(
        item.price,
        SHOP_PURCHASE_SOURCE,
        Some(description.as_str()),
        cause,
        clock,
    )?;
    let wallet_events = wallet.take_uncommitted_events();
    wallets.save(&wallet).await?;
    publisher.publish_all(wallet_events).await?;

    let lives_remaining = match item.kind {
        ShopItemKind::Life => {
            let mut player_lives = lives.get_or_create(command.user_id, clock).await?;
            player_lives.restore_life(true, cause, clock)?;
            let events = player_lives.take_uncommitted_events();
            lives.save(&player_lives).await?;
            publisher.publish_all(events).await?;
            Some(player_lives.current_lives())
        }
        ShopItemKind::Cosmetic => None,
    };

    Ok(PurchaseResult {
        item_id: item.id,
        item_name: item.name,
        price: item.price,
        balance_after: wallet.balance(),
        lives_remaining,
    })
}
