//! Shop catalogue.

use async_trait::async_trait;
use quizrush_core::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What buying an item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShopItemKind {
    /// Grants one life, even above the regeneration cap.
    Life,
    /// Purely cosmetic; only the coins change hands.
    Cosmetic,
}

/// An item offered in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    /// Item identifier.
    pub id: Uuid,
    /// Display name, used in the transaction description.
    pub name: String,
    /// Price in coins.
    pub price: i64,
    /// Effect of the purchase.
    pub kind: ShopItemKind,
    /// Whether the item can currently be bought.
    pub available: bool,
}

/// Read access to the shop catalogue.
#[async_trait]
pub trait ShopCatalog: Send + Sync {
    /// Looks up an item.
    async fn find_item(&self, item_id: Uuid) -> Result<Option<ShopItem>, DomainError>;

    /// Items that can currently be bought.
    async fn list_available(&self) -> Result<Vec<ShopItem>, DomainError>;
}
