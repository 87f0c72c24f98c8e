//! Fixed shop catalogue held in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use quizrush_core::error::DomainError;
use quizrush_economy::domain::shop::{ShopCatalog, ShopItem};
use uuid::Uuid;

/// Catalogue loaded once and never modified.
#[derive(Debug, Default)]
pub struct InMemoryShopCatalog {
    items: HashMap<Uuid, ShopItem>,
}

impl InMemoryShopCatalog {
    /// Creates a catalogue offering `items`.
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = ShopItem>) -> Self {
        Self {
            items: items.into_iter().map(|item| (item.id, item)).collect(),
        }
    }
}

#[async_trait]
impl ShopCatalog for InMemoryShopCatalog {
    async fn find_item(&self, item_id: Uuid) -> Result<Option<ShopItem>, DomainError> {
        Ok(self.items.get(&item_id).cloned())
    }

    async fn list_available(&self) -> Result<Vec<ShopItem>, DomainError> {
        let mut available: Vec<ShopItem> = self
            .items
            .values()
            .filter(|item| item.available)
            .cloned()
            .collect();
        available.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.name.cmp(&b.name)));
        Ok(available)
    }
}
