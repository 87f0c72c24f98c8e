//! Commands for the Economy context.

use quizrush_core::command::Command;
use uuid::Uuid;

/// Command to buy a shop item with coins.
#[derive(Debug, Clone)]
pub struct PurchaseItem {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The buyer.
    pub user_id: Uuid,
    /// The item to buy.
    pub item_id: Uuid,
}

impl Command for PurchaseItem {
    fn command_type(&self) -> &'static str {
        "economy.purchase_item"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
