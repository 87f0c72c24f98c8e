//! QuizRush Store: repository adapters.
//!
//! Every aggregate is kept in process memory behind an async lock. Saved
//! aggregates are snapshots with their event buffers cleared.

pub mod in_memory_repository;
pub mod shop_catalog;

pub use in_memory_repository::InMemoryRepository;
pub use shop_catalog::InMemoryShopCatalog;
