//! Shared ingredient inventory: on-hand and reserved quantities.
//!
//! Each ingredient's level is protected by its own mutex; multi-ingredient
//! operations acquire every lock in ascending ingredient-id order before the
//! check-then-commit sequence, so concurrent reservations can never jointly
//! oversell an ingredient and never deadlock across dishes that share
//! ingredients.

pub mod store;

pub use store::{InventoryStore, StockLevel};
