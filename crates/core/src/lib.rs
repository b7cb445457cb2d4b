//! Shared domain primitives for the menustock workspace.
//!
//! Typed identifiers, the error taxonomy, and units of measure used by every
//! other crate in the workspace. Pure domain: no IO, no storage.

pub mod error;
pub mod id;
pub mod unit;

pub use error::{StockError, StockResult};
pub use id::{DishId, IngredientId, ReservationId};
pub use unit::Unit;
