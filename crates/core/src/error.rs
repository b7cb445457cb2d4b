//! Domain error model.

use thiserror::Error;

use crate::id::{DishId, IngredientId, ReservationId};

/// Result type used across the engine.
pub type StockResult<T> = Result<T, StockError>;

/// Domain-level error.
///
/// Every variant except `InvariantViolation` is recoverable and user-facing:
/// the caller surfaces the message and takes no corrective action.
/// `InvariantViolation` signals a programming-logic failure (reserved
/// exceeding on-hand, internal underflow/overflow); the operation aborts
/// rather than clamping values, since clamping would hide an oversell bug.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    /// The dish does not exist on the menu, or is inactive.
    #[error("dish {0} not found or inactive")]
    DishNotFound(DishId),

    /// A recipe references an ingredient with no inventory level row.
    /// Configuration error, distinct from the ingredient simply being empty.
    #[error("no inventory level configured for ingredient {0}")]
    IngredientNotFound(IngredientId),

    /// No reservation exists with the given identifier.
    #[error("reservation {0} not found")]
    ReservationNotFound(ReservationId),

    /// A quantity or portion count failed validation (non-positive input).
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A display name failed validation (empty or blank).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// An ingredient cannot cover the requested quantity.
    #[error("insufficient stock of ingredient {ingredient_id}: available {available}, required {required}")]
    InsufficientStock {
        ingredient_id: IngredientId,
        available: i64,
        required: i64,
    },

    /// Reservation lifecycle misuse (e.g. releasing a confirmed reservation).
    #[error("reservation {reservation_id} is {state}, expected reserved")]
    InvalidState {
        reservation_id: ReservationId,
        state: String,
    },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A domain invariant was violated. Fatal, not user-facing.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl StockError {
    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn invalid_name(msg: impl Into<String>) -> Self {
        Self::InvalidName(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_state(reservation_id: ReservationId, state: impl Into<String>) -> Self {
        Self::InvalidState {
            reservation_id,
            state: state.into(),
        }
    }

    /// Whether the error is safe to show to an end user.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }
}
