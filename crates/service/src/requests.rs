//! Typed request/response structures for the service boundary.
//!
//! Callers get structured results (a value or a typed `StockError`), never
//! boolean-plus-message pairs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use menustock_alerts::Alert;
use menustock_core::{DishId, IngredientId, ReservationId};
use menustock_reservations::ReservationState;

/// Request: check and reserve stock for N portions of a dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveRequest {
    pub dish_id: DishId,
    pub portions: i64,
    /// External order reference (opaque to the engine).
    pub order_ref: String,
}

/// Response: a reservation was created in state `Reserved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationAccepted {
    pub reservation_id: ReservationId,
    pub dish_id: DishId,
    pub portions: i64,
    /// Per-ingredient quantities committed at creation time.
    pub quantities: BTreeMap<IngredientId, i64>,
    pub state: ReservationState,
    pub created_at: DateTime<Utc>,
}

/// Request: replace a dish's full ingredient map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecipeRequest {
    pub dish_id: DishId,
    pub per_portion: BTreeMap<IngredientId, i64>,
}

/// Response: the edit was applied; any low-stock alerts the new recipe
/// triggers are surfaced for the caller to deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeEdited {
    pub dish_id: DishId,
    pub alerts: Vec<Alert>,
}
