use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use menustock_core::{DishId, IngredientId, ReservationId};

/// Reservation lifecycle.
///
/// `Reserved` is the only non-terminal state: it moves to `Confirmed` (stock
/// permanently consumed) or `Released` (stock returned to available). No
/// transition leaves a terminal state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationState {
    Reserved,
    Confirmed,
    Released,
}

impl ReservationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Released)
    }
}

impl core::fmt::Display for ReservationState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ReservationState::Reserved => "reserved",
            ReservationState::Confirmed => "confirmed",
            ReservationState::Released => "released",
        };
        f.write_str(s)
    }
}

/// A committed hold against inventory for one order.
///
/// `quantities` is the per-ingredient snapshot taken when the reservation was
/// created. It is a copy, never a reference into the catalog, so a recipe
/// edit after the fact cannot alter what this reservation committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    dish_id: DishId,
    portions: i64,
    quantities: BTreeMap<IngredientId, i64>,
    state: ReservationState,
    created_at: DateTime<Utc>,
    order_ref: String,
}

impl Reservation {
    pub(crate) fn new(
        id: ReservationId,
        dish_id: DishId,
        portions: i64,
        quantities: BTreeMap<IngredientId, i64>,
        created_at: DateTime<Utc>,
        order_ref: String,
    ) -> Self {
        Self {
            id,
            dish_id,
            portions,
            quantities,
            state: ReservationState::Reserved,
            created_at,
            order_ref,
        }
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn dish_id(&self) -> DishId {
        self.dish_id
    }

    pub fn portions(&self) -> i64 {
        self.portions
    }

    /// The per-ingredient quantities committed at creation time.
    pub fn quantities(&self) -> &BTreeMap<IngredientId, i64> {
        &self.quantities
    }

    pub fn state(&self) -> ReservationState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn order_ref(&self) -> &str {
        &self.order_ref
    }

    pub(crate) fn set_state(&mut self, state: ReservationState) {
        self.state = state;
    }

    /// Snapshot as a requirement set, in ascending ingredient-id order.
    pub(crate) fn requirement_set(&self) -> Vec<(IngredientId, i64)> {
        self.quantities.iter().map(|(id, qty)| (*id, *qty)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReservationState::Reserved).unwrap(),
            "\"reserved\""
        );
        assert_eq!(ReservationState::Released.to_string(), "released");
    }

    #[test]
    fn only_reserved_is_non_terminal() {
        assert!(!ReservationState::Reserved.is_terminal());
        assert!(ReservationState::Confirmed.is_terminal());
        assert!(ReservationState::Released.is_terminal());
    }
}
