use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use chrono::Utc;

use menustock_catalog::RecipeCatalog;
use menustock_core::{DishId, ReservationId, StockError, StockResult};
use menustock_inventory::InventoryStore;

use crate::reservation::{Reservation, ReservationState};

/// The central check-and-reserve state machine.
///
/// Owns the only mutation path into inventory's reserved quantities. Lock
/// hierarchy: the reservation map's write lock is acquired before any
/// ingredient level lock (which the store takes in ascending id order), a
/// fixed order that rules out deadlock between reservation transitions and
/// new reservations.
#[derive(Debug)]
pub struct ReservationEngine {
    catalog: Arc<RecipeCatalog>,
    inventory: Arc<InventoryStore>,
    reservations: RwLock<HashMap<ReservationId, Reservation>>,
}

impl ReservationEngine {
    pub fn new(catalog: Arc<RecipeCatalog>, inventory: Arc<InventoryStore>) -> Self {
        Self {
            catalog,
            inventory,
            reservations: RwLock::new(HashMap::new()),
        }
    }

    fn write_reservations(
        &self,
    ) -> StockResult<RwLockWriteGuard<'_, HashMap<ReservationId, Reservation>>> {
        self.reservations
            .write()
            .map_err(|_| StockError::invariant("reservation map lock poisoned"))
    }

    /// Check and reserve stock for `portions` portions of a dish, as one
    /// atomic unit across the dish's whole ingredient set.
    ///
    /// Either every ingredient's requirement is reserved and a `Reserved`
    /// reservation is returned, or nothing is touched and the first failure
    /// is reported; there is no partial reservation.
    pub fn reserve_for_order(
        &self,
        dish_id: DishId,
        portions: i64,
        order_ref: impl Into<String>,
    ) -> StockResult<Reservation> {
        let dish = self.catalog.active_dish(dish_id)?;
        if portions <= 0 {
            return Err(StockError::invalid_quantity(format!(
                "portions must be positive, got {portions}"
            )));
        }
        if dish.recipe().is_empty() {
            return Err(StockError::invalid_quantity(format!(
                "dish {dish_id} has no recipe"
            )));
        }

        // Snapshot taken before reserving; the recipe map is a clone, so a
        // concurrent edit cannot change what this reservation commits.
        let requirements = dish.recipe().requirements_for(portions)?;
        self.inventory.reserve_set(&requirements)?;

        let reservation = Reservation::new(
            ReservationId::new(),
            dish_id,
            portions,
            requirements.into_iter().collect(),
            Utc::now(),
            order_ref.into(),
        );

        let mut reservations = self.write_reservations()?;
        reservations.insert(reservation.id(), reservation.clone());
        Ok(reservation)
    }

    /// Permanently consume a reservation's stock (Reserved → Confirmed).
    ///
    /// On-hand and reserved decrease together by the snapshot amounts.
    pub fn confirm(&self, reservation_id: ReservationId) -> StockResult<()> {
        let mut reservations = self.write_reservations()?;
        let reservation = reservations
            .get_mut(&reservation_id)
            .ok_or(StockError::ReservationNotFound(reservation_id))?;
        if reservation.state() != ReservationState::Reserved {
            return Err(StockError::invalid_state(
                reservation_id,
                reservation.state().to_string(),
            ));
        }

        self.inventory.consume_set(&reservation.requirement_set())?;
        reservation.set_state(ReservationState::Confirmed);
        Ok(())
    }

    /// Return a reservation's stock to available (Reserved → Released).
    pub fn release(&self, reservation_id: ReservationId) -> StockResult<()> {
        let mut reservations = self.write_reservations()?;
        let reservation = reservations
            .get_mut(&reservation_id)
            .ok_or(StockError::ReservationNotFound(reservation_id))?;
        if reservation.state() != ReservationState::Reserved {
            return Err(StockError::invalid_state(
                reservation_id,
                reservation.state().to_string(),
            ));
        }

        self.inventory.release_set(&reservation.requirement_set())?;
        reservation.set_state(ReservationState::Released);
        Ok(())
    }

    pub fn get(&self, reservation_id: ReservationId) -> StockResult<Reservation> {
        self.reservations
            .read()
            .map_err(|_| StockError::invariant("reservation map lock poisoned"))?
            .get(&reservation_id)
            .cloned()
            .ok_or(StockError::ReservationNotFound(reservation_id))
    }

    /// All reservations, newest first (UUIDv7 ids are time-ordered).
    pub fn list(&self) -> Vec<Reservation> {
        let mut all: Vec<Reservation> = match self.reservations.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => Vec::new(),
        };
        all.sort_by_key(|r| std::cmp::Reverse(r.id()));
        all
    }
}
