use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use serde::{Deserialize, Serialize};

use menustock_core::{IngredientId, StockError, StockResult};

/// Queryable stock read model: current level for one ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub ingredient_id: IngredientId,
    pub on_hand: i64,
    pub reserved: i64,
    pub available: i64,
}

/// Mutable level for one ingredient. Invariants: `on_hand >= 0`,
/// `reserved >= 0`, `reserved <= on_hand`.
#[derive(Debug, Default)]
struct Level {
    on_hand: i64,
    reserved: i64,
}

impl Level {
    fn available(&self) -> i64 {
        self.on_hand - self.reserved
    }
}

/// In-memory inventory store.
///
/// The outer map lock is held only to look up or insert level handles, never
/// across a level mutation; each level has its own mutex. Multi-ingredient
/// operations (`reserve_set`, `release_set`, `consume_set`) acquire every
/// level lock in ascending ingredient-id order (a fixed global order, so two
/// dishes sharing ingredients cannot deadlock) and hold them all across the
/// check-then-commit sequence. That makes the whole set atomic: either every
/// ingredient is mutated or none is.
#[derive(Debug, Default)]
pub struct InventoryStore {
    levels: RwLock<HashMap<IngredientId, Arc<Mutex<Level>>>>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the on-hand quantity for an ingredient, creating the level row if
    /// it does not exist yet.
    ///
    /// Setting on-hand below the outstanding reserved quantity is rejected:
    /// it would strand reservations that can no longer be consumed.
    pub fn put(&self, ingredient_id: IngredientId, on_hand: i64) -> StockResult<()> {
        if on_hand < 0 {
            return Err(StockError::invalid_quantity(format!(
                "on-hand for ingredient {ingredient_id} must not be negative, got {on_hand}"
            )));
        }
        let handle = self.handle_or_create(ingredient_id)?;
        let mut level = lock_level(ingredient_id, &handle)?;
        if on_hand < level.reserved {
            return Err(StockError::invalid_quantity(format!(
                "on-hand {on_hand} below outstanding reservations {} for ingredient {ingredient_id}",
                level.reserved
            )));
        }
        level.on_hand = on_hand;
        Ok(())
    }

    /// Adjust on-hand by a delta (deliveries, spoilage corrections).
    ///
    /// The ingredient must already have a level row. A negative delta that
    /// would take on-hand below reserved signals that reservations were
    /// handed out against stock that no longer exists; that is an invariant
    /// violation, not a user error.
    pub fn receive(&self, ingredient_id: IngredientId, delta: i64) -> StockResult<()> {
        let handle = self.handle(ingredient_id)?;
        let mut level = lock_level(ingredient_id, &handle)?;
        let next = level.on_hand.checked_add(delta).ok_or_else(|| {
            StockError::invariant(format!(
                "on-hand overflow for ingredient {ingredient_id}"
            ))
        })?;
        if next < level.reserved {
            return Err(StockError::invariant(format!(
                "adjustment would leave on-hand {next} below reserved {} for ingredient {ingredient_id}",
                level.reserved
            )));
        }
        level.on_hand = next;
        Ok(())
    }

    /// On-hand minus reserved for an ingredient.
    ///
    /// Returns zero (not an error) for an absent record: "unknown ingredient"
    /// is a configuration concern the mutation paths report separately.
    pub fn available_quantity(&self, ingredient_id: IngredientId) -> i64 {
        self.peek(ingredient_id)
            .map(|(_, available)| available)
            .unwrap_or(0)
    }

    /// Current on-hand for an ingredient; zero for an absent record.
    pub fn on_hand(&self, ingredient_id: IngredientId) -> i64 {
        self.peek(ingredient_id).map(|(on_hand, _)| on_hand).unwrap_or(0)
    }

    /// Snapshot of every level, in ascending ingredient-id order.
    pub fn levels(&self) -> Vec<StockLevel> {
        let handles: Vec<(IngredientId, Arc<Mutex<Level>>)> = match self.levels.read() {
            Ok(map) => map.iter().map(|(id, h)| (*id, Arc::clone(h))).collect(),
            Err(_) => Vec::new(),
        };
        let mut out: Vec<StockLevel> = handles
            .into_iter()
            .filter_map(|(ingredient_id, handle)| {
                let level = handle.lock().ok()?;
                Some(StockLevel {
                    ingredient_id,
                    on_hand: level.on_hand,
                    reserved: level.reserved,
                    available: level.available(),
                })
            })
            .collect();
        out.sort_by_key(|l| l.ingredient_id);
        out
    }

    /// Reserve a quantity of a single ingredient.
    ///
    /// The availability check and the increment happen under the level's lock
    /// as one atomic step with respect to other reservations.
    pub fn reserve(&self, ingredient_id: IngredientId, quantity: i64) -> StockResult<()> {
        self.reserve_set(&[(ingredient_id, quantity)])
    }

    /// Return a reserved quantity of a single ingredient to available.
    pub fn release(&self, ingredient_id: IngredientId, quantity: i64) -> StockResult<()> {
        self.release_set(&[(ingredient_id, quantity)])
    }

    /// Atomically reserve a set of ingredient quantities, all or nothing.
    ///
    /// Any shortfall aborts with `InsufficientStock` carrying the first short
    /// ingredient (in id order) and leaves every level untouched.
    pub fn reserve_set(&self, requirements: &[(IngredientId, i64)]) -> StockResult<()> {
        let handles = self.collect_handles(requirements)?;
        let mut entries = lock_all(&handles)?;

        for (ingredient_id, required, level) in entries.iter() {
            let available = level.available();
            if *required > available {
                return Err(StockError::InsufficientStock {
                    ingredient_id: *ingredient_id,
                    available,
                    required: *required,
                });
            }
        }
        for (_, required, level) in entries.iter_mut() {
            level.reserved += *required;
        }
        Ok(())
    }

    /// Atomically return a set of reserved quantities to available
    /// (reservation cancellation).
    pub fn release_set(&self, requirements: &[(IngredientId, i64)]) -> StockResult<()> {
        let handles = self.collect_handles(requirements)?;
        let mut entries = lock_all(&handles)?;

        for (ingredient_id, quantity, level) in entries.iter() {
            if *quantity > level.reserved {
                return Err(StockError::invariant(format!(
                    "release of {quantity} exceeds reserved {} for ingredient {ingredient_id}",
                    level.reserved
                )));
            }
        }
        for (_, quantity, level) in entries.iter_mut() {
            level.reserved -= *quantity;
        }
        Ok(())
    }

    /// Atomically consume a set of reserved quantities (reservation
    /// confirmation): on-hand and reserved decrease together.
    pub fn consume_set(&self, requirements: &[(IngredientId, i64)]) -> StockResult<()> {
        let handles = self.collect_handles(requirements)?;
        let mut entries = lock_all(&handles)?;

        for (ingredient_id, quantity, level) in entries.iter() {
            if *quantity > level.reserved || *quantity > level.on_hand {
                return Err(StockError::invariant(format!(
                    "consume of {quantity} exceeds reserved {} / on-hand {} for ingredient {ingredient_id}",
                    level.reserved, level.on_hand
                )));
            }
        }
        for (_, quantity, level) in entries.iter_mut() {
            level.on_hand -= *quantity;
            level.reserved -= *quantity;
        }
        Ok(())
    }

    /// Validate a requirement set and resolve its level handles, sorted in
    /// ascending ingredient-id order (the global lock-acquisition order).
    fn collect_handles(
        &self,
        requirements: &[(IngredientId, i64)],
    ) -> StockResult<Vec<(IngredientId, i64, Arc<Mutex<Level>>)>> {
        let mut sorted = requirements.to_vec();
        sorted.sort_by_key(|(id, _)| *id);
        for window in sorted.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(StockError::invariant(format!(
                    "duplicate ingredient {} in requirement set",
                    window[0].0
                )));
            }
        }

        let levels = self
            .levels
            .read()
            .map_err(|_| StockError::invariant("inventory lock poisoned"))?;
        let mut handles = Vec::with_capacity(sorted.len());
        for (ingredient_id, quantity) in &sorted {
            if *quantity <= 0 {
                return Err(StockError::invalid_quantity(format!(
                    "quantity for ingredient {ingredient_id} must be positive, got {quantity}"
                )));
            }
            let handle = levels
                .get(ingredient_id)
                .cloned()
                .ok_or(StockError::IngredientNotFound(*ingredient_id))?;
            handles.push((*ingredient_id, *quantity, handle));
        }
        Ok(handles)
    }

    fn peek(&self, ingredient_id: IngredientId) -> Option<(i64, i64)> {
        let handle = self
            .levels
            .read()
            .ok()
            .and_then(|map| map.get(&ingredient_id).cloned())?;
        let level = handle.lock().ok()?;
        Some((level.on_hand, level.available()))
    }

    fn handle(&self, ingredient_id: IngredientId) -> StockResult<Arc<Mutex<Level>>> {
        self.levels
            .read()
            .map_err(|_| StockError::invariant("inventory lock poisoned"))?
            .get(&ingredient_id)
            .cloned()
            .ok_or(StockError::IngredientNotFound(ingredient_id))
    }

    fn handle_or_create(&self, ingredient_id: IngredientId) -> StockResult<Arc<Mutex<Level>>> {
        let mut levels = self
            .levels
            .write()
            .map_err(|_| StockError::invariant("inventory lock poisoned"))?;
        Ok(Arc::clone(levels.entry(ingredient_id).or_default()))
    }
}

/// Lock every handle in the (already sorted) set. The returned guards drop
/// together when the caller's scope ends, success or abort, so no partial
/// hold is ever observable.
fn lock_all<'a>(
    handles: &'a [(IngredientId, i64, Arc<Mutex<Level>>)],
) -> StockResult<Vec<(IngredientId, i64, MutexGuard<'a, Level>)>> {
    let mut entries = Vec::with_capacity(handles.len());
    for (ingredient_id, quantity, handle) in handles {
        entries.push((*ingredient_id, *quantity, lock_level(*ingredient_id, handle)?));
    }
    Ok(entries)
}

fn lock_level<'a>(
    ingredient_id: IngredientId,
    handle: &'a Arc<Mutex<Level>>,
) -> StockResult<MutexGuard<'a, Level>> {
    handle.lock().map_err(|_| {
        StockError::invariant(format!("level lock poisoned for ingredient {ingredient_id}"))
    })
}
