use std::sync::Arc;

use serde::{Deserialize, Serialize};

use menustock_catalog::RecipeCatalog;
use menustock_core::{DishId, IngredientId};
use menustock_inventory::InventoryStore;

/// A low-stock warning for one (dish, ingredient) pair.
///
/// `critical` is the quantity needed to keep `threshold_portions` portions of
/// the dish servable; the alert fires when `available < critical`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub dish_id: DishId,
    pub ingredient_id: IngredientId,
    pub available: i64,
    pub critical: i64,
    pub threshold_portions: i64,
}

/// Computes low-stock alerts after inventory mutations.
///
/// Reads availability per ingredient without the reservation lock: alerts are
/// advisory and tolerate eventual consistency.
#[derive(Debug)]
pub struct AlertEvaluator {
    catalog: Arc<RecipeCatalog>,
    inventory: Arc<InventoryStore>,
}

impl AlertEvaluator {
    pub fn new(catalog: Arc<RecipeCatalog>, inventory: Arc<InventoryStore>) -> Self {
        Self { catalog, inventory }
    }

    /// Alerts for every active dish whose recipe references the ingredient.
    ///
    /// Absence of data yields an empty list, never an error.
    pub fn evaluate(&self, ingredient_id: IngredientId) -> Vec<Alert> {
        let available = self.inventory.available_quantity(ingredient_id);

        self.catalog
            .dishes_using(ingredient_id)
            .into_iter()
            .filter_map(|dish| {
                let per_portion = dish.recipe().quantity_of(ingredient_id)?;
                // Saturating: a threshold so large it overflows can only make
                // the alert more likely to fire, which is the safe direction.
                let critical = per_portion.saturating_mul(dish.min_portions());
                (available < critical).then(|| Alert {
                    dish_id: dish.id(),
                    ingredient_id,
                    available,
                    critical,
                    threshold_portions: dish.min_portions(),
                })
            })
            .collect()
    }

    /// Sweep every ingredient referenced by an active recipe.
    pub fn evaluate_all(&self) -> Vec<Alert> {
        self.catalog
            .referenced_ingredients()
            .into_iter()
            .flat_map(|ingredient_id| self.evaluate(ingredient_id))
            .collect()
    }
}
