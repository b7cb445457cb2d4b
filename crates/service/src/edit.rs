use std::collections::BTreeMap;
use std::sync::Arc;

use menustock_alerts::{Alert, AlertEvaluator};
use menustock_catalog::RecipeCatalog;
use menustock_core::{DishId, IngredientId, StockError, StockResult};
use menustock_inventory::InventoryStore;

/// Validates and applies recipe edits, re-running alert evaluation.
///
/// An edit never touches outstanding reservation snapshots: those hold
/// copies of the quantities they committed, and release/confirm work from
/// the snapshot, not the catalog.
#[derive(Debug)]
pub struct EditCoordinator {
    catalog: Arc<RecipeCatalog>,
    inventory: Arc<InventoryStore>,
}

impl EditCoordinator {
    pub fn new(catalog: Arc<RecipeCatalog>, inventory: Arc<InventoryStore>) -> Self {
        Self { catalog, inventory }
    }

    /// Replace a dish's recipe.
    ///
    /// Order of checks, all before any mutation:
    /// 1. the dish must exist and be active (`DishNotFound`);
    /// 2. every quantity must be strictly positive (`InvalidQuantity`);
    /// 3. a conservative one-portion feasibility check: every new
    ///    per-portion quantity must currently be available
    ///    (`InsufficientStock`). This verifies the edit is servable at all;
    ///    it reserves nothing.
    ///
    /// On success the catalog is updated atomically and alerts are evaluated
    /// for every ingredient of the new recipe.
    pub fn edit_recipe(
        &self,
        evaluator: &AlertEvaluator,
        dish_id: DishId,
        per_portion: BTreeMap<IngredientId, i64>,
    ) -> StockResult<Vec<Alert>> {
        self.catalog.active_dish(dish_id)?;

        if per_portion.is_empty() {
            return Err(StockError::invalid_quantity(
                "recipe must contain at least one ingredient",
            ));
        }
        for (ingredient_id, qty) in &per_portion {
            if *qty <= 0 {
                return Err(StockError::invalid_quantity(format!(
                    "per-portion quantity for ingredient {ingredient_id} must be positive, got {qty}"
                )));
            }
        }

        for (ingredient_id, qty) in &per_portion {
            let available = self.inventory.available_quantity(*ingredient_id);
            if available < *qty {
                return Err(StockError::InsufficientStock {
                    ingredient_id: *ingredient_id,
                    available,
                    required: *qty,
                });
            }
        }

        let recipe = self.catalog.upsert_recipe(dish_id, per_portion)?;

        let alerts = recipe
            .ingredient_ids()
            .flat_map(|ingredient_id| evaluator.evaluate(ingredient_id))
            .collect();
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use menustock_catalog::Dish;

    use super::*;

    struct Fixture {
        catalog: Arc<RecipeCatalog>,
        inventory: Arc<InventoryStore>,
        evaluator: AlertEvaluator,
        coordinator: EditCoordinator,
        pizza: DishId,
        cheese: IngredientId,
        tomato: IngredientId,
    }

    fn fixture() -> Fixture {
        let catalog = Arc::new(RecipeCatalog::new());
        let inventory = Arc::new(InventoryStore::new());

        let pizza = DishId::new();
        let cheese = IngredientId::new();
        let tomato = IngredientId::new();

        catalog.add_dish(Dish::new(pizza, "pizza").unwrap()).unwrap();
        let mut recipe = BTreeMap::new();
        recipe.insert(cheese, 200);
        catalog.upsert_recipe(pizza, recipe).unwrap();

        inventory.put(cheese, 10_000).unwrap();
        inventory.put(tomato, 8_000).unwrap();

        Fixture {
            evaluator: AlertEvaluator::new(Arc::clone(&catalog), Arc::clone(&inventory)),
            coordinator: EditCoordinator::new(Arc::clone(&catalog), Arc::clone(&inventory)),
            catalog,
            inventory,
            pizza,
            cheese,
            tomato,
        }
    }

    #[test]
    fn a_valid_edit_replaces_the_recipe_whole() {
        let fx = fixture();

        let mut new_recipe = BTreeMap::new();
        new_recipe.insert(fx.cheese, 250);
        new_recipe.insert(fx.tomato, 100);
        fx.coordinator
            .edit_recipe(&fx.evaluator, fx.pizza, new_recipe)
            .unwrap();

        let recipe = fx.catalog.recipe(fx.pizza).unwrap();
        assert_eq!(recipe.quantity_of(fx.cheese), Some(250));
        assert_eq!(recipe.quantity_of(fx.tomato), Some(100));
    }

    #[test]
    fn non_positive_quantities_are_rejected_before_any_mutation() {
        let fx = fixture();

        let mut bad = BTreeMap::new();
        bad.insert(fx.cheese, 250);
        bad.insert(fx.tomato, 0);
        let err = fx
            .coordinator
            .edit_recipe(&fx.evaluator, fx.pizza, bad)
            .unwrap_err();
        assert!(matches!(err, StockError::InvalidQuantity(_)));

        // Previous recipe intact.
        let recipe = fx.catalog.recipe(fx.pizza).unwrap();
        assert_eq!(recipe.quantity_of(fx.cheese), Some(200));
        assert!(!recipe.uses(fx.tomato));
    }

    #[test]
    fn one_portion_feasibility_check_blocks_unservable_edits() {
        let fx = fixture();
        // Only 50 units of tomato available.
        fx.inventory.reserve(fx.tomato, 7_950).unwrap();

        let mut new_recipe = BTreeMap::new();
        new_recipe.insert(fx.tomato, 100);
        let err = fx
            .coordinator
            .edit_recipe(&fx.evaluator, fx.pizza, new_recipe)
            .unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                ingredient_id: fx.tomato,
                available: 50,
                required: 100,
            }
        );
    }

    #[test]
    fn an_ingredient_with_no_level_row_fails_the_feasibility_check() {
        let fx = fixture();
        let phantom = IngredientId::new();

        // Unknown ingredients read as zero available, so any positive
        // per-portion quantity is infeasible.
        let mut new_recipe = BTreeMap::new();
        new_recipe.insert(phantom, 10);
        let err = fx
            .coordinator
            .edit_recipe(&fx.evaluator, fx.pizza, new_recipe)
            .unwrap_err();
        assert!(matches!(err, StockError::InsufficientStock { .. }));
    }

    #[test]
    fn edits_surface_alerts_for_the_new_recipe() {
        let fx = fixture();
        // Leave cheese below the default critical quantity (250 * 5 = 1250).
        fx.inventory.reserve(fx.cheese, 9_000).unwrap();

        let mut new_recipe = BTreeMap::new();
        new_recipe.insert(fx.cheese, 250);
        let alerts = fx
            .coordinator
            .edit_recipe(&fx.evaluator, fx.pizza, new_recipe)
            .unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].ingredient_id, fx.cheese);
        assert_eq!(alerts[0].available, 1_000);
        assert_eq!(alerts[0].critical, 1_250);
    }

    #[test]
    fn inactive_dishes_cannot_be_edited() {
        let fx = fixture();
        fx.catalog.set_active(fx.pizza, false).unwrap();

        let mut new_recipe = BTreeMap::new();
        new_recipe.insert(fx.cheese, 100);
        assert!(matches!(
            fx.coordinator
                .edit_recipe(&fx.evaluator, fx.pizza, new_recipe),
            Err(StockError::DishNotFound(_))
        ));
    }
}
