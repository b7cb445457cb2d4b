use std::sync::Arc;

use tracing::{debug, error, info, warn};

use menustock_alerts::{Alert, AlertEvaluator};
use menustock_catalog::RecipeCatalog;
use menustock_core::{IngredientId, ReservationId, StockError, StockResult};
use menustock_inventory::{InventoryStore, StockLevel};
use menustock_reservations::{Reservation, ReservationEngine};

use crate::edit::EditCoordinator;
use crate::requests::{EditRecipeRequest, RecipeEdited, ReservationAccepted, ReserveRequest};

/// Facade over the reservation and alert engine.
///
/// Owns the wiring between catalog, inventory, engine, evaluator, and edit
/// coordinator; callers hand in typed requests and get typed results. The
/// catalog and inventory are injected (never ambient globals) so tests and
/// embedders control the lifecycle.
#[derive(Debug)]
pub struct MenuStockService {
    catalog: Arc<RecipeCatalog>,
    inventory: Arc<InventoryStore>,
    engine: ReservationEngine,
    evaluator: AlertEvaluator,
    editor: EditCoordinator,
}

impl MenuStockService {
    pub fn new(catalog: Arc<RecipeCatalog>, inventory: Arc<InventoryStore>) -> Self {
        Self {
            engine: ReservationEngine::new(Arc::clone(&catalog), Arc::clone(&inventory)),
            evaluator: AlertEvaluator::new(Arc::clone(&catalog), Arc::clone(&inventory)),
            editor: EditCoordinator::new(Arc::clone(&catalog), Arc::clone(&inventory)),
            catalog,
            inventory,
        }
    }

    /// Check and reserve stock for N portions of a dish.
    pub fn reserve_for_order(&self, request: ReserveRequest) -> StockResult<ReservationAccepted> {
        let reservation = self
            .engine
            .reserve_for_order(request.dish_id, request.portions, request.order_ref)
            .map_err(|e| self.log_failure("reserve_for_order", e))?;

        info!(
            reservation_id = %reservation.id(),
            dish_id = %reservation.dish_id(),
            portions = reservation.portions(),
            order_ref = reservation.order_ref(),
            "stock reserved"
        );
        self.surface_alerts(reservation.quantities().keys().copied());

        Ok(ReservationAccepted {
            reservation_id: reservation.id(),
            dish_id: reservation.dish_id(),
            portions: reservation.portions(),
            quantities: reservation.quantities().clone(),
            state: reservation.state(),
            created_at: reservation.created_at(),
        })
    }

    /// Permanently consume a reservation's stock.
    pub fn confirm_reservation(&self, reservation_id: ReservationId) -> StockResult<()> {
        self.engine
            .confirm(reservation_id)
            .map_err(|e| self.log_failure("confirm_reservation", e))?;
        info!(%reservation_id, "reservation confirmed");
        Ok(())
    }

    /// Cancel a reservation, returning its stock to available.
    pub fn release_reservation(&self, reservation_id: ReservationId) -> StockResult<()> {
        self.engine
            .release(reservation_id)
            .map_err(|e| self.log_failure("release_reservation", e))?;
        info!(%reservation_id, "reservation released");
        Ok(())
    }

    /// Validate and apply a recipe edit; returns the alerts the new recipe
    /// triggers so the caller can deliver them.
    pub fn edit_recipe(&self, request: EditRecipeRequest) -> StockResult<RecipeEdited> {
        let alerts = self
            .editor
            .edit_recipe(&self.evaluator, request.dish_id, request.per_portion)
            .map_err(|e| self.log_failure("edit_recipe", e))?;

        info!(dish_id = %request.dish_id, alerts = alerts.len(), "recipe edited");
        for alert in &alerts {
            warn_alert(alert);
        }
        Ok(RecipeEdited {
            dish_id: request.dish_id,
            alerts,
        })
    }

    /// Low-stock alerts for one ingredient. Read-only, never fails.
    pub fn evaluate_alerts(&self, ingredient_id: IngredientId) -> Vec<Alert> {
        self.evaluator.evaluate(ingredient_id)
    }

    /// Current stock levels for every ingredient with a level row.
    pub fn stock_levels(&self) -> Vec<StockLevel> {
        self.inventory.levels()
    }

    pub fn reservation(&self, reservation_id: ReservationId) -> StockResult<Reservation> {
        self.engine.get(reservation_id)
    }

    pub fn reservations(&self) -> Vec<Reservation> {
        self.engine.list()
    }

    /// Catalog handle for registry administration (dishes, ingredients,
    /// thresholds).
    pub fn catalog(&self) -> &Arc<RecipeCatalog> {
        &self.catalog
    }

    /// Inventory handle for provisioning (`put`/`receive`).
    pub fn inventory(&self) -> &Arc<InventoryStore> {
        &self.inventory
    }

    fn surface_alerts(&self, ingredient_ids: impl Iterator<Item = IngredientId>) {
        for ingredient_id in ingredient_ids {
            for alert in self.evaluator.evaluate(ingredient_id) {
                warn_alert(&alert);
            }
        }
    }

    fn log_failure(&self, operation: &'static str, err: StockError) -> StockError {
        if err.is_user_facing() {
            debug!(%operation, %err, "operation rejected");
        } else {
            error!(%operation, %err, "invariant violation");
        }
        err
    }
}

fn warn_alert(alert: &Alert) {
    warn!(
        dish_id = %alert.dish_id,
        ingredient_id = %alert.ingredient_id,
        available = alert.available,
        critical = alert.critical,
        threshold_portions = alert.threshold_portions,
        "low stock"
    );
}
