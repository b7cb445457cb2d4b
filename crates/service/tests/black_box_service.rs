//! Black-box tests driving the engine exclusively through the service
//! facade, the way an external collaborator (HTTP handler, admin UI) would.

use std::collections::BTreeMap;
use std::sync::Arc;

use menustock_catalog::{Dish, Ingredient, RecipeCatalog};
use menustock_core::{DishId, IngredientId, StockError, Unit};
use menustock_inventory::InventoryStore;
use menustock_reservations::ReservationState;
use menustock_service::{EditRecipeRequest, MenuStockService, ReserveRequest};

struct World {
    service: MenuStockService,
    pizza: DishId,
    cheese: IngredientId,
    tomato: IngredientId,
    flour: IngredientId,
}

/// The worked scenario: pizza = {cheese: 200, tomato: 100, flour: 300} per
/// portion, inventory = {cheese: 10000, tomato: 8000, flour: 15000},
/// minimum-portions threshold 5.
fn world() -> World {
    menustock_observability::init();

    let catalog = Arc::new(RecipeCatalog::new());
    let inventory = Arc::new(InventoryStore::new());

    let pizza = DishId::new();
    let cheese = IngredientId::new();
    let tomato = IngredientId::new();
    let flour = IngredientId::new();

    for (id, name) in [(cheese, "queso"), (tomato, "tomate"), (flour, "harina")] {
        catalog
            .upsert_ingredient(Ingredient::new(id, name, Unit::Grams, 0).unwrap())
            .unwrap();
    }

    catalog.add_dish(Dish::new(pizza, "pizza").unwrap()).unwrap();
    let mut recipe = BTreeMap::new();
    recipe.insert(cheese, 200);
    recipe.insert(tomato, 100);
    recipe.insert(flour, 300);
    catalog.upsert_recipe(pizza, recipe).unwrap();
    catalog.set_min_portions(pizza, 5).unwrap();

    inventory.put(cheese, 10_000).unwrap();
    inventory.put(tomato, 8_000).unwrap();
    inventory.put(flour, 15_000).unwrap();

    World {
        service: MenuStockService::new(catalog, inventory),
        pizza,
        cheese,
        tomato,
        flour,
    }
}

fn reserve(world: &World, portions: i64, order_ref: &str) -> Result<menustock_service::ReservationAccepted, StockError> {
    world.service.reserve_for_order(ReserveRequest {
        dish_id: world.pizza,
        portions,
        order_ref: order_ref.to_string(),
    })
}

fn available(world: &World, ingredient_id: IngredientId) -> i64 {
    world
        .service
        .stock_levels()
        .into_iter()
        .find(|l| l.ingredient_id == ingredient_id)
        .map(|l| l.available)
        .unwrap_or(0)
}

#[test]
fn the_full_pizza_walkthrough() {
    let w = world();

    // 40 portions: {cheese: 8000, tomato: 4000, flour: 12000}. Succeeds.
    let first = reserve(&w, 40, "order-40").unwrap();
    assert_eq!(first.state, ReservationState::Reserved);
    assert_eq!(available(&w, w.cheese), 2_000);
    assert_eq!(available(&w, w.tomato), 4_000);
    assert_eq!(available(&w, w.flour), 3_000);

    // Remaining flour (3000) is still at or above critical (300 * 5 = 1500):
    // no alert yet.
    assert!(w.service.evaluate_alerts(w.flour).is_empty());

    // 10 more portions need flour 3000 exactly; the boundary is sufficient.
    reserve(&w, 10, "order-10").unwrap();
    assert_eq!(available(&w, w.flour), 0);

    // Flour is now below critical: the alert fires for pizza.
    let alerts = w.service.evaluate_alerts(w.flour);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].dish_id, w.pizza);
    assert_eq!(alerts[0].available, 0);
    assert_eq!(alerts[0].critical, 1_500);

    // One further portion needs 300 more flour with 0 available.
    let err = reserve(&w, 1, "order-1").unwrap_err();
    assert_eq!(
        err,
        StockError::InsufficientStock {
            ingredient_id: w.flour,
            available: 0,
            required: 300,
        }
    );
}

#[test]
fn accounting_identity_holds_after_every_operation() {
    let w = world();

    let r1 = reserve(&w, 12, "order-1").unwrap();
    let r2 = reserve(&w, 7, "order-2").unwrap();
    w.service.confirm_reservation(r1.reservation_id).unwrap();
    w.service.release_reservation(r2.reservation_id).unwrap();

    for level in w.service.stock_levels() {
        assert!(level.on_hand >= 0);
        assert!(level.reserved >= 0);
        assert!(level.reserved <= level.on_hand);
        assert_eq!(level.available, level.on_hand - level.reserved);
    }
    // r1 consumed: on-hand dropped by 12 portions' worth of cheese.
    assert_eq!(
        w.service
            .stock_levels()
            .into_iter()
            .find(|l| l.ingredient_id == w.cheese)
            .unwrap()
            .on_hand,
        10_000 - 12 * 200
    );
}

#[test]
fn lifecycle_misuse_is_rejected_with_invalid_state() {
    let w = world();

    let confirmed = reserve(&w, 2, "order-1").unwrap();
    w.service.confirm_reservation(confirmed.reservation_id).unwrap();
    assert!(matches!(
        w.service.release_reservation(confirmed.reservation_id),
        Err(StockError::InvalidState { .. })
    ));

    let released = reserve(&w, 2, "order-2").unwrap();
    w.service.release_reservation(released.reservation_id).unwrap();
    assert!(matches!(
        w.service.release_reservation(released.reservation_id),
        Err(StockError::InvalidState { .. })
    ));
}

#[test]
fn edits_do_not_alter_snapshotted_reservations() {
    let w = world();
    let reservation = reserve(&w, 10, "order-1").unwrap();
    assert_eq!(reservation.quantities[&w.cheese], 2_000);

    let mut new_recipe = BTreeMap::new();
    new_recipe.insert(w.cheese, 500);
    new_recipe.insert(w.flour, 300);
    w.service
        .edit_recipe(EditRecipeRequest {
            dish_id: w.pizza,
            per_portion: new_recipe,
        })
        .unwrap();

    let stored = w.service.reservation(reservation.reservation_id).unwrap();
    assert_eq!(stored.quantities()[&w.cheese], 2_000);

    // Releasing restores the snapshot quantities, not the edited recipe's.
    w.service.release_reservation(reservation.reservation_id).unwrap();
    assert_eq!(available(&w, w.cheese), 10_000);
}

#[test]
fn edit_rejections_surface_as_typed_errors() {
    let w = world();

    let mut zero = BTreeMap::new();
    zero.insert(w.cheese, 0);
    assert!(matches!(
        w.service.edit_recipe(EditRecipeRequest {
            dish_id: w.pizza,
            per_portion: zero,
        }),
        Err(StockError::InvalidQuantity(_))
    ));

    assert!(matches!(
        w.service.edit_recipe(EditRecipeRequest {
            dish_id: DishId::new(),
            per_portion: BTreeMap::from([(w.cheese, 100)]),
        }),
        Err(StockError::DishNotFound(_))
    ));
}

#[test]
fn concurrent_buyers_cannot_jointly_oversell() {
    use std::thread;

    let w = world();
    let service = Arc::new(w.service);

    // Flour caps the menu at 50 portions; 12 buyers want 8 each (96 total).
    let mut handles = Vec::new();
    for i in 0..12 {
        let service = Arc::clone(&service);
        let dish_id = w.pizza;
        handles.push(thread::spawn(move || {
            service
                .reserve_for_order(ReserveRequest {
                    dish_id,
                    portions: 8,
                    order_ref: format!("buyer-{i}"),
                })
                .is_ok()
        }));
    }
    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    // 6 * 8 = 48 portions fit (14400 flour), a 7th buyer would need 16800.
    assert_eq!(wins, 6);
    for level in service.stock_levels() {
        assert!(level.reserved <= level.on_hand);
        assert!(level.available >= 0);
    }
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Action {
        Reserve(i64),
        ConfirmNth(usize),
        ReleaseNth(usize),
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        prop_oneof![
            (1i64..15).prop_map(Action::Reserve),
            (0usize..8).prop_map(Action::ConfirmNth),
            (0usize..8).prop_map(Action::ReleaseNth),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: any interleaving of reserve/confirm/release requests,
        /// including invalid ones, keeps every inventory level consistent.
        #[test]
        fn inventory_stays_consistent_under_any_request_sequence(
            actions in proptest::collection::vec(action_strategy(), 1..30)
        ) {
            let w = world();
            let mut ids = Vec::new();

            for (i, action) in actions.iter().enumerate() {
                let _ = match action {
                    Action::Reserve(portions) => reserve(&w, *portions, &format!("order-{i}"))
                        .map(|accepted| ids.push(accepted.reservation_id)),
                    Action::ConfirmNth(n) => ids
                        .get(*n)
                        .map(|id| w.service.confirm_reservation(*id).map(|_| ()))
                        .unwrap_or(Ok(())),
                    Action::ReleaseNth(n) => ids
                        .get(*n)
                        .map(|id| w.service.release_reservation(*id).map(|_| ()))
                        .unwrap_or(Ok(())),
                };

                for level in w.service.stock_levels() {
                    prop_assert!(level.on_hand >= 0);
                    prop_assert!(level.reserved >= 0);
                    prop_assert!(level.reserved <= level.on_hand);
                    prop_assert_eq!(level.available, level.on_hand - level.reserved);
                }
            }
        }
    }
}
