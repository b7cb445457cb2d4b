use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use menustock_core::{DishId, IngredientId, StockError, StockResult};

/// Minimum servable portions a dish should remain able to produce before a
/// low-stock alert fires, unless configured per dish.
pub const DEFAULT_MIN_PORTIONS: i64 = 5;

/// Per-portion ingredient requirements of a dish.
///
/// The map is ordered by ingredient id, which doubles as the global lock
/// acquisition order when the requirements are reserved. Every quantity is
/// strictly positive, enforced at construction, so a `Recipe` in hand is
/// always valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    per_portion: BTreeMap<IngredientId, i64>,
}

impl Recipe {
    /// Build a recipe from per-portion quantities.
    ///
    /// Fails with `InvalidQuantity` if any quantity is not strictly positive.
    pub fn new(per_portion: BTreeMap<IngredientId, i64>) -> StockResult<Self> {
        for (ingredient_id, qty) in &per_portion {
            if *qty <= 0 {
                return Err(StockError::invalid_quantity(format!(
                    "per-portion quantity for ingredient {ingredient_id} must be positive, got {qty}"
                )));
            }
        }
        Ok(Self { per_portion })
    }

    /// A recipe with no rows. The dish exists but cannot be reserved.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.per_portion.is_empty()
    }

    pub fn len(&self) -> usize {
        self.per_portion.len()
    }

    /// Per-portion quantity for one ingredient, if the recipe uses it.
    pub fn quantity_of(&self, ingredient_id: IngredientId) -> Option<i64> {
        self.per_portion.get(&ingredient_id).copied()
    }

    pub fn uses(&self, ingredient_id: IngredientId) -> bool {
        self.per_portion.contains_key(&ingredient_id)
    }

    /// Iterate requirements in ascending ingredient-id order.
    pub fn iter(&self) -> impl Iterator<Item = (IngredientId, i64)> + '_ {
        self.per_portion.iter().map(|(id, qty)| (*id, *qty))
    }

    pub fn ingredient_ids(&self) -> impl Iterator<Item = IngredientId> + '_ {
        self.per_portion.keys().copied()
    }

    /// Total requirements for `portions` portions, in ingredient-id order.
    ///
    /// Overflow in `per_portion * portions` is an invariant violation, never
    /// a silent wrap.
    pub fn requirements_for(&self, portions: i64) -> StockResult<Vec<(IngredientId, i64)>> {
        self.per_portion
            .iter()
            .map(|(id, per)| {
                per.checked_mul(portions)
                    .map(|total| (*id, total))
                    .ok_or_else(|| {
                        StockError::invariant(format!(
                            "requirement overflow for ingredient {id}: {per} * {portions}"
                        ))
                    })
            })
            .collect()
    }
}

/// A sellable dish: its recipe, its low-stock alert threshold, and whether it
/// is currently offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    id: DishId,
    name: String,
    active: bool,
    recipe: Recipe,
    min_portions: i64,
}

impl Dish {
    pub fn new(id: DishId, name: impl Into<String>) -> StockResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StockError::invalid_name("dish name must not be empty"));
        }
        Ok(Self {
            id,
            name,
            active: true,
            recipe: Recipe::empty(),
            min_portions: DEFAULT_MIN_PORTIONS,
        })
    }

    pub fn id(&self) -> DishId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn min_portions(&self) -> i64 {
        self.min_portions
    }

    pub(crate) fn set_recipe(&mut self, recipe: Recipe) {
        self.recipe = recipe;
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn set_min_portions(&mut self, min_portions: i64) {
        self.min_portions = min_portions;
    }
}
