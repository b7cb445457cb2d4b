use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use menustock_core::{DishId, IngredientId, StockError, StockResult};

use crate::dish::{Dish, Recipe};
use crate::ingredient::Ingredient;

/// In-memory catalog of ingredients and dishes.
///
/// Single owner of recipe data: a recipe is only ever replaced whole through
/// `upsert_recipe`, and readers get clones, so concurrent reservations can
/// never observe (or retroactively pick up) a half-applied edit.
#[derive(Debug, Default)]
pub struct RecipeCatalog {
    ingredients: RwLock<HashMap<IngredientId, Ingredient>>,
    dishes: RwLock<HashMap<DishId, Dish>>,
}

impl RecipeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_dishes(&self) -> StockResult<RwLockReadGuard<'_, HashMap<DishId, Dish>>> {
        self.dishes
            .read()
            .map_err(|_| StockError::invariant("catalog lock poisoned"))
    }

    fn write_dishes(&self) -> StockResult<RwLockWriteGuard<'_, HashMap<DishId, Dish>>> {
        self.dishes
            .write()
            .map_err(|_| StockError::invariant("catalog lock poisoned"))
    }

    /// Register an ingredient, replacing its display attributes if it is
    /// already known (identity is the id, attributes are editable).
    pub fn upsert_ingredient(&self, ingredient: Ingredient) -> StockResult<()> {
        let mut ingredients = self
            .ingredients
            .write()
            .map_err(|_| StockError::invariant("catalog lock poisoned"))?;
        ingredients.insert(ingredient.id(), ingredient);
        Ok(())
    }

    pub fn ingredient(&self, ingredient_id: IngredientId) -> Option<Ingredient> {
        self.ingredients
            .read()
            .ok()
            .and_then(|map| map.get(&ingredient_id).cloned())
    }

    /// All registered ingredients, sorted by name for stable listings.
    pub fn ingredients(&self) -> Vec<Ingredient> {
        let mut all: Vec<Ingredient> = match self.ingredients.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => Vec::new(),
        };
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    /// Register a new dish. The dish starts active, with an empty recipe and
    /// the default alert threshold.
    pub fn add_dish(&self, dish: Dish) -> StockResult<()> {
        let mut dishes = self.write_dishes()?;
        if dishes.contains_key(&dish.id()) {
            // Double registration is caller misuse, not end-user input.
            return Err(StockError::invariant(format!(
                "dish {} already registered",
                dish.id()
            )));
        }
        dishes.insert(dish.id(), dish);
        Ok(())
    }

    /// Look up a dish regardless of its active flag.
    pub fn dish(&self, dish_id: DishId) -> StockResult<Dish> {
        self.read_dishes()?
            .get(&dish_id)
            .cloned()
            .ok_or(StockError::DishNotFound(dish_id))
    }

    /// Look up a dish that is currently offered.
    ///
    /// Inactive dishes are reported as `DishNotFound`, matching how the menu
    /// hides deactivated entries from every consumer.
    pub fn active_dish(&self, dish_id: DishId) -> StockResult<Dish> {
        let dish = self.dish(dish_id)?;
        if !dish.is_active() {
            return Err(StockError::DishNotFound(dish_id));
        }
        Ok(dish)
    }

    /// Snapshot of an active dish's recipe.
    pub fn recipe(&self, dish_id: DishId) -> StockResult<Recipe> {
        Ok(self.active_dish(dish_id)?.recipe().clone())
    }

    /// Replace a dish's full ingredient map atomically (all-or-nothing).
    ///
    /// Validation happens before any mutation: on failure the catalog is left
    /// unchanged. Returns the recipe as applied.
    pub fn upsert_recipe(
        &self,
        dish_id: DishId,
        per_portion: BTreeMap<IngredientId, i64>,
    ) -> StockResult<Recipe> {
        if per_portion.is_empty() {
            return Err(StockError::invalid_quantity(
                "recipe must contain at least one ingredient",
            ));
        }
        let recipe = Recipe::new(per_portion)?;

        let mut dishes = self.write_dishes()?;
        let dish = dishes
            .get_mut(&dish_id)
            .filter(|d| d.is_active())
            .ok_or(StockError::DishNotFound(dish_id))?;
        dish.set_recipe(recipe.clone());
        Ok(recipe)
    }

    /// Activate or deactivate a dish (soft delete; the row stays).
    pub fn set_active(&self, dish_id: DishId, active: bool) -> StockResult<()> {
        let mut dishes = self.write_dishes()?;
        let dish = dishes
            .get_mut(&dish_id)
            .ok_or(StockError::DishNotFound(dish_id))?;
        dish.set_active(active);
        Ok(())
    }

    /// Configure the minimum-portions alert threshold for a dish.
    pub fn set_min_portions(&self, dish_id: DishId, min_portions: i64) -> StockResult<()> {
        if min_portions <= 0 {
            return Err(StockError::invalid_quantity(
                "min_portions must be positive",
            ));
        }
        let mut dishes = self.write_dishes()?;
        let dish = dishes
            .get_mut(&dish_id)
            .ok_or(StockError::DishNotFound(dish_id))?;
        dish.set_min_portions(min_portions);
        Ok(())
    }

    /// Active dishes whose recipes reference the given ingredient.
    pub fn dishes_using(&self, ingredient_id: IngredientId) -> Vec<Dish> {
        match self.read_dishes() {
            Ok(dishes) => dishes
                .values()
                .filter(|d| d.is_active() && d.recipe().uses(ingredient_id))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// All dishes, active or not, sorted by name.
    pub fn dishes(&self) -> Vec<Dish> {
        let mut all: Vec<Dish> = match self.read_dishes() {
            Ok(dishes) => dishes.values().cloned().collect(),
            Err(_) => Vec::new(),
        };
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    /// Every ingredient referenced by at least one active recipe, in
    /// ascending id order (deduplicated).
    pub fn referenced_ingredients(&self) -> Vec<IngredientId> {
        let mut ids: Vec<IngredientId> = match self.read_dishes() {
            Ok(dishes) => dishes
                .values()
                .filter(|d| d.is_active())
                .flat_map(|d| d.recipe().ingredient_ids().collect::<Vec<_>>())
                .collect(),
            Err(_) => Vec::new(),
        };
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
