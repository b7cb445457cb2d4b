//! Menu catalog: ingredients, dishes, recipes, and alert thresholds.
//!
//! The catalog is the single owner of recipe data. Recipes are replaced
//! whole (all-or-nothing) and hand out clones, never live references, so an
//! outstanding reservation snapshot can never be altered by a later edit.

pub mod catalog;
pub mod dish;
pub mod ingredient;

pub use catalog::RecipeCatalog;
pub use dish::{DEFAULT_MIN_PORTIONS, Dish, Recipe};
pub use ingredient::Ingredient;
