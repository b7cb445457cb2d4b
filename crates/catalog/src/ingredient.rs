use serde::{Deserialize, Serialize};

use menustock_core::{IngredientId, StockError, StockResult, Unit};

/// An ingredient as registered on the menu.
///
/// Identity is immutable; display attributes are editable by administrators
/// (outside the engine's scope). `min_stock` is informational only; alert
/// evaluation uses per-dish portion thresholds, not this field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    id: IngredientId,
    name: String,
    unit: Unit,
    min_stock: i64,
}

impl Ingredient {
    pub fn new(
        id: IngredientId,
        name: impl Into<String>,
        unit: Unit,
        min_stock: i64,
    ) -> StockResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StockError::invalid_name("ingredient name must not be empty"));
        }
        if min_stock < 0 {
            return Err(StockError::invalid_quantity("min_stock must not be negative"));
        }
        Ok(Self {
            id,
            name,
            unit,
            min_stock,
        })
    }

    pub fn id(&self) -> IngredientId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn min_stock(&self) -> i64 {
        self.min_stock
    }
}

impl core::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.name, self.unit)
    }
}
