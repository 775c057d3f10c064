use crate::domain::model::{Recipe, StockLevels, StoreroomSnapshot};
use std::collections::BTreeMap;

/// Ingredients currently on the cart, bounded by a per-ingredient capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stock {
    levels: StockLevels,
    capacity: StockLevels,
}

impl Stock {
    pub fn full(capacity: StockLevels) -> Self {
        Self {
            levels: capacity.clone(),
            capacity,
        }
    }

    pub fn level(&self, ingredient: &str) -> u32 {
        self.levels.get(ingredient).copied().unwrap_or(0)
    }

    pub fn levels(&self) -> &StockLevels {
        &self.levels
    }

    pub fn capacity(&self) -> &StockLevels {
        &self.capacity
    }

    pub fn can_make(&self, recipe: &Recipe) -> bool {
        recipe
            .iter()
            .all(|(ingredient, units)| self.level(ingredient) >= *units)
    }

    /// Checks that a full cart could make the recipe at all.
    pub fn check_fits(&self, recipe: &Recipe) -> Result<(), String> {
        for (ingredient, units) in recipe {
            match self.capacity.get(ingredient) {
                None => return Err(format!("the cart does not stock {}", ingredient)),
                Some(capacity) if capacity < units => {
                    return Err(format!(
                        "needs {} units of {} but the cart holds at most {}",
                        units, ingredient, capacity
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// All-or-nothing: nothing is taken unless every ingredient is available.
    pub fn take(&mut self, recipe: &Recipe) -> bool {
        if !self.can_make(recipe) {
            return false;
        }
        for (ingredient, units) in recipe {
            if let Some(level) = self.levels.get_mut(ingredient) {
                *level -= units;
            }
        }
        true
    }

    pub fn shortfall(&self) -> StockLevels {
        self.capacity
            .iter()
            .map(|(ingredient, capacity)| {
                (
                    ingredient.clone(),
                    capacity.saturating_sub(self.level(ingredient)),
                )
            })
            .filter(|(_, missing)| *missing > 0)
            .collect()
    }

    /// Tops every ingredient back up to capacity and returns the units drawn.
    pub fn refill_from(&mut self, storeroom: &mut Storeroom) -> StockLevels {
        let missing = self.shortfall();
        for (ingredient, units) in &missing {
            let drawn = storeroom.draw(ingredient, *units);
            *self.levels.entry(ingredient.clone()).or_insert(0) += drawn;
        }
        storeroom.restocks += 1;
        missing
    }
}

/// Backing stock with no upper bound; only the draw-down is tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Storeroom {
    restocks: u64,
    units_drawn: BTreeMap<String, u64>,
}

impl Storeroom {
    pub fn draw(&mut self, ingredient: &str, units: u32) -> u32 {
        *self.units_drawn.entry(ingredient.to_string()).or_insert(0) += u64::from(units);
        units
    }

    pub fn snapshot(&self) -> StoreroomSnapshot {
        StoreroomSnapshot {
            restocks: self.restocks,
            units_drawn: self.units_drawn.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity() -> StockLevels {
        [("beans".to_string(), 36), ("cups".to_string(), 2)]
            .into_iter()
            .collect()
    }

    fn espresso() -> Recipe {
        [("beans".to_string(), 18), ("cups".to_string(), 1)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_take_is_all_or_nothing() {
        let mut stock = Stock::full(capacity());
        assert!(stock.take(&espresso()));
        assert!(stock.take(&espresso()));
        assert_eq!(stock.level("beans"), 0);
        assert_eq!(stock.level("cups"), 0);

        let mut stock = Stock::full(capacity());
        let greedy: Recipe = [("beans".to_string(), 10), ("cups".to_string(), 3)]
            .into_iter()
            .collect();
        assert!(!stock.take(&greedy));
        assert_eq!(stock.level("beans"), 36);
    }

    #[test]
    fn test_refill_tops_up_to_capacity() {
        let mut stock = Stock::full(capacity());
        let mut storeroom = Storeroom::default();
        stock.take(&espresso());

        let drawn = stock.refill_from(&mut storeroom);
        assert_eq!(drawn.get("beans"), Some(&18));
        assert_eq!(drawn.get("cups"), Some(&1));
        assert_eq!(stock.levels(), &capacity());

        let snapshot = storeroom.snapshot();
        assert_eq!(snapshot.restocks, 1);
        assert_eq!(snapshot.units_drawn.get("beans"), Some(&18));
    }

    #[test]
    fn test_check_fits() {
        let stock = Stock::full(capacity());
        assert!(stock.check_fits(&espresso()).is_ok());

        let milky: Recipe = [("milk".to_string(), 100)].into_iter().collect();
        assert!(stock.check_fits(&milky).unwrap_err().contains("milk"));

        let huge: Recipe = [("beans".to_string(), 100)].into_iter().collect();
        assert!(stock.check_fits(&huge).is_err());
    }
}
