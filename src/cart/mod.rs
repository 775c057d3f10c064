pub mod barista;
pub mod business;
pub mod customer;
pub mod queue;
pub mod stock;

pub use barista::Barista;
pub use business::Business;
pub use customer::Customer;
pub use queue::{Order, OrderQueue, OrderReceipt, QueueTicket};
pub use stock::{Stock, Storeroom};

use crate::domain::model::{default_stock_capacity, Menu, MenuItem, StockLevels, Timing};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CartError, Result};

pub const DEFAULT_QUEUE_CAPACITY: usize = 5;
pub const MAX_QUEUE_CAPACITY: usize = 10_000;

/// Shared state every actor at the cart works against.
#[derive(Debug)]
pub struct Cart {
    business: Business,
    queue: OrderQueue,
    menu: Menu,
    timing: Timing,
    stock_capacity: StockLevels,
}

impl Cart {
    pub fn new(menu: Menu, stock_capacity: StockLevels, queue_capacity: usize, timing: Timing) -> Self {
        Self {
            business: Business::new(stock_capacity.clone()),
            queue: OrderQueue::new(queue_capacity),
            menu,
            timing,
            stock_capacity,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            config.menu().clone(),
            config.stock_capacity().clone(),
            config.queue_capacity(),
            config.timing(),
        )
    }

    pub fn business(&self) -> &Business {
        &self.business
    }

    pub fn queue(&self) -> &OrderQueue {
        &self.queue
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// An order is valid when it matches a menu entry the cart can hold stock for.
    pub fn validate_order(&self, item: &MenuItem) -> Result<()> {
        let listed = self
            .menu
            .get(&item.name)
            .ok_or_else(|| CartError::UnknownMenuItem {
                name: item.name.clone(),
            })?;
        if listed != item {
            return Err(CartError::InvalidOrder {
                item: item.name.clone(),
                reason: "does not match the menu listing".to_string(),
            });
        }

        Stock::full(self.stock_capacity.clone())
            .check_fits(&item.recipe)
            .map_err(|reason| CartError::InvalidOrder {
                item: item.name.clone(),
                reason,
            })
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(
            Menu::default(),
            default_stock_capacity(),
            DEFAULT_QUEUE_CAPACITY,
            Timing::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cart_is_closed_and_empty() {
        let cart = Cart::default();
        assert!(!cart.business().is_open());
        assert!(cart.queue().is_empty());
        assert_eq!(cart.queue().capacity(), DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_default_menu_fits_default_stock() {
        let cart = Cart::default();
        for item in cart.menu().items() {
            assert!(cart.validate_order(item).is_ok(), "{}", item.name);
        }
    }

    #[test]
    fn test_validate_rejects_altered_price() {
        let cart = Cart::default();
        let mut item = cart.menu().items()[0].clone();
        item.price_cents = 1;
        assert!(matches!(
            cart.validate_order(&item),
            Err(CartError::InvalidOrder { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_recipe_over_capacity() {
        let menu = Menu::new(vec![MenuItem::new("bucket", 900, 0).with_ingredient("milk", 5000)]);
        let cart = Cart::new(menu, default_stock_capacity(), 1, Timing::instant());
        let item = cart.menu().items()[0].clone();
        assert!(matches!(
            cart.validate_order(&item),
            Err(CartError::InvalidOrder { .. })
        ));
    }
}
