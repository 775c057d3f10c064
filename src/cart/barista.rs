use crate::cart::queue::Order;
use crate::cart::stock::Stock;
use crate::cart::Cart;
use crate::domain::model::{BaristaId, OrderId, OrderOutcome, Recipe, ServedOrder};
use crate::utils::error::{CartError, Result};
use chrono::Utc;
use std::sync::Arc;

/// A staff member at the coffee cart, identified by staff id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Barista {
    id: BaristaId,
}

impl Barista {
    pub fn new(id: BaristaId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> BaristaId {
        self.id
    }

    /// Validates an order and puts it in the queue. A rejected order is
    /// signalled back to the customer before the error is returned.
    pub fn accept_order(&self, cart: &Cart, order: Order) -> Result<OrderId> {
        // Nobody drains a closed queue.
        let checked = if cart.queue().is_closed() {
            Err(CartError::CartClosed)
        } else {
            cart.validate_order(&order.item)
        };
        if let Err(e) = checked {
            tracing::warn!("{} rejected {}: {}", self.id, order.id, e);
            cart.business().record_rejection();
            order.signal(OrderOutcome::Rejected {
                reason: e.to_string(),
            });
            return Err(e);
        }

        let id = order.id;
        tracing::debug!("{} accepted {} ({})", self.id, id, order.item.name);
        cart.queue().push(order);
        Ok(id)
    }

    /// Makes the oldest queued order and signals the customer. Returns `None`
    /// when nothing is waiting. Never fails: the storeroom is unlimited.
    pub async fn make_order(&self, cart: &Cart) -> Option<ServedOrder> {
        let order = cart.queue().pop()?;
        Some(self.prepare(cart, order).await)
    }

    /// Refills the cart from the storeroom, then pauses for the restock time.
    pub async fn restock(&self, cart: &Cart) {
        let mut stock = cart.business().stock().lock().await;
        self.restock_locked(cart, &mut stock).await;
    }

    /// Makes orders until the queue is closed and empty. Returns how many were made.
    pub async fn work(self, cart: Arc<Cart>) -> u64 {
        tracing::debug!("{} starting shift", self.id);
        let mut made = 0;
        while let Some(order) = cart.queue().next().await {
            self.prepare(&cart, order).await;
            made += 1;
        }
        tracing::debug!("{} finished shift after {} orders", self.id, made);
        made
    }

    async fn prepare(&self, cart: &Cart, order: Order) -> ServedOrder {
        self.take_ingredients(cart, &order.item.recipe).await;
        tokio::time::sleep(cart.timing().scale(order.item.time_to_make())).await;

        let served = ServedOrder {
            order_id: order.id,
            customer: order.customer,
            barista: self.id,
            item: order.item.name.clone(),
            price_cents: order.item.price_cents,
            placed_at: order.placed_at,
            ready_at: Utc::now(),
        };
        cart.business().record_sale(served.price_cents);

        if order.signal(OrderOutcome::Ready(served.clone())) {
            tracing::debug!("{} served {} to {}", self.id, served.order_id, served.customer);
        } else {
            tracing::debug!("{} left before {} was ready", served.customer, served.order_id);
        }
        served
    }

    async fn take_ingredients(&self, cart: &Cart, recipe: &Recipe) {
        let mut stock = cart.business().stock().lock().await;
        if stock.take(recipe) {
            return;
        }

        self.restock_locked(cart, &mut stock).await;
        if !stock.take(recipe) {
            // Only reachable for orders queued without validation.
            tracing::warn!("{} drawing straight from the storeroom", self.id);
            let mut storeroom = cart.business().storeroom();
            for (ingredient, units) in recipe {
                storeroom.draw(ingredient, *units);
            }
        }
    }

    async fn restock_locked(&self, cart: &Cart, stock: &mut Stock) {
        let drawn = {
            let mut storeroom = cart.business().storeroom();
            stock.refill_from(&mut storeroom)
        };
        tracing::info!("📦 {} restocking the cart: {:?}", self.id, drawn);
        tokio::time::sleep(cart.timing().restock()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::customer::Customer;
    use crate::domain::model::{CustomerId, Menu, MenuItem, StockLevels, Timing};

    fn instant_cart(capacity: &[(&str, u32)]) -> Cart {
        let stock: StockLevels = capacity
            .iter()
            .map(|(name, units)| (name.to_string(), *units))
            .collect();
        let menu = Menu::new(vec![MenuItem::new("espresso", 350, 100)
            .with_ingredient("beans", 18)
            .with_ingredient("cups", 1)]);
        let cart = Cart::new(menu, stock, 4, Timing::instant());
        cart.business().open();
        cart
    }

    #[tokio::test]
    async fn test_make_order_on_empty_queue_is_noop() {
        let cart = Cart::default();
        let barista = Barista::default();
        assert!(barista.make_order(&cart).await.is_none());
        assert_eq!(cart.business().ledger().orders_served, 0);
    }

    #[tokio::test]
    async fn test_accept_then_make_signals_customer() {
        let cart = instant_cart(&[("beans", 36), ("cups", 2)]);
        let barista = Barista::new(BaristaId(1));
        let customer = Customer::new(CustomerId(9));

        let ticket = customer.join_queue(&cart).unwrap();
        let item = cart.menu().items()[0].clone();
        let (order, receipt) = customer.create_order(ticket, &item);
        let id = barista.accept_order(&cart, order).unwrap();

        let served = barista.make_order(&cart).await.unwrap();
        assert_eq!(served.order_id, id);
        assert_eq!(served.barista, BaristaId(1));

        match receipt.wait().await {
            OrderOutcome::Ready(ready) => assert_eq!(ready, served),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(cart.business().ledger().revenue_cents, 350);
        assert_eq!(cart.business().stock_levels().await.get("beans"), Some(&18));
    }

    #[tokio::test]
    async fn test_accept_rejects_item_not_on_menu() {
        let cart = instant_cart(&[("beans", 36), ("cups", 2)]);
        let customer = Customer::default();
        let ticket = customer.join_queue(&cart).unwrap();
        let (order, receipt) = customer.create_order(ticket, &MenuItem::new("mocha", 500, 0));

        let err = Barista::default().accept_order(&cart, order).unwrap_err();
        assert!(matches!(err, CartError::UnknownMenuItem { .. }));
        assert!(matches!(receipt.wait().await, OrderOutcome::Rejected { .. }));
        assert_eq!(cart.business().ledger().orders_rejected, 1);
        assert!(cart.queue().is_empty());
    }

    #[tokio::test]
    async fn test_accept_rejects_order_after_queue_closed() {
        let cart = instant_cart(&[("beans", 36), ("cups", 2)]);
        let customer = Customer::default();
        let ticket = customer.join_queue(&cart).unwrap();
        cart.queue().close();

        let item = cart.menu().items()[0].clone();
        let (order, receipt) = customer.create_order(ticket, &item);
        let err = Barista::default().accept_order(&cart, order).unwrap_err();

        assert!(matches!(err, CartError::CartClosed));
        assert!(matches!(receipt.wait().await, OrderOutcome::Rejected { .. }));
        assert_eq!(cart.business().ledger().orders_rejected, 1);
        assert!(cart.queue().is_empty());
        assert_eq!(cart.queue().waiting(), 0);
    }

    #[tokio::test]
    async fn test_make_order_restocks_when_short() {
        let cart = instant_cart(&[("beans", 18), ("cups", 1)]);
        let barista = Barista::default();
        let customer = Customer::default();
        let item = cart.menu().items()[0].clone();

        for _ in 0..3 {
            let ticket = customer.join_queue(&cart).unwrap();
            let (order, _receipt) = customer.create_order(ticket, &item);
            barista.accept_order(&cart, order).unwrap();
        }
        for _ in 0..3 {
            assert!(barista.make_order(&cart).await.is_some());
        }

        let storeroom = cart.business().storeroom_snapshot();
        assert_eq!(storeroom.restocks, 2);
        assert_eq!(storeroom.units_drawn.get("beans"), Some(&36));
    }

    #[tokio::test]
    async fn test_restock_on_full_cart_draws_nothing() {
        let cart = instant_cart(&[("beans", 18), ("cups", 1)]);
        Barista::default().restock(&cart).await;

        let storeroom = cart.business().storeroom_snapshot();
        assert_eq!(storeroom.restocks, 1);
        assert!(storeroom.units_drawn.is_empty());
    }

    #[tokio::test]
    async fn test_work_drains_queue_then_stops() {
        let cart = Arc::new(instant_cart(&[("beans", 360), ("cups", 20)]));
        let customer = Customer::default();
        let item = cart.menu().items()[0].clone();
        let mut receipts = Vec::new();
        for _ in 0..4 {
            let ticket = customer.join_queue(&cart).unwrap();
            let (order, receipt) = customer.create_order(ticket, &item);
            Barista::default().accept_order(&cart, order).unwrap();
            receipts.push(receipt);
        }
        cart.queue().close();

        let made = Barista::new(BaristaId(2)).work(cart.clone()).await;
        assert_eq!(made, 4);
        for receipt in receipts {
            assert!(matches!(receipt.wait().await, OrderOutcome::Ready(_)));
        }
    }
}
