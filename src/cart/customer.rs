use crate::cart::queue::{Order, OrderReceipt, QueueTicket};
use crate::cart::Cart;
use crate::domain::model::{CustomerId, MenuItem};
use crate::utils::error::{CartError, Result};

/// A customer visiting the coffee cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Customer {
    id: CustomerId,
}

impl Customer {
    pub fn new(id: CustomerId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    /// Adds the customer to the ordering queue, to be served asynchronously by
    /// a barista. Fails if the cart is closed or the queue is full.
    pub fn join_queue(&self, cart: &Cart) -> Result<QueueTicket> {
        if !cart.business().is_open() {
            tracing::debug!("{} turned away: cart closed", self.id);
            return Err(CartError::CartClosed);
        }
        let ticket = cart.queue().reserve().inspect_err(|e| {
            tracing::debug!("{} turned away: {}", self.id, e);
        })?;
        tracing::debug!("{} joined the queue as {}", self.id, ticket.number());
        Ok(ticket)
    }

    /// A customer in the queue can always make an order, so this does not fail.
    /// The barista taking the order decides whether it can be made.
    pub fn create_order(&self, ticket: QueueTicket, item: &MenuItem) -> (Order, OrderReceipt) {
        Order::new(ticket, self.id, item.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_queue_on_open_cart_always_succeeds() {
        let cart = Cart::default();
        cart.business().open();
        let customer = Customer::default();

        let capacity = cart.queue().capacity();
        let tickets: Vec<_> = (0..capacity)
            .map(|_| customer.join_queue(&cart))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(tickets.len(), capacity);
    }

    #[test]
    fn test_join_queue_fails_when_closed() {
        let cart = Cart::default();
        let customer = Customer::new(CustomerId(4));
        assert!(matches!(
            customer.join_queue(&cart),
            Err(CartError::CartClosed)
        ));
    }

    #[test]
    fn test_create_order_carries_ticket_number() {
        let cart = Cart::default();
        cart.business().open();
        let customer = Customer::new(CustomerId(2));

        let ticket = customer.join_queue(&cart).unwrap();
        let number = ticket.number();
        let item = cart.menu().items()[0].clone();
        let (order, receipt) = customer.create_order(ticket, &item);

        assert_eq!(order.id, number);
        assert_eq!(receipt.order_id(), number);
        assert_eq!(order.customer, CustomerId(2));
        assert_eq!(order.item, item);
    }
}
