use crate::cart::stock::{Stock, Storeroom};
use crate::domain::model::{CartState, LedgerSnapshot, StockLevels, StoreroomSnapshot};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

/// Business state of the cart: whether it is open, the cash ledger and stock.
#[derive(Debug)]
pub struct Business {
    state: watch::Sender<CartState>,
    ledger: Mutex<LedgerSnapshot>,
    stock: tokio::sync::Mutex<Stock>,
    storeroom: Mutex<Storeroom>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Business {
    pub fn new(stock_capacity: StockLevels) -> Self {
        Self {
            state: watch::Sender::new(CartState::Closed),
            ledger: Mutex::new(LedgerSnapshot::default()),
            stock: tokio::sync::Mutex::new(Stock::full(stock_capacity)),
            storeroom: Mutex::new(Storeroom::default()),
        }
    }

    /// Opens the cart so customers can join the ordering queue.
    pub fn open(&self) {
        if self.state.send_replace(CartState::Open) == CartState::Closed {
            tracing::info!("☕ Cart is open");
        }
    }

    /// Closes the cart to new customers. Orders already queued are still made.
    pub fn close(&self) {
        if self.state.send_replace(CartState::Closed) == CartState::Open {
            tracing::info!("🔒 Cart is closed");
        }
    }

    pub fn state(&self) -> CartState {
        *self.state.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.state() == CartState::Open
    }

    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    pub fn record_sale(&self, price_cents: u64) {
        let mut ledger = lock(&self.ledger);
        ledger.revenue_cents += price_cents;
        ledger.orders_served += 1;
    }

    pub fn record_rejection(&self) {
        lock(&self.ledger).orders_rejected += 1;
    }

    pub fn ledger(&self) -> LedgerSnapshot {
        *lock(&self.ledger)
    }

    pub(crate) fn stock(&self) -> &tokio::sync::Mutex<Stock> {
        &self.stock
    }

    pub(crate) fn storeroom(&self) -> MutexGuard<'_, Storeroom> {
        lock(&self.storeroom)
    }

    pub async fn stock_levels(&self) -> StockLevels {
        self.stock.lock().await.levels().clone()
    }

    pub fn storeroom_snapshot(&self) -> StoreroomSnapshot {
        self.storeroom().snapshot()
    }
}

impl Default for Business {
    fn default() -> Self {
        Self::new(StockLevels::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close_toggle_state() {
        let business = Business::default();
        assert!(!business.is_open());

        business.open();
        business.open();
        assert_eq!(business.state(), CartState::Open);

        business.close();
        business.close();
        assert_eq!(business.state(), CartState::Closed);
    }

    #[test]
    fn test_subscribers_see_state_changes() {
        let business = Business::default();
        let rx = business.subscribe();
        business.open();
        assert_eq!(*rx.borrow(), CartState::Open);
    }

    #[test]
    fn test_ledger_tracks_sales_and_rejections() {
        let business = Business::default();
        business.record_sale(350);
        business.record_sale(480);
        business.record_rejection();

        let ledger = business.ledger();
        assert_eq!(ledger.revenue_cents, 830);
        assert_eq!(ledger.orders_served, 2);
        assert_eq!(ledger.orders_rejected, 1);
    }
}
