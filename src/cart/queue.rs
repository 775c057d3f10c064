use crate::domain::model::{CustomerId, MenuItem, OrderId, OrderOutcome};
use crate::utils::error::{CartError, Result};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{oneshot, Notify, OwnedSemaphorePermit, Semaphore, TryAcquireError};

/// A customer's place in line. Dropping it gives the slot back.
#[derive(Debug)]
pub struct QueueTicket {
    number: OrderId,
    _slot: OwnedSemaphorePermit,
}

impl QueueTicket {
    pub fn number(&self) -> OrderId {
        self.number
    }
}

#[derive(Debug)]
pub struct Order {
    pub id: OrderId,
    pub customer: CustomerId,
    pub item: MenuItem,
    pub placed_at: DateTime<Utc>,
    ticket: Option<QueueTicket>,
    notifier: oneshot::Sender<OrderOutcome>,
}

impl Order {
    pub(crate) fn new(
        ticket: QueueTicket,
        customer: CustomerId,
        item: MenuItem,
    ) -> (Self, OrderReceipt) {
        let (notifier, rx) = oneshot::channel();
        let id = ticket.number();
        let order = Self {
            id,
            customer,
            item,
            placed_at: Utc::now(),
            ticket: Some(ticket),
            notifier,
        };
        (order, OrderReceipt { order_id: id, rx })
    }

    /// Moves the customer from the queue to the pickup area.
    fn leave_queue(&mut self) {
        self.ticket.take();
    }

    /// Returns false when the customer is no longer waiting.
    pub(crate) fn signal(self, outcome: OrderOutcome) -> bool {
        self.notifier.send(outcome).is_ok()
    }
}

#[derive(Debug)]
pub struct OrderReceipt {
    order_id: OrderId,
    rx: oneshot::Receiver<OrderOutcome>,
}

impl OrderReceipt {
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub async fn wait(self) -> OrderOutcome {
        self.rx.await.unwrap_or(OrderOutcome::Abandoned)
    }
}

/// FIFO of accepted orders with a fixed number of customer slots.
#[derive(Debug)]
pub struct OrderQueue {
    capacity: usize,
    slots: Arc<Semaphore>,
    orders: Mutex<VecDeque<Order>>,
    available: Notify,
    closed: AtomicBool,
    next_number: AtomicU64,
}

impl OrderQueue {
    /// Capacities above what a semaphore can count are clamped.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(Semaphore::MAX_PERMITS);
        Self {
            capacity,
            slots: Arc::new(Semaphore::new(capacity)),
            orders: Mutex::new(VecDeque::new()),
            available: Notify::new(),
            closed: AtomicBool::new(false),
            next_number: AtomicU64::new(1),
        }
    }

    fn orders(&self) -> MutexGuard<'_, VecDeque<Order>> {
        self.orders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Customers holding a slot, whether or not they have ordered yet.
    pub fn waiting(&self) -> usize {
        self.capacity - self.slots.available_permits()
    }

    pub fn len(&self) -> usize {
        self.orders().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders().is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn reserve(&self) -> Result<QueueTicket> {
        if self.is_closed() {
            return Err(CartError::CartClosed);
        }
        let slot = self
            .slots
            .clone()
            .try_acquire_owned()
            .map_err(|e| match e {
                TryAcquireError::NoPermits => CartError::QueueFull {
                    capacity: self.capacity,
                },
                TryAcquireError::Closed => CartError::CartClosed,
            })?;
        let number = OrderId(self.next_number.fetch_add(1, Ordering::Relaxed));
        Ok(QueueTicket {
            number,
            _slot: slot,
        })
    }

    pub fn push(&self, order: Order) {
        self.orders().push_back(order);
        self.available.notify_one();
    }

    /// Takes the oldest order and frees its customer's slot.
    pub fn pop(&self) -> Option<Order> {
        let mut order = self.orders().pop_front()?;
        order.leave_queue();
        Some(order)
    }

    /// Waits for the next order; `None` once the queue is closed and drained.
    pub async fn next(&self) -> Option<Order> {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(order) = self.pop() {
                return Some(order);
            }
            if self.is_closed() {
                return None;
            }
            notified.await;
        }
    }

    /// Stops new reservations and wakes idle baristas so they can drain and exit.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.available.notify_waiters();
    }
}
