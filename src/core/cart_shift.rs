use crate::cart::{Barista, Cart, Customer, QueueTicket};
use crate::core::{ConfigProvider, Shift, ShiftReport, Storage};
use crate::domain::model::{BaristaId, CustomerId, OrderOutcome, ReportFormat, ServedOrder};
use crate::utils::error::{CartError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// How a customer's visit ended once they made it into the queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Visit {
    Served(ServedOrder),
    Rejected,
    Abandoned,
}

/// The rest of a queued customer's trip: order at the till, wait for pickup.
pub async fn visit(cart: Arc<Cart>, customer: Customer, ticket: QueueTicket, till: Barista) -> Visit {
    let Some(item) = cart.menu().pick_for(customer.id()).cloned() else {
        return Visit::Rejected;
    };
    let (order, receipt) = customer.create_order(ticket, &item);
    if let Err(e) = till.accept_order(&cart, order) {
        tracing::debug!("{} could not order {}: {}", customer.id(), item.name, e);
    }

    match receipt.wait().await {
        OrderOutcome::Ready(served) => Visit::Served(served),
        OrderOutcome::Rejected { .. } => Visit::Rejected,
        OrderOutcome::Abandoned => Visit::Abandoned,
    }
}

pub struct CoffeeCartShift<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CoffeeCartShift<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn staff(&self) -> Vec<Barista> {
        (1..=self.config.baristas())
            .map(|id| Barista::new(BaristaId(id as u64)))
            .collect()
    }

    fn render(&self, format: ReportFormat, report: &ShiftReport) -> Result<Vec<u8>> {
        match format {
            ReportFormat::Json => Ok(serde_json::to_vec_pretty(report)?),
            ReportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                for served in &report.served {
                    writer.serialize(served)?;
                }
                writer.into_inner().map_err(|e| CartError::Io(e.into_error()))
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Shift for CoffeeCartShift<S, C> {
    async fn open(&self) -> Result<Arc<Cart>> {
        let cart = Arc::new(Cart::from_config(&self.config));
        cart.business().open();
        Ok(cart)
    }

    async fn serve(&self, cart: Arc<Cart>) -> Result<ShiftReport> {
        let timing = cart.timing();
        let staff = self.staff();
        if staff.is_empty() {
            return Err(CartError::InvalidConfigValue {
                field: "cart.baristas".to_string(),
                value: "0".to_string(),
                reason: "Value must be at least 1".to_string(),
            });
        }

        let mut workers = JoinSet::new();
        for barista in &staff {
            workers.spawn(barista.work(cart.clone()));
        }

        let mut report = ShiftReport {
            customers_arrived: self.config.customers() as u64,
            ..ShiftReport::default()
        };
        let open_for = self.config.open_duration();
        let interval = self.config.arrival_interval();
        // Shift clock in unscaled time; only the sleeps are scaled.
        let mut arrived_at = Duration::ZERO;
        let mut visits = JoinSet::new();
        for n in 0..self.config.customers() {
            if n > 0 {
                arrived_at = arrived_at.saturating_add(interval);
                tokio::time::sleep(timing.scale(interval)).await;
            }
            if open_for.is_some_and(|open_for| arrived_at >= open_for) {
                cart.business().close();
            }
            // Joining happens on arrival; the rest of the visit runs on its own task.
            let customer = Customer::new(CustomerId(n as u64));
            match customer.join_queue(&cart) {
                Ok(ticket) => {
                    let till = staff[n % staff.len()];
                    visits.spawn(visit(cart.clone(), customer, ticket, till));
                }
                Err(CartError::QueueFull { .. }) => report.turned_away_full += 1,
                Err(_) => report.turned_away_closed += 1,
            }
        }

        // Nobody else is coming once the last customer has arrived.
        cart.business().close();

        while let Some(outcome) = visits.join_next().await {
            match outcome? {
                Visit::Served(served) => report.served.push(served),
                Visit::Abandoned => report.orders_abandoned += 1,
                Visit::Rejected => {}
            }
        }

        cart.queue().close();
        while let Some(made) = workers.join_next().await {
            made?;
        }

        if report.turned_away_full > 0 {
            tracing::warn!(
                "{} customers found the queue full",
                report.turned_away_full
            );
        }

        report.served.sort_by_key(|served| served.order_id);
        report.ledger = cart.business().ledger();
        report.storeroom = cart.business().storeroom_snapshot();
        Ok(report)
    }

    async fn close_out(&self, report: &ShiftReport) -> Result<String> {
        for format in self.config.report_formats() {
            let data = self.render(*format, report)?;
            self.storage.write_file(format.file_name(), &data).await?;
            tracing::debug!("Wrote {}", format.file_name());
        }
        Ok(self.config.output_path().to_string())
    }
}
