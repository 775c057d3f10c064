use crate::core::{Shift, ShiftReport};
use crate::domain::model::format_cents;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct CompletedShift {
    pub report: ShiftReport,
    pub output_path: String,
}

pub struct ShiftEngine<S: Shift> {
    shift: S,
}

impl<S: Shift> ShiftEngine<S> {
    pub fn new(shift: S) -> Self {
        Self { shift }
    }

    pub async fn run(&self) -> Result<CompletedShift> {
        tracing::info!("Starting shift...");

        // Open
        let cart = self.shift.open().await?;
        tracing::info!(
            "Cart open with {} menu items, queue capacity {}",
            cart.menu().len(),
            cart.queue().capacity()
        );

        // Serve
        let report = self.shift.serve(cart).await?;
        tracing::info!(
            "Served {} of {} customers ({} turned away, {} rejected), revenue {}",
            report.served.len(),
            report.customers_arrived,
            report.turned_away_closed + report.turned_away_full,
            report.ledger.orders_rejected,
            format_cents(report.ledger.revenue_cents)
        );
        if let Some(wait) = report.average_wait_ms() {
            tracing::info!("Average wait: {}ms", wait);
        }

        // Close out
        let output_path = self.shift.close_out(&report).await?;
        tracing::info!("Report saved to: {}", output_path);

        Ok(CompletedShift {
            report,
            output_path,
        })
    }
}
