use crate::cart::Cart;
use crate::domain::model::{Menu, ReportFormat, ShiftReport, StockLevels, Timing};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn baristas(&self) -> usize;
    fn customers(&self) -> usize;
    fn queue_capacity(&self) -> usize;
    fn arrival_interval(&self) -> Duration;
    /// `None` keeps the cart open until every customer has arrived.
    fn open_duration(&self) -> Option<Duration>;
    fn menu(&self) -> &Menu;
    fn stock_capacity(&self) -> &StockLevels;
    fn timing(&self) -> Timing;
    fn output_path(&self) -> &str;
    fn report_formats(&self) -> &[ReportFormat];
}

#[async_trait]
pub trait Shift: Send + Sync {
    async fn open(&self) -> Result<Arc<Cart>>;
    async fn serve(&self, cart: Arc<Cart>) -> Result<ShiftReport>;
    async fn close_out(&self, report: &ShiftReport) -> Result<String>;
}
