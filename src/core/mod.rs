pub mod cart_shift;
pub mod shift;

pub use crate::domain::model::ShiftReport;
pub use crate::domain::ports::{ConfigProvider, Shift, Storage};
pub use crate::utils::error::Result;
