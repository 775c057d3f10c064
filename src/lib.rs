pub mod cart;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use cart::{Barista, Business, Cart, Customer};
pub use config::{cli::LocalStorage, ShiftSettings, TomlConfig};
#[cfg(feature = "cli")]
pub use config::ShiftConfig;

pub use core::{cart_shift::CoffeeCartShift, shift::ShiftEngine};
pub use utils::error::{CartError, Result};
