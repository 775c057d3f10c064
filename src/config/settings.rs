use crate::cart::{Stock, DEFAULT_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY};
use crate::config::toml_config::TomlConfig;
use crate::domain::model::{default_stock_capacity, Menu, ReportFormat, StockLevels, Timing};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_unique_names, Validate,
};
use std::time::Duration;

/// Fully resolved shift settings: defaults, then the TOML file, then CLI flags.
#[derive(Debug, Clone)]
pub struct ShiftSettings {
    pub name: String,
    pub baristas: usize,
    pub customers: usize,
    pub queue_capacity: usize,
    pub arrival_interval: Duration,
    pub open_duration: Option<Duration>,
    pub menu: Menu,
    pub stock_capacity: StockLevels,
    pub timing: Timing,
    pub output_path: String,
    pub report_formats: Vec<ReportFormat>,
}

impl Default for ShiftSettings {
    fn default() -> Self {
        Self {
            name: "coffee cart".to_string(),
            baristas: 2,
            customers: 10,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            arrival_interval: Duration::from_millis(50),
            open_duration: None,
            menu: Menu::default(),
            stock_capacity: default_stock_capacity(),
            timing: Timing::default(),
            output_path: "./output".to_string(),
            report_formats: vec![ReportFormat::Json, ReportFormat::Csv],
        }
    }
}

impl ShiftSettings {
    pub fn from_toml(config: TomlConfig) -> Self {
        let mut settings = Self::default();
        let cart = config.cart;

        if let Some(name) = cart.name {
            settings.name = name;
        }
        if let Some(baristas) = cart.baristas {
            settings.baristas = baristas;
        }
        if let Some(customers) = cart.customers {
            settings.customers = customers;
        }
        if let Some(capacity) = cart.queue_capacity {
            settings.queue_capacity = capacity;
        }
        if let Some(ms) = cart.arrival_interval_ms {
            settings.arrival_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = cart.open_duration_ms {
            settings.open_duration = Some(Duration::from_millis(ms));
        }
        if let Some(ms) = config.timing.restock_ms {
            settings.timing.restock_ms = ms;
        }
        if let Some(scale) = config.timing.time_scale {
            settings.timing.time_scale = scale;
        }
        // Menu and stock are replaced wholesale, never merged with the defaults.
        if !config.menu.is_empty() {
            settings.menu = Menu::new(config.menu);
        }
        if !config.stock.is_empty() {
            settings.stock_capacity = config.stock;
        }
        if let Some(path) = config.output.path {
            settings.output_path = path;
        }
        if let Some(formats) = config.output.formats {
            settings.report_formats = formats;
        }

        settings
    }
}

impl Validate for ShiftSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("cart.name", &self.name)?;
        validate_positive_number("cart.baristas", self.baristas, 1)?;
        validate_range(
            "cart.queue_capacity",
            self.queue_capacity,
            1,
            MAX_QUEUE_CAPACITY,
        )?;
        if self.timing.time_scale.is_nan() {
            return Err(CartError::InvalidConfigValue {
                field: "timing.time_scale".to_string(),
                value: "NaN".to_string(),
                reason: "Value must be a number".to_string(),
            });
        }
        validate_range("timing.time_scale", self.timing.time_scale, 0.0, 100.0)?;
        validate_path("output.path", &self.output_path)?;

        if self.menu.is_empty() {
            return Err(CartError::InvalidConfigValue {
                field: "menu".to_string(),
                value: "[]".to_string(),
                reason: "The menu needs at least one item".to_string(),
            });
        }
        validate_unique_names("menu.name", self.menu.items().iter().map(|i| i.name.as_str()))?;

        let full_cart = Stock::full(self.stock_capacity.clone());
        for item in self.menu.items() {
            validate_non_empty_string("menu.name", &item.name)?;
            full_cart
                .check_fits(&item.recipe)
                .map_err(|reason| CartError::InvalidConfigValue {
                    field: format!("menu.{}.recipe", item.name),
                    value: format!("{:?}", item.recipe),
                    reason: format!("{}; adjust [stock]", reason),
                })?;
        }

        Ok(())
    }
}

impl ConfigProvider for ShiftSettings {
    fn baristas(&self) -> usize {
        self.baristas
    }

    fn customers(&self) -> usize {
        self.customers
    }

    fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    fn arrival_interval(&self) -> Duration {
        self.arrival_interval
    }

    fn open_duration(&self) -> Option<Duration> {
        self.open_duration
    }

    fn menu(&self) -> &Menu {
        &self.menu
    }

    fn stock_capacity(&self) -> &StockLevels {
        &self.stock_capacity
    }

    fn timing(&self) -> Timing {
        self.timing
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn report_formats(&self) -> &[ReportFormat] {
        &self.report_formats
    }
}
