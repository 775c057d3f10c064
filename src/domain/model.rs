use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

macro_rules! id_type {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

id_type!(BaristaId, "barista");
id_type!(CustomerId, "customer");
id_type!(OrderId, "order");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartState {
    Open,
    #[default]
    Closed,
}

/// Ingredient name to units.
pub type Recipe = BTreeMap<String, u32>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price_cents: u64,
    pub time_to_make_ms: u64,
    #[serde(default)]
    pub recipe: Recipe,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, price_cents: u64, time_to_make_ms: u64) -> Self {
        Self {
            name: name.into(),
            price_cents,
            time_to_make_ms,
            recipe: Recipe::new(),
        }
    }

    pub fn with_ingredient(mut self, ingredient: impl Into<String>, units: u32) -> Self {
        self.recipe.insert(ingredient.into(), units);
        self
    }

    pub fn time_to_make(&self) -> Duration {
        Duration::from_millis(self.time_to_make_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn get(&self, name: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Customer `n` always orders the same item, cycling through the menu.
    pub fn pick_for(&self, customer: CustomerId) -> Option<&MenuItem> {
        if self.items.is_empty() {
            return None;
        }
        self.items.get((customer.0 as usize) % self.items.len())
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new(vec![
            MenuItem::new("espresso", 350, 120)
                .with_ingredient("beans", 18)
                .with_ingredient("cups", 1),
            MenuItem::new("flat white", 450, 200)
                .with_ingredient("beans", 18)
                .with_ingredient("milk", 120)
                .with_ingredient("cups", 1),
            MenuItem::new("latte", 480, 220)
                .with_ingredient("beans", 18)
                .with_ingredient("milk", 200)
                .with_ingredient("cups", 1),
            MenuItem::new("cold brew", 500, 60)
                .with_ingredient("cold brew", 250)
                .with_ingredient("cups", 1),
        ])
    }
}

/// Per-ingredient units the cart itself can hold.
pub type StockLevels = BTreeMap<String, u32>;

pub fn default_stock_capacity() -> StockLevels {
    [("beans", 360), ("milk", 2000), ("cold brew", 2000), ("cups", 20)]
        .into_iter()
        .map(|(name, units)| (name.to_string(), units))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub restock_ms: u64,
    /// Multiplier applied to every pause; 0 makes the simulation instant.
    pub time_scale: f64,
}

impl Timing {
    pub fn scale(&self, duration: Duration) -> Duration {
        duration.mul_f64(self.time_scale)
    }

    pub fn restock(&self) -> Duration {
        self.scale(Duration::from_millis(self.restock_ms))
    }

    pub fn instant() -> Self {
        Self {
            time_scale: 0.0,
            ..Self::default()
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            restock_ms: 200,
            time_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportFormat::Json => "report.json",
            ReportFormat::Csv => "orders.csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServedOrder {
    pub order_id: OrderId,
    pub customer: CustomerId,
    pub barista: BaristaId,
    pub item: String,
    pub price_cents: u64,
    pub placed_at: DateTime<Utc>,
    pub ready_at: DateTime<Utc>,
}

impl ServedOrder {
    pub fn wait_ms(&self) -> i64 {
        (self.ready_at - self.placed_at).num_milliseconds()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Ready(ServedOrder),
    Rejected { reason: String },
    /// The order was dropped before anyone signalled the customer.
    Abandoned,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub revenue_cents: u64,
    pub orders_served: u64,
    pub orders_rejected: u64,
}

pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreroomSnapshot {
    pub restocks: u64,
    pub units_drawn: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftReport {
    pub customers_arrived: u64,
    pub turned_away_closed: u64,
    pub turned_away_full: u64,
    pub orders_abandoned: u64,
    pub ledger: LedgerSnapshot,
    pub storeroom: StoreroomSnapshot,
    pub served: Vec<ServedOrder>,
}

impl ShiftReport {
    pub fn average_wait_ms(&self) -> Option<i64> {
        if self.served.is_empty() {
            return None;
        }
        let total: i64 = self.served.iter().map(ServedOrder::wait_ms).sum();
        Some(total / self.served.len() as i64)
    }
}
