use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("The cart is closed")]
    CartClosed,

    #[error("The queue is full ({capacity} customers waiting)")]
    QueueFull { capacity: usize },

    #[error("Invalid order for '{item}': {reason}")]
    InvalidOrder { item: String, reason: String },

    #[error("Unknown menu item: {name}")]
    UnknownMenuItem { name: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigParse { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Worker task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Service,
    Order,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::CartClosed | CartError::QueueFull { .. } => ErrorCategory::Service,
            CartError::InvalidOrder { .. } | CartError::UnknownMenuItem { .. } => {
                ErrorCategory::Order
            }
            CartError::InvalidConfigValue { .. } | CartError::ConfigParse { .. } => {
                ErrorCategory::Configuration
            }
            CartError::Io(_)
            | CartError::Serialization(_)
            | CartError::Csv(_)
            | CartError::TaskJoin(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Service => ErrorSeverity::Low,
            ErrorCategory::Order => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Customers turned away at the cart are part of a normal shift.
    pub fn is_turn_away(&self) -> bool {
        matches!(self, CartError::CartClosed | CartError::QueueFull { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CartError::CartClosed => "Sorry, the coffee cart is closed.".to_string(),
            CartError::QueueFull { .. } => {
                "The queue is full right now, please come back later.".to_string()
            }
            CartError::InvalidOrder { item, .. } => {
                format!("We can't make '{}' at this cart.", item)
            }
            CartError::UnknownMenuItem { name } => format!("'{}' is not on the menu.", name),
            CartError::InvalidConfigValue { field, .. } => {
                format!("The setting '{}' is not valid.", field)
            }
            CartError::ConfigParse { .. } => "The configuration file could not be read.".to_string(),
            CartError::Io(_) => "A file could not be read or written.".to_string(),
            CartError::Serialization(_) | CartError::Csv(_) => {
                "The shift report could not be written.".to_string()
            }
            CartError::TaskJoin(_) => "A worker stopped unexpectedly.".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CartError::CartClosed => "Open the cart before customers arrive".to_string(),
            CartError::QueueFull { capacity } => format!(
                "Increase --queue-capacity (currently {}) or add baristas",
                capacity
            ),
            CartError::InvalidOrder { .. } => {
                "Check the recipe against the [stock] capacities in the config".to_string()
            }
            CartError::UnknownMenuItem { .. } => "Add the item to the [[menu]] section".to_string(),
            CartError::InvalidConfigValue { reason, .. } => reason.clone(),
            CartError::ConfigParse { .. } => {
                "Make sure the file exists and is valid TOML".to_string()
            }
            CartError::Io(_) => "Check that the output path is writable".to_string(),
            CartError::Serialization(_) | CartError::Csv(_) => {
                "Re-run the shift; the report data may be corrupt".to_string()
            }
            CartError::TaskJoin(_) => "Re-run with --verbose to see the failing task".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
