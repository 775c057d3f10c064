pub mod cli;
pub mod settings;
pub mod toml_config;

pub use settings::ShiftSettings;
pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "coffee-cart")]
#[command(about = "Simulates a shift at a coffee cart")]
pub struct ShiftConfig {
    /// Path to a TOML shift configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub baristas: Option<usize>,

    #[arg(long)]
    pub customers: Option<usize>,

    #[arg(long)]
    pub queue_capacity: Option<usize>,

    #[arg(long)]
    pub arrival_interval_ms: Option<u64>,

    /// Close the cart after this long; by default it closes once every customer has arrived
    #[arg(long)]
    pub open_duration_ms: Option<u64>,

    /// Multiplier for every pause; 0 runs the shift instantly
    #[arg(long)]
    pub time_scale: Option<f64>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Validate and print the settings without running a shift")]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl ShiftConfig {
    /// Loads the config file when given and applies the command-line overrides on top.
    pub fn resolve(&self) -> Result<ShiftSettings> {
        let mut settings = match &self.config {
            Some(path) => ShiftSettings::from_toml(TomlConfig::from_file(path)?),
            None => ShiftSettings::default(),
        };

        if let Some(baristas) = self.baristas {
            settings.baristas = baristas;
        }
        if let Some(customers) = self.customers {
            settings.customers = customers;
        }
        if let Some(capacity) = self.queue_capacity {
            settings.queue_capacity = capacity;
        }
        if let Some(ms) = self.arrival_interval_ms {
            settings.arrival_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.open_duration_ms {
            settings.open_duration = Some(Duration::from_millis(ms));
        }
        if let Some(scale) = self.time_scale {
            settings.timing.time_scale = scale;
        }
        if let Some(path) = &self.output_path {
            settings.output_path = path.clone();
        }

        Ok(settings)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[cart]\nbaristas = 4\ncustomers = 20\n")
            .unwrap();

        let config = ShiftConfig::parse_from([
            "coffee-cart",
            "--config",
            file.path().to_str().unwrap(),
            "--customers",
            "3",
            "--time-scale",
            "0",
        ]);
        let settings = config.resolve().unwrap();

        assert_eq!(settings.baristas, 4);
        assert_eq!(settings.customers, 3);
        assert_eq!(settings.timing.time_scale, 0.0);
    }

    #[test]
    fn test_no_config_file_uses_defaults() {
        let config = ShiftConfig::parse_from(["coffee-cart", "--verbose"]);
        assert!(config.verbose);

        let settings = config.resolve().unwrap();
        assert_eq!(settings.baristas, ShiftSettings::default().baristas);
    }
}
