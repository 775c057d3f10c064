use clap::Parser;
use coffee_cart::domain::model::format_cents;
use coffee_cart::utils::error::ErrorSeverity;
use coffee_cart::utils::logger::{self, LogFormat};
use coffee_cart::utils::validation::Validate;
use coffee_cart::{CoffeeCartShift, LocalStorage, ShiftConfig, ShiftEngine, ShiftSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ShiftConfig::parse();

    // 初始化日誌
    let format = if config.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(config.verbose, format);

    tracing::info!("Starting coffee-cart");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 載入並驗證配置
    let settings = match config.resolve().and_then(|settings| {
        settings.validate()?;
        Ok(settings)
    }) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if config.dry_run {
        print_settings(&settings);
        return Ok(());
    }

    let storage = LocalStorage::new(settings.output_path.clone());
    let shift = CoffeeCartShift::new(storage, settings);
    let engine = ShiftEngine::new(shift);

    match engine.run().await {
        Ok(completed) => {
            let report = &completed.report;
            println!("✅ Shift complete!");
            println!(
                "☕ Served {} of {} customers, revenue {}",
                report.served.len(),
                report.customers_arrived,
                format_cents(report.ledger.revenue_cents)
            );
            println!("📁 Report saved to: {}", completed.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Shift failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn print_settings(settings: &ShiftSettings) {
    println!("🔍 Dry run for '{}'", settings.name);
    println!(
        "   {} baristas, {} customers, queue capacity {}",
        settings.baristas, settings.customers, settings.queue_capacity
    );
    println!(
        "   arrivals every {:?}, open for {}",
        settings.arrival_interval,
        settings
            .open_duration
            .map(|d| format!("{:?}", d))
            .unwrap_or_else(|| "as long as customers keep coming".to_string())
    );
    for item in settings.menu.items() {
        println!(
            "   - {} {} ({}ms)",
            item.name,
            format_cents(item.price_cents),
            item.time_to_make_ms
        );
    }
    println!("   output: {} {:?}", settings.output_path, settings.report_formats);
}
