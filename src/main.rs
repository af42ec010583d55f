//! plantwatch: unattended greenhouse logger for Raspberry Pi
//!
//! Polls a DHT22 climate sensor and a TSL2561 light sensor on a fixed cadence
//! and appends every sample as a timestamped row to a Google Sheets
//! spreadsheet. Runs until killed; no failure is fatal.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod sample;
mod sensors;
mod shared;
mod sheets;
mod watcher;

use sensors::climate::Dht22;
use sensors::light::Tsl2561;
use shared::ThreadSleeper;
use sheets::google::GoogleSheets;
use watcher::Watcher;

fn main() -> anyhow::Result<()> {
    init_logging()?;

    tracing::info!("starting plantwatch");

    let climate = Dht22::new(config::DHT22_PIN);
    let light = Tsl2561::new(config::I2C_BUS);
    let sheets = GoogleSheets::new(config::CREDENTIALS_PATH, config::SPREADSHEET_NAME);

    Watcher::new(climate, light, sheets, ThreadSleeper).run()
}

/// One log file per calendar day under `logs/`, DEBUG and up.
fn init_logging() -> anyhow::Result<()> {
    std::fs::create_dir_all(config::LOG_DIR).context("creating log directory")?;

    let appender = tracing_appender::rolling::daily(config::LOG_DIR, config::LOG_PREFIX);
    tracing_subscriber::registry()
        .with(EnvFilter::new("plantwatch=debug"))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(appender)
                .with_ansi(false),
        )
        .init();
    Ok(())
}
