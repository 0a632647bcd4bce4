//! Padwheel - virtual racing wheel feeder
//!
//! Turns a standard gamepad into a smoothed steering wheel and pedal set on
//! a virtual joystick device.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use padwheel::config::AppConfig;
use padwheel::feeder::Feeder;
use padwheel::input::{diagnostics, GamepadProvider};
use padwheel::output::{ConsoleDriver, WheelDriver};

/// Padwheel - feed a virtual racing wheel from a standard gamepad
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// List detected gamepads and exit
    #[arg(long)]
    list_devices: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    info!("Starting Padwheel...");

    if args.list_devices {
        diagnostics::print_device_diagnostics();
        return Ok(());
    }

    if args.write_config {
        AppConfig::default().write(&args.config).await?;
        info!("Default configuration written to {}", args.config);
        return Ok(());
    }

    let config = AppConfig::load(&args.config).await?;
    info!(
        "Configuration loaded: {} degrees of rotation, {} ms per tick",
        config.steering.max_angle, config.general.update_ms
    );

    // Acquire the virtual device before anything else; without an output
    // there is nothing to feed
    let driver: Arc<dyn WheelDriver> = Arc::new(ConsoleDriver::new("console"));
    driver.init().await?;

    let mut provider = GamepadProvider::start(config.general.tick_period())?;

    let feeder = Feeder::new(&config, provider.subscribe(), driver.clone());
    feeder.run(shutdown_signal()).await?;

    provider.shutdown();
    driver.shutdown().await?;

    info!("Padwheel shutdown complete");
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    info!("Shutdown signal received");
}
