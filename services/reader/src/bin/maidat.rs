//! services/reader/src/bin/maidat.rs

use maidat_core::DailyContentRequester;
use reader_lib::{
    adapters::GeminiContentAdapter,
    config::Config,
    console::{run_console, ShellDriver},
    error::AppError,
};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(
        model = %config.content_model,
        start_day = config.start_day.get(),
        "Configuration loaded. Starting shell..."
    );

    // --- 2. Initialize the Provider Adapter ---
    let provider = Arc::new(GeminiContentAdapter::from_config(&config));
    let requester = Arc::new(DailyContentRequester::new(provider));

    // --- 3. Mount the Shell and Run Until Quit ---
    let driver = ShellDriver::mount(requester, config.start_day);
    run_console(driver, BufReader::new(tokio::io::stdin()), std::io::stdout()).await?;

    info!("Shell closed.");
    Ok(())
}
