//! Main application entry point (service binary).
//!
//! A thin wrapper around the `offer_api` library that handles:
//! - Environment variable loading (.env file)
//! - Command-line argument parsing
//! - Logger initialization
//!
//! All service functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use offer_api::initialization::init_logger_with;
use offer_api::{run_service, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // Settings such as DATABASE_PATH may come from a .env file next to the working directory
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {}", e);
        }
    }

    let config = Config::from(Opt::parse());

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    match run_service(config).await {
        Ok(report) => {
            if report.unflushed > 0 {
                log::error!("{} buffered offers were not persisted", report.unflushed);
                process::exit(2);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("offer_api error: {:#}", e);
            process::exit(1);
        }
    }
}
