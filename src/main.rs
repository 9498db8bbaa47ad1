//! Stockwell CLI entrypoint for material-request review.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use stockwell::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};
use stockwell::{ApprovalError, OperationMode, StockwellConfig};

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ApprovalError> {
    let config = load_config()?;

    match config.operation_mode() {
        OperationMode::VendorUpdate => cli::vendor_update::run(&config).await,
        OperationMode::Export => {
            let sink = telemetry_sink(&config);
            cli::export_lines::run(&config, sink.as_ref()).await
        }
        OperationMode::ReviewTui => cli::review_tui::run(&config).await,
        OperationMode::SingleRequest => cli::single_request::run(&config).await,
        OperationMode::PendingListing => cli::pending_listing::run(&config).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ApprovalError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<StockwellConfig, ApprovalError> {
    StockwellConfig::load().map_err(|error| ApprovalError::Configuration {
        message: error.to_string(),
    })
}

fn telemetry_sink(config: &StockwellConfig) -> Box<dyn TelemetrySink> {
    if config.telemetry {
        Box::new(StderrJsonlTelemetrySink)
    } else {
        Box::new(NoopTelemetrySink)
    }
}
