//! TUI mode for reviewing and deciding a request.
//!
//! This module provides the entry point for the interactive terminal user
//! interface that lets a reviewer edit quantities, remarks, and notes and
//! then approve or reject the request.

use std::io::{self, Write};

use bubbletea_rs::Program;

use stockwell::tui::{PanelSeed, ReviewPanelApp, set_panel_seed, set_submit_context};
use stockwell::{
    ApiToken, ApprovalError, HttpRequestGateway, RequestIntake, RequestLocator, StockwellConfig,
};

/// Statuses that make a request historical and therefore read-only.
fn is_historical(status: &str) -> bool {
    matches!(status, "approved" | "rejected" | "issued" | "closed")
}

/// Runs the TUI mode for one request.
///
/// # Errors
///
/// Returns an error if:
/// - The request URL is missing or invalid
/// - The token is missing or invalid
/// - The initial API fetch fails
/// - The TUI fails to initialise
pub async fn run(config: &StockwellConfig) -> Result<(), ApprovalError> {
    let request_url = config.require_request_url()?;
    let locator = RequestLocator::parse(request_url)?;
    let token = ApiToken::new(config.resolve_token()?)?;

    // Fetch the request before entering the alternate screen.
    let gateway = HttpRequestGateway::for_token(&token)?;
    let details = RequestIntake::new(&gateway).load(&locator).await?;

    let historical = details
        .metadata
        .status
        .as_deref()
        .is_some_and(is_historical);

    // Store panel data in module-level state for Model::init() to retrieve.
    // If already set (e.g. re-running the TUI in the same process), this is
    // a no-op and the existing data remains.
    let _ = set_panel_seed(PanelSeed {
        details,
        identity: config.resolve_identity(),
        note_max_length: config.note_max_length(),
        priority: config.priority,
        historical,
        remark_template: config.remark_template.clone(),
    });

    // Same semantics for the submission context.
    let _ = set_submit_context(locator, token, config.telemetry);

    run_tui().await.map_err(|error| ApprovalError::Api {
        message: format!("TUI error: {error}"),
    })?;

    Ok(())
}

/// Runs the bubbletea-rs program with the `ReviewPanelApp` model.
async fn run_tui() -> Result<(), bubbletea_rs::Error> {
    let program = Program::<ReviewPanelApp>::builder().alt_screen(true).build()?;

    program.run().await?;

    // Ensure stdout is flushed
    io::stdout().flush().ok();

    Ok(())
}
