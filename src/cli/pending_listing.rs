//! Pending request listing operation.

use std::io;

use stockwell::erp::gateway::ListingGateway;
use stockwell::{ApiToken, ApprovalError, HttpRequestGateway, ServiceLocator, StockwellConfig};

use super::default_listing_params;
use super::output::write_listing_summary;

/// Lists requests awaiting the caller's action.
///
/// # Errors
///
/// Returns [`ApprovalError::Configuration`] when no service URL is set,
/// [`ApprovalError::MissingToken`] without a token, and propagates gateway
/// failures.
pub async fn run(config: &StockwellConfig) -> Result<(), ApprovalError> {
    let service_url = config.require_service_url()?;
    let token = ApiToken::new(config.resolve_token()?)?;

    let locator = ServiceLocator::parse(service_url)?;
    let gateway = HttpRequestGateway::for_token(&token)?;
    let page = gateway
        .pending_requests(&locator, &default_listing_params())
        .await?;

    let mut stdout = io::stdout().lock();
    write_listing_summary(&mut stdout, &page)
}
