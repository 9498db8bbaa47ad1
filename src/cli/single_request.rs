//! Single request loading operation.

use stockwell::{
    ApiToken, ApprovalError, HttpRequestGateway, RequestIntake, RequestLocator, StockwellConfig,
};

use super::output::write_request_summary;

/// Loads a single request by URL and prints its summary.
///
/// # Errors
///
/// Returns [`ApprovalError::MissingRequestUrl`] or
/// [`ApprovalError::MissingToken`] when required configuration is missing,
/// and propagates gateway failures.
pub async fn run(config: &StockwellConfig) -> Result<(), ApprovalError> {
    let request_url = config.require_request_url()?;
    let token_value = config.resolve_token()?;

    let locator = RequestLocator::parse(request_url)?;
    let token = ApiToken::new(token_value)?;

    let gateway = HttpRequestGateway::for_token(&token)?;
    let intake = RequestIntake::new(&gateway);
    let details = intake.load(&locator).await?;

    write_request_summary(&details)
}
