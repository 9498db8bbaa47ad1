//! High-level intake facade used by the CLI and the review panel.

use super::error::ApprovalError;
use super::gateway::RequestGateway;
use super::locator::RequestLocator;
use super::models::RequestDetails;

/// Loads a request's metadata and line items using a gateway.
pub struct RequestIntake<'client, Gateway>
where
    Gateway: RequestGateway,
{
    client: &'client Gateway,
}

impl<'client, Gateway> RequestIntake<'client, Gateway>
where
    Gateway: RequestGateway,
{
    /// Create a new intake facade using the provided gateway.
    #[must_use]
    pub const fn new(client: &'client Gateway) -> Self {
        Self { client }
    }

    /// Load the target request in full.
    ///
    /// # Errors
    ///
    /// Propagates any failure from the underlying gateway, including backend
    /// authentication errors or network problems.
    pub async fn load(&self, locator: &RequestLocator) -> Result<RequestDetails, ApprovalError> {
        self.client.request_details(locator).await
    }
}
