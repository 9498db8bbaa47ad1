//! HTTP implementation of the vendor gateway.

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::erp::error::ApprovalError;
use crate::erp::locator::{ApiToken, RequestLocator};
use crate::erp::models::VendorDetails;

use super::VendorGateway;
use super::client::{build_erp_client, endpoint};
use super::error_mapping::{ensure_success, map_transport_error};

/// Reqwest-backed gateway for vendor detail updates.
pub struct HttpVendorGateway {
    client: Client,
}

impl HttpVendorGateway {
    /// Creates a new gateway from an existing client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a gateway authenticated with the given token.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Configuration`] when the HTTP client cannot
    /// be constructed.
    pub fn for_token(token: &ApiToken) -> Result<Self, ApprovalError> {
        Ok(Self::new(build_erp_client(token)?))
    }
}

#[async_trait]
impl VendorGateway for HttpVendorGateway {
    async fn update_vendor(
        &self,
        locator: &RequestLocator,
        component_id: u64,
        vendor: &VendorDetails,
    ) -> Result<(), ApprovalError> {
        let url = endpoint(locator.api_base(), &locator.vendor_path(component_id))?;
        info!(request = %locator.label(), component_id, "updating vendor details");

        let response = self
            .client
            .put(url)
            .json(vendor)
            .send()
            .await
            .map_err(|error| map_transport_error("update vendor", &error))?;
        ensure_success("update vendor", response).await?;
        Ok(())
    }
}
