//! HTTP implementation of the approval gateway.

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::erp::error::ApprovalError;
use crate::erp::locator::{ApiToken, RequestLocator};
use crate::erp::models::submission::{ApprovalOutcome, ApprovalSubmission, RejectionSubmission};

use super::ApprovalGateway;
use super::client::{build_erp_client, endpoint};
use super::error_mapping::{ensure_success, map_transport_error};

/// Reqwest-backed gateway for approve and reject submissions.
pub struct HttpApprovalGateway {
    client: Client,
}

impl HttpApprovalGateway {
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

    async fn post_decision<B: serde::Serialize + Sync>(
        &self,
        operation: &str,
        url: url::Url,
        body: &B,
    ) -> Result<ApprovalOutcome, ApprovalError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|error| map_transport_error(operation, &error))?;
        let response = ensure_success(operation, response).await?;

        response.json().await.map_err(|error| ApprovalError::Api {
            message: format!("{operation} returned an invalid body: {error}"),
        })
    }
}

#[async_trait]
impl ApprovalGateway for HttpApprovalGateway {
    async fn approve(
        &self,
        locator: &RequestLocator,
        submission: &ApprovalSubmission,
    ) -> Result<ApprovalOutcome, ApprovalError> {
        let url = endpoint(locator.api_base(), &locator.approve_path())?;
        info!(
            request = %locator.label(),
            items = submission.updated_items.len(),
            "submitting approval"
        );
        self.post_decision("approve", url, submission).await
    }

    async fn reject(
        &self,
        locator: &RequestLocator,
        rejection: &RejectionSubmission,
    ) -> Result<ApprovalOutcome, ApprovalError> {
        let url = endpoint(locator.api_base(), &locator.reject_path())?;
        info!(request = %locator.label(), "submitting rejection");
        self.post_decision("reject", url, rejection).await
    }
}
