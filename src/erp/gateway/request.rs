//! HTTP implementation of the request and listing gateways.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::erp::error::ApprovalError;
use crate::erp::locator::{ApiToken, RequestLocator, ServiceLocator};
use crate::erp::models::{PendingRequestPage, RequestDetails};

use super::client::{build_erp_client, endpoint};
use super::error_mapping::{ensure_success, map_transport_error};
use super::{ListingGateway, RequestGateway};

const MAX_PER_PAGE: u8 = 100;

/// Pagination parameters for the pending-request listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingListingParams {
    /// 1-based page number; defaults to the first page.
    pub page: Option<u32>,
    /// Items per page; defaults to the backend's page size.
    pub per_page: Option<u8>,
}

fn validate_listing_params(params: &PendingListingParams) -> Result<(), ApprovalError> {
    if params.page == Some(0) {
        return Err(ApprovalError::InvalidListing {
            message: "page must be at least 1".to_owned(),
        });
    }

    if params.per_page == Some(0) {
        return Err(ApprovalError::InvalidListing {
            message: "per_page must be at least 1".to_owned(),
        });
    }

    if params.per_page.is_some_and(|value| value > MAX_PER_PAGE) {
        return Err(ApprovalError::InvalidListing {
            message: format!("per_page must not exceed {MAX_PER_PAGE}"),
        });
    }

    Ok(())
}

/// Reqwest-backed gateway for loading requests and listings.
pub struct HttpRequestGateway {
    client: Client,
}

impl HttpRequestGateway {
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
impl RequestGateway for HttpRequestGateway {
    async fn request_details(
        &self,
        locator: &RequestLocator,
    ) -> Result<RequestDetails, ApprovalError> {
        let url = endpoint(locator.api_base(), &locator.details_path())?;
        debug!(url = %url, "fetching request details");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| map_transport_error("load request", &error))?;
        let response = ensure_success("load request", response).await?;

        let details: crate::erp::models::ApiRequestDetails =
            response.json().await.map_err(|error| ApprovalError::Api {
                message: format!("load request returned an invalid body: {error}"),
            })?;
        Ok(details.into())
    }
}

#[async_trait]
impl ListingGateway for HttpRequestGateway {
    async fn pending_requests(
        &self,
        locator: &ServiceLocator,
        params: &PendingListingParams,
    ) -> Result<PendingRequestPage, ApprovalError> {
        validate_listing_params(params)?;

        let page = params.page.unwrap_or(1);
        let per_page = params.per_page.unwrap_or(30);

        let url = endpoint(locator.api_base(), &locator.pending_path())?;
        debug!(url = %url, page, per_page, "listing pending requests");

        let response = self
            .client
            .get(url)
            .query(&[
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await
            .map_err(|error| map_transport_error("list pending", &error))?;
        let response = ensure_success("list pending", response).await?;

        let listing: crate::erp::models::ApiPendingPage =
            response.json().await.map_err(|error| ApprovalError::Api {
                message: format!("list pending returned an invalid body: {error}"),
            })?;
        Ok(listing.into())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{HttpRequestGateway, PendingListingParams};
    use crate::erp::error::ApprovalError;
    use crate::erp::gateway::{ListingGateway, RequestGateway};
    use crate::erp::locator::{ApiToken, FormKind, RequestLocator, ServiceLocator};

    fn gateway() -> HttpRequestGateway {
        let token = ApiToken::new("valid-token").expect("token should be valid");
        HttpRequestGateway::for_token(&token).expect("gateway should build")
    }

    #[tokio::test]
    async fn request_details_sends_bearer_token_and_decodes_body() {
        let server = MockServer::start().await;
        let locator = RequestLocator::parse(&format!("{}/forms/mif/42", server.uri()))
            .expect("locator should parse");

        let response = ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "number": 42,
            "kind": "mif",
            "title": "Bench rework batch",
            "status": "pending_head",
            "components": [{
                "component_id": 301,
                "initial_requested_qty": 50,
                "updated_requested_qty": 30,
                "note": "please expedite"
            }]
        }));

        Mock::given(method("GET"))
            .and(path("/api/requests/mif/42"))
            .and(header("authorization", "Bearer valid-token"))
            .respond_with(response)
            .mount(&server)
            .await;

        let details = gateway()
            .request_details(&locator)
            .await
            .expect("request should succeed");

        assert_eq!(details.metadata.number, 42);
        assert_eq!(details.metadata.kind, FormKind::Mif);
        let line = details.lines.first().expect("line expected");
        assert_eq!(line.current_quantity, 30);
        assert_eq!(
            line.notes.first().map(|note| note.content.as_str()),
            Some("please expedite")
        );
    }

    #[tokio::test]
    async fn request_details_surfaces_backend_message_on_conflict() {
        let server = MockServer::start().await;
        let locator = RequestLocator::parse(&format!("{}/forms/mrf/7", server.uri()))
            .expect("locator should parse");

        let response = ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "message": "request already actioned"
        }));
        Mock::given(method("GET"))
            .and(path("/api/requests/mrf/7"))
            .respond_with(response)
            .mount(&server)
            .await;

        let error = gateway()
            .request_details(&locator)
            .await
            .expect_err("request should fail");

        assert!(
            matches!(error, ApprovalError::Api { ref message } if message.contains("request already actioned")),
            "unexpected error: {error:?}"
        );
    }

    #[tokio::test]
    async fn request_details_maps_unauthorised_to_authentication() {
        let server = MockServer::start().await;
        let locator = RequestLocator::parse(&format!("{}/forms/mif/9", server.uri()))
            .expect("locator should parse");

        Mock::given(method("GET"))
            .and(path("/api/requests/mif/9"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let error = gateway()
            .request_details(&locator)
            .await
            .expect_err("request should fail");

        assert!(
            matches!(error, ApprovalError::Authentication { .. }),
            "expected Authentication, got {error:?}"
        );
    }

    #[tokio::test]
    async fn pending_requests_applies_default_query_params() {
        let server = MockServer::start().await;
        let locator = ServiceLocator::parse(&server.uri()).expect("locator should parse");

        let response = ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "number": 12,
                "kind": "mrf",
                "title": "Prototype connectors",
                "status": "pending_purchase",
                "requested_by": "a.khan"
            }],
            "page": 1,
            "total_pages": 3
        }));

        Mock::given(method("GET"))
            .and(path("/api/requests/pending"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "30"))
            .respond_with(response)
            .mount(&server)
            .await;

        let listing = gateway()
            .pending_requests(&locator, &PendingListingParams::default())
            .await
            .expect("listing should succeed");

        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.page, 1);
        assert_eq!(listing.total_pages, Some(3));
        let item = listing.items.first().expect("item expected");
        assert_eq!(item.number, 12);
        assert_eq!(item.kind, FormKind::Mrf);
    }

    #[tokio::test]
    async fn pending_requests_rejects_invalid_pagination() {
        let locator = ServiceLocator::parse("https://erp.example.com").expect("should parse");

        let params = PendingListingParams {
            page: Some(0),
            per_page: Some(0),
        };
        let error = gateway()
            .pending_requests(&locator, &params)
            .await
            .expect_err("invalid params should fail");

        assert!(
            matches!(error, ApprovalError::InvalidListing { .. }),
            "expected InvalidListing, got {error:?}"
        );
    }

    #[tokio::test]
    async fn pending_requests_rejects_per_page_over_maximum() {
        let locator = ServiceLocator::parse("https://erp.example.com").expect("should parse");

        let params = PendingListingParams {
            page: Some(1),
            per_page: Some(101),
        };
        let error = gateway()
            .pending_requests(&locator, &params)
            .await
            .expect_err("invalid per_page should fail");

        assert!(
            matches!(error, ApprovalError::InvalidListing { .. }),
            "expected InvalidListing, got {error:?}"
        );
    }
}
