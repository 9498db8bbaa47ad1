//! Gateways for talking to the ERP approval API.
//!
//! This module provides trait-based gateways for communicating with the ERP
//! backend. The trait-based design enables mocking in tests while the HTTP
//! implementations handle real requests through a shared reqwest client.

mod approval;
mod client;
mod error_mapping;
mod request;
mod vendor;

pub use approval::HttpApprovalGateway;
pub use request::{HttpRequestGateway, PendingListingParams};
pub use vendor::HttpVendorGateway;

use async_trait::async_trait;

use crate::erp::error::ApprovalError;
use crate::erp::locator::{RequestLocator, ServiceLocator};
use crate::erp::models::submission::{ApprovalOutcome, ApprovalSubmission, RejectionSubmission};
use crate::erp::models::{PendingRequestPage, RequestDetails, VendorDetails};

/// Gateway that can load request data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestGateway: Send + Sync {
    /// Fetch the full request: metadata and every line item.
    async fn request_details(
        &self,
        locator: &RequestLocator,
    ) -> Result<RequestDetails, ApprovalError>;
}

/// Gateway for listing requests awaiting the caller's action.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingGateway: Send + Sync {
    /// List pending requests with pagination.
    async fn pending_requests(
        &self,
        locator: &ServiceLocator,
        params: &PendingListingParams,
    ) -> Result<PendingRequestPage, ApprovalError>;
}

/// Gateway for submitting approval decisions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApprovalGateway: Send + Sync {
    /// Approve the request with the given line items and notes.
    async fn approve(
        &self,
        locator: &RequestLocator,
        submission: &ApprovalSubmission,
    ) -> Result<ApprovalOutcome, ApprovalError>;

    /// Reject the request with the given notes.
    async fn reject(
        &self,
        locator: &RequestLocator,
        rejection: &RejectionSubmission,
    ) -> Result<ApprovalOutcome, ApprovalError>;
}

/// Gateway for pushing vendor details onto a procurement line.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VendorGateway: Send + Sync {
    /// Replace the vendor sub-record on one component.
    async fn update_vendor(
        &self,
        locator: &RequestLocator,
        component_id: u64,
        vendor: &VendorDetails,
    ) -> Result<(), ApprovalError>;
}
