//! ERP request intake, approval submission, and token validation.
//!
//! This module wraps the backend's JSON-over-HTTP API: it parses form URLs,
//! validates API tokens, retrieves request metadata alongside line items, and
//! submits approval decisions. Errors are mapped into user-friendly variants
//! so that callers can surface precise failures without exposing transport
//! internals.

pub mod error;
pub mod gateway;
pub mod intake;
pub mod locator;
pub mod models;

pub use error::ApprovalError;
pub use gateway::{
    ApprovalGateway, HttpApprovalGateway, HttpRequestGateway, HttpVendorGateway, ListingGateway,
    PendingListingParams, RequestGateway, VendorGateway,
};
pub use intake::RequestIntake;
pub use locator::{ApiToken, FormKind, FormNumber, RequestLocator, ServiceLocator};
pub use models::{
    NoteEntry, PendingRequestPage, RequestDetails, RequestLine, RequestMetadata, RequestSummary,
};

#[cfg(test)]
pub use gateway::{MockApprovalGateway, MockRequestGateway, MockVendorGateway};
