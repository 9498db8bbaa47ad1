//! Stockwell library crate providing material-request intake and approval.
//!
//! The library wraps the ERP's JSON-over-HTTP API to parse form URLs,
//! validate tokens, retrieve request line items, drive the request-line
//! editor, and surface friendly errors that can be displayed in the CLI.

pub mod config;
pub mod editor;
pub mod erp;
pub mod export;
pub mod telemetry;
pub mod tui;

pub use config::{OperationMode, StockwellConfig};
pub use editor::{
    EditorIdentity, PanelState, RequestLineEditor, SubmissionCoverage, SubmitAction,
    ValidationOutcome,
};
pub use erp::{
    ApiToken, ApprovalError, ApprovalGateway, FormKind, HttpApprovalGateway, HttpRequestGateway,
    HttpVendorGateway, ListingGateway, PendingListingParams, RequestDetails, RequestGateway,
    RequestIntake, RequestLocator, ServiceLocator, VendorGateway,
};
