//! CLI operation mode handlers.
//!
//! This module contains the implementations for the different operation
//! modes:
//! - [`pending_listing`]: List requests awaiting the caller's action
//! - [`single_request`]: Load and print one request's details
//! - [`review_tui`]: Interactive TUI for reviewing and deciding a request
//! - [`export_lines`]: Write a request's decision record to a file
//! - [`vendor_update`]: Push vendor details onto one component
//!
//! Output formatting utilities are in [`output`].

use stockwell::PendingListingParams;

pub mod export_lines;
pub mod output;
pub mod pending_listing;
pub mod review_tui;
pub mod single_request;
pub mod vendor_update;

/// Returns the default parameters for listing pending requests.
pub const fn default_listing_params() -> PendingListingParams {
    PendingListingParams {
        page: Some(1),
        per_page: Some(50),
    }
}
