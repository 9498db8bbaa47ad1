//! Terminal User Interface for reviewing and deciding material requests.
//!
//! This module provides an interactive panel for editing line quantities,
//! remarks, notes, and allocations before approving or rejecting a request,
//! built on the bubbletea-rs framework.
//!
//! # Architecture
//!
//! The TUI follows the Model-View-Update (MVU) pattern:
//!
//! - **Model**: Application state in [`app::ReviewPanelApp`]
//! - **View**: Rendering logic in each component's `view()` method
//! - **Update**: Message-driven state transitions in `update()`
//!
//! # Modules
//!
//! - [`app`]: Main application model and entry point
//! - [`messages`]: Message types for the update loop
//! - [`components`]: Reusable UI components
//! - [`input`]: Key-to-message mapping for input handling
//!
//! # Initial Data Loading
//!
//! Because bubbletea-rs's `Model` trait requires `init()` to be a static
//! function, module-level storage carries the initial panel data. Call
//! [`set_panel_seed`] before starting the program, and
//! `ReviewPanelApp::init()` will retrieve it.
//!
//! # Submissions
//!
//! Similarly, [`set_submit_context`] must be called to enable approve and
//! reject submissions. The context stores the request locator and token the
//! submission commands use to reach the backend.

use std::sync::OnceLock;

use crate::editor::EditorIdentity;
use crate::erp::error::ApprovalError;
use crate::erp::gateway::{ApprovalGateway, HttpApprovalGateway};
use crate::erp::locator::{ApiToken, RequestLocator};
use crate::erp::models::RequestDetails;
use crate::erp::models::submission::{
    ApprovalOutcome, ApprovalSubmission, RejectionSubmission,
};
use crate::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink};

pub mod app;
pub mod components;
pub mod input;
pub mod messages;

pub use app::ReviewPanelApp;

/// Initial data for one review panel.
#[derive(Debug, Clone)]
pub struct PanelSeed {
    /// The fetched request.
    pub details: RequestDetails,
    /// Identity stamped onto edits and notes.
    pub identity: EditorIdentity,
    /// Maximum draft-note length.
    pub note_max_length: usize,
    /// Whether approvals carry the priority flag.
    pub priority: bool,
    /// Whether the request is historical and therefore read-only.
    pub historical: bool,
    /// MiniJinja template offered when a remark field starts empty.
    pub remark_template: Option<String>,
}

/// Context required to submit decisions to the backend.
struct SubmitContext {
    locator: RequestLocator,
    token: ApiToken,
    telemetry: bool,
}

/// Global storage for the initial panel data.
///
/// Set before the TUI program starts and read by `ReviewPanelApp::init()`.
static PANEL_SEED: OnceLock<PanelSeed> = OnceLock::new();

/// Global storage for the submission context (locator and token).
static SUBMIT_CONTEXT: OnceLock<SubmitContext> = OnceLock::new();

/// Sets the initial panel data for the TUI application.
///
/// This must be called before starting the bubbletea-rs program.
///
/// # Returns
///
/// `true` if the seed was set, `false` if it was already set.
pub fn set_panel_seed(seed: PanelSeed) -> bool {
    PANEL_SEED.set(seed).is_ok()
}

/// Sets the submission context for the TUI application.
///
/// This must be called before starting the bubbletea-rs program to enable
/// approve and reject submissions. Without it, submissions fail with a
/// configuration error shown in the panel.
///
/// # Returns
///
/// `true` if the context was set, `false` if it was already set.
pub fn set_submit_context(locator: RequestLocator, token: ApiToken, telemetry: bool) -> bool {
    SUBMIT_CONTEXT
        .set(SubmitContext {
            locator,
            token,
            telemetry,
        })
        .is_ok()
}

/// Gets a clone of the panel seed from storage.
///
/// Called internally by `ReviewPanelApp::init()`. `OnceLock` does not
/// support consuming the value, so this clones.
pub(crate) fn panel_seed() -> Option<PanelSeed> {
    PANEL_SEED.get().cloned()
}

fn submit_context() -> Result<&'static SubmitContext, ApprovalError> {
    SUBMIT_CONTEXT.get().ok_or_else(|| ApprovalError::Configuration {
        message: "submission context not configured".to_owned(),
    })
}

fn record_submission(context: &SubmitContext, decision: &str, line_count: usize, accepted: bool) {
    let event = TelemetryEvent::SubmissionRecorded {
        request: context.locator.label(),
        decision: decision.to_owned(),
        line_count,
        accepted,
    };
    if context.telemetry {
        StderrJsonlTelemetrySink.record(event);
    } else {
        NoopTelemetrySink.record(event);
    }
}

/// Submits an approval using the stored context.
///
/// Returns an error when the context was not set or the API call fails; the
/// caller surfaces the message and keeps editor state for a manual retry.
pub(crate) async fn submit_approval(
    submission: ApprovalSubmission,
) -> Result<ApprovalOutcome, ApprovalError> {
    let context = submit_context()?;
    let gateway = HttpApprovalGateway::for_token(&context.token)?;
    let line_count = submission.updated_items.len();
    let result = gateway.approve(&context.locator, &submission).await;
    record_submission(context, "approve", line_count, result.is_ok());
    result
}

/// Submits a rejection using the stored context.
pub(crate) async fn submit_rejection(
    rejection: RejectionSubmission,
) -> Result<ApprovalOutcome, ApprovalError> {
    let context = submit_context()?;
    let gateway = HttpApprovalGateway::for_token(&context.token)?;
    let result = gateway.reject(&context.locator, &rejection).await;
    record_submission(context, "reject", 0, result.is_ok());
    result
}

/// Refetches the request after a successful submission.
///
/// The server is the sole source of truth; whatever it returns replaces the
/// panel's editor state.
pub(crate) async fn refetch_details() -> Result<RequestDetails, ApprovalError> {
    use crate::erp::gateway::{HttpRequestGateway, RequestGateway};

    let context = submit_context()?;
    let gateway = HttpRequestGateway::for_token(&context.token)?;
    gateway.request_details(&context.locator).await
}
