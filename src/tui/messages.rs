//! Message types for the TUI update loop.
//!
//! This module defines all message types that can be sent to the
//! application's update function. Messages represent user actions, async
//! command results, and system events.

use crate::erp::error::ApprovalError;

/// The decision a submission carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Approve with the edited line items.
    Approve,
    /// Reject with the drafted notes.
    Reject,
}

impl Decision {
    /// Name used in status lines and telemetry.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// Messages for the review panel TUI application.
#[derive(Debug, Clone)]
pub enum AppMsg {
    /// Synthetic startup event triggering the first render cycle.
    Initialized,

    // Navigation
    /// Move cursor up one line item.
    CursorUp,
    /// Move cursor down one line item.
    CursorDown,
    /// Move cursor to first line item.
    Home,
    /// Move cursor to last line item.
    End,

    // Editing
    /// Start entering a quantity for the selected line.
    BeginQuantityEntry,
    /// Start entering a remark for the selected line.
    BeginRemarkEntry,
    /// Start composing a note for the selected line.
    BeginNoteEntry,
    /// A character was typed into the active entry field.
    InputChar(char),
    /// Backspace was pressed in the active entry field.
    InputBackspace,
    /// Commit the active entry field.
    CommitEntry,
    /// Abandon the active entry field.
    CancelEntry,

    // Submission
    /// Validate and dispatch an approval.
    SubmitApprove,
    /// Validate and dispatch a rejection.
    SubmitReject,
    /// The backend acknowledged the submission.
    SubmitSucceeded {
        /// Decision that was submitted.
        decision: Decision,
        /// Backend acknowledgement message, when present.
        message: Option<String>,
    },
    /// The submission failed; editor state is preserved for retry.
    SubmitFailed(String),
    /// The post-submission refetch returned fresh server state.
    ReloadComplete(crate::erp::models::RequestDetails),
    /// The post-submission refetch failed; the stale view is kept.
    ReloadFailed(String),

    // Application lifecycle
    /// Quit the application.
    Quit,
    /// Toggle help overlay.
    ToggleHelp,

    // Window events
    /// Terminal window was resized.
    WindowResized {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
}

impl AppMsg {
    /// Creates a failure message from an [`ApprovalError`].
    #[must_use]
    pub fn from_error(error: &ApprovalError) -> Self {
        Self::SubmitFailed(error.to_string())
    }
}
