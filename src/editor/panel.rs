//! Panel lifecycle state machine.
//!
//! One open request panel moves through a single explicit state machine
//! instead of a collection of sibling boolean flags, so invalid combinations
//! (submitting while already submitting, editing after approval) cannot be
//! represented. The `Submitting` state is the submission-in-flight guard: a
//! second submit attempt is refused until the first resolves.

use thiserror::Error;

/// Lifecycle state of one open request panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelState {
    /// No request loaded yet.
    #[default]
    Idle,
    /// Lines are loaded and editable.
    Editing,
    /// A submission is in flight; further submits and edits are refused.
    Submitting,
    /// The backend acknowledged an approval.
    Approved,
    /// The backend acknowledged a rejection.
    Rejected,
    /// A historical request was loaded; the panel is permanently read-only.
    PastReadonly,
}

/// Events that drive the panel state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    /// An editable request finished loading.
    LinesLoaded,
    /// A historical (already decided) request finished loading.
    HistoricalLoaded,
    /// The user changed a quantity, remark, note, or allocation.
    EditMade,
    /// A submission was dispatched to the backend.
    SubmitStarted,
    /// The backend acknowledged the approval.
    ApproveSucceeded,
    /// The backend acknowledged the rejection.
    RejectSucceeded,
    /// The submission failed; the panel returns to editing with state intact.
    SubmitFailed,
}

/// An event arrived that the current state does not accept.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("panel in state {state:?} cannot accept {event:?}")]
pub struct PanelTransitionError {
    /// State the panel was in.
    pub state: PanelState,
    /// Event that was refused.
    pub event: PanelEvent,
}

impl PanelState {
    /// Applies one event, yielding the next state.
    ///
    /// # Errors
    ///
    /// Returns [`PanelTransitionError`] when the event is not valid in the
    /// current state; the caller keeps the old state.
    pub const fn apply(self, event: PanelEvent) -> Result<Self, PanelTransitionError> {
        match (self, event) {
            (Self::Idle, PanelEvent::LinesLoaded) => Ok(Self::Editing),
            (Self::Idle, PanelEvent::HistoricalLoaded) => Ok(Self::PastReadonly),
            (Self::Editing, PanelEvent::EditMade) => Ok(Self::Editing),
            (Self::Editing, PanelEvent::SubmitStarted) => Ok(Self::Submitting),
            (Self::Submitting, PanelEvent::ApproveSucceeded) => Ok(Self::Approved),
            (Self::Submitting, PanelEvent::RejectSucceeded) => Ok(Self::Rejected),
            (Self::Submitting, PanelEvent::SubmitFailed) => Ok(Self::Editing),
            (state, event) => Err(PanelTransitionError { state, event }),
        }
    }

    /// Whether the editor behind this panel accepts mutations.
    #[must_use]
    pub const fn can_edit(self) -> bool {
        matches!(self, Self::Editing)
    }

    /// Whether a submission may be dispatched now.
    #[must_use]
    pub const fn can_submit(self) -> bool {
        matches!(self, Self::Editing)
    }

    /// Whether the panel reached a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::PastReadonly)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{PanelEvent, PanelState};

    #[test]
    fn approval_happy_path_walks_the_machine() {
        let state = PanelState::Idle;
        let state = state.apply(PanelEvent::LinesLoaded).expect("load");
        let state = state.apply(PanelEvent::EditMade).expect("edit");
        let state = state.apply(PanelEvent::SubmitStarted).expect("submit");
        let state = state.apply(PanelEvent::ApproveSucceeded).expect("ack");

        assert_eq!(state, PanelState::Approved);
        assert!(state.is_terminal());
    }

    #[test]
    fn failed_submission_returns_to_editing() {
        let state = PanelState::Submitting
            .apply(PanelEvent::SubmitFailed)
            .expect("failure should transition");

        assert_eq!(state, PanelState::Editing);
        assert!(state.can_edit());
    }

    #[test]
    fn submitting_refuses_a_second_submit() {
        let state = PanelState::Submitting;

        assert!(!state.can_submit());
        assert!(state.apply(PanelEvent::SubmitStarted).is_err());
    }

    #[rstest]
    #[case(PanelState::Approved)]
    #[case(PanelState::Rejected)]
    #[case(PanelState::PastReadonly)]
    fn terminal_states_refuse_edits_and_submits(#[case] state: PanelState) {
        assert!(state.is_terminal());
        assert!(!state.can_edit());
        assert!(!state.can_submit());
        assert!(state.apply(PanelEvent::EditMade).is_err());
        assert!(state.apply(PanelEvent::SubmitStarted).is_err());
    }

    #[test]
    fn historical_load_goes_straight_to_readonly() {
        let state = PanelState::Idle
            .apply(PanelEvent::HistoricalLoaded)
            .expect("historical load should transition");

        assert_eq!(state, PanelState::PastReadonly);
    }
}
