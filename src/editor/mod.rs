//! Editable view of a request's line items.
//!
//! The editor holds one [`EditableLine`] per component on an open request,
//! tracks original versus edited quantities, derives the preview-of-changes
//! list, enforces the remark-required-on-change and note-required-on-reject
//! rules, and projects a validated submission payload.
//!
//! Preview membership is derived by equality comparison against the committed
//! quantity on demand, never by a dirty flag, so any sequence of edits
//! (including reverts) converges to the same preview set. Quantity edits on a
//! mirrored line propagate to the mirror as a delta, never an absolute
//! overwrite, because the mirror may carry independent pending edits from its
//! own panel.

use chrono::Utc;
use tracing::debug;

use crate::erp::locator::FormKind;
use crate::erp::models::submission::{
    ApprovalSubmission, RejectionSubmission, SubmittedNote, UpdatedItem,
};
use crate::erp::models::{MrrAllocation, NoteEntry, QuantityChange, RequestLine, VendorDetails};

pub mod notes;
pub mod panel;
pub mod vendor;

pub use notes::{NoteDraftError, NoteDraftState};
pub use panel::{PanelEvent, PanelState, PanelTransitionError};
pub use vendor::{VendorField, VendorPolicy};

/// Who is editing, stamped onto change-history entries and draft notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorIdentity {
    /// Display name of the editing user.
    pub user_name: String,
    /// Role the user acts in (e.g. `head`, `inventory`, `purchase`).
    pub role: String,
}

/// Action applied by [`RequestLineEditor::set_allocation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationAction {
    /// Insert or update an allocation entry.
    Add,
    /// Delete an allocation entry.
    Remove,
}

/// The decision a submission is being validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    /// Approve the request, possibly with adjusted quantities.
    Approve,
    /// Reject the request outright.
    Reject,
}

/// Which lines a submission payload must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionCoverage {
    /// Only lines with a changed quantity or a newly entered remark.
    ChangedOnly,
    /// Every line; issuance needs each line's issued quantity.
    AllLines,
}

/// One derived entry in the preview-of-changes list.
///
/// Entries exist exactly for lines whose edited quantity differs from the
/// committed quantity; reverting an edit removes the entry again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEntry {
    /// Component identifier.
    pub component_id: u64,
    /// Component description for display.
    pub description: Option<String>,
    /// Committed quantity the edit diverges from.
    pub current_quantity: u32,
    /// Quantity after the edit.
    pub updated_quantity: u32,
    /// Remark entered for the change (possibly still blank).
    pub remark: String,
    /// The most recent change-history entry recorded this session.
    pub last_change: Option<QuantityChange>,
}

/// Result of [`RequestLineEditor::validate_for_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The submission may proceed.
    Ready,
    /// At least one changed line is missing a remark.
    MissingRemark {
        /// First offending component, for focus placement.
        first: u64,
        /// Every offending component.
        component_ids: Vec<u64>,
    },
    /// Allocations exceed the quantity being issued on at least one line.
    AllocationExceeded {
        /// First offending component.
        first: u64,
        /// Every offending component.
        component_ids: Vec<u64>,
    },
    /// A rejection was requested without any note on any line.
    NoteRequired,
}

impl ValidationOutcome {
    /// Whether submission may proceed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Mutable editing state layered over one fetched [`RequestLine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableLine {
    record: RequestLine,
    edited_quantity: u32,
    remark: String,
    highlight_remark: bool,
    allocations: Vec<MrrAllocation>,
    mirror_quantity: Option<u32>,
    vendor: Option<VendorDetails>,
    draft_notes: Vec<NoteEntry>,
    session_history: Vec<QuantityChange>,
}

impl EditableLine {
    fn seed(record: RequestLine) -> Self {
        let edited_quantity = record.current_quantity;
        let remark = record.remark.clone().unwrap_or_default();
        let allocations = record.mrr_allocations.clone();
        let mirror_quantity = record.linked_line.as_ref().map(|linked| linked.quantity);
        Self {
            record,
            edited_quantity,
            remark,
            highlight_remark: false,
            allocations,
            mirror_quantity,
            vendor: None,
            draft_notes: Vec::new(),
            session_history: Vec::new(),
        }
    }

    /// The fetched line this edit state is layered over.
    #[must_use]
    pub const fn record(&self) -> &RequestLine {
        &self.record
    }

    /// The in-progress quantity edit.
    #[must_use]
    pub const fn edited_quantity(&self) -> u32 {
        self.edited_quantity
    }

    /// The working remark text.
    #[must_use]
    pub fn remark(&self) -> &str {
        self.remark.as_str()
    }

    /// Whether the remark field should be highlighted as missing.
    #[must_use]
    pub const fn highlight_remark(&self) -> bool {
        self.highlight_remark
    }

    /// Allocations drafted against warehouse receipts.
    #[must_use]
    pub fn allocations(&self) -> &[MrrAllocation] {
        self.allocations.as_slice()
    }

    /// Last known quantity on the mirrored line, when one exists.
    #[must_use]
    pub const fn mirror_quantity(&self) -> Option<u32> {
        self.mirror_quantity
    }

    /// Draft vendor sub-record, when the purchaser entered one.
    #[must_use]
    pub const fn vendor(&self) -> Option<&VendorDetails> {
        self.vendor.as_ref()
    }

    /// Notes composed this session, not yet submitted.
    #[must_use]
    pub fn draft_notes(&self) -> &[NoteEntry] {
        self.draft_notes.as_slice()
    }

    /// Change-history entries recorded this session.
    #[must_use]
    pub fn session_history(&self) -> &[QuantityChange] {
        self.session_history.as_slice()
    }

    /// Whether the edited quantity diverges from the committed quantity.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.edited_quantity != self.record.current_quantity
    }

    /// Edited quantity plus the mirrored line's quantity.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.edited_quantity
            .saturating_add(self.mirror_quantity.unwrap_or(0))
    }

    fn allocated_total(&self) -> u32 {
        self.allocations
            .iter()
            .fold(0_u32, |sum, allocation| sum.saturating_add(allocation.quantity))
    }

    fn remark_entered(&self) -> bool {
        let trimmed = self.remark.trim();
        !trimmed.is_empty() && Some(trimmed) != self.record.remark.as_deref().map(str::trim)
    }
}

/// Editable view over one open request's line items.
///
/// Each open request panel owns its own editor instance; nothing here is
/// shared across panels and nothing is persisted; a refetch always wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLineEditor {
    kind: FormKind,
    identity: EditorIdentity,
    read_only: bool,
    note_required: bool,
    lines: Vec<EditableLine>,
}

impl RequestLineEditor {
    /// Normalises fetched lines into editable state.
    ///
    /// Each line's edited quantity is seeded from its committed quantity, so
    /// a freshly loaded editor has an empty preview list.
    #[must_use]
    pub fn load(kind: FormKind, lines: Vec<RequestLine>, identity: EditorIdentity) -> Self {
        Self {
            kind,
            identity,
            read_only: false,
            note_required: false,
            lines: lines.into_iter().map(EditableLine::seed).collect(),
        }
    }

    /// Puts the editor into read-only mode for historical requests.
    ///
    /// All mutating operations become no-ops.
    pub fn mark_read_only(&mut self) {
        self.read_only = true;
    }

    /// Whether the editor rejects mutations.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Form kind the clamp policy is derived from.
    #[must_use]
    pub const fn kind(&self) -> FormKind {
        self.kind
    }

    /// Identity stamped onto edits made through this editor.
    #[must_use]
    pub const fn identity(&self) -> &EditorIdentity {
        &self.identity
    }

    /// Whether a rejection was attempted without any note.
    #[must_use]
    pub const fn note_required(&self) -> bool {
        self.note_required
    }

    /// All editable lines, in fetch order.
    #[must_use]
    pub fn lines(&self) -> &[EditableLine] {
        self.lines.as_slice()
    }

    /// Looks up one line by component id.
    #[must_use]
    pub fn line(&self, component_id: u64) -> Option<&EditableLine> {
        self.lines
            .iter()
            .find(|line| line.record.component_id == component_id)
    }

    fn position(&self, component_id: u64) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.record.component_id == component_id)
    }

    /// Applies a quantity edit.
    ///
    /// Issue lines are clamped to `[0, on-hand]` (falling back to the
    /// committed quantity when the warehouse reports no on-hand figure);
    /// request lines are not clamped because the backend enforces their
    /// range. Unknown component ids and read-only panels are silent no-ops.
    pub fn set_quantity(&mut self, component_id: u64, quantity: u32) {
        if self.read_only {
            return;
        }
        let Some(index) = self.position(component_id) else {
            debug!(component_id, "quantity edit for unknown component dropped");
            return;
        };

        let identity = self.identity.clone();
        let kind = self.kind;
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };

        let applied = match kind {
            FormKind::Mif => {
                let bound = line
                    .record
                    .on_hand_quantity
                    .unwrap_or(line.record.current_quantity);
                quantity.min(bound)
            }
            FormKind::Mrf => quantity,
        };

        let previous = line.edited_quantity;
        line.highlight_remark = false;
        if applied == previous {
            return;
        }

        line.edited_quantity = applied;
        line.session_history.push(QuantityChange {
            changed_at: Some(Utc::now().to_rfc3339()),
            user_name: Some(identity.user_name),
            role: Some(identity.role),
            old_quantity: previous,
            new_quantity: applied,
        });

        self.propagate_to_mirror(index, previous, applied);
    }

    /// Applies the delta of an edit to the mirrored line.
    ///
    /// When the mirror is present in this editor it receives the delta on its
    /// own edited quantity; otherwise the line's local view of the mirror
    /// quantity is adjusted. Either way the result floors at zero.
    fn propagate_to_mirror(&mut self, index: usize, previous: u32, applied: u32) {
        let Some(linked) = self
            .lines
            .get(index)
            .and_then(|line| line.record.linked_line.clone())
        else {
            return;
        };

        let delta = i64::from(applied) - i64::from(previous);
        let adjust = |value: u32| {
            let shifted = i64::from(value).saturating_add(delta);
            u32::try_from(shifted.max(0)).unwrap_or(u32::MAX)
        };

        let mirror_index = self
            .lines
            .iter()
            .position(|line| line.record.component_id == linked.component_id);
        match mirror_index {
            Some(mirror_index) if mirror_index != index => {
                if let Some(mirror) = self.lines.get_mut(mirror_index) {
                    mirror.edited_quantity = adjust(mirror.edited_quantity);
                }
            }
            _ => {
                if let Some(line) = self.lines.get_mut(index) {
                    line.mirror_quantity = Some(adjust(line.mirror_quantity.unwrap_or(0)));
                }
            }
        }
    }

    /// Updates the remark on one line. No-op when the panel is read-only.
    pub fn set_remark(&mut self, component_id: u64, remark: &str) {
        if self.read_only {
            return;
        }
        let Some(index) = self.position(component_id) else {
            debug!(component_id, "remark edit for unknown component dropped");
            return;
        };
        if let Some(line) = self.lines.get_mut(index) {
            line.remark = remark.to_owned();
            line.highlight_remark = false;
        }
    }

    /// Replaces the draft vendor sub-record on one line.
    pub fn set_vendor(&mut self, component_id: u64, vendor: VendorDetails) {
        if self.read_only {
            return;
        }
        let Some(index) = self.position(component_id) else {
            debug!(component_id, "vendor edit for unknown component dropped");
            return;
        };
        if let Some(line) = self.lines.get_mut(index) {
            line.vendor = Some(vendor);
        }
    }

    /// Adds or removes an allocation against a warehouse receipt.
    ///
    /// An `Add` that would push the allocation sum beyond the quantity being
    /// issued leaves the state untouched; the invariant
    /// `sum(allocations) <= issued quantity` always holds afterwards.
    pub fn set_allocation(
        &mut self,
        component_id: u64,
        mrr_id: u64,
        quantity: u32,
        action: AllocationAction,
    ) {
        if self.read_only {
            return;
        }
        let Some(index) = self.position(component_id) else {
            debug!(component_id, "allocation edit for unknown component dropped");
            return;
        };
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };

        match action {
            AllocationAction::Add => {
                let other_total: u32 = line
                    .allocations
                    .iter()
                    .filter(|allocation| allocation.mrr_id != mrr_id)
                    .fold(0_u32, |sum, allocation| sum.saturating_add(allocation.quantity));
                if other_total.saturating_add(quantity) > line.edited_quantity {
                    debug!(component_id, mrr_id, "allocation exceeding issued quantity dropped");
                    return;
                }
                if let Some(existing) = line
                    .allocations
                    .iter_mut()
                    .find(|allocation| allocation.mrr_id == mrr_id)
                {
                    existing.quantity = quantity;
                } else {
                    line.allocations.push(MrrAllocation { mrr_id, quantity });
                }
            }
            AllocationAction::Remove => {
                line.allocations.retain(|allocation| allocation.mrr_id != mrr_id);
            }
        }
    }

    /// Appends a composed note to one line and clears the note-required flag.
    ///
    /// Blank content is dropped; the composer enforces this upstream.
    pub fn append_draft_note(&mut self, component_id: u64, content: &str) {
        if self.read_only {
            return;
        }
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return;
        }
        let Some(index) = self.position(component_id) else {
            debug!(component_id, "note for unknown component dropped");
            return;
        };

        let identity = self.identity.clone();
        if let Some(line) = self.lines.get_mut(index) {
            line.draft_notes.push(NoteEntry {
                noted_at: Some(Utc::now().to_rfc3339()),
                author: Some(identity.user_name),
                role: Some(identity.role),
                content: trimmed.to_owned(),
            });
            self.note_required = false;
        }
    }

    /// Derives the preview-of-changes list.
    ///
    /// Recomputed from scratch on every call; an entry exists exactly while
    /// the line's edited quantity differs from its committed quantity.
    #[must_use]
    pub fn preview(&self) -> Vec<PreviewEntry> {
        self.lines
            .iter()
            .filter(|line| line.is_changed())
            .map(|line| PreviewEntry {
                component_id: line.record.component_id,
                description: line.record.description.clone(),
                current_quantity: line.record.current_quantity,
                updated_quantity: line.edited_quantity,
                remark: line.remark.clone(),
                last_change: line.session_history.last().cloned(),
            })
            .collect()
    }

    /// Validates the editor state ahead of a submission.
    ///
    /// Approve requires a non-blank remark on every changed line and
    /// re-checks the allocation invariant (a quantity cut after an allocation
    /// upsert could otherwise slip through). Reject requires at least one
    /// note (fetched or draft) across all lines.
    pub fn validate_for_submit(&mut self, action: SubmitAction) -> ValidationOutcome {
        match action {
            SubmitAction::Approve => self.validate_approve(),
            SubmitAction::Reject => self.validate_reject(),
        }
    }

    fn validate_approve(&mut self) -> ValidationOutcome {
        let missing: Vec<u64> = self
            .lines
            .iter()
            .filter(|line| line.is_changed() && line.remark.trim().is_empty())
            .map(|line| line.record.component_id)
            .collect();
        if let Some(first) = missing.first().copied() {
            for line in &mut self.lines {
                if missing.contains(&line.record.component_id) {
                    line.highlight_remark = true;
                }
            }
            return ValidationOutcome::MissingRemark {
                first,
                component_ids: missing,
            };
        }

        let exceeded: Vec<u64> = self
            .lines
            .iter()
            .filter(|line| line.allocated_total() > line.edited_quantity)
            .map(|line| line.record.component_id)
            .collect();
        if let Some(first) = exceeded.first().copied() {
            return ValidationOutcome::AllocationExceeded {
                first,
                component_ids: exceeded,
            };
        }

        ValidationOutcome::Ready
    }

    fn validate_reject(&mut self) -> ValidationOutcome {
        let has_note = self
            .lines
            .iter()
            .any(|line| !line.record.notes.is_empty() || !line.draft_notes.is_empty());
        if has_note {
            self.note_required = false;
            ValidationOutcome::Ready
        } else {
            self.note_required = true;
            ValidationOutcome::NoteRequired
        }
    }

    /// Projects line items for submission.
    ///
    /// `ChangedOnly` keeps lines whose quantity changed or whose remark was
    /// newly entered; `AllLines` keeps everything because issuance submits
    /// every line's issued quantity, changed or not.
    #[must_use]
    pub fn submission_items(&self, coverage: SubmissionCoverage) -> Vec<UpdatedItem> {
        self.lines
            .iter()
            .filter(|line| match coverage {
                SubmissionCoverage::ChangedOnly => line.is_changed() || line.remark_entered(),
                SubmissionCoverage::AllLines => true,
            })
            .map(|line| UpdatedItem {
                component_id: line.record.component_id,
                updated_requested_qty: line.edited_quantity,
                remark: {
                    let trimmed = line.remark.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(trimmed.to_owned())
                    }
                },
                vendor: line.vendor.clone(),
                mrr_allocations: line.allocations.clone(),
            })
            .collect()
    }

    /// Builds the approve endpoint body from the current state.
    #[must_use]
    pub fn approval_submission(
        &self,
        coverage: SubmissionCoverage,
        priority: bool,
    ) -> ApprovalSubmission {
        ApprovalSubmission {
            updated_items: self.submission_items(coverage),
            notes: self.draft_note_payloads(),
            priority,
        }
    }

    /// Builds the reject endpoint body from the current draft notes.
    #[must_use]
    pub fn rejection_submission(&self) -> RejectionSubmission {
        RejectionSubmission {
            notes: self.draft_note_payloads(),
        }
    }

    fn draft_note_payloads(&self) -> Vec<SubmittedNote> {
        self.lines
            .iter()
            .flat_map(|line| {
                line.draft_notes.iter().map(|note| SubmittedNote {
                    component_id: line.record.component_id,
                    noted_at: note.noted_at.clone(),
                    author: note.author.clone(),
                    role: note.role.clone(),
                    content: note.content.clone(),
                })
            })
            .collect()
    }
}
