//! Main application model for the review panel TUI.
//!
//! One `ReviewPanelApp` owns one [`RequestLineEditor`] plus the panel state
//! machine: editor mutations happen synchronously inside `update`, and the
//! only asynchronous operations are the approve/reject submissions, which
//! run as commands and report back as messages. While a submission is in
//! flight the panel sits in `Submitting` and refuses a second dispatch.

use std::any::Any;

use bubbletea_rs::{Cmd, Model};
use tracing::debug;

use crate::editor::{
    EditorIdentity, NoteDraftState, PanelEvent, PanelState, RequestLineEditor, SubmissionCoverage,
    SubmitAction, ValidationOutcome,
};
use crate::erp::locator::FormKind;
use crate::erp::models::RequestMetadata;
use crate::tui::components::{
    LineTableComponent, LineTableViewContext, NotePanelComponent, NotePanelViewContext,
};
use crate::tui::input::{InputContext, map_key_to_message};
use crate::tui::messages::{AppMsg, Decision};

/// Rows reserved for the header, preview block, notes, and status bar.
const CHROME_ROWS: usize = 12;
/// Rows of the note panel.
const NOTE_ROWS: usize = 4;

/// Active entry field, when the user is typing into one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EntryState {
    /// Quantity entry; only digits are accepted.
    Quantity {
        /// Digits typed so far.
        buffer: String,
    },
    /// Remark entry.
    Remark {
        /// Text typed so far.
        buffer: String,
    },
    /// Note composition backed by the draft composer.
    Note {
        /// Draft enforcing length and non-emptiness.
        draft: NoteDraftState,
    },
}

/// Application model for reviewing and deciding one request.
#[derive(Debug)]
pub struct ReviewPanelApp {
    pub(crate) metadata: Option<RequestMetadata>,
    pub(crate) editor: RequestLineEditor,
    pub(crate) panel: PanelState,
    pub(crate) show_help: bool,
    cursor: usize,
    scroll: usize,
    width: u16,
    height: u16,
    entry: Option<EntryState>,
    status: Option<String>,
    error: Option<String>,
    priority: bool,
    note_max_length: usize,
    remark_template: Option<String>,
    line_table: LineTableComponent,
    note_panel: NotePanelComponent,
}

impl ReviewPanelApp {
    /// Creates an empty panel with no request loaded.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            metadata: None,
            editor: RequestLineEditor::load(
                FormKind::Mif,
                Vec::new(),
                EditorIdentity {
                    user_name: "unknown".to_owned(),
                    role: "approver".to_owned(),
                },
            ),
            panel: PanelState::Idle,
            show_help: false,
            cursor: 0,
            scroll: 0,
            width: 80,
            height: 24,
            entry: None,
            status: None,
            error: None,
            priority: false,
            note_max_length: 500,
            remark_template: None,
            line_table: LineTableComponent::new(),
            note_panel: NotePanelComponent::new(),
        }
    }

    /// Builds the panel from a seed stored before program start.
    #[must_use]
    pub fn from_seed(seed: crate::tui::PanelSeed) -> Self {
        let mut editor = RequestLineEditor::load(
            seed.details.metadata.kind,
            seed.details.lines,
            seed.identity,
        );
        let event = if seed.historical {
            editor.mark_read_only();
            PanelEvent::HistoricalLoaded
        } else {
            PanelEvent::LinesLoaded
        };
        let panel = PanelState::Idle.apply(event).unwrap_or(PanelState::Idle);

        Self {
            metadata: Some(seed.details.metadata),
            editor,
            panel,
            priority: seed.priority,
            note_max_length: seed.note_max_length.max(1),
            remark_template: seed.remark_template,
            ..Self::empty()
        }
    }

    /// Number of line items on the open request.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.editor.lines().len()
    }

    /// Component id of the line under the cursor.
    fn selected_component(&self) -> Option<u64> {
        self.editor
            .lines()
            .get(self.cursor)
            .map(|line| line.record().component_id)
    }

    /// Returns the current input context for context-aware key mapping.
    pub(crate) const fn input_context(&self) -> InputContext {
        if self.entry.is_some() {
            InputContext::TextEntry
        } else {
            InputContext::LineList
        }
    }

    /// Dispatches one application message.
    pub(crate) fn handle_message(&mut self, msg: &AppMsg) -> Option<Cmd> {
        match msg {
            AppMsg::Initialized => None,
            AppMsg::Quit => Some(bubbletea_rs::quit()),
            AppMsg::ToggleHelp => {
                self.show_help = !self.show_help;
                None
            }
            AppMsg::WindowResized { width, height } => {
                self.width = *width;
                self.height = *height;
                self.adjust_scroll_to_cursor();
                None
            }
            AppMsg::CursorUp => self.move_cursor(-1),
            AppMsg::CursorDown => self.move_cursor(1),
            AppMsg::Home => self.move_cursor_to(0),
            AppMsg::End => self.move_cursor_to(self.line_count().saturating_sub(1)),
            AppMsg::BeginQuantityEntry => self.begin_entry(EntryKindTag::Quantity),
            AppMsg::BeginRemarkEntry => self.begin_entry(EntryKindTag::Remark),
            AppMsg::BeginNoteEntry => self.begin_entry(EntryKindTag::Note),
            AppMsg::InputChar(character) => self.handle_input_char(*character),
            AppMsg::InputBackspace => self.handle_input_backspace(),
            AppMsg::CommitEntry => self.handle_commit_entry(),
            AppMsg::CancelEntry => {
                self.entry = None;
                None
            }
            AppMsg::SubmitApprove => self.handle_submit(Decision::Approve),
            AppMsg::SubmitReject => self.handle_submit(Decision::Reject),
            AppMsg::SubmitSucceeded { decision, message } => {
                self.handle_submit_succeeded(*decision, message.as_deref())
            }
            AppMsg::SubmitFailed(message) => self.handle_submit_failed(message),
            AppMsg::ReloadComplete(details) => self.handle_reload_complete(details),
            AppMsg::ReloadFailed(message) => {
                self.status = Some(format!("refetch failed: {message}"));
                None
            }
        }
    }

    fn move_cursor(&mut self, delta: i64) -> Option<Cmd> {
        let count = self.line_count();
        if count == 0 {
            return None;
        }
        let position = i64::try_from(self.cursor).unwrap_or(0) + delta;
        let clamped = position.clamp(0, i64::try_from(count - 1).unwrap_or(0));
        self.cursor = usize::try_from(clamped).unwrap_or(0);
        self.adjust_scroll_to_cursor();
        None
    }

    fn move_cursor_to(&mut self, position: usize) -> Option<Cmd> {
        let count = self.line_count();
        if count == 0 {
            return None;
        }
        self.cursor = position.min(count - 1);
        self.adjust_scroll_to_cursor();
        None
    }

    fn adjust_scroll_to_cursor(&mut self) {
        let visible = self.list_height().max(1);
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + visible {
            self.scroll = self.cursor + 1 - visible;
        }
    }

    fn list_height(&self) -> usize {
        (self.height as usize).saturating_sub(CHROME_ROWS).max(3)
    }

    fn begin_entry(&mut self, kind: EntryKindTag) -> Option<Cmd> {
        if !self.panel.can_edit() {
            self.status = Some("this request can no longer be edited".to_owned());
            return None;
        }
        let Some(component_id) = self.selected_component() else {
            return None;
        };

        self.entry = Some(match kind {
            EntryKindTag::Quantity => EntryState::Quantity {
                buffer: self
                    .editor
                    .line(component_id)
                    .map(|line| line.edited_quantity().to_string())
                    .unwrap_or_default(),
            },
            EntryKindTag::Remark => EntryState::Remark {
                buffer: self.seed_remark_buffer(component_id),
            },
            EntryKindTag::Note => EntryState::Note {
                draft: NoteDraftState::new(component_id, self.note_max_length),
            },
        });
        self.status = None;
        None
    }

    /// Seeds the remark entry buffer.
    ///
    /// An existing remark is offered for editing; an empty one starts from
    /// the configured template, rendered against the selected line. A
    /// template that fails to render falls back to an empty buffer.
    fn seed_remark_buffer(&self, component_id: u64) -> String {
        let Some(line) = self.editor.line(component_id) else {
            return String::new();
        };
        if !line.remark().is_empty() {
            return line.remark().to_owned();
        }
        self.remark_template
            .as_deref()
            .and_then(|template| {
                crate::editor::notes::render_remark_template(
                    template,
                    line.record(),
                    line.edited_quantity(),
                )
                .ok()
            })
            .unwrap_or_default()
    }

    fn handle_input_char(&mut self, character: char) -> Option<Cmd> {
        match &mut self.entry {
            Some(EntryState::Quantity { buffer }) => {
                // Non-numeric input never reaches the editor.
                if character.is_ascii_digit() {
                    buffer.push(character);
                } else {
                    debug!(%character, "non-numeric quantity input dropped");
                }
            }
            Some(EntryState::Remark { buffer }) => buffer.push(character),
            Some(EntryState::Note { draft }) => {
                if let Err(error) = draft.push_char(character) {
                    self.status = Some(error.to_string());
                }
            }
            None => {}
        }
        None
    }

    fn handle_input_backspace(&mut self) -> Option<Cmd> {
        match &mut self.entry {
            Some(EntryState::Quantity { buffer } | EntryState::Remark { buffer }) => {
                let _ = buffer.pop();
            }
            Some(EntryState::Note { draft }) => draft.backspace(),
            None => {}
        }
        None
    }

    fn handle_commit_entry(&mut self) -> Option<Cmd> {
        let Some(entry) = self.entry.take() else {
            return None;
        };
        let Some(component_id) = self.selected_component() else {
            return None;
        };

        match entry {
            EntryState::Quantity { buffer } => match buffer.trim().parse::<u32>() {
                Ok(quantity) => {
                    self.editor.set_quantity(component_id, quantity);
                    self.note_edit_made();
                }
                Err(_) => {
                    // Unparsable input is dropped without an error surface.
                    debug!(input = %buffer, "invalid quantity input dropped");
                }
            },
            EntryState::Remark { buffer } => {
                self.editor.set_remark(component_id, &buffer);
                self.note_edit_made();
            }
            EntryState::Note { mut draft } => {
                if let Err(error) = draft.request_send() {
                    self.status = Some(error.to_string());
                    self.entry = Some(EntryState::Note { draft });
                    return None;
                }
                self.editor.append_draft_note(draft.component_id(), draft.text());
                self.note_edit_made();
            }
        }
        None
    }

    fn note_edit_made(&mut self) {
        if let Ok(next) = self.panel.apply(PanelEvent::EditMade) {
            self.panel = next;
        }
        self.status = None;
        self.error = None;
    }

    fn handle_submit(&mut self, decision: Decision) -> Option<Cmd> {
        if !self.panel.can_submit() {
            self.status = Some(match self.panel {
                PanelState::Submitting => "a submission is already in flight".to_owned(),
                _ => "this request can no longer be decided".to_owned(),
            });
            return None;
        }

        let action = match decision {
            Decision::Approve => SubmitAction::Approve,
            Decision::Reject => SubmitAction::Reject,
        };
        match self.editor.validate_for_submit(action) {
            ValidationOutcome::Ready => {}
            ValidationOutcome::MissingRemark { first, .. } => {
                self.focus_component(first);
                self.status = Some(format!(
                    "component {first} changed quantity without a remark"
                ));
                return None;
            }
            ValidationOutcome::AllocationExceeded { first, .. } => {
                self.focus_component(first);
                self.status = Some(format!(
                    "component {first} allocates more than it issues"
                ));
                return None;
            }
            ValidationOutcome::NoteRequired => {
                self.status = Some("a note explaining the rejection is required".to_owned());
                return None;
            }
        }

        if let Ok(next) = self.panel.apply(PanelEvent::SubmitStarted) {
            self.panel = next;
        }
        self.status = Some(format!("submitting {}...", decision.name()));
        self.error = None;

        match decision {
            Decision::Approve => {
                let submission = self
                    .editor
                    .approval_submission(SubmissionCoverage::AllLines, self.priority);
                Some(Box::pin(async move {
                    let msg = match crate::tui::submit_approval(submission).await {
                        Ok(outcome) => AppMsg::SubmitSucceeded {
                            decision: Decision::Approve,
                            message: outcome.message,
                        },
                        Err(error) => AppMsg::from_error(&error),
                    };
                    Some(Box::new(msg) as Box<dyn Any + Send>)
                }))
            }
            Decision::Reject => {
                let rejection = self.editor.rejection_submission();
                Some(Box::pin(async move {
                    let msg = match crate::tui::submit_rejection(rejection).await {
                        Ok(outcome) => AppMsg::SubmitSucceeded {
                            decision: Decision::Reject,
                            message: outcome.message,
                        },
                        Err(error) => AppMsg::from_error(&error),
                    };
                    Some(Box::new(msg) as Box<dyn Any + Send>)
                }))
            }
        }
    }

    fn focus_component(&mut self, component_id: u64) {
        if let Some(position) = self
            .editor
            .lines()
            .iter()
            .position(|line| line.record().component_id == component_id)
        {
            self.cursor = position;
            self.adjust_scroll_to_cursor();
        }
    }

    /// Locks the panel and kicks off the post-submission refetch.
    ///
    /// The editor's local state is done with: the server's fresh view
    /// replaces it when the reload lands.
    fn handle_submit_succeeded(
        &mut self,
        decision: Decision,
        message: Option<&str>,
    ) -> Option<Cmd> {
        let event = match decision {
            Decision::Approve => PanelEvent::ApproveSucceeded,
            Decision::Reject => PanelEvent::RejectSucceeded,
        };
        if let Ok(next) = self.panel.apply(event) {
            self.panel = next;
        }
        self.editor.mark_read_only();
        self.status = Some(
            message
                .map_or_else(|| format!("{} recorded", decision.name()), ToOwned::to_owned),
        );
        self.error = None;

        Some(Box::pin(async {
            let msg = match crate::tui::refetch_details().await {
                Ok(details) => AppMsg::ReloadComplete(details),
                Err(error) => AppMsg::ReloadFailed(error.to_string()),
            };
            Some(Box::new(msg) as Box<dyn Any + Send>)
        }))
    }

    /// Replaces the panel's view with fresh server state after a decision.
    fn handle_reload_complete(
        &mut self,
        details: &crate::erp::models::RequestDetails,
    ) -> Option<Cmd> {
        let mut editor = RequestLineEditor::load(
            details.metadata.kind,
            details.lines.clone(),
            self.editor.identity().clone(),
        );
        editor.mark_read_only();
        self.editor = editor;
        self.metadata = Some(details.metadata.clone());
        self.cursor = self.cursor.min(self.line_count().saturating_sub(1));
        self.adjust_scroll_to_cursor();
        None
    }

    fn handle_submit_failed(&mut self, message: &str) -> Option<Cmd> {
        // Editor state is left untouched so the user can retry manually.
        if let Ok(next) = self.panel.apply(PanelEvent::SubmitFailed) {
            self.panel = next;
        }
        self.error = Some(message.to_owned());
        self.status = None;
        None
    }

    fn render_header(&self) -> String {
        let Some(metadata) = &self.metadata else {
            return "stockwell review panel (no request loaded)\n".to_owned();
        };
        let title = metadata.title.as_deref().unwrap_or("(untitled)");
        let status = metadata.status.as_deref().unwrap_or("unknown");
        let requester = metadata.requested_by.as_deref().unwrap_or("unknown");
        let priority = if metadata.priority { "  PRIORITY" } else { "" };
        format!(
            "{kind} #{number} [{status}]{priority}  {title}  (requested by {requester})\n",
            kind = metadata.kind.label(),
            number = metadata.number,
        )
    }

    fn render_preview(&self) -> String {
        let preview = self.editor.preview();
        if preview.is_empty() {
            return String::new();
        }

        let mut output = String::from("Pending changes:\n");
        for entry in &preview {
            let description = entry.description.as_deref().unwrap_or("(no description)");
            let remark = if entry.remark.trim().is_empty() {
                String::new()
            } else {
                format!("  ({})", entry.remark.trim())
            };
            output.push_str(&format!(
                "  [{id}] {description}: {current} -> {updated}{remark}\n",
                id = entry.component_id,
                current = entry.current_quantity,
                updated = entry.updated_quantity,
            ));
        }
        output
    }

    fn render_entry_line(&self) -> String {
        match &self.entry {
            Some(EntryState::Quantity { buffer }) => format!("quantity> {buffer}\n"),
            Some(EntryState::Remark { buffer }) => format!("remark> {buffer}\n"),
            Some(EntryState::Note { draft }) => format!(
                "note ({remaining} left)> {text}\n",
                remaining = draft.remaining_chars(),
                text = draft.text(),
            ),
            None => String::new(),
        }
    }

    fn render_status_bar(&self) -> String {
        if let Some(error) = &self.error {
            return format!("error: {error}\n");
        }
        if let Some(status) = &self.status {
            return format!("{status}\n");
        }
        let hint = match self.panel {
            PanelState::Editing => {
                "e: quantity  r: remark  n: note  a: approve  x: reject  ?: help  q: quit"
            }
            PanelState::Submitting => "submitting...",
            PanelState::Approved | PanelState::Rejected | PanelState::PastReadonly => {
                "read-only  q: quit"
            }
            PanelState::Idle => "loading...",
        };
        format!("{hint}\n")
    }

    fn render_help_overlay() -> String {
        concat!(
            "Review panel keys\n",
            "\n",
            "  j / k, arrows   move between line items\n",
            "  g / G           first / last line item\n",
            "  e               edit quantity (digits only)\n",
            "  r               edit remark\n",
            "  n               compose a note\n",
            "  a               approve with current edits\n",
            "  x               reject (requires a note)\n",
            "  Esc / Enter     cancel / commit the active field\n",
            "  q               quit\n",
            "\n",
            "Press any key to close this help.\n",
        )
        .to_owned()
    }
}

/// Tag used by `begin_entry` to select the field kind.
#[derive(Debug, Clone, Copy)]
enum EntryKindTag {
    Quantity,
    Remark,
    Note,
}

impl Model for ReviewPanelApp {
    fn init() -> (Self, Option<Cmd>) {
        // Retrieve initial data from module-level storage.
        let model = crate::tui::panel_seed().map_or_else(Self::empty, Self::from_seed);

        // Emit an immediate startup message to trigger the first render.
        let cmd: Cmd = Box::pin(async { Some(Box::new(AppMsg::Initialized) as Box<dyn Any + Send>) });
        (model, Some(cmd))
    }

    fn update(&mut self, msg: Box<dyn Any + Send>) -> Option<Cmd> {
        if let Some(app_msg) = msg.downcast_ref::<AppMsg>() {
            return self.handle_message(app_msg);
        }

        if let Some(key_msg) = msg.downcast_ref::<bubbletea_rs::event::KeyMsg>() {
            if self.show_help {
                return self.handle_message(&AppMsg::ToggleHelp);
            }
            let context = self.input_context();
            if let Some(mapped) = map_key_to_message(key_msg, context) {
                return self.handle_message(&mapped);
            }
        }

        if let Some(size_msg) = msg.downcast_ref::<bubbletea_rs::event::WindowSizeMsg>() {
            let resize = AppMsg::WindowResized {
                width: size_msg.width,
                height: size_msg.height,
            };
            return self.handle_message(&resize);
        }

        None
    }

    fn view(&self) -> String {
        if self.show_help {
            return Self::render_help_overlay();
        }

        let mut output = String::new();
        output.push_str(&self.render_header());
        output.push('\n');

        let table = self.line_table.view(&LineTableViewContext {
            lines: self.editor.lines(),
            cursor_position: self.cursor,
            scroll_offset: self.scroll,
            visible_height: self.list_height(),
            max_width: (self.width as usize).max(1),
        });
        output.push_str(&table);
        output.push('\n');

        output.push_str(&self.render_preview());

        let notes = self.note_panel.view(&NotePanelViewContext {
            selected_line: self.editor.lines().get(self.cursor),
            max_width: (self.width as usize).max(1),
            max_rows: NOTE_ROWS,
        });
        output.push_str(&notes);

        output.push_str(&self.render_entry_line());
        output.push_str(&self.render_status_bar());
        output
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
