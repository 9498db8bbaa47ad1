//! Unit tests for the review panel application model.

use bubbletea_rs::Model;
use crossterm::event::{KeyCode, KeyModifiers};

use super::{EntryState, ReviewPanelApp};
use crate::editor::{EditorIdentity, PanelState};
use crate::erp::locator::FormKind;
use crate::erp::models::{RequestDetails, RequestLine, RequestMetadata};
use crate::tui::PanelSeed;
use crate::tui::messages::{AppMsg, Decision};

fn key_msg(key: KeyCode) -> bubbletea_rs::event::KeyMsg {
    bubbletea_rs::event::KeyMsg {
        key,
        modifiers: KeyModifiers::empty(),
    }
}

fn line(component_id: u64, quantity: u32) -> RequestLine {
    RequestLine {
        component_id,
        description: Some(format!("Component {component_id}")),
        initial_quantity: quantity,
        current_quantity: quantity,
        ..Default::default()
    }
}

fn seed(lines: Vec<RequestLine>, historical: bool) -> PanelSeed {
    PanelSeed {
        details: RequestDetails {
            metadata: RequestMetadata {
                number: 42,
                kind: FormKind::Mrf,
                title: Some("Prototype connectors".to_owned()),
                status: Some("pending_head".to_owned()),
                requested_by: Some("a.khan".to_owned()),
                department: None,
                created_at: None,
                updated_at: None,
                priority: false,
            },
            lines,
        },
        identity: EditorIdentity {
            user_name: "s.rao".to_owned(),
            role: "head".to_owned(),
        },
        note_max_length: 100,
        priority: false,
        historical,
        remark_template: None,
    }
}

fn app_with_lines() -> ReviewPanelApp {
    ReviewPanelApp::from_seed(seed(vec![line(1, 5), line(2, 8)], false))
}

#[test]
fn empty_app_has_no_lines_and_idle_panel() {
    let app = ReviewPanelApp::empty();

    assert_eq!(app.line_count(), 0);
    assert_eq!(app.panel, PanelState::Idle);
}

#[test]
fn seeded_app_enters_editing_state() {
    let app = app_with_lines();

    assert_eq!(app.panel, PanelState::Editing);
    assert_eq!(app.line_count(), 2);
}

#[test]
fn historical_seed_enters_readonly_state() {
    let app = ReviewPanelApp::from_seed(seed(vec![line(1, 5)], true));

    assert_eq!(app.panel, PanelState::PastReadonly);
    assert!(app.editor.is_read_only());
}

#[test]
fn quantity_entry_commits_digits_into_the_editor() {
    let mut app = app_with_lines();

    app.handle_message(&AppMsg::BeginQuantityEntry);
    app.handle_message(&AppMsg::InputBackspace);
    app.handle_message(&AppMsg::InputChar('3'));
    app.handle_message(&AppMsg::CommitEntry);

    assert_eq!(
        app.editor.line(1).map(|l| l.edited_quantity()),
        Some(3)
    );
}

#[test]
fn non_numeric_quantity_input_is_dropped_silently() {
    let mut app = app_with_lines();

    app.handle_message(&AppMsg::BeginQuantityEntry);
    app.handle_message(&AppMsg::InputChar('-'));
    app.handle_message(&AppMsg::InputChar('x'));
    app.handle_message(&AppMsg::CommitEntry);

    // Buffer was prefilled with the current value; junk characters never
    // entered it, so the committed value is unchanged.
    assert_eq!(
        app.editor.line(1).map(|l| l.edited_quantity()),
        Some(5)
    );
}

#[test]
fn remark_entry_commits_text() {
    let mut app = app_with_lines();

    app.handle_message(&AppMsg::BeginRemarkEntry);
    for character in "ok".chars() {
        app.handle_message(&AppMsg::InputChar(character));
    }
    app.handle_message(&AppMsg::CommitEntry);

    assert_eq!(app.editor.line(1).map(|l| l.remark().to_owned()), Some("ok".to_owned()));
}

#[test]
fn empty_remark_entry_is_seeded_from_the_template() {
    let mut panel_seed = seed(vec![line(1, 5)], false);
    panel_seed.remark_template = Some("{{ requested }} -> {{ updated }} {{ unit }}".to_owned());
    let mut app = ReviewPanelApp::from_seed(panel_seed);
    app.editor.set_quantity(1, 3);

    app.handle_message(&AppMsg::BeginRemarkEntry);

    match &app.entry {
        Some(EntryState::Remark { buffer }) => assert_eq!(buffer, "5 -> 3 pcs"),
        other => panic!("expected remark entry, got {other:?}"),
    }
}

#[test]
fn empty_note_commit_keeps_the_entry_open() {
    let mut app = app_with_lines();

    app.handle_message(&AppMsg::BeginNoteEntry);
    app.handle_message(&AppMsg::CommitEntry);

    assert!(
        matches!(app.entry, Some(EntryState::Note { .. })),
        "empty note must not be committed"
    );
}

#[test]
fn approve_without_remark_on_changed_line_is_blocked() {
    let mut app = app_with_lines();
    app.editor.set_quantity(1, 3);

    let cmd = app.handle_message(&AppMsg::SubmitApprove);

    assert!(cmd.is_none(), "validation failure must not dispatch");
    assert_eq!(app.panel, PanelState::Editing);
    assert!(app.editor.line(1).is_some_and(|l| l.highlight_remark()));
}

#[test]
fn reject_without_notes_is_blocked() {
    let mut app = app_with_lines();

    let cmd = app.handle_message(&AppMsg::SubmitReject);

    assert!(cmd.is_none());
    assert!(app.editor.note_required());
}

#[test]
fn submitting_state_refuses_a_second_dispatch() {
    let mut app = app_with_lines();
    app.editor.append_draft_note(1, "wrong part");
    let first = app.handle_message(&AppMsg::SubmitReject);
    assert!(first.is_some(), "first dispatch should produce a command");
    assert_eq!(app.panel, PanelState::Submitting);

    let second = app.handle_message(&AppMsg::SubmitReject);

    assert!(second.is_none(), "in-flight guard must refuse the second");
}

#[test]
fn successful_approval_locks_the_panel() {
    let mut app = app_with_lines();
    app.handle_message(&AppMsg::SubmitApprove);

    app.handle_message(&AppMsg::SubmitSucceeded {
        decision: Decision::Approve,
        message: Some("approved".to_owned()),
    });

    assert_eq!(app.panel, PanelState::Approved);
    assert!(app.editor.is_read_only());
}

#[test]
fn reload_replaces_editor_with_server_state() {
    let mut app = app_with_lines();
    app.editor.append_draft_note(1, "restock first");
    app.handle_message(&AppMsg::SubmitReject);
    app.handle_message(&AppMsg::SubmitSucceeded {
        decision: Decision::Reject,
        message: None,
    });

    let fresh = seed(vec![line(1, 3)], false).details;
    app.handle_message(&AppMsg::ReloadComplete(fresh));

    assert_eq!(app.line_count(), 1);
    assert!(app.editor.is_read_only(), "server state stays read-only");
    assert_eq!(
        app.editor.line(1).map(|l| l.record().current_quantity),
        Some(3)
    );
}

#[test]
fn failed_submission_returns_to_editing_with_state_intact() {
    let mut app = app_with_lines();
    app.editor.set_quantity(1, 3);
    app.editor.set_remark(1, "short supply");
    app.handle_message(&AppMsg::SubmitApprove);
    assert_eq!(app.panel, PanelState::Submitting);

    app.handle_message(&AppMsg::SubmitFailed("backend unavailable".to_owned()));

    assert_eq!(app.panel, PanelState::Editing);
    assert_eq!(
        app.editor.line(1).map(|l| l.edited_quantity()),
        Some(3),
        "editor state must survive a failed submission for retry"
    );
}

#[test]
fn cursor_navigation_clamps_to_line_count() {
    let mut app = app_with_lines();

    app.handle_message(&AppMsg::CursorUp);
    app.handle_message(&AppMsg::End);
    app.handle_message(&AppMsg::CursorDown);

    let view = app.view();
    assert!(view.contains("> [2]"), "cursor should rest on the last line: {view}");
}

#[test]
fn help_overlay_consumes_the_next_key() {
    let mut app = app_with_lines();
    app.handle_message(&AppMsg::ToggleHelp);
    assert!(app.show_help);

    let cmd = app.update(Box::new(key_msg(KeyCode::Char('q'))));

    assert!(cmd.is_none());
    assert!(!app.show_help, "any key closes the help overlay");
}

#[test]
fn view_renders_header_preview_and_status() {
    let mut app = app_with_lines();
    app.editor.set_quantity(1, 3);
    app.editor.set_remark(1, "short supply");

    let view = app.view();

    assert!(view.contains("MRF #42"), "{view}");
    assert!(view.contains("Pending changes:"), "{view}");
    assert!(view.contains("5 -> 3"), "{view}");
    assert!(view.contains("a: approve"), "{view}");
}

#[test]
fn readonly_panel_refuses_entry_fields() {
    let mut app = ReviewPanelApp::from_seed(seed(vec![line(1, 5)], true));

    app.handle_message(&AppMsg::BeginQuantityEntry);

    assert!(app.entry.is_none());
}
