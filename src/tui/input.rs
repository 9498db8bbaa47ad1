//! Input handling for the TUI application.
//!
//! This module provides key-to-message mapping for translating terminal key
//! events into application messages. Mapping is context-aware: while an
//! entry field is active, printable keys feed the field instead of firing
//! navigation shortcuts.

use super::messages::AppMsg;

/// Which input surface currently owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// The line list owns navigation and command shortcuts.
    LineList,
    /// A quantity, remark, or note entry field is active.
    TextEntry,
}

/// Maps a key event to an application message for the given context.
///
/// Returns `None` for unrecognised key events, allowing them to be ignored.
#[must_use]
pub fn map_key_to_message(
    key: &bubbletea_rs::event::KeyMsg,
    context: InputContext,
) -> Option<AppMsg> {
    match context {
        InputContext::LineList => map_list_key(key),
        InputContext::TextEntry => map_entry_key(key),
    }
}

#[expect(
    clippy::missing_const_for_fn,
    reason = "KeyCode match patterns prevent const evaluation"
)]
fn map_list_key(key: &bubbletea_rs::event::KeyMsg) -> Option<AppMsg> {
    use crossterm::event::KeyCode;

    match key.key {
        KeyCode::Char('q') => Some(AppMsg::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(AppMsg::CursorDown),
        KeyCode::Char('k') | KeyCode::Up => Some(AppMsg::CursorUp),
        KeyCode::Home | KeyCode::Char('g') => Some(AppMsg::Home),
        KeyCode::End | KeyCode::Char('G') => Some(AppMsg::End),
        KeyCode::Char('e') => Some(AppMsg::BeginQuantityEntry),
        KeyCode::Char('r') => Some(AppMsg::BeginRemarkEntry),
        KeyCode::Char('n') => Some(AppMsg::BeginNoteEntry),
        KeyCode::Char('a') => Some(AppMsg::SubmitApprove),
        KeyCode::Char('x') => Some(AppMsg::SubmitReject),
        KeyCode::Char('?') => Some(AppMsg::ToggleHelp),
        _ => None,
    }
}

#[expect(
    clippy::missing_const_for_fn,
    reason = "KeyCode match patterns prevent const evaluation"
)]
fn map_entry_key(key: &bubbletea_rs::event::KeyMsg) -> Option<AppMsg> {
    use crossterm::event::KeyCode;

    match key.key {
        KeyCode::Esc => Some(AppMsg::CancelEntry),
        KeyCode::Enter => Some(AppMsg::CommitEntry),
        KeyCode::Backspace => Some(AppMsg::InputBackspace),
        KeyCode::Char(character) => Some(AppMsg::InputChar(character)),
        _ => None,
    }
}
