//! Note panel component for the selected request line.
//!
//! Renders fetched notes followed by this session's drafts, most recent
//! last, for whichever line the cursor rests on.

use crate::editor::EditableLine;
use crate::erp::models::NoteEntry;

use super::truncate_to_width;

/// Context for rendering the note panel view.
#[derive(Debug, Clone)]
pub struct NotePanelViewContext<'a> {
    /// The line the cursor rests on, when any line exists.
    pub selected_line: Option<&'a EditableLine>,
    /// Maximum width in terminal columns.
    pub max_width: usize,
    /// Maximum number of note rows to render.
    pub max_rows: usize,
}

/// Component for displaying the notes attached to the selected line.
#[derive(Debug, Clone, Default)]
pub struct NotePanelComponent;

impl NotePanelComponent {
    /// Creates a new note panel component.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Renders the note panel as a string.
    #[must_use]
    pub fn view(&self, ctx: &NotePanelViewContext<'_>) -> String {
        let Some(line) = ctx.selected_line else {
            return String::new();
        };

        let fetched = line.record().notes.as_slice();
        let drafts = line.draft_notes();
        if fetched.is_empty() && drafts.is_empty() {
            return "  No notes on this line.\n".to_owned();
        }

        let mut output = String::new();
        let rows = fetched
            .iter()
            .map(|note| Self::format_note(note, false))
            .chain(drafts.iter().map(|note| Self::format_note(note, true)));
        for row in rows.take(ctx.max_rows.max(1)) {
            output.push_str(&truncate_to_width(&row, ctx.max_width));
            output.push('\n');
        }
        output
    }

    fn format_note(note: &NoteEntry, draft: bool) -> String {
        let author = note.author.as_deref().unwrap_or("unknown");
        let role = note
            .role
            .as_deref()
            .map_or_else(String::new, |role| format!(" ({role})"));
        let marker = if draft { " [draft]" } else { "" };
        format!(
            "  {author}{role}{marker}: {content}",
            content = note.content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{NotePanelComponent, NotePanelViewContext};
    use crate::editor::{EditorIdentity, RequestLineEditor};
    use crate::erp::locator::FormKind;
    use crate::erp::models::{NoteEntry, RequestLine};

    fn editor_with_notes() -> RequestLineEditor {
        let line = RequestLine {
            component_id: 1,
            initial_quantity: 5,
            current_quantity: 5,
            notes: vec![NoteEntry {
                noted_at: None,
                author: Some("a.khan".to_owned()),
                role: Some("requester".to_owned()),
                content: "urgent".to_owned(),
            }],
            ..Default::default()
        };
        RequestLineEditor::load(
            FormKind::Mif,
            vec![line],
            EditorIdentity {
                user_name: "s.rao".to_owned(),
                role: "head".to_owned(),
            },
        )
    }

    fn render(editor: &RequestLineEditor) -> String {
        NotePanelComponent::new().view(&NotePanelViewContext {
            selected_line: editor.lines().first(),
            max_width: 100,
            max_rows: 5,
        })
    }

    #[test]
    fn fetched_notes_render_with_author_and_role() {
        let editor = editor_with_notes();

        let view = render(&editor);

        assert!(view.contains("a.khan (requester): urgent"), "{view}");
    }

    #[test]
    fn draft_notes_carry_a_marker() {
        let mut editor = editor_with_notes();
        editor.append_draft_note(1, "hold for recount");

        let view = render(&editor);

        assert!(view.contains("[draft]: hold for recount"), "{view}");
    }

    #[test]
    fn no_selection_renders_nothing() {
        let view = NotePanelComponent::new().view(&NotePanelViewContext {
            selected_line: None,
            max_width: 100,
            max_rows: 5,
        });

        assert!(view.is_empty());
    }
}
