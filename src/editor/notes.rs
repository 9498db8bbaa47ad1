//! Note draft state and remark template rendering for the review panel.
//!
//! This module encapsulates the editable note draft tied to a selected
//! request line. It enforces a maximum character count, tracks
//! send-readiness, and renders configured remark templates using `MiniJinja`.

use minijinja::{Environment, context};
use thiserror::Error;

use crate::erp::models::RequestLine;

/// Local note draft for a selected request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraftState {
    component_id: u64,
    text: String,
    max_length: usize,
    ready_to_send: bool,
}

impl NoteDraftState {
    /// Creates an empty note draft for the given component.
    #[must_use]
    pub fn new(component_id: u64, max_length: usize) -> Self {
        debug_assert!(
            max_length >= 1,
            "note draft max_length must be normalised before state creation"
        );
        Self {
            component_id,
            text: String::new(),
            max_length,
            ready_to_send: false,
        }
    }

    /// Returns the component this draft is attached to.
    #[must_use]
    pub const fn component_id(&self) -> u64 {
        self.component_id
    }

    /// Returns the current draft text.
    #[must_use]
    pub const fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Returns the configured maximum character count.
    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// Returns whether the draft has been marked ready to send.
    #[must_use]
    pub const fn is_ready_to_send(&self) -> bool {
        self.ready_to_send
    }

    /// Returns the current character count using Unicode scalar values.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns remaining characters before the draft reaches its limit.
    #[must_use]
    pub fn remaining_chars(&self) -> usize {
        self.max_length.saturating_sub(self.char_count())
    }

    /// Appends free-form text to the draft, enforcing max length.
    ///
    /// # Errors
    ///
    /// Returns [`NoteDraftError::LengthExceeded`] when appending `suffix`
    /// would exceed the configured maximum length.
    pub fn append_text(&mut self, suffix: &str) -> Result<(), NoteDraftError> {
        if suffix.is_empty() {
            return Ok(());
        }

        let attempted = self.char_count().saturating_add(suffix.chars().count());
        self.ensure_within_limit(attempted)?;

        self.text.push_str(suffix);
        self.ready_to_send = false;
        Ok(())
    }

    /// Appends one character to the draft, enforcing max length.
    ///
    /// # Errors
    ///
    /// Returns [`NoteDraftError::LengthExceeded`] when appending `character`
    /// would exceed the configured maximum length.
    pub fn push_char(&mut self, character: char) -> Result<(), NoteDraftError> {
        let attempted = self.char_count().saturating_add(1);
        self.ensure_within_limit(attempted)?;

        self.text.push(character);
        self.ready_to_send = false;
        Ok(())
    }

    /// Removes the last character from the draft, if present.
    pub fn backspace(&mut self) {
        let _ = self.text.pop();
        self.ready_to_send = false;
    }

    /// Clears the draft text and readiness state.
    pub fn clear(&mut self) {
        self.text.clear();
        self.ready_to_send = false;
    }

    /// Marks the draft as ready to send.
    ///
    /// The draft must be non-empty and within the configured length limit.
    ///
    /// # Errors
    ///
    /// Returns [`NoteDraftError::EmptyDraft`] when the draft is empty or
    /// whitespace-only, or [`NoteDraftError::LengthExceeded`] when the draft
    /// length exceeds the configured maximum.
    pub fn request_send(&mut self) -> Result<(), NoteDraftError> {
        if self.text.trim().is_empty() {
            return Err(NoteDraftError::EmptyDraft);
        }

        let current_count = self.char_count();
        self.ensure_within_limit(current_count)?;

        self.ready_to_send = true;
        Ok(())
    }

    const fn ensure_within_limit(&self, attempted: usize) -> Result<(), NoteDraftError> {
        if attempted > self.max_length {
            return Err(NoteDraftError::LengthExceeded {
                attempted,
                max_length: self.max_length,
            });
        }
        Ok(())
    }
}

/// Errors raised while mutating or validating note drafts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NoteDraftError {
    /// The draft text would exceed the configured character limit.
    #[error("note draft length {attempted} exceeds configured limit {max_length}")]
    LengthExceeded {
        /// Character count after the attempted mutation.
        attempted: usize,
        /// Configured maximum character count.
        max_length: usize,
    },
    /// Sending was requested for an empty draft.
    #[error("note draft is empty")]
    EmptyDraft,
}

/// Errors raised while rendering a remark template.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemarkTemplateError {
    /// The template source failed to parse.
    #[error("invalid remark template syntax: {message}")]
    InvalidSyntax {
        /// Human-readable parser message from `MiniJinja`.
        message: String,
    },
    /// Rendering failed after successful parsing.
    #[error("remark template rendering failed: {message}")]
    RenderFailed {
        /// Human-readable rendering failure from `MiniJinja`.
        message: String,
    },
}

/// Renders a remark template with data from a selected request line.
///
/// Templates can use the following variables:
/// - `component`
/// - `part_number`
/// - `requested`
/// - `updated`
/// - `unit`
///
/// # Errors
///
/// Returns [`RemarkTemplateError::InvalidSyntax`] when `template_source`
/// fails to parse, or [`RemarkTemplateError::RenderFailed`] when rendering
/// fails.
pub fn render_remark_template(
    template_source: &str,
    line: &RequestLine,
    updated_quantity: u32,
) -> Result<String, RemarkTemplateError> {
    let mut environment = Environment::new();
    environment.set_auto_escape_callback(|_| minijinja::AutoEscape::None);

    environment
        .add_template("remark", template_source)
        .map_err(|error| RemarkTemplateError::InvalidSyntax {
            message: error.to_string(),
        })?;

    let component = line
        .description
        .clone()
        .unwrap_or_else(|| "(unknown component)".to_owned());
    let part_number = line.part_number.clone().unwrap_or_default();
    let unit = line.unit.clone().unwrap_or_else(|| "pcs".to_owned());

    let template =
        environment
            .get_template("remark")
            .map_err(|error| RemarkTemplateError::RenderFailed {
                message: error.to_string(),
            })?;

    template
        .render(context! {
            component => component,
            part_number => part_number,
            requested => line.current_quantity,
            updated => updated_quantity,
            unit => unit,
        })
        .map_err(|error| RemarkTemplateError::RenderFailed {
            message: error.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{NoteDraftError, NoteDraftState, render_remark_template};
    use crate::erp::models::RequestLine;

    #[fixture]
    fn sample_line() -> RequestLine {
        RequestLine {
            component_id: 301,
            description: Some("Ceramic capacitor 10uF".to_owned()),
            part_number: Some("CAP-0603-10U".to_owned()),
            unit: Some("pcs".to_owned()),
            initial_quantity: 50,
            current_quantity: 50,
            ..Default::default()
        }
    }

    #[test]
    fn new_draft_starts_empty_and_not_ready() {
        let draft = NoteDraftState::new(301, 60);

        assert_eq!(draft.component_id(), 301);
        assert_eq!(draft.text(), "");
        assert_eq!(draft.max_length(), 60);
        assert_eq!(draft.char_count(), 0);
        assert!(!draft.is_ready_to_send());
    }

    #[test]
    fn append_text_respects_max_length() {
        let mut draft = NoteDraftState::new(301, 10);

        let result = draft.append_text("hold for recount");
        assert_eq!(
            result,
            Err(NoteDraftError::LengthExceeded {
                attempted: 16,
                max_length: 10,
            })
        );
        assert_eq!(draft.text(), "");
    }

    #[test]
    fn push_char_and_backspace_update_draft() {
        let mut draft = NoteDraftState::new(301, 10);

        assert!(draft.push_char('o').is_ok());
        assert!(draft.push_char('k').is_ok());
        assert_eq!(draft.text(), "ok");

        draft.backspace();
        assert_eq!(draft.text(), "o");
    }

    #[test]
    fn request_send_requires_non_empty_draft() {
        let mut draft = NoteDraftState::new(301, 10);

        let result = draft.request_send();
        assert_eq!(result, Err(NoteDraftError::EmptyDraft));
        assert!(!draft.is_ready_to_send());
    }

    #[test]
    fn request_send_marks_ready_when_valid() {
        let mut draft = NoteDraftState::new(301, 10);
        assert!(draft.append_text("hold").is_ok());

        assert!(draft.request_send().is_ok());
        assert!(draft.is_ready_to_send());
    }

    #[test]
    fn clear_resets_text_and_readiness() {
        let mut draft = NoteDraftState::new(301, 10);
        assert!(draft.append_text("hold").is_ok());
        assert!(draft.request_send().is_ok());

        draft.clear();

        assert_eq!(draft.text(), "");
        assert!(!draft.is_ready_to_send());
    }

    #[rstest]
    #[case("abc", 3)]
    #[case("é", 1)]
    #[case("🙂", 1)]
    fn char_count_uses_unicode_scalar_values(#[case] text: &str, #[case] expected: usize) {
        let mut draft = NoteDraftState::new(301, 20);
        assert!(draft.append_text(text).is_ok());

        assert_eq!(draft.char_count(), expected);
    }

    #[rstest]
    fn render_remark_template_includes_line_fields(sample_line: RequestLine) {
        let rendered = render_remark_template(
            "{{ component }}: {{ requested }} -> {{ updated }} {{ unit }}",
            &sample_line,
            30,
        )
        .expect("template should render");

        assert_eq!(rendered, "Ceramic capacitor 10uF: 50 -> 30 pcs");
    }

    #[rstest]
    fn render_remark_template_reports_invalid_syntax(sample_line: RequestLine) {
        let result = render_remark_template("{{ component", &sample_line, 30);

        assert!(
            matches!(result, Err(super::RemarkTemplateError::InvalidSyntax { .. })),
            "expected invalid syntax error, got {result:?}"
        );
    }
}
