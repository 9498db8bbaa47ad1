//! Reusable view components for the review panel.

pub mod line_table;
pub mod note_panel;

pub use line_table::{LineTableComponent, LineTableViewContext};
pub use note_panel::{NotePanelComponent, NotePanelViewContext};

use unicode_width::UnicodeWidthChar;

/// Truncates text to a display width, appending an ellipsis when cut.
///
/// Width is measured in terminal columns so wide characters do not overflow
/// the row.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    let total: usize = text
        .chars()
        .map(|character| character.width().unwrap_or(0))
        .sum();
    if total <= max_width {
        return text.to_owned();
    }

    let limit = max_width.saturating_sub(1);
    let mut width = 0_usize;
    let mut truncated = String::new();
    for character in text.chars() {
        let char_width = character.width().unwrap_or(0);
        if width + char_width > limit {
            break;
        }
        width += char_width;
        truncated.push(character);
    }
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::truncate_to_width;

    #[rstest]
    #[case("short", 20, "short")]
    #[case("a long component description", 10, "a long co…")]
    #[case("", 5, "")]
    fn truncation_respects_display_width(
        #[case] input: &str,
        #[case] max: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(truncate_to_width(input, max), expected);
    }

    #[test]
    fn zero_width_yields_empty_string() {
        assert_eq!(truncate_to_width("anything", 0), "");
    }

    #[test]
    fn wide_characters_count_as_two_columns() {
        let truncated = truncate_to_width("電解コンデンサ", 7);

        assert!(truncated.ends_with('…'));
        assert!(truncated.chars().count() <= 4);
    }
}
