//! Line table component for displaying editable request lines.
//!
//! This component renders a scrollable table of line items with cursor
//! highlighting, quantity edit markers, and remark state for each line.

use crate::editor::EditableLine;

use super::truncate_to_width;

/// Default visible height for the line table component.
const DEFAULT_VISIBLE_HEIGHT: usize = 15;

/// Context for rendering the line table view.
///
/// Bundles the data needed to render the table without requiring per-frame
/// allocations.
#[derive(Debug, Clone)]
pub struct LineTableViewContext<'a> {
    /// All editable lines on the open request.
    pub lines: &'a [EditableLine],
    /// Current cursor position (0-indexed).
    pub cursor_position: usize,
    /// Number of rows scrolled from top.
    pub scroll_offset: usize,
    /// Maximum visible height in rows.
    pub visible_height: usize,
    /// Maximum width in terminal columns.
    pub max_width: usize,
}

/// Component for displaying the editable line items of one request.
#[derive(Debug, Clone)]
pub struct LineTableComponent {
    visible_height: usize,
}

impl Default for LineTableComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl LineTableComponent {
    /// Creates a new line table component.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            visible_height: DEFAULT_VISIBLE_HEIGHT,
        }
    }

    /// Renders the line table as a string.
    ///
    /// Only rows within the visible window (based on scroll offset and
    /// visible height) are rendered.
    #[must_use]
    pub fn view(&self, ctx: &LineTableViewContext<'_>) -> String {
        if ctx.lines.is_empty() {
            return "  This request has no line items.\n".to_owned();
        }

        let visible_height = if ctx.visible_height > 0 {
            ctx.visible_height
        } else {
            self.visible_height
        };

        let start = ctx.scroll_offset;
        let end = (ctx.scroll_offset + visible_height).min(ctx.lines.len());

        let mut output = String::new();
        for (index, line) in ctx
            .lines
            .iter()
            .enumerate()
            .skip(start)
            .take(end.saturating_sub(start))
        {
            let prefix = if index == ctx.cursor_position { ">" } else { " " };
            output.push_str(&Self::format_line_row(line, prefix, ctx.max_width));
            output.push('\n');
        }

        output
    }

    /// Formats a single table row.
    fn format_line_row(line: &EditableLine, prefix: &str, max_width: usize) -> String {
        let record = line.record();
        let description = record
            .description
            .as_deref()
            .unwrap_or("(no description)");
        let unit = record.unit.as_deref().unwrap_or("pcs");

        let quantity = if line.is_changed() {
            format!(
                "{current} -> {edited}* {unit}",
                current = record.current_quantity,
                edited = line.edited_quantity(),
            )
        } else {
            format!("{} {unit}", line.edited_quantity())
        };

        let mirror = line
            .mirror_quantity()
            .map_or_else(String::new, |_| format!(" (total {})", line.total_quantity()));

        let remark_marker = if line.highlight_remark() {
            "  !remark"
        } else if line.remark().trim().is_empty() {
            ""
        } else {
            "  \u{201c}\u{201d}"
        };

        let row = format!(
            "{prefix} [{id}] {description}: {quantity}{mirror}{remark_marker}",
            id = record.component_id,
        );
        truncate_to_width(&row, max_width)
    }
}
