//! Markdown formatter for exported decision records.
//!
//! Generates human-readable Markdown output suitable for filing or emailing
//! alongside the approval.

use std::io::Write;

use crate::erp::ApprovalError;

use super::model::ExportedLine;

/// Writes a decision record in Markdown format to the given writer.
///
/// The output includes a header with the request label, followed by each
/// line item with its identity, quantities, remark, and notes.
///
/// # Errors
///
/// Returns [`ApprovalError::Io`] if writing to the output fails.
pub fn write_markdown<W: Write>(
    writer: &mut W,
    lines: &[ExportedLine],
    request_label: &str,
) -> Result<(), ApprovalError> {
    write_header(writer, lines, request_label)?;

    for line in lines {
        write_line_section(writer, line)?;
    }

    Ok(())
}

/// Writes the Markdown header with the request label.
fn write_header<W: Write>(
    writer: &mut W,
    lines: &[ExportedLine],
    request_label: &str,
) -> Result<(), ApprovalError> {
    writeln!(writer, "# Decision Record: {request_label}").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "Line items: {}", lines.len()).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Writes a single line-item section.
fn write_line_section<W: Write>(writer: &mut W, line: &ExportedLine) -> Result<(), ApprovalError> {
    writeln!(writer, "---").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    write_identity_heading(writer, line)?;
    write_quantities(writer, line)?;

    if let Some(remark) = &line.remark {
        writeln!(writer).map_err(|e| io_error(&e))?;
        writeln!(writer, "> {remark}").map_err(|e| io_error(&e))?;
    }

    write_notes(writer, line)?;

    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Writes the component identity heading.
fn write_identity_heading<W: Write>(
    writer: &mut W,
    line: &ExportedLine,
) -> Result<(), ApprovalError> {
    let identity = match (&line.description, &line.part_number) {
        (Some(description), Some(part_number)) => format!("{description} ({part_number})"),
        (Some(description), None) => description.clone(),
        (None, Some(part_number)) => part_number.clone(),
        (None, None) => format!("component {}", line.component_id),
    };
    writeln!(writer, "## {identity}").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Writes requested and confirmed quantities.
fn write_quantities<W: Write>(writer: &mut W, line: &ExportedLine) -> Result<(), ApprovalError> {
    let unit = line.unit.as_deref().unwrap_or("pcs");
    if line.adjusted {
        writeln!(
            writer,
            "**Quantity:** {initial} {unit} requested, {current} {unit} confirmed",
            initial = line.initial_quantity,
            current = line.current_quantity,
        )
        .map_err(|e| io_error(&e))?;
    } else {
        writeln!(
            writer,
            "**Quantity:** {current} {unit}",
            current = line.current_quantity,
        )
        .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes the note list, when any notes exist.
fn write_notes<W: Write>(writer: &mut W, line: &ExportedLine) -> Result<(), ApprovalError> {
    if line.notes.is_empty() {
        return Ok(());
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "**Notes:**").map_err(|e| io_error(&e))?;
    for note in &line.notes {
        let author = note.author.as_deref().unwrap_or("unknown");
        writeln!(writer, "- {author}: {content}", content = note.content)
            .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Converts an I/O error to an [`ApprovalError::Io`].
fn io_error(error: &std::io::Error) -> ApprovalError {
    ApprovalError::Io {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::write_markdown;
    use crate::erp::models::{NoteEntry, RequestLine};
    use crate::export::model::ExportedLine;

    fn render(lines: &[ExportedLine]) -> String {
        let mut buffer = Vec::new();
        write_markdown(&mut buffer, lines, "MIF #42").expect("should write Markdown");
        String::from_utf8(buffer).expect("output should be valid UTF-8")
    }

    fn adjusted_line() -> ExportedLine {
        ExportedLine::from(&RequestLine {
            component_id: 301,
            description: Some("Ceramic capacitor 10uF".to_owned()),
            part_number: Some("CAP-0603-10U".to_owned()),
            unit: Some("pcs".to_owned()),
            initial_quantity: 50,
            current_quantity: 30,
            remark: Some("reduced at head approval".to_owned()),
            notes: vec![NoteEntry {
                noted_at: None,
                author: Some("a.khan".to_owned()),
                role: None,
                content: "urgent".to_owned(),
            }],
            ..Default::default()
        })
    }

    #[test]
    fn header_names_the_request_and_line_count() {
        let output = render(&[adjusted_line()]);

        assert!(output.contains("# Decision Record: MIF #42"), "{output}");
        assert!(output.contains("Line items: 1"), "{output}");
    }

    #[test]
    fn adjusted_line_shows_both_quantities_and_remark() {
        let output = render(&[adjusted_line()]);

        assert!(
            output.contains("## Ceramic capacitor 10uF (CAP-0603-10U)"),
            "{output}"
        );
        assert!(
            output.contains("**Quantity:** 50 pcs requested, 30 pcs confirmed"),
            "{output}"
        );
        assert!(output.contains("> reduced at head approval"), "{output}");
        assert!(output.contains("- a.khan: urgent"), "{output}");
    }

    #[test]
    fn unadjusted_line_shows_one_quantity_and_no_notes_block() {
        let line = ExportedLine::from(&RequestLine {
            component_id: 7,
            initial_quantity: 5,
            current_quantity: 5,
            ..Default::default()
        });

        let output = render(&[line]);

        assert!(output.contains("## component 7"), "{output}");
        assert!(output.contains("**Quantity:** 5 pcs"), "{output}");
        assert!(!output.contains("**Notes:**"), "{output}");
    }
}
