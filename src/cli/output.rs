//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use stockwell::erp::models::PendingRequestPage;
use stockwell::{ApprovalError, RequestDetails};

/// Writes a summary of request details to stdout.
pub fn write_request_summary(details: &RequestDetails) -> Result<(), ApprovalError> {
    let mut stdout = io::stdout().lock();
    write_request_summary_to(&mut stdout, details)
}

/// Writes a summary of request details to the given writer.
pub fn write_request_summary_to<W: Write>(
    writer: &mut W,
    details: &RequestDetails,
) -> Result<(), ApprovalError> {
    let metadata = &details.metadata;
    let title = metadata.title.as_deref().unwrap_or("(untitled)");
    let status = metadata.status.as_deref().unwrap_or("unknown");
    let requester = metadata.requested_by.as_deref().unwrap_or("unknown");
    writeln!(
        writer,
        "Loaded {kind} #{number} [{status}] by {requester}: {title}",
        kind = metadata.kind.label(),
        number = metadata.number,
    )
    .map_err(|e| io_error(&e))?;

    for line in &details.lines {
        let description = line.description.as_deref().unwrap_or("(no description)");
        let unit = line.unit.as_deref().unwrap_or("pcs");
        let adjusted = if line.current_quantity == line.initial_quantity {
            String::new()
        } else {
            format!(" (was {})", line.initial_quantity)
        };
        writeln!(
            writer,
            "  [{id}] {description}: {quantity} {unit}{adjusted}",
            id = line.component_id,
            quantity = line.current_quantity,
        )
        .map_err(|e| io_error(&e))?;
    }

    writeln!(writer, "Line items: {}", details.lines.len()).map_err(|e| io_error(&e))
}

/// Writes a summary of pending requests to the given writer.
pub fn write_listing_summary<W: Write>(
    writer: &mut W,
    page: &PendingRequestPage,
) -> Result<(), ApprovalError> {
    writeln!(writer, "Requests awaiting your action:").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    for request in &page.items {
        let title = request.title.as_deref().unwrap_or("(untitled)");
        let status = request.status.as_deref().unwrap_or("unknown");
        let requester = request.requested_by.as_deref().unwrap_or("unknown");
        writeln!(
            writer,
            "  {kind} #{number} [{status}] {title} (@{requester})",
            kind = request.kind.label(),
            number = request.number,
        )
        .map_err(|e| io_error(&e))?;
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "Page {page_number} of {total} ({shown} shown)",
        page_number = page.page,
        total = page.total_pages.unwrap_or(1),
        shown = page.items.len(),
    )
    .map_err(|e| io_error(&e))?;

    if page.total_pages.is_some_and(|total| total > page.page) {
        writeln!(writer, "More pages available.").map_err(|e| io_error(&e))?;
    }

    Ok(())
}

/// Converts an I/O error to an [`ApprovalError::Io`].
pub(crate) fn io_error(error: &io::Error) -> ApprovalError {
    ApprovalError::Io {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use stockwell::erp::models::{
        PendingRequestPage, RequestDetails, RequestMetadata, RequestSummary,
    };
    use stockwell::erp::models::test_support::minimal_line;
    use stockwell::FormKind;

    use super::{write_listing_summary, write_request_summary_to};

    fn render_details(details: &RequestDetails) -> String {
        let mut buffer = Vec::new();
        write_request_summary_to(&mut buffer, details).expect("should write summary");
        String::from_utf8(buffer).expect("output should be valid UTF-8")
    }

    #[test]
    fn request_summary_includes_metadata_and_lines() {
        let details = RequestDetails {
            metadata: RequestMetadata {
                number: 42,
                kind: FormKind::Mif,
                title: Some("Bench rework batch".to_owned()),
                status: Some("pending_head".to_owned()),
                requested_by: Some("a.khan".to_owned()),
                department: None,
                created_at: None,
                updated_at: None,
                priority: false,
            },
            lines: vec![minimal_line(301, 50)],
        };

        let output = render_details(&details);

        assert!(
            output.contains("Loaded MIF #42 [pending_head] by a.khan: Bench rework batch"),
            "missing header: {output}"
        );
        assert!(output.contains("[301] Component 301: 50 pcs"), "{output}");
        assert!(output.contains("Line items: 1"), "{output}");
    }

    #[test]
    fn listing_summary_includes_items_and_pagination() {
        let page = PendingRequestPage {
            items: vec![RequestSummary {
                number: 12,
                kind: FormKind::Mrf,
                title: Some("Prototype connectors".to_owned()),
                status: Some("pending_purchase".to_owned()),
                requested_by: Some("a.khan".to_owned()),
                created_at: None,
                updated_at: None,
            }],
            page: 2,
            total_pages: Some(3),
        };

        let mut buffer = Vec::new();
        write_listing_summary(&mut buffer, &page).expect("should write listing");
        let output = String::from_utf8(buffer).expect("output should be valid UTF-8");

        assert!(
            output.contains("MRF #12 [pending_purchase] Prototype connectors (@a.khan)"),
            "missing request line: {output}"
        );
        assert!(output.contains("Page 2 of 3 (1 shown)"), "{output}");
        assert!(output.contains("More pages available."), "{output}");
    }

    #[test]
    fn listing_summary_defaults_total_pages_to_one_when_unknown() {
        let page = PendingRequestPage {
            items: Vec::new(),
            page: 1,
            total_pages: None,
        };

        let mut buffer = Vec::new();
        write_listing_summary(&mut buffer, &page).expect("should write listing");
        let output = String::from_utf8(buffer).expect("output should be valid UTF-8");

        assert!(output.contains("Page 1 of 1 (0 shown)"), "{output}");
        assert!(!output.contains("More pages available."), "{output}");
    }
}
