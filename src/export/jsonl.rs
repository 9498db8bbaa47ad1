//! JSONL (JSON Lines) formatter for exported decision records.
//!
//! Generates machine-readable output with one JSON object per line, suitable
//! for downstream reporting pipelines.

use std::io::Write;

use crate::erp::ApprovalError;

use super::model::ExportedLine;

/// Writes line items in JSONL format to the given writer.
///
/// Each line item is serialised as a single JSON object on its own line.
/// Empty fields are omitted from the output.
///
/// # Errors
///
/// Returns [`ApprovalError::Io`] if writing to the output fails, or if JSON
/// serialisation fails (which should not happen for valid line items).
pub fn write_jsonl<W: Write>(writer: &mut W, lines: &[ExportedLine]) -> Result<(), ApprovalError> {
    for line in lines {
        serde_json::to_writer(&mut *writer, line).map_err(|e| ApprovalError::Io {
            message: format!("JSON serialisation failed: {e}"),
        })?;
        writeln!(writer).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Converts an I/O error to an [`ApprovalError::Io`].
fn io_error(error: &std::io::Error) -> ApprovalError {
    ApprovalError::Io {
        message: error.to_string(),
    }
}
