//! Export data models for structured decision-record output.
//!
//! This module defines the serialisable structures used for exporting a
//! request's line items and the format selection enum for CLI integration.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::erp::error::ApprovalError;
use crate::erp::models::{NoteEntry, RequestLine};

/// A request line prepared for export with all relevant fields.
///
/// This structure is designed for serialisation and includes only the fields
/// needed for the decision record. It is constructed from a [`RequestLine`]
/// via the [`From`] trait implementation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportedLine {
    /// Component identifier.
    pub component_id: u64,
    /// Component description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Internal part number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    /// Unit of measure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Quantity originally requested.
    pub initial_quantity: u32,
    /// Latest confirmed quantity.
    pub current_quantity: u32,
    /// Whether the confirmed quantity diverges from the original request.
    pub adjusted: bool,
    /// Remark recorded with the last quantity change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Notes attached to the line.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<NoteEntry>,
}

impl From<&RequestLine> for ExportedLine {
    fn from(line: &RequestLine) -> Self {
        Self {
            component_id: line.component_id,
            description: line.description.clone(),
            part_number: line.part_number.clone(),
            unit: line.unit.clone(),
            initial_quantity: line.initial_quantity,
            current_quantity: line.current_quantity,
            adjusted: line.current_quantity != line.initial_quantity,
            remark: line.remark.clone(),
            notes: line.notes.clone(),
        }
    }
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Human-readable Markdown.
    #[default]
    Markdown,
    /// Machine-readable JSON Lines (one object per line).
    Jsonl,
}

impl FromStr for ExportFormat {
    type Err = ApprovalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "jsonl" | "json-lines" | "jsonlines" => Ok(Self::Jsonl),
            _ => Err(ApprovalError::Configuration {
                message: format!(
                    "unsupported export format '{s}': valid options are 'markdown' or 'jsonl'"
                ),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Jsonl => write!(f, "jsonl"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn from_request_line_preserves_decision_fields() {
        let line = RequestLine {
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
                role: Some("requester".to_owned()),
                content: "urgent".to_owned(),
            }],
            ..Default::default()
        };

        let exported = ExportedLine::from(&line);

        assert_eq!(exported.component_id, 301);
        assert_eq!(exported.initial_quantity, 50);
        assert_eq!(exported.current_quantity, 30);
        assert!(exported.adjusted);
        assert_eq!(exported.remark.as_deref(), Some("reduced at head approval"));
        assert_eq!(exported.notes.len(), 1);
    }

    #[rstest]
    fn unadjusted_line_is_flagged_as_such() {
        let line = RequestLine {
            component_id: 1,
            initial_quantity: 5,
            current_quantity: 5,
            ..Default::default()
        };

        let exported = ExportedLine::from(&line);

        assert!(!exported.adjusted);
        assert!(exported.notes.is_empty());
    }

    #[rstest]
    #[case("markdown", ExportFormat::Markdown)]
    #[case("MD", ExportFormat::Markdown)]
    #[case("jsonl", ExportFormat::Jsonl)]
    #[case("json-lines", ExportFormat::Jsonl)]
    fn export_format_parses_valid_values(#[case] input: &str, #[case] expected: ExportFormat) {
        let parsed: ExportFormat = input.parse().expect("format should parse");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("xml")]
    #[case("csv")]
    #[case("")]
    fn export_format_rejects_invalid_values(#[case] input: &str) {
        let result: Result<ExportFormat, _> = input.parse();
        let err = result.expect_err("should reject invalid format");
        assert!(
            matches!(err, ApprovalError::Configuration { ref message } if message.contains("unsupported export format")),
            "expected Configuration error, got {err:?}"
        );
    }

    #[rstest]
    fn export_format_display() {
        assert_eq!(ExportFormat::Markdown.to_string(), "markdown");
        assert_eq!(ExportFormat::Jsonl.to_string(), "jsonl");
    }
}
