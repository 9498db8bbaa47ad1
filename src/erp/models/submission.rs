//! Request bodies and responses for the approval endpoints.
//!
//! These are the only wire shapes the client owns: the editor projects its
//! state into [`ApprovalSubmission`] / [`RejectionSubmission`], and the
//! gateways post them verbatim. Responses are all-or-nothing; there is no
//! partial-success reconciliation.

use serde::{Deserialize, Serialize};

use super::{MrrAllocation, VendorDetails};

/// One line item carried in an approval submission.
///
/// Only submission-relevant fields are projected; optional fields are left
/// off the wire entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatedItem {
    /// Component identifier.
    pub component_id: u64,
    /// Quantity being approved or issued.
    pub updated_requested_qty: u32,
    /// Remark justifying a quantity change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Vendor sub-record for procurement lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<VendorDetails>,
    /// Warehouse receipt allocations for issue lines.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mrr_allocations: Vec<MrrAllocation>,
}

/// A draft note submitted alongside an approval or rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedNote {
    /// Component the note is attached to.
    pub component_id: u64,
    /// Timestamp the note was composed (ISO 8601 format).
    pub noted_at: Option<String>,
    /// Name of the author.
    pub author: Option<String>,
    /// Role the author acted in.
    pub role: Option<String>,
    /// Note text.
    pub content: String,
}

/// Body of the approve endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalSubmission {
    /// Line items being approved.
    pub updated_items: Vec<UpdatedItem>,
    /// Draft notes composed during review.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<SubmittedNote>,
    /// Whether the request should carry the priority flag.
    pub priority: bool,
}

/// Body of the reject endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionSubmission {
    /// Draft notes explaining the rejection; at least one is required.
    pub notes: Vec<SubmittedNote>,
}

/// Backend acknowledgement for approve and reject calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApprovalOutcome {
    /// Human-readable backend message.
    pub message: Option<String>,
    /// Components the backend reports as updated.
    #[serde(default)]
    pub updated_components: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ApprovalSubmission, RejectionSubmission, SubmittedNote, UpdatedItem};
    use crate::erp::models::MrrAllocation;

    #[test]
    fn updated_item_omits_absent_optional_fields() {
        let item = UpdatedItem {
            component_id: 5,
            updated_requested_qty: 3,
            remark: None,
            vendor: None,
            mrr_allocations: Vec::new(),
        };

        let value = serde_json::to_value(&item).expect("item should serialise");
        assert_eq!(
            value,
            json!({ "component_id": 5, "updated_requested_qty": 3 })
        );
    }

    #[test]
    fn approval_submission_serialises_full_shape() {
        let submission = ApprovalSubmission {
            updated_items: vec![UpdatedItem {
                component_id: 5,
                updated_requested_qty: 3,
                remark: Some("short supply".to_owned()),
                vendor: None,
                mrr_allocations: vec![MrrAllocation {
                    mrr_id: 11,
                    quantity: 3,
                }],
            }],
            notes: vec![SubmittedNote {
                component_id: 5,
                noted_at: None,
                author: Some("s.rao".to_owned()),
                role: Some("head".to_owned()),
                content: "approved with cut".to_owned(),
            }],
            priority: true,
        };

        let value = serde_json::to_value(&submission).expect("submission should serialise");
        assert_eq!(value["priority"], json!(true));
        assert_eq!(value["updated_items"][0]["remark"], json!("short supply"));
        assert_eq!(
            value["updated_items"][0]["mrr_allocations"][0]["mrr_id"],
            json!(11)
        );
        assert_eq!(value["notes"][0]["content"], json!("approved with cut"));
    }

    #[test]
    fn rejection_submission_always_carries_notes_field() {
        let submission = RejectionSubmission { notes: Vec::new() };

        let value = serde_json::to_value(&submission).expect("submission should serialise");
        assert_eq!(value, json!({ "notes": [] }));
    }
}
