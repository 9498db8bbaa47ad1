//! Data models representing material requests and their line items.
//!
//! This module contains domain models for the request data returned by the
//! ERP API. Types prefixed with `Api` are internal deserialisation targets
//! that convert into public domain types. All quantity fields are clamped to
//! non-negative values at ingestion so the rest of the crate can work with
//! unsigned quantities.

use serde::{Deserialize, Serialize};

use super::locator::FormKind;

mod notes;
pub mod submission;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use notes::NoteEntry;
pub(super) use notes::{ApiNotePayload, normalise_notes};

/// Minimal request metadata shown in headers and summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetadata {
    /// Form number.
    pub number: u64,
    /// Form kind (issue or request).
    pub kind: FormKind,
    /// Short title or purpose text.
    pub title: Option<String>,
    /// Workflow status (e.g. `pending_head`, `approved`, `rejected`).
    pub status: Option<String>,
    /// Login of the requesting employee.
    pub requested_by: Option<String>,
    /// Requesting department.
    pub department: Option<String>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
    /// Last update timestamp (ISO 8601 format).
    pub updated_at: Option<String>,
    /// Whether the request carries the priority flag.
    pub priority: bool,
}

/// One recorded quantity change on a line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuantityChange {
    /// Timestamp of the edit (ISO 8601 format).
    pub changed_at: Option<String>,
    /// Name of the user who made the edit.
    pub user_name: Option<String>,
    /// Role the user acted in.
    pub role: Option<String>,
    /// Quantity before the edit.
    pub old_quantity: u32,
    /// Quantity after the edit.
    pub new_quantity: u32,
}

/// Vendor certificate preference on a procurement line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateChoice {
    /// A certificate of conformance is required.
    Yes,
    /// Explicitly not required.
    No,
    /// The purchaser has not decided yet.
    #[default]
    Unset,
}

/// Vendor sub-record attached to MRF lines before procurement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VendorDetails {
    /// Vendor company name.
    pub vendor_name: Option<String>,
    /// Link to the vendor's product page or quote.
    pub vendor_link: Option<String>,
    /// Approximate unit price quoted, in minor currency units.
    pub approx_price: Option<u64>,
    /// Expected delivery date (ISO 8601 format).
    pub expected_delivery: Option<String>,
    /// Whether a certificate of conformance is desired.
    pub certificate: CertificateChoice,
}

/// A warehouse receipt available for allocation on an issue line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrrOption {
    /// Material Receipt Record identifier.
    pub mrr_id: u64,
    /// Quantity still available against this receipt.
    pub available_quantity: u32,
    /// Origin of the receipt (e.g. purchase order, transfer).
    pub source: Option<String>,
}

/// Quantity allocated against a specific warehouse receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MrrAllocation {
    /// Material Receipt Record identifier.
    pub mrr_id: u64,
    /// Quantity drawn from this receipt.
    pub quantity: u32,
}

/// Reference to the linked line on the mirrored form.
///
/// An issue line can be mirrored by a procurement line (and vice versa) when
/// the requested quantity exceeds on-hand stock. Quantity edits propagate to
/// the mirror as a delta, never as an absolute overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedLine {
    /// Kind of the mirrored form.
    pub kind: FormKind,
    /// Component identifier on the mirrored form.
    pub component_id: u64,
    /// Last known requested quantity on the mirror.
    pub quantity: u32,
}

/// One component entry within a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    /// Component identifier (line reference used by the API).
    pub component_id: u64,
    /// Secondary line reference (basket or MRF row id), when present.
    pub line_id: Option<u64>,
    /// Component description.
    pub description: Option<String>,
    /// Manufacturer part number.
    pub mpn: Option<String>,
    /// Internal part number.
    pub part_number: Option<String>,
    /// Manufacturer / make.
    pub make: Option<String>,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Quantity currently on hand, when the warehouse reports one.
    pub on_hand_quantity: Option<u32>,
    /// Storage location.
    pub location: Option<String>,
    /// Quantity originally requested.
    pub initial_quantity: u32,
    /// Latest confirmed quantity (falls back to the initial request).
    pub current_quantity: u32,
    /// Remark recorded with the last quantity change.
    pub remark: Option<String>,
    /// Append-only history of quantity changes.
    pub change_history: Vec<QuantityChange>,
    /// Normalised notes attached to the line.
    pub notes: Vec<NoteEntry>,
    /// Vendor sub-record (procurement lines only).
    pub vendor: Option<VendorDetails>,
    /// Warehouse receipts available for allocation.
    pub mrr_options: Vec<MrrOption>,
    /// Allocations already recorded against receipts.
    pub mrr_allocations: Vec<MrrAllocation>,
    /// Mirrored line on the linked form, when one exists.
    pub linked_line: Option<LinkedLine>,
}

/// Combined request details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDetails {
    /// Request metadata.
    pub metadata: RequestMetadata,
    /// All line items on the request.
    pub lines: Vec<RequestLine>,
}

/// Lightweight request summary for listing views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSummary {
    /// Form number.
    pub number: u64,
    /// Form kind.
    pub kind: FormKind,
    /// Short title or purpose text.
    pub title: Option<String>,
    /// Workflow status.
    pub status: Option<String>,
    /// Login of the requesting employee.
    pub requested_by: Option<String>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
    /// Last update timestamp (ISO 8601 format).
    pub updated_at: Option<String>,
}

/// One page of pending requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequestPage {
    /// Summaries on this page.
    pub items: Vec<RequestSummary>,
    /// Page number reported by the backend (1-based).
    pub page: u32,
    /// Total number of pages, when the backend reports one.
    pub total_pages: Option<u32>,
}

/// Clamps a possibly-negative wire quantity to the unsigned domain.
fn clamp_quantity(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiFormKind(String);

impl ApiFormKind {
    fn into_kind(self) -> FormKind {
        // Unknown kinds fall back to MRF, which applies no client-side clamp.
        FormKind::parse(&self.0).unwrap_or(FormKind::Mrf)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRequestDetails {
    pub(super) number: u64,
    pub(super) kind: ApiFormKind,
    pub(super) title: Option<String>,
    pub(super) status: Option<String>,
    pub(super) requested_by: Option<String>,
    pub(super) department: Option<String>,
    pub(super) created_at: Option<String>,
    pub(super) updated_at: Option<String>,
    #[serde(default)]
    pub(super) priority: bool,
    #[serde(default)]
    pub(super) components: Vec<ApiRequestLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRequestLine {
    pub(super) component_id: u64,
    #[serde(alias = "basket_id", alias = "mrf_id")]
    pub(super) line_id: Option<u64>,
    pub(super) description: Option<String>,
    pub(super) mpn: Option<String>,
    pub(super) part_number: Option<String>,
    pub(super) make: Option<String>,
    #[serde(alias = "uom")]
    pub(super) unit: Option<String>,
    #[serde(alias = "on_hand_qty")]
    pub(super) on_hand_quantity: Option<i64>,
    pub(super) location: Option<String>,
    pub(super) initial_requested_qty: i64,
    pub(super) updated_requested_qty: Option<i64>,
    pub(super) remark: Option<String>,
    #[serde(default)]
    pub(super) quantity_change_history: Vec<ApiQuantityChange>,
    pub(super) note: Option<ApiNotePayload>,
    pub(super) vendor: Option<ApiVendorDetails>,
    #[serde(default)]
    pub(super) mrr_options: Vec<ApiMrrOption>,
    #[serde(default)]
    pub(super) mrr_allocations: Vec<ApiMrrAllocation>,
    pub(super) linked_component: Option<ApiLinkedLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiQuantityChange {
    #[serde(alias = "timestamp")]
    pub(super) changed_at: Option<String>,
    #[serde(alias = "userName", alias = "username")]
    pub(super) user_name: Option<String>,
    #[serde(alias = "userRole")]
    pub(super) role: Option<String>,
    #[serde(default, alias = "oldQuantity")]
    pub(super) old_quantity: i64,
    #[serde(default, alias = "newQuantity")]
    pub(super) new_quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiVendorDetails {
    pub(super) vendor_name: Option<String>,
    pub(super) vendor_link: Option<String>,
    pub(super) approx_price: Option<u64>,
    #[serde(alias = "expected_delivery_date")]
    pub(super) expected_delivery: Option<String>,
    #[serde(default, alias = "certificate_desired")]
    pub(super) certificate: CertificateChoice,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiMrrOption {
    pub(super) mrr_id: u64,
    #[serde(default, alias = "available_qty")]
    pub(super) available_quantity: i64,
    pub(super) source: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiMrrAllocation {
    pub(super) mrr_id: u64,
    #[serde(default, alias = "qty")]
    pub(super) quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiLinkedLine {
    pub(super) kind: ApiFormKind,
    pub(super) component_id: u64,
    #[serde(default, alias = "requested_qty")]
    pub(super) quantity: i64,
}

/// API response type for request listings.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPendingPage {
    #[serde(default)]
    pub(super) items: Vec<ApiRequestSummary>,
    #[serde(default = "default_page")]
    pub(super) page: u32,
    pub(super) total_pages: Option<u32>,
}

const fn default_page() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRequestSummary {
    pub(super) number: u64,
    pub(super) kind: ApiFormKind,
    pub(super) title: Option<String>,
    pub(super) status: Option<String>,
    pub(super) requested_by: Option<String>,
    pub(super) created_at: Option<String>,
    pub(super) updated_at: Option<String>,
}

impl From<ApiRequestDetails> for RequestDetails {
    fn from(value: ApiRequestDetails) -> Self {
        let kind = value.kind.into_kind();
        Self {
            metadata: RequestMetadata {
                number: value.number,
                kind,
                title: value.title,
                status: value.status,
                requested_by: value.requested_by,
                department: value.department,
                created_at: value.created_at,
                updated_at: value.updated_at,
                priority: value.priority,
            },
            lines: value
                .components
                .into_iter()
                .map(RequestLine::from)
                .collect(),
        }
    }
}

impl From<ApiRequestLine> for RequestLine {
    fn from(value: ApiRequestLine) -> Self {
        let initial_quantity = clamp_quantity(value.initial_requested_qty);
        let current_quantity = value
            .updated_requested_qty
            .map_or(initial_quantity, clamp_quantity);
        Self {
            component_id: value.component_id,
            line_id: value.line_id,
            description: value.description,
            mpn: value.mpn,
            part_number: value.part_number,
            make: value.make,
            unit: value.unit,
            on_hand_quantity: value.on_hand_quantity.map(clamp_quantity),
            location: value.location,
            initial_quantity,
            current_quantity,
            remark: value.remark,
            change_history: value
                .quantity_change_history
                .into_iter()
                .map(QuantityChange::from)
                .collect(),
            notes: normalise_notes(value.note),
            vendor: value.vendor.map(VendorDetails::from),
            mrr_options: value.mrr_options.into_iter().map(MrrOption::from).collect(),
            mrr_allocations: value
                .mrr_allocations
                .into_iter()
                .map(MrrAllocation::from)
                .collect(),
            linked_line: value.linked_component.map(LinkedLine::from),
        }
    }
}

impl From<ApiQuantityChange> for QuantityChange {
    fn from(value: ApiQuantityChange) -> Self {
        Self {
            changed_at: value.changed_at,
            user_name: value.user_name,
            role: value.role,
            old_quantity: clamp_quantity(value.old_quantity),
            new_quantity: clamp_quantity(value.new_quantity),
        }
    }
}

impl From<ApiVendorDetails> for VendorDetails {
    fn from(value: ApiVendorDetails) -> Self {
        Self {
            vendor_name: value.vendor_name,
            vendor_link: value.vendor_link,
            approx_price: value.approx_price,
            expected_delivery: value.expected_delivery,
            certificate: value.certificate,
        }
    }
}

impl From<ApiMrrOption> for MrrOption {
    fn from(value: ApiMrrOption) -> Self {
        Self {
            mrr_id: value.mrr_id,
            available_quantity: clamp_quantity(value.available_quantity),
            source: value.source,
        }
    }
}

impl From<ApiMrrAllocation> for MrrAllocation {
    fn from(value: ApiMrrAllocation) -> Self {
        Self {
            mrr_id: value.mrr_id,
            quantity: clamp_quantity(value.quantity),
        }
    }
}

impl From<ApiLinkedLine> for LinkedLine {
    fn from(value: ApiLinkedLine) -> Self {
        Self {
            kind: value.kind.into_kind(),
            component_id: value.component_id,
            quantity: clamp_quantity(value.quantity),
        }
    }
}

impl From<ApiPendingPage> for PendingRequestPage {
    fn from(value: ApiPendingPage) -> Self {
        Self {
            items: value
                .items
                .into_iter()
                .map(RequestSummary::from)
                .collect(),
            page: value.page,
            total_pages: value.total_pages,
        }
    }
}

impl From<ApiRequestSummary> for RequestSummary {
    fn from(value: ApiRequestSummary) -> Self {
        Self {
            number: value.number,
            kind: value.kind.into_kind(),
            title: value.title,
            status: value.status,
            requested_by: value.requested_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::{ApiRequestDetails, ApiRequestLine, RequestDetails, RequestLine};
    use crate::erp::locator::FormKind;

    #[fixture]
    fn sample_api_line() -> ApiRequestLine {
        let value = json!({
            "component_id": 301,
            "basket_id": 77,
            "description": "Ceramic capacitor 10uF",
            "mpn": "GRM188R61A106ME69D",
            "part_number": "CAP-0603-10U",
            "make": "Murata",
            "uom": "pcs",
            "on_hand_qty": 140,
            "location": "R2-B4",
            "initial_requested_qty": 50,
            "updated_requested_qty": 30,
            "remark": "reduced at head approval",
            "quantity_change_history": [{
                "timestamp": "2026-02-12T08:30:00Z",
                "userName": "s.rao",
                "role": "head",
                "oldQuantity": 50,
                "newQuantity": 30
            }],
            "note": "please expedite",
            "mrr_options": [{ "mrr_id": 9001, "available_qty": 100, "source": "PO-1188" }],
            "mrr_allocations": [{ "mrr_id": 9001, "qty": 20 }],
            "linked_component": { "kind": "mrf", "component_id": 640, "requested_qty": 20 }
        });
        serde_json::from_value(value).expect("ApiRequestLine should deserialise")
    }

    #[rstest]
    fn api_line_converts_core_fields(sample_api_line: ApiRequestLine) {
        let line = RequestLine::from(sample_api_line);

        assert_eq!(line.component_id, 301);
        assert_eq!(line.line_id, Some(77));
        assert_eq!(line.initial_quantity, 50);
        assert_eq!(line.current_quantity, 30);
        assert_eq!(line.on_hand_quantity, Some(140));
        assert_eq!(line.remark.as_deref(), Some("reduced at head approval"));
    }

    #[rstest]
    fn api_line_converts_history_with_camel_case_keys(sample_api_line: ApiRequestLine) {
        let line = RequestLine::from(sample_api_line);

        let entry = line.change_history.first().expect("history entry expected");
        assert_eq!(entry.user_name.as_deref(), Some("s.rao"));
        assert_eq!(entry.role.as_deref(), Some("head"));
        assert_eq!(entry.old_quantity, 50);
        assert_eq!(entry.new_quantity, 30);
    }

    #[rstest]
    fn api_line_converts_allocations_and_mirror(sample_api_line: ApiRequestLine) {
        let line = RequestLine::from(sample_api_line);

        let option = line.mrr_options.first().expect("MRR option expected");
        assert_eq!(option.available_quantity, 100);
        assert_eq!(option.source.as_deref(), Some("PO-1188"));

        let allocation = line.mrr_allocations.first().expect("allocation expected");
        assert_eq!(allocation.quantity, 20);

        let mirror = line.linked_line.expect("mirror expected");
        assert_eq!(mirror.kind, FormKind::Mrf);
        assert_eq!(mirror.component_id, 640);
        assert_eq!(mirror.quantity, 20);
    }

    #[test]
    fn current_quantity_falls_back_to_initial_request() {
        let value = json!({
            "component_id": 1,
            "initial_requested_qty": 12,
            "updated_requested_qty": null
        });
        let api: ApiRequestLine = serde_json::from_value(value).expect("should deserialise");
        let line = RequestLine::from(api);

        assert_eq!(line.current_quantity, 12);
        assert!(line.notes.is_empty());
        assert!(line.mrr_options.is_empty());
    }

    #[test]
    fn negative_wire_quantities_are_clamped_to_zero() {
        let value = json!({
            "component_id": 1,
            "initial_requested_qty": -4,
            "updated_requested_qty": -1,
            "on_hand_qty": -10
        });
        let api: ApiRequestLine = serde_json::from_value(value).expect("should deserialise");
        let line = RequestLine::from(api);

        assert_eq!(line.initial_quantity, 0);
        assert_eq!(line.current_quantity, 0);
        assert_eq!(line.on_hand_quantity, Some(0));
    }

    #[test]
    fn api_request_details_converts_metadata_and_lines() {
        let value = json!({
            "number": 42,
            "kind": "mif",
            "title": "Bench rework batch",
            "status": "pending_head",
            "requested_by": "a.khan",
            "department": "assembly",
            "priority": true,
            "components": [{
                "component_id": 1,
                "initial_requested_qty": 5
            }]
        });
        let api: ApiRequestDetails = serde_json::from_value(value).expect("should deserialise");
        let details = RequestDetails::from(api);

        assert_eq!(details.metadata.number, 42);
        assert_eq!(details.metadata.kind, FormKind::Mif);
        assert!(details.metadata.priority);
        assert_eq!(details.lines.len(), 1);
    }

    #[test]
    fn unknown_form_kind_defaults_to_mrf() {
        let value = json!({
            "number": 1,
            "kind": "grn",
            "components": []
        });
        let api: ApiRequestDetails = serde_json::from_value(value).expect("should deserialise");
        let details = RequestDetails::from(api);

        assert_eq!(details.metadata.kind, FormKind::Mrf);
    }
}
