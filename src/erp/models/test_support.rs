//! Test helpers for constructing request-line fixtures.
//!
//! This module provides builder functions for creating [`RequestLine`]
//! instances in tests, reducing boilerplate and ensuring consistency across
//! test modules.
//!
//! # Examples
//!
//! ```
//! use stockwell::erp::models::test_support::{minimal_line, line_with_mirror};
//!
//! let line = minimal_line(1, 5);
//! assert_eq!(line.current_quantity, 5);
//!
//! let mirrored = line_with_mirror(2, 8, 640, 10);
//! assert_eq!(mirrored.linked_line.as_ref().map(|m| m.quantity), Some(10));
//! ```

use super::{LinkedLine, MrrOption, RequestLine};
use crate::erp::locator::FormKind;

/// Constructs a minimal request line with only identity and quantity set.
///
/// `initial_quantity` and `current_quantity` both take `quantity`; all other
/// fields are set to their default values.
#[must_use]
pub fn minimal_line(component_id: u64, quantity: u32) -> RequestLine {
    RequestLine {
        component_id,
        description: Some(format!("Component {component_id}")),
        initial_quantity: quantity,
        current_quantity: quantity,
        ..Default::default()
    }
}

/// Constructs a line mirrored by a procurement line on the linked form.
#[must_use]
pub fn line_with_mirror(
    component_id: u64,
    quantity: u32,
    mirror_component_id: u64,
    mirror_quantity: u32,
) -> RequestLine {
    RequestLine {
        linked_line: Some(LinkedLine {
            kind: FormKind::Mrf,
            component_id: mirror_component_id,
            quantity: mirror_quantity,
        }),
        ..minimal_line(component_id, quantity)
    }
}

/// Constructs an issue line with a single warehouse receipt available.
#[must_use]
pub fn line_with_mrr_option(
    component_id: u64,
    quantity: u32,
    mrr_id: u64,
    available_quantity: u32,
) -> RequestLine {
    RequestLine {
        mrr_options: vec![MrrOption {
            mrr_id,
            available_quantity,
            source: Some(format!("PO-{mrr_id}")),
        }],
        ..minimal_line(component_id, quantity)
    }
}

/// Creates a vector of minimal lines with sequential component ids from 1.
#[must_use]
pub fn create_lines(count: usize, quantity: u32) -> Vec<RequestLine> {
    (1..=count)
        .map(|i| minimal_line(i as u64, quantity))
        .collect()
}
