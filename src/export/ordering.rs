//! Stable ordering for exported line items.

use std::cmp::Ordering;

use super::model::ExportedLine;

/// Sorts line items into stable export order.
///
/// Lines sort by part number (alphabetical, missing last), then by component
/// id (ascending), so repeated exports of the same request are comparable.
pub fn sort_lines(lines: &mut [ExportedLine]) {
    lines.sort_by(|a, b| {
        compare_part_numbers(a.part_number.as_deref(), b.part_number.as_deref())
            .then_with(|| a.component_id.cmp(&b.component_id))
    });
}

fn compare_part_numbers(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::sort_lines;
    use crate::erp::models::RequestLine;
    use crate::export::model::ExportedLine;

    fn line(component_id: u64, part_number: Option<&str>) -> ExportedLine {
        ExportedLine::from(&RequestLine {
            component_id,
            part_number: part_number.map(ToOwned::to_owned),
            ..Default::default()
        })
    }

    #[test]
    fn sorts_by_part_number_then_component_id() {
        let mut lines = vec![
            line(3, Some("RES-0402-10K")),
            line(2, Some("CAP-0603-10U")),
            line(1, Some("CAP-0603-10U")),
        ];

        sort_lines(&mut lines);

        let order: Vec<u64> = lines.iter().map(|l| l.component_id).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn missing_part_numbers_sort_last() {
        let mut lines = vec![line(1, None), line(2, Some("CAP-0603-10U"))];

        sort_lines(&mut lines);

        let order: Vec<u64> = lines.iter().map(|l| l.component_id).collect();
        assert_eq!(order, vec![2, 1]);
    }
}
