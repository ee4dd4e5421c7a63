use crate::model::{ReconciledRow, RowKind};

/// Order rows for display and export.
///
/// Detailed rows (matched, booking-only, payout-only) sort by unit name, then
/// arrival date with unparseable dates first. The sort is stable, so ties keep
/// their incoming order. No-detail rows follow in their original order.
pub fn sort_rows(rows: Vec<ReconciledRow>) -> Vec<ReconciledRow> {
    let (mut detailed, no_detail): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|r| r.kind != RowKind::NoDetail);

    detailed.sort_by(|a, b| {
        a.unit
            .cmp(&b.unit)
            .then_with(|| a.arrival.sort_key().cmp(&b.arrival.sort_key()))
    });

    detailed.extend(no_detail);
    detailed
}
