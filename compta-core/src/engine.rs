use std::collections::{HashMap, HashSet};

use compta_ingest::{BookingRecord, NO_DETAIL, PayoutRecord, RecordDate};
use tracing::info;

use crate::aggregate::aggregate_payouts;
use crate::channel::{Channel, PaymentStatus};
use crate::error::{ReconcileError, Result};
use crate::model::{
    PAYOUT_WITHOUT_BOOKING, PayoutGroup, Reconciliation, ReconciledRow, RowKind, Summary,
    duplicate_code_alert, multi_payment_alert,
};
use crate::sort::sort_rows;

const PAYOUT_CHANNEL: &str = "Airbnb";

/// Reconcile Lodgify bookings against Airbnb payouts.
///
/// Every booking yields one row (matched or booking-only), every payout group
/// no booking claimed yields one payout-only row, and every undetailed payout
/// line yields its own no-detail row. Fails only when both inputs are empty.
pub fn reconcile(bookings: &[BookingRecord], payouts: &[PayoutRecord]) -> Result<Reconciliation> {
    if bookings.is_empty() && payouts.is_empty() {
        return Err(ReconcileError::NoInput);
    }

    let index = aggregate_payouts(payouts);

    let mut code_counts: HashMap<&str, usize> = HashMap::new();
    for booking in bookings.iter().filter(|b| !b.code.is_empty()) {
        *code_counts.entry(booking.code.as_str()).or_insert(0) += 1;
    }

    let mut consumed: HashSet<&str> = HashSet::new();
    let mut rows = Vec::with_capacity(bookings.len() + index.groups.len() + index.no_detail.len());

    for booking in bookings {
        let group = if booking.code.is_empty() {
            None
        } else {
            index.groups.get(&booking.code)
        };

        match group {
            Some(group) => {
                consumed.insert(group.code.as_str());
                let sharing = code_counts.get(booking.code.as_str()).copied().unwrap_or(1);
                rows.push(matched_row(booking, group, sharing));
            }
            None => rows.push(booking_only_row(booking)),
        }
    }

    for (code, group) in &index.groups {
        if !consumed.contains(code.as_str()) {
            rows.push(payout_only_row(group));
        }
    }

    rows.extend(index.no_detail.iter().map(no_detail_row));

    let rows = sort_rows(rows);
    let summary = Summary::from_rows(&rows);
    info!(
        total = summary.total,
        matched = summary.matched,
        booking_only = summary.booking_only,
        payout_only = summary.payout_only,
        no_detail = summary.no_detail,
        alerts = summary.alerts,
        "reconciliation complete"
    );

    Ok(Reconciliation { rows, summary })
}

fn matched_row(booking: &BookingRecord, group: &PayoutGroup, sharing: usize) -> ReconciledRow {
    let mut alerts = Vec::new();
    if sharing > 1 {
        alerts.push(duplicate_code_alert(sharing));
    }
    if group.count > 1 {
        alerts.push(multi_payment_alert(group.count));
    }

    ReconciledRow {
        unit: booking.unit.clone(),
        arrival: booking.arrival.clone(),
        departure: booking.departure.clone(),
        guest: booking.guest.clone(),
        code: booking.code.clone(),
        amount: group.total,
        original_amount: booking.amount,
        payment_count: group.count,
        payment_detail: group.detail.clone(),
        channel: booking.channel.clone(),
        status: PaymentStatus::Paid,
        alerts,
        kind: RowKind::Matched,
    }
}

fn booking_only_row(booking: &BookingRecord) -> ReconciledRow {
    ReconciledRow {
        unit: booking.unit.clone(),
        arrival: booking.arrival.clone(),
        departure: booking.departure.clone(),
        guest: booking.guest.clone(),
        code: booking.code.clone(),
        amount: booking.amount,
        original_amount: booking.amount,
        payment_count: 0,
        payment_detail: String::new(),
        channel: booking.channel.clone(),
        status: Channel::from_label(&booking.channel).unmatched_status(),
        alerts: Vec::new(),
        kind: RowKind::BookingOnly,
    }
}

fn payout_only_row(group: &PayoutGroup) -> ReconciledRow {
    let (guest, unit, date) = match group.members.first() {
        Some(first) => (first.guest.clone(), first.unit.clone(), first.date.clone()),
        None => (String::new(), String::new(), RecordDate::default()),
    };

    let mut alerts = vec![PAYOUT_WITHOUT_BOOKING.to_string()];
    if group.count > 1 {
        alerts.push(multi_payment_alert(group.count));
    }

    ReconciledRow {
        unit,
        arrival: date,
        departure: RecordDate::default(),
        guest,
        code: group.code.clone(),
        amount: group.total,
        original_amount: 0.0,
        payment_count: group.count,
        payment_detail: group.detail.clone(),
        channel: PAYOUT_CHANNEL.to_string(),
        status: PaymentStatus::MissingFromBookings,
        alerts,
        kind: RowKind::PayoutOnly,
    }
}

fn no_detail_row(payout: &PayoutRecord) -> ReconciledRow {
    ReconciledRow {
        unit: payout.unit.clone(),
        arrival: payout.date.clone(),
        departure: RecordDate::default(),
        guest: payout.guest.clone(),
        code: NO_DETAIL.to_string(),
        amount: payout.amount,
        original_amount: 0.0,
        payment_count: 1,
        payment_detail: String::new(),
        channel: PAYOUT_CHANNEL.to_string(),
        status: PaymentStatus::NoDetail,
        alerts: Vec::new(),
        kind: RowKind::NoDetail,
    }
}
