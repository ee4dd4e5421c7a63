use compta_ingest::{PayoutRecord, RecordDate};
use serde::Serialize;

use crate::channel::PaymentStatus;

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Deduplicated payout lines sharing one reservation code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutGroup {
    pub code: String,
    pub total: f64,
    pub count: usize,
    /// `"60.00€ (2024-01-01) + 40.00€ (2024-01-02)"`, empty for a single payment.
    pub detail: String,
    /// Kept lines, oldest first. Never empty.
    pub members: Vec<PayoutRecord>,
}

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Matched,
    BookingOnly,
    PayoutOnly,
    NoDetail,
}

/// One line of the merged ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRow {
    pub unit: String,
    pub arrival: RecordDate,
    pub departure: RecordDate,
    pub guest: String,
    pub code: String,
    /// Payout total when paid, otherwise the booking amount.
    pub amount: f64,
    /// Amount on the Lodgify booking, 0 when there is none.
    pub original_amount: f64,
    pub payment_count: usize,
    pub payment_detail: String,
    pub channel: String,
    pub status: PaymentStatus,
    pub alerts: Vec<String>,
    pub kind: RowKind,
}

impl ReconciledRow {
    pub fn has_alert(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Alerts as a single display string.
    pub fn alert_text(&self) -> String {
        self.alerts.join(" | ")
    }
}

pub const PAYOUT_WITHOUT_BOOKING: &str = "VERSEMENT SANS RÉSERVATION LODGIFY";

pub fn duplicate_code_alert(bookings: usize) -> String {
    format!("DOUBLON ({bookings} réservations Lodgify avec ce code)")
}

pub fn multi_payment_alert(payments: usize) -> String {
    format!("MULTI_VERSEMENT ({payments} paiements)")
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub matched: usize,
    pub booking_only: usize,
    pub payout_only: usize,
    pub no_detail: usize,
    /// Rows carrying at least one alert.
    pub alerts: usize,
}

impl Summary {
    pub fn from_rows(rows: &[ReconciledRow]) -> Self {
        let mut s = Summary {
            total: rows.len(),
            ..Default::default()
        };
        for row in rows {
            match row.kind {
                RowKind::Matched => s.matched += 1,
                RowKind::BookingOnly => s.booking_only += 1,
                RowKind::PayoutOnly => s.payout_only += 1,
                RowKind::NoDetail => s.no_detail += 1,
            }
            if row.has_alert() {
                s.alerts += 1;
            }
        }
        s
    }
}

/// Result of one reconciliation run. Rebuilt from scratch on every run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub rows: Vec<ReconciledRow>,
    pub summary: Summary,
}
