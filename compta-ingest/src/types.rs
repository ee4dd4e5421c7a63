use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::{DateOrder, parse_date_as};

/// A date cell as found in an export: the original text plus its parsed value.
///
/// Display and export always use `raw`; ordering uses `parsed`, where an
/// unparseable date (`None`) sorts before every real date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDate {
    pub raw: String,
    pub parsed: Option<NaiveDate>,
}

impl RecordDate {
    /// Day-first reading of `nn/nn/yyyy`.
    pub fn new(raw: &str) -> Self {
        Self::with_order(raw, DateOrder::DayFirst)
    }

    pub fn with_order(raw: &str, order: DateOrder) -> Self {
        let raw = raw.trim();
        Self {
            raw: raw.to_string(),
            parsed: parse_date_as(raw, order),
        }
    }

    /// Ordering key: `None` (unparseable or missing) is earliest.
    pub fn sort_key(&self) -> Option<NaiveDate> {
        self.parsed
    }

    /// Identity used when collapsing duplicate payout lines.
    pub fn dedup_key(&self) -> String {
        match self.parsed {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => self.raw.clone(),
        }
    }
}

/// One reservation exported from Lodgify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Extracted reservation code, empty when none could be found.
    pub code: String,
    pub guest: String,
    pub unit: String,
    pub arrival: RecordDate,
    pub departure: RecordDate,
    /// Free-text channel label ("Airbnb", "Booking.com", "Manuel", "Site web", ...)
    pub channel: String,
    pub amount: f64,
    /// Text the code was extracted from, kept for diagnostics.
    pub source_text: String,
}

/// One line of an Airbnb payout export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutRecord {
    /// Reservation code, [`crate::NO_DETAIL`], or empty.
    pub code: String,
    pub guest: String,
    pub unit: String,
    pub amount: f64,
    pub date: RecordDate,
}

impl PayoutRecord {
    /// True when this line cannot be tied to a reservation.
    pub fn is_undetailed(&self) -> bool {
        self.code.is_empty() || self.code == crate::NO_DETAIL
    }

    /// Amount in cents, the precision used to compare payout lines.
    pub fn amount_cents(&self) -> i64 {
        (self.amount * 100.0).round() as i64
    }
}
