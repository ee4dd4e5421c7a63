//! Airbnb payout export -> [`PayoutRecord`].
//!
//! A single reservation may appear on several lines (split payouts, or the same
//! payout repeated in overlapping exports). Lines without a confirmation code
//! are kept and carry an empty code or [`crate::NO_DETAIL`].

use tracing::debug;

use crate::error::Result;
use crate::normalize::{DateOrder, canonical_payout_code, parse_amount};
use crate::rows::{RawRow, read_rows};
use crate::types::{PayoutRecord, RecordDate};

const CODE: &[&str] = &["Confirmation code", "Code de confirmation"];
const GUEST: &[&str] = &["Guest name", "Nom du voyageur", "Voyageur"];
const UNIT: &[&str] = &["Listing", "Annonce", "Logement"];
const DATE: &[&str] = &["Date", "Start date", "Date de début"];
const AMOUNT: &[&str] = &["Paid out", "Versé", "Earnings", "Revenus", "Amount", "Montant"];

/// Map one payout line. Missing cells become empty strings or zero.
pub fn payout_from_row(row: &RawRow, dates: DateOrder) -> PayoutRecord {
    let raw_code = row.first_of(CODE);
    let code = canonical_payout_code(raw_code);
    if code.is_empty() && !raw_code.is_empty() {
        debug!(raw_code, "payout code not usable, treated as undetailed");
    }

    PayoutRecord {
        code,
        guest: row.first_of(GUEST).to_string(),
        unit: row.first_of(UNIT).to_string(),
        amount: parse_amount(row.first_of(AMOUNT)),
        date: RecordDate::with_order(row.first_of(DATE), dates),
    }
}

/// Parse a whole Airbnb payout export.
///
/// The date order is detected over the whole date column. Without evidence,
/// English exports are month-first and French ones day-first.
pub fn parse_airbnb_csv(text: &str) -> Result<Vec<PayoutRecord>> {
    let rows = read_rows(text)?;
    let english = rows.first().is_some_and(|r| r.has_column(CODE[0]));
    let fallback = if english {
        DateOrder::MonthFirst
    } else {
        DateOrder::DayFirst
    };
    let dates = DateOrder::detect(rows.iter().map(|r| r.first_of(DATE)), fallback);
    debug!(?dates, rows = rows.len(), "airbnb export");
    Ok(rows.iter().map(|r| payout_from_row(r, dates)).collect())
}
