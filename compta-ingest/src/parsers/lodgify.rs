//! Lodgify reservation export -> [`BookingRecord`].
//!
//! Lodgify exports in English or French depending on account locale, so each
//! field is looked up through a list of column aliases:
//!   SourceText,Name,HouseName,DateArrival,DateDeparture,Source,TotalAmount
//!   Code,Client,Appartement,Arrivée,Départ,Canal,Total

use tracing::debug;

use crate::error::Result;
use crate::normalize::{DateOrder, extract_reservation_code, parse_amount};
use crate::rows::{RawRow, read_rows};
use crate::types::{BookingRecord, RecordDate};

const CODE_TEXT: &[&str] = &["SourceText", "Code", "Source Text"];
const GUEST: &[&str] = &["Name", "Client", "Guest"];
const UNIT: &[&str] = &["HouseName", "Appartement", "Property"];
const ARRIVAL: &[&str] = &["DateArrival", "Arrivée", "Arrival"];
const DEPARTURE: &[&str] = &["DateDeparture", "Départ", "Departure"];
const CHANNEL: &[&str] = &["Source", "Canal", "Channel"];
const AMOUNT: &[&str] = &["TotalAmount", "Total", "Amount"];

/// Map one Lodgify row. Missing cells become empty strings or zero.
pub fn booking_from_row(row: &RawRow, dates: DateOrder) -> BookingRecord {
    let source_text = row.first_of(CODE_TEXT).to_string();
    let code = extract_reservation_code(&source_text).unwrap_or_default();
    if code.is_empty() {
        debug!(guest = row.first_of(GUEST), source_text = %source_text, "booking without reservation code");
    }

    BookingRecord {
        code,
        guest: row.first_of(GUEST).to_string(),
        unit: row.first_of(UNIT).to_string(),
        arrival: RecordDate::with_order(row.first_of(ARRIVAL), dates),
        departure: RecordDate::with_order(row.first_of(DEPARTURE), dates),
        channel: row.first_of(CHANNEL).to_string(),
        amount: parse_amount(row.first_of(AMOUNT)),
        source_text,
    }
}

/// Parse a whole Lodgify export.
///
/// Arrival and departure share one date order, detected over both columns
/// and day-first when the file gives no evidence.
pub fn parse_lodgify_csv(text: &str) -> Result<Vec<BookingRecord>> {
    let rows = read_rows(text)?;
    let dates = DateOrder::detect(
        rows.iter().flat_map(|r| [r.first_of(ARRIVAL), r.first_of(DEPARTURE)]),
        DateOrder::DayFirst,
    );
    debug!(?dates, rows = rows.len(), "lodgify export");
    Ok(rows.iter().map(|r| booking_from_row(r, dates)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parses_english_export() {
        let text = r#"Id,SourceText,Name,HouseName,DateArrival,DateDeparture,Source,TotalAmount
1,"Airbnb HMABC12345",Marie Dupont,Gutenberg,2024-03-01,2024-03-04,Airbnb,"312,50"
2,,Jean Martin,Kléber,2024-03-02,2024-03-03,Manuel,90
"#;

        let bookings = parse_lodgify_csv(text).unwrap();
        assert_eq!(bookings.len(), 2);

        let first = &bookings[0];
        assert_eq!(first.code, "HMABC12345");
        assert_eq!(first.guest, "Marie Dupont");
        assert_eq!(first.unit, "Gutenberg");
        assert_eq!(first.arrival.parsed, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(first.channel, "Airbnb");
        assert_eq!(first.amount, 312.5);
        assert_eq!(first.source_text, "Airbnb HMABC12345");

        assert_eq!(bookings[1].code, "");
        assert_eq!(bookings[1].amount, 90.0);
    }

    #[test]
    fn test_parses_french_export() {
        let text = "Code;Client;Appartement;Arrivée;Départ;Canal;Total\n\
                    bk00112233;Anna;Petite France;01/04/2024;05/04/2024;Booking.com;400,00\n";
        let bookings = parse_lodgify_csv(text).unwrap();
        assert_eq!(bookings[0].code, "BK00112233");
        assert_eq!(bookings[0].unit, "Petite France");
        assert_eq!(bookings[0].departure.raw, "05/04/2024");
        assert_eq!(bookings[0].channel, "Booking.com");
        assert_eq!(bookings[0].amount, 400.0);
        assert_eq!(bookings[0].arrival.parsed, NaiveDate::from_ymd_opt(2024, 4, 1));
    }

    #[test]
    fn test_us_dates_read_month_first_for_the_whole_file() {
        let text = "SourceText,Name,HouseName,DateArrival,DateDeparture,Source,TotalAmount\n\
                    HMABC12345,A,Gutenberg,01/05/2024,01/08/2024,Airbnb,100\n\
                    HMABD12345,B,Gutenberg,01/20/2024,01/22/2024,Airbnb,100\n";
        let bookings = parse_lodgify_csv(text).unwrap();
        assert_eq!(bookings[0].arrival.parsed, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(bookings[0].departure.parsed, NaiveDate::from_ymd_opt(2024, 1, 8));
        assert_eq!(bookings[1].arrival.parsed, NaiveDate::from_ymd_opt(2024, 1, 20));
        assert!(bookings[0].arrival.sort_key() < bookings[1].arrival.sort_key());
    }

    #[test]
    fn test_missing_columns_degrade_to_defaults() {
        let row = RawRow::from_pairs([("Name", "Solo")]);
        let b = booking_from_row(&row, DateOrder::DayFirst);
        assert_eq!(b.guest, "Solo");
        assert_eq!(b.code, "");
        assert_eq!(b.unit, "");
        assert_eq!(b.amount, 0.0);
        assert_eq!(b.arrival.parsed, None);
    }
}
