//! Ledger CSV export.
//!
//! Spreadsheet-friendly output: UTF-8 BOM, `;` separator, decimal comma.

use chrono::NaiveDate;
use csv::WriterBuilder;
use std::io::Write;

use crate::error::Result;
use crate::model::ReconciledRow;

pub const LEDGER_HEADER: [&str; 11] = [
    "Property",
    "Arrival",
    "Departure",
    "Guest",
    "ReservationCode",
    "Amount",
    "PaymentCount",
    "PaymentDetail",
    "Channel",
    "Status",
    "Alert",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub delimiter: u8,
    pub bom: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            bom: true,
        }
    }
}

/// `citycosy_fusion_2024-06-30.csv`
pub fn default_export_file_name(today: NaiveDate) -> String {
    format!("citycosy_fusion_{}.csv", today.format("%Y-%m-%d"))
}

/// Two decimals with a decimal comma: `1234.5` -> `"1234,50"`.
pub fn decimal_comma(value: f64) -> String {
    format!("{value:.2}").replace('.', ",")
}

/// Write the merged ledger, header first, rows in the given order.
pub fn write_ledger_csv<W: Write>(
    mut writer: W,
    rows: &[ReconciledRow],
    options: &ExportOptions,
) -> Result<()> {
    if options.bom {
        writer.write_all("\u{feff}".as_bytes())?;
    }

    let mut wtr = WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    wtr.write_record(LEDGER_HEADER)?;
    for row in rows {
        let amount = decimal_comma(row.amount);
        let count = row.payment_count.to_string();
        let alert = row.alert_text();
        wtr.write_record([
            row.unit.as_str(),
            row.arrival.raw.as_str(),
            row.departure.raw.as_str(),
            row.guest.as_str(),
            row.code.as_str(),
            amount.as_str(),
            count.as_str(),
            row.payment_detail.as_str(),
            row.channel.as_str(),
            row.status.label(),
            alert.as_str(),
        ])?;
    }
    wtr.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::PaymentStatus;
    use crate::model::RowKind;
    use compta_ingest::RecordDate;

    fn sample_row() -> ReconciledRow {
        ReconciledRow {
            unit: "Gutenberg".into(),
            arrival: RecordDate::new("2024-01-01"),
            departure: RecordDate::new("2024-01-03"),
            guest: "Dupont; Marie".into(),
            code: "ABC1234567".into(),
            amount: 1234.5,
            original_amount: 1200.0,
            payment_count: 2,
            payment_detail: "600.00€ (2024-01-01) + 634.50€ (2024-01-02)".into(),
            channel: "Airbnb".into(),
            status: PaymentStatus::Paid,
            alerts: vec!["MULTI_VERSEMENT (2 paiements)".into()],
            kind: RowKind::Matched,
        }
    }

    #[test]
    fn test_writes_bom_header_and_row() {
        let mut out = Vec::new();
        write_ledger_csv(&mut out, &[sample_row()], &ExportOptions::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with('\u{feff}'));
        let mut lines = text.trim_start_matches('\u{feff}').lines();
        assert_eq!(
            lines.next().unwrap(),
            "Property;Arrival;Departure;Guest;ReservationCode;Amount;PaymentCount;PaymentDetail;Channel;Status;Alert"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Gutenberg;2024-01-01;2024-01-03;\"Dupont; Marie\";ABC1234567;1234,50;2;600.00€ (2024-01-01) + 634.50€ (2024-01-02);Airbnb;PAYÉ;MULTI_VERSEMENT (2 paiements)"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_without_bom_and_custom_delimiter() {
        let mut out = Vec::new();
        let options = ExportOptions { delimiter: b',', bom: false };
        write_ledger_csv(&mut out, &[], &options).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Property,Arrival"));
    }

    #[test]
    fn test_decimal_comma_and_file_name() {
        assert_eq!(decimal_comma(100.0), "100,00");
        assert_eq!(decimal_comma(-15.5), "-15,50");
        let day = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(default_export_file_name(day), "citycosy_fusion_2024-06-30.csv");
    }
}
