//! Field-level cleaning shared by every export: reservation codes, amounts, dates.
//!
//! None of these fail. Unusable input degrades to an empty code, a zero
//! amount or an unparsed date, and the row is still kept.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Code carried by payout lines that are not attached to any reservation.
pub const NO_DETAIL: &str = "AUCUN DÉTAIL";

fn code_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Za-z0-9]{10}\b").expect("invalid code regex"))
}

/// Find the reservation code in a free-text field.
///
/// Candidates are standalone runs of exactly 10 ASCII letters/digits. The
/// first one mixing letters and digits wins, uppercased; plain words such as
/// a city name are skipped.
pub fn extract_reservation_code(text: &str) -> Option<String> {
    for m in code_token_re().find_iter(text) {
        let token = m.as_str().to_ascii_uppercase();
        let has_letter = token.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = token.chars().any(|c| c.is_ascii_digit());
        if has_letter && has_digit {
            return Some(token);
        }
        debug!(text, candidate = %token, "rejected reservation code candidate");
    }

    if !text.trim().is_empty() {
        debug!(text, "no reservation code found");
    }
    None
}

/// Canonical code for a payout line: [`NO_DETAIL`] for the undetailed
/// sentinel in any casing, the extracted code otherwise, empty if none.
pub fn canonical_payout_code(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    if text.to_uppercase() == NO_DETAIL {
        return NO_DETAIL.to_string();
    }
    extract_reservation_code(text).unwrap_or_default()
}

/// Parse a money cell such as `"1 234,50 €"`, `"$1,234.50"` or `"60.00"`.
///
/// Currency symbols and spaces are dropped. When both `,` and `.` appear the
/// last one is the decimal separator. A lone comma is a decimal comma unless
/// it is followed by exactly three digits (`"$1,060"`), where it groups
/// thousands. Anything unparseable is zero.
pub fn parse_amount(value: &str) -> f64 {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();
    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(c), None) if commas == 1 && !groups_thousands(&cleaned, c) => {
            cleaned.replace(',', ".")
        }
        (Some(_), None) => cleaned.replace(',', ""),
        (None, Some(_)) if dots > 1 => cleaned.replace('.', ""),
        _ => cleaned,
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// `1,060` or `-12,500`: one to three leading digits (not a lone zero) and
/// exactly three after the separator.
fn groups_thousands(cleaned: &str, sep: usize) -> bool {
    let int = cleaned[..sep].trim_start_matches('-');
    let frac = &cleaned[sep + 1..];
    frac.len() == 3 && (1..=3).contains(&int.len()) && int != "0"
}

/// How a column writes `nn/nn/yyyy` dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateOrder {
    /// `05/01/2024` is 5 January (French exports).
    #[default]
    DayFirst,
    /// `01/05/2024` is 5 January (US exports).
    MonthFirst,
}

impl DateOrder {
    /// Decide the order once for a whole column.
    ///
    /// A first field above 12 can only be a day (day-first), a second field
    /// above 12 can only be a day (month-first). With no proof, or
    /// contradictory proof, `fallback` is used.
    pub fn detect<'a>(
        values: impl IntoIterator<Item = &'a str>,
        fallback: DateOrder,
    ) -> DateOrder {
        let mut day_first = false;
        let mut month_first = false;
        for (a, b) in values.into_iter().filter_map(slash_fields) {
            day_first |= a > 12;
            month_first |= b > 12;
        }
        match (day_first, month_first) {
            (true, false) => DateOrder::DayFirst,
            (false, true) => DateOrder::MonthFirst,
            _ => fallback,
        }
    }

    fn slash_formats(self) -> [&'static str; 2] {
        match self {
            DateOrder::DayFirst => ["%d/%m/%Y", "%m/%d/%Y"],
            DateOrder::MonthFirst => ["%m/%d/%Y", "%d/%m/%Y"],
        }
    }
}

/// Date part of a cell, without a trailing time (`2024-01-05 14:00`, `2024-01-05T14:00:00`).
fn date_head(value: &str) -> &str {
    let value = value.trim();
    value.split([' ', 'T']).next().unwrap_or(value)
}

fn slash_fields(value: &str) -> Option<(u32, u32)> {
    let mut parts = date_head(value).split('/');
    let a = parts.next()?.parse().ok()?;
    let b = parts.next()?.parse().ok()?;
    parts.next()?;
    Some((a, b))
}

/// Parse a date cell, reading `nn/nn/yyyy` day-first.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_date_as(value, DateOrder::DayFirst)
}

/// Parse a date cell with the column's [`DateOrder`]. The other order is
/// still tried when the preferred one cannot produce a valid date.
pub fn parse_date_as(value: &str, order: DateOrder) -> Option<NaiveDate> {
    let head = date_head(value);
    if head.is_empty() {
        return None;
    }
    let [first, second] = order.slash_formats();
    ["%Y-%m-%d", first, second, "%d.%m.%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_code_from_noisy_text() {
        assert_eq!(
            extract_reservation_code("Airbnb reservation hmabc12345 (2 guests)"),
            Some("HMABC12345".to_string())
        );
        assert_eq!(
            extract_reservation_code("HMZZ9Y8X7W"),
            Some("HMZZ9Y8X7W".to_string())
        );
    }

    #[test]
    fn test_rejects_single_class_tokens() {
        assert_eq!(extract_reservation_code("Ref 0612345678"), None);
        assert_eq!(extract_reservation_code("Strasbourgs"), None);
        assert_eq!(extract_reservation_code("ABCDEFGHIJ"), None);
    }

    #[test]
    fn test_skips_plain_words_before_the_code() {
        assert_eq!(
            extract_reservation_code("Strasbourg HMABC12345"),
            Some("HMABC12345".to_string())
        );
        assert_eq!(
            extract_reservation_code("Appartement 0388123456 hm4kq8zt2p"),
            Some("HM4KQ8ZT2P".to_string())
        );
        assert_eq!(extract_reservation_code("Strasbourg Schiltigheim"), None);
    }

    #[test]
    fn test_code_is_ascii_only() {
        assert_eq!(extract_reservation_code("HMABC1234\u{212a}"), None);
        assert_eq!(extract_reservation_code("hmabc1234\u{17f}"), None);
    }

    #[test]
    fn test_requires_exactly_ten_characters() {
        assert_eq!(extract_reservation_code("HMABC1234"), None);
        assert_eq!(extract_reservation_code("HMABC123456"), None);
        assert_eq!(extract_reservation_code(""), None);
    }

    #[test]
    fn test_canonical_payout_code() {
        assert_eq!(canonical_payout_code("aucun détail"), NO_DETAIL);
        assert_eq!(canonical_payout_code(" AUCUN DÉTAIL "), NO_DETAIL);
        assert_eq!(canonical_payout_code("hmabc12345"), "HMABC12345");
        assert_eq!(canonical_payout_code("1234567890"), "");
        assert_eq!(canonical_payout_code(""), "");
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("60.00"), 60.0);
        assert_eq!(parse_amount("60,50"), 60.5);
        assert_eq!(parse_amount("1 234,50 €"), 1234.5);
        assert_eq!(parse_amount("1\u{a0}234,50\u{a0}€"), 1234.5);
        assert_eq!(parse_amount("$1,234.50"), 1234.5);
        assert_eq!(parse_amount("1.234,50"), 1234.5);
        assert_eq!(parse_amount("1,234,567"), 1234567.0);
        assert_eq!(parse_amount("-42,10"), -42.1);
    }

    #[test]
    fn test_parse_amount_lone_comma_thousands() {
        assert_eq!(parse_amount("$1,060"), 1060.0);
        assert_eq!(parse_amount("1,060"), 1060.0);
        assert_eq!(parse_amount("-12,500"), -12500.0);
        // still decimal commas
        assert_eq!(parse_amount("0,125"), 0.125);
        assert_eq!(parse_amount("1060,5"), 1060.5);
        assert_eq!(parse_amount("1234,567"), 1234.567);
    }

    #[test]
    fn test_parse_amount_defaults_to_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("n/a"), 0.0);
        assert_eq!(parse_amount("€"), 0.0);
        assert_eq!(parse_amount("1-2"), 0.0);
    }

    #[test]
    fn test_parse_date_formats() {
        let jan5 = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert_eq!(parse_date("2024-01-05"), jan5);
        assert_eq!(parse_date("05/01/2024"), jan5);
        assert_eq!(parse_date("05.01.2024"), jan5);
        assert_eq!(parse_date("2024-01-05 14:00"), jan5);
        // month-first only when day-first is impossible
        assert_eq!(parse_date("01/25/2024"), NaiveDate::from_ymd_opt(2024, 1, 25));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn test_parse_date_as_month_first() {
        let jan5 = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert_eq!(parse_date_as("01/05/2024", DateOrder::MonthFirst), jan5);
        assert_eq!(
            parse_date_as("01/05/2024", DateOrder::DayFirst),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(parse_date_as("2024-01-05", DateOrder::MonthFirst), jan5);
        // impossible in the preferred order, so the other one applies
        assert_eq!(
            parse_date_as("25/01/2024", DateOrder::MonthFirst),
            NaiveDate::from_ymd_opt(2024, 1, 25)
        );
    }

    #[test]
    fn test_date_order_detected_per_column() {
        let us = ["01/05/2024", "01/20/2024", ""];
        assert_eq!(
            DateOrder::detect(us, DateOrder::DayFirst),
            DateOrder::MonthFirst
        );

        let fr = ["05/01/2024", "20/01/2024"];
        assert_eq!(
            DateOrder::detect(fr, DateOrder::MonthFirst),
            DateOrder::DayFirst
        );

        let unknown = ["01/05/2024", "2024-01-07", "n/a"];
        assert_eq!(
            DateOrder::detect(unknown, DateOrder::MonthFirst),
            DateOrder::MonthFirst
        );
        assert_eq!(
            DateOrder::detect(unknown, DateOrder::DayFirst),
            DateOrder::DayFirst
        );

        let mixed = ["13/01/2024", "01/13/2024"];
        assert_eq!(
            DateOrder::detect(mixed, DateOrder::DayFirst),
            DateOrder::DayFirst
        );
    }
}
