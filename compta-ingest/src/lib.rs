//! compta-ingest: tabular exports from Lodgify and Airbnb, normalized into typed records.

pub mod error;
pub mod normalize;
pub mod parsers;
pub mod rows;
pub mod types;

pub use error::IngestError;
pub use normalize::{
    DateOrder, NO_DETAIL, extract_reservation_code, parse_amount, parse_date, parse_date_as,
};
pub use parsers::airbnb::{parse_airbnb_csv, payout_from_row};
pub use parsers::lodgify::{booking_from_row, parse_lodgify_csv};
pub use rows::{RawRow, read_rows};
pub use types::{BookingRecord, PayoutRecord, RecordDate};
