//! compta-core: reconciliation of Lodgify bookings against Airbnb payouts.
//!
//! Pure engine: receives normalized records, returns a sorted, classified
//! ledger plus a tally. The only I/O is the optional ledger CSV writer.

pub mod aggregate;
pub mod channel;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod sort;

pub use aggregate::{PayoutIndex, aggregate_payouts};
pub use channel::{Channel, PaymentStatus};
pub use engine::reconcile;
pub use error::ReconcileError;
pub use export::{ExportOptions, default_export_file_name, write_ledger_csv};
pub use model::{PayoutGroup, Reconciliation, ReconciledRow, RowKind, Summary};
pub use sort::sort_rows;
