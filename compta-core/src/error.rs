use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Neither bookings nor payouts were supplied.
    #[error("no input loaded: load a Lodgify or Airbnb export first")]
    NoInput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
