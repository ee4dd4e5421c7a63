use compta_ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("no invoice rows found (need '{number}' and '{recipient}' columns)")]
    NoInvoices {
        number: &'static str,
        recipient: &'static str,
    },

    #[error("render invoice document: {0}")]
    Render(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
