use serde::Serialize;

use crate::vat::{VatSplit, split_ttc};

/// Which invoice sheet a CSV holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    /// Cleaning and agency fees billed to the guest.
    Tenant,
    /// Monthly management fee billed to the property owner.
    Owner,
}

/// A billed service, amount tax-inclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLine {
    pub label: String,
    pub ttc: f64,
}

impl InvoiceLine {
    pub fn new(label: impl Into<String>, ttc: f64) -> Self {
        Self {
            label: label.into(),
            ttc,
        }
    }

    pub fn split(&self, vat_rate: f64) -> VatSplit {
        split_ttc(self.ttc, vat_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub kind: InvoiceKind,
    pub number: String,
    /// Display date (DD/MM/YYYY when the source was ISO).
    pub date: String,
    pub client_number: String,
    pub recipient: String,
    /// Postal lines under the recipient name; may be empty.
    pub recipient_address: Vec<String>,
    pub reference: String,
    pub lines: Vec<InvoiceLine>,
    /// Display due date, empty when none.
    pub due_date: String,
}

impl Invoice {
    /// Sum of line amounts; `0.0` (never `-0.0`) without lines.
    pub fn total_ttc(&self) -> f64 {
        self.lines.iter().fold(0.0, |acc, l| acc + l.ttc)
    }

    /// Totals are computed on the summed TTC, not summed per line.
    pub fn totals(&self, vat_rate: f64) -> VatSplit {
        split_ttc(self.total_ttc(), vat_rate)
    }
}

/// `2024-03-01` -> `01/03/2024`. Text already using `/` is kept as is.
pub fn format_invoice_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() || value.contains('/') {
        return value.to_string();
    }
    let parts: Vec<&str> = value.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{day}/{month}/{year}"),
        _ => value.to_string(),
    }
}
