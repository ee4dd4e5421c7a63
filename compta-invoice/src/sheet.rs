//! Invoice CSV sheets -> [`Invoice`].
//!
//! Tenant sheet:
//!   N° Facture;Date Facture;N° Client;Client;Appartement;Arrivée;Départ;
//!   Frais Ménage TTC;Frais Agence TTC;Échéance
//! Owner sheet:
//!   N° Facture;Date Facture;N° Client;Propriétaire Nom;Propriétaire Adresse;
//!   Propriétaire CP;Propriétaire Ville;Référence;Montant TTC;Échéance
//!
//! Rows without an invoice number or recipient are skipped.

use compta_ingest::{RawRow, parse_amount, read_rows};
use tracing::warn;

use crate::error::{InvoiceError, Result};
use crate::model::{Invoice, InvoiceKind, InvoiceLine, format_invoice_date};

const NUMBER: &str = "N° Facture";
const DATE: &str = "Date Facture";
const CLIENT_NUMBER: &str = "N° Client";
const DUE_DATE: &str = "Échéance";

const TENANT: &str = "Client";
const OWNER: &str = "Propriétaire Nom";

impl InvoiceKind {
    /// Column naming the invoice recipient.
    pub fn recipient_column(self) -> &'static str {
        match self {
            InvoiceKind::Tenant => TENANT,
            InvoiceKind::Owner => OWNER,
        }
    }
}

/// Map one row, or `None` when it lacks an invoice number or recipient.
pub fn invoice_from_row(row: &RawRow, kind: InvoiceKind) -> Option<Invoice> {
    let number = row.get(NUMBER);
    let recipient = row.get(kind.recipient_column());
    if number.is_empty() || recipient.is_empty() {
        return None;
    }

    let (recipient_address, reference, lines) = match kind {
        InvoiceKind::Tenant => tenant_details(row),
        InvoiceKind::Owner => owner_details(row),
    };

    Some(Invoice {
        kind,
        number: number.to_string(),
        date: format_invoice_date(row.get(DATE)),
        client_number: row.get(CLIENT_NUMBER).to_string(),
        recipient: recipient.to_string(),
        recipient_address,
        reference,
        lines,
        due_date: format_invoice_date(row.get(DUE_DATE)),
    })
}

fn tenant_details(row: &RawRow) -> (Vec<String>, String, Vec<InvoiceLine>) {
    let cleaning = parse_amount(row.get("Frais Ménage TTC"));
    let agency = parse_amount(row.get("Frais Agence TTC"));

    let mut lines = Vec::new();
    if agency > 0.0 {
        lines.push(InvoiceLine::new("S012 -Frais Agence", agency));
    }
    if cleaning > 0.0 {
        lines.push(InvoiceLine::new("S006 -Frais de ménage", cleaning));
    }

    let reference = format!(
        "{} - séjour du {} au {}",
        row.get("Appartement"),
        format_invoice_date(row.get("Arrivée")),
        format_invoice_date(row.get("Départ")),
    );

    (Vec::new(), reference, lines)
}

fn owner_details(row: &RawRow) -> (Vec<String>, String, Vec<InvoiceLine>) {
    let town = format!("{} {}", row.get("Propriétaire CP"), row.get("Propriétaire Ville"));
    let address = [row.get("Propriétaire Adresse").to_string(), town.trim().to_string()]
        .into_iter()
        .filter(|l| !l.is_empty())
        .collect();

    let fee = parse_amount(row.get("Montant TTC"));
    let lines = vec![InvoiceLine::new("S002 -Frais de gestion", fee)];

    (address, row.get("Référence").to_string(), lines)
}

/// Parse an invoice sheet. Fails when no row is usable.
pub fn parse_invoices(text: &str, kind: InvoiceKind) -> Result<Vec<Invoice>> {
    let rows = read_rows(text)?;
    let mut invoices = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        match invoice_from_row(row, kind) {
            Some(invoice) => invoices.push(invoice),
            None => warn!(row = i + 2, "skipping invoice row without number or recipient"),
        }
    }

    if invoices.is_empty() {
        return Err(InvoiceError::NoInvoices {
            number: NUMBER,
            recipient: kind.recipient_column(),
        });
    }

    Ok(invoices)
}
