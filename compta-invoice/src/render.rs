//! Printable HTML rendering.
//!
//! Generates a self-contained document: every invoice is a `<section>` that
//! ends with a page break, so printing (or "save as PDF") yields one invoice
//! per page.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

use crate::error::Result;
use crate::model::Invoice;
use crate::vat::DEFAULT_VAT_RATE;

/// The company issuing the invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issuer {
    pub name: String,
    pub address: Vec<String>,
    pub phones: Vec<String>,
    pub siret: String,
    pub email: String,
    pub iban: String,
    pub bic: String,
    pub payment_terms: String,
    pub legal_footer: String,
}

impl Default for Issuer {
    fn default() -> Self {
        Self {
            name: "CityCosy Strasbourg".to_string(),
            address: vec!["67000 - STRASBOURG".to_string(), "France".to_string()],
            phones: Vec::new(),
            siret: String::new(),
            email: String::new(),
            iban: String::new(),
            bic: String::new(),
            payment_terms: "Pas d'escompte pour règlement anticipé. En cas de retard de paiement, \
                            une pénalité égale à 3 fois le taux intérêt légal sera exigible."
                .to_string(),
            legal_footer: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub vat_rate: f64,
    pub currency_symbol: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            vat_rate: DEFAULT_VAT_RATE,
            currency_symbol: "€".to_string(),
        }
    }
}

impl RenderOptions {
    fn money(&self, value: f64) -> String {
        format!("{value:.2} {}", self.currency_symbol)
    }

    fn rate(&self) -> String {
        format!("{:.2}%", self.vat_rate * 100.0).replace('.', ",")
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render all invoices into one HTML document.
pub fn render_html(
    invoices: &[Invoice],
    issuer: &Issuer,
    options: &RenderOptions,
) -> Result<String> {
    let mut body = String::new();
    for invoice in invoices {
        render_invoice(&mut body, invoice, issuer, options)?;
    }

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <title>Factures - {issuer_name}</title>
    <style>
{css}
    </style>
</head>
<body>
{body}</body>
</html>
"##,
        issuer_name = escape(&issuer.name),
        css = CSS,
        body = body,
    ))
}

fn render_invoice(
    out: &mut String,
    invoice: &Invoice,
    issuer: &Issuer,
    options: &RenderOptions,
) -> fmt::Result {
    let totals = invoice.totals(options.vat_rate);
    let rate = options.rate();

    writeln!(out, r#"<section class="invoice">"#)?;
    render_header(out, invoice, issuer)?;

    writeln!(
        out,
        "  <table class=\"lines\"><thead><tr><th>Libellé</th><th>Qté</th><th>Unité</th>\
         <th>PU HT</th><th>Rem.</th><th>Montant HT</th><th>TVA</th></tr></thead><tbody>"
    )?;
    for line in &invoice.lines {
        let ht = options.money(line.split(options.vat_rate).ht);
        writeln!(
            out,
            "    <tr><td>{}</td><td>1,00</td><td></td><td>{ht}</td><td>0,00%</td><td>{ht}</td><td>{rate}</td></tr>",
            escape(&line.label),
        )?;
    }
    writeln!(out, "  </tbody></table>")?;

    if !issuer.iban.is_empty() {
        writeln!(
            out,
            "  <div class=\"payment\"><strong>Pour vos règlements par virement :</strong><br>IBAN : {}<br>BIC : {}<br><br>{}</div>",
            escape(&issuer.iban),
            escape(&issuer.bic),
            escape(&issuer.payment_terms),
        )?;
    } else if !issuer.payment_terms.is_empty() {
        writeln!(out, "  <div class=\"payment\">{}</div>", escape(&issuer.payment_terms))?;
    }

    writeln!(out, r#"  <div class="totals"><div class="vat">"#)?;
    writeln!(
        out,
        "    <h4>Détail de la TVA</h4><table><tr><th>Code</th><th>Base HT</th><th>Taux</th><th>Montant</th></tr>\
         <tr><td>Normale</td><td>{}</td><td>{rate}</td><td>{}</td></tr></table>",
        options.money(totals.ht),
        options.money(totals.tva),
    )?;
    writeln!(out, "    <p><strong>Règlement</strong> Virement</p>")?;
    if !invoice.due_date.is_empty() {
        writeln!(
            out,
            "    <p><strong>Echéance(s)</strong> {} au {}</p>",
            options.money(totals.ttc),
            escape(&invoice.due_date),
        )?;
    }
    writeln!(out, r#"  </div><div class="sums">"#)?;
    writeln!(
        out,
        "    <p><strong>Total HT</strong><strong>{}</strong></p>",
        options.money(totals.ht)
    )?;
    writeln!(
        out,
        "    <p><strong>TVA</strong><strong>{}</strong></p>",
        options.money(totals.tva)
    )?;
    writeln!(
        out,
        r#"    <p class="ttc"><span>Total TTC</span><span>{}</span></p>"#,
        options.money(totals.ttc)
    )?;
    writeln!(out, "  </div></div>")?;

    if !issuer.legal_footer.is_empty() {
        writeln!(out, r#"  <footer>{}</footer>"#, escape(&issuer.legal_footer))?;
    }
    writeln!(out, "</section>")
}

/// Issuer block, invoice number and recipient.
fn render_header(out: &mut String, invoice: &Invoice, issuer: &Issuer) -> fmt::Result {
    writeln!(
        out,
        r#"  <header><div class="issuer"><strong>{}</strong>"#,
        escape(&issuer.name)
    )?;
    for line in issuer.address.iter().chain(&issuer.phones) {
        writeln!(out, "    <br>{}", escape(line))?;
    }
    if !issuer.siret.is_empty() {
        writeln!(out, "    <br>Siret : {}", escape(&issuer.siret))?;
    }
    if !issuer.email.is_empty() {
        writeln!(out, "    <br>Email : {}", escape(&issuer.email))?;
    }
    writeln!(out, r#"  </div><h1>Facture</h1></header>"#)?;

    writeln!(out, r#"  <div class="infos"><div>"#)?;
    writeln!(out, "    <p><strong>N° : {}</strong></p>", escape(&invoice.number))?;
    writeln!(out, "    <p>Date : {}</p>", escape(&invoice.date))?;
    writeln!(out, "    <p>N° client : {}</p>", escape(&invoice.client_number))?;
    writeln!(
        out,
        r#"  </div><div class="recipient"><strong>{}</strong>"#,
        escape(&invoice.recipient)
    )?;
    for line in &invoice.recipient_address {
        writeln!(out, "    <p>{}</p>", escape(line))?;
    }
    writeln!(out, "  </div></div>")?;

    writeln!(
        out,
        r#"  <div class="reference">Réf. : {}</div>"#,
        escape(&invoice.reference)
    )
}

const CSS: &str = r#"        body { font-family: Arial, sans-serif; color: #333; margin: 0; }
        .invoice { max-width: 60rem; margin: 2rem auto; padding: 3rem; page-break-after: always; }
        .invoice:last-child { page-break-after: auto; }
        header { display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 2rem; }
        .issuer { font-size: 0.75rem; line-height: 1.5; }
        h1 { color: #dc2626; font-size: 3rem; margin: 0; }
        .infos { display: flex; justify-content: space-between; font-size: 0.875rem; margin-bottom: 1.5rem; }
        .infos p { margin: 0 0 0.25rem; }
        .recipient { text-align: right; }
        .reference { background: #f9fafb; border-left: 4px solid #dc2626; padding: 0.75rem; color: #dc2626; font-weight: bold; margin-bottom: 1.5rem; }
        table { width: 100%; border-collapse: collapse; font-size: 0.75rem; }
        .lines { margin-bottom: 1.5rem; }
        .lines th { background: #dc2626; color: #fff; padding: 0.5rem; }
        .lines td { border-bottom: 1px solid #e5e7eb; padding: 0.5rem; }
        .payment { background: #f9fafb; padding: 1rem; font-size: 0.75rem; margin-bottom: 1.5rem; }
        .totals { display: flex; gap: 2rem; }
        .totals > div { flex: 1; }
        .vat h4 { color: #dc2626; }
        .vat td, .vat th { border: 1px solid #e5e7eb; padding: 0.25rem 0.5rem; }
        .vat p { font-size: 0.75rem; }
        .sums p { display: flex; justify-content: space-between; margin: 0.5rem 0; }
        .sums .ttc { background: #dc2626; color: #fff; padding: 0.75rem 1rem; font-weight: bold; font-size: 1.125rem; }
        footer { text-align: center; font-size: 0.75rem; color: #4b5563; border-top: 1px solid #e5e7eb; padding-top: 1rem; margin-top: 1.5rem; }
        @media print { .invoice { margin: 0; max-width: none; } }"#;
