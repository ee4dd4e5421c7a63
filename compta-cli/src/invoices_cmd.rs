use anyhow::{Context, Result, bail};
use clap::Args;
use compta_invoice::{Invoice, InvoiceKind, parse_invoices, render_html};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct InvoiceArgs {
    /// Invoice sheet (CSV, `;` or `,` separated)
    #[arg(long)]
    pub csv: PathBuf,

    /// Output HTML file (default: factures_locataires.html / factures_gestion.html)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Render only the Nth invoice of the sheet (1-based)
    #[arg(long)]
    pub index: Option<usize>,
}

fn default_output(kind: InvoiceKind) -> &'static str {
    match kind {
        InvoiceKind::Tenant => "factures_locataires.html",
        InvoiceKind::Owner => "factures_gestion.html",
    }
}

pub fn run(kind: InvoiceKind, args: &InvoiceArgs, cfg: &Config) -> Result<()> {
    let text =
        fs::read_to_string(&args.csv).with_context(|| format!("read {}", args.csv.display()))?;
    let invoices =
        parse_invoices(&text, kind).with_context(|| format!("parsing {}", args.csv.display()))?;

    let selected = select(&invoices, args.index)?;
    let options = cfg.render_options();

    for invoice in selected {
        println!(
            "{:<12} {:<10} {:<28} {:>10.2}",
            invoice.number,
            invoice.date,
            invoice.recipient,
            invoice.total_ttc()
        );
    }

    let html = render_html(selected, &cfg.issuer, &options).context("render invoices")?;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_output(kind)));
    write_html(&out, &html)?;
    eprintln!("Wrote {} invoice(s) to {}", selected.len(), out.display());

    Ok(())
}

fn select(invoices: &[Invoice], index: Option<usize>) -> Result<&[Invoice]> {
    match index {
        None => Ok(invoices),
        Some(n) if n >= 1 && n <= invoices.len() => Ok(&invoices[n - 1..n]),
        Some(n) => bail!("--index {n} out of range: sheet has {} invoice(s)", invoices.len()),
    }
}

fn write_html(path: &Path, html: &str) -> Result<()> {
    fs::write(path, html).with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "N° Facture;Date Facture;N° Client;Client;Appartement;Arrivée;Départ;Frais Ménage TTC;Frais Agence TTC;Échéance\n\
        F-1;2024-03-05;C1;Marie Dupont;Gutenberg;2024-03-01;2024-03-04;60;36;2024-03-20\n\
        F-2;2024-03-06;C2;Paul Martin;Kléber;2024-03-02;2024-03-03;45;0;\n";

    fn args(dir: &Path, index: Option<usize>) -> InvoiceArgs {
        let csv = dir.join("sheet.csv");
        fs::write(&csv, SHEET).unwrap();
        InvoiceArgs {
            csv,
            out: Some(dir.join("out.html")),
            index,
        }
    }

    #[test]
    fn test_renders_whole_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), None);
        run(InvoiceKind::Tenant, &args, &Config::default()).unwrap();

        let html = fs::read_to_string(dir.path().join("out.html")).unwrap();
        assert_eq!(html.matches("<section class=\"invoice\">").count(), 2);
    }

    #[test]
    fn test_index_selects_one_invoice() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), Some(2));
        run(InvoiceKind::Tenant, &args, &Config::default()).unwrap();

        let html = fs::read_to_string(dir.path().join("out.html")).unwrap();
        assert_eq!(html.matches("<section class=\"invoice\">").count(), 1);
        assert!(html.contains("Paul Martin"));
        assert!(!html.contains("Marie Dupont"));
    }

    #[test]
    fn test_index_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        for bad in [0, 3] {
            let args = args(dir.path(), Some(bad));
            let err = run(InvoiceKind::Tenant, &args, &Config::default()).unwrap_err();
            assert!(err.to_string().contains("out of range"));
        }
    }

    #[test]
    fn test_wrong_kind_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), None);
        assert!(run(InvoiceKind::Owner, &args, &Config::default()).is_err());
    }

    #[test]
    fn test_default_output_names() {
        assert_eq!(default_output(InvoiceKind::Tenant), "factures_locataires.html");
        assert_eq!(default_output(InvoiceKind::Owner), "factures_gestion.html");
    }
}
