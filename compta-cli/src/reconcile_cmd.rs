use anyhow::{Context, Result, bail};
use clap::Args;
use compta_core::{
    ExportOptions, Reconciliation, default_export_file_name, reconcile, write_ledger_csv,
};
use compta_ingest::{BookingRecord, PayoutRecord, parse_airbnb_csv, parse_lodgify_csv};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Lodgify reservations export (CSV)
    #[arg(long)]
    pub lodgify: Option<PathBuf>,

    /// Airbnb payouts export (CSV)
    #[arg(long)]
    pub airbnb: Option<PathBuf>,

    /// Write the merged ledger to this CSV file
    #[arg(long, conflicts_with = "export")]
    pub out: Option<PathBuf>,

    /// Write the merged ledger to citycosy_fusion_<today>.csv
    #[arg(long)]
    pub export: bool,

    /// Print the full result as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Limit number of rows printed (default: 50)
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

pub async fn run(args: &ReconcileArgs, cfg: &Config) -> Result<()> {
    if args.lodgify.is_none() && args.airbnb.is_none() {
        bail!("no input loaded: pass --lodgify <csv> and/or --airbnb <csv>");
    }
    let export_options = cfg.export_options()?;

    let (bookings, payouts) = tokio::try_join!(
        load_bookings(args.lodgify.as_deref()),
        load_payouts(args.airbnb.as_deref()),
    )?;

    let result = reconcile(&bookings, &payouts).context("reconciliation aborted")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Loaded {} Lodgify bookings and {} Airbnb payout lines\n",
            bookings.len(),
            payouts.len()
        );
        print_table(&result, args.limit);
    }

    let out = match (&args.out, args.export) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(PathBuf::from(default_export_file_name(
            chrono::Local::now().date_naive(),
        ))),
        (None, false) => None,
    };
    if let Some(path) = out {
        write_export(&path, &result, &export_options)?;
        eprintln!("Wrote {} rows to {}", result.rows.len(), path.display());
    }

    Ok(())
}

async fn load_bookings(path: Option<&Path>) -> Result<Vec<BookingRecord>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    parse_lodgify_csv(&text).with_context(|| format!("parsing {}", path.display()))
}

async fn load_payouts(path: Option<&Path>) -> Result<Vec<PayoutRecord>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    parse_airbnb_csv(&text).with_context(|| format!("parsing {}", path.display()))
}

fn write_export(path: &Path, result: &Reconciliation, options: &ExportOptions) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_ledger_csv(BufWriter::new(file), &result.rows, options)
        .with_context(|| format!("write {}", path.display()))
}

fn print_table(result: &Reconciliation, limit: usize) {
    println!(
        "  {:<22} {:<10} {:<10} {:<20} {:<12} {:>10} {:>3}  {:<18} Alert",
        "Property", "Arrival", "Departure", "Guest", "Code", "Amount", "#", "Status"
    );

    for row in result.rows.iter().take(limit) {
        let mark = if row.has_alert() { '!' } else { ' ' };
        println!(
            "{} {:<22} {:<10} {:<10} {:<20} {:<12} {:>10.2} {:>3}  {:<18} {}",
            mark,
            truncate(&row.unit, 22),
            row.arrival.raw,
            row.departure.raw,
            truncate(&row.guest, 20),
            row.code,
            row.amount,
            row.payment_count,
            row.status.label(),
            row.alert_text()
        );
        if !row.payment_detail.is_empty() {
            println!("    {}", row.payment_detail);
        }
    }

    if result.rows.len() > limit {
        println!(
            "... {} more rows (use --json or --out for the full ledger)",
            result.rows.len() - limit
        );
    }

    let s = &result.summary;
    println!(
        "\nRows: {} | matched: {} | Lodgify only: {} | Airbnb only: {} | no detail: {} | alerts: {}",
        s.total, s.matched, s.booking_only, s.payout_only, s.no_detail, s.alerts
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, text).unwrap();
        p
    }

    #[tokio::test]
    async fn test_missing_inputs_rejected() {
        let args = ReconcileArgs {
            lodgify: None,
            airbnb: None,
            out: None,
            export: false,
            json: false,
            limit: 10,
        };
        let err = run(&args, &Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("no input loaded"));
    }

    #[tokio::test]
    async fn test_reconcile_files_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let lodgify = write(
            dir.path(),
            "lodgify.csv",
            "SourceText,Name,HouseName,DateArrival,DateDeparture,Source,TotalAmount\n\
             HMABC12345,Marie,Gutenberg,2024-01-01,2024-01-03,Airbnb,100\n",
        );
        let airbnb = write(
            dir.path(),
            "airbnb.csv",
            "Date,Confirmation code,Guest name,Listing,Paid out\n\
             2024-01-04,HMABC12345,Marie,Gutenberg,60\n\
             2024-01-05,HMABC12345,Marie,Gutenberg,40\n",
        );
        let out = dir.path().join("ledger.csv");

        let args = ReconcileArgs {
            lodgify: Some(lodgify),
            airbnb: Some(airbnb),
            out: Some(out.clone()),
            export: false,
            json: true,
            limit: 10,
        };
        run(&args, &Config::default()).await.unwrap();

        let ledger = std::fs::read_to_string(&out).unwrap();
        assert!(ledger.starts_with('\u{feff}'));
        assert!(ledger.contains("Gutenberg;2024-01-01;2024-01-03;Marie;HMABC12345;100,00;2;"));
        assert!(ledger.contains("MULTI_VERSEMENT (2 paiements)"));
    }

    #[tokio::test]
    async fn test_empty_exports_report_no_input() {
        let dir = tempfile::tempdir().unwrap();
        let lodgify = write(dir.path(), "lodgify.csv", "SourceText,Name\n");
        let args = ReconcileArgs {
            lodgify: Some(lodgify),
            airbnb: None,
            out: None,
            export: false,
            json: false,
            limit: 10,
        };
        let err = run(&args, &Config::default()).await.unwrap_err();
        assert!(format!("{err:#}").contains("no input loaded"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Gutenberg", 22), "Gutenberg");
        assert_eq!(truncate("Appartement Petite France", 10), "Apparteme…");
    }
}
