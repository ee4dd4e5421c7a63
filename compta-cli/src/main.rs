use anyhow::Result;
use clap::{Parser, Subcommand};
use compta_invoice::InvoiceKind;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod invoices_cmd;
mod reconcile_cmd;

use invoices_cmd::InvoiceArgs;
use reconcile_cmd::ReconcileArgs;

#[derive(Parser, Debug)]
#[command(
    name = "compta",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("COMPTA_BUILD_DESCRIBE"), ")"),
    about = "CityCosy bookkeeping: Lodgify/Airbnb reconciliation and invoices"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.compta/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge a Lodgify export with an Airbnb payout export into one ledger
    Reconcile(ReconcileArgs),

    /// Render invoices from a CSV sheet
    Invoices {
        #[command(subcommand)]
        command: InvoiceCommand,
    },

    /// Manage ~/.compta/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum InvoiceCommand {
    /// Cleaning and agency fee invoices addressed to guests
    Tenant(InvoiceArgs),

    /// Management fee invoices addressed to property owners
    Owner(InvoiceArgs),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(build = env!("COMPTA_BUILD_DESCRIBE"), "starting compta");

    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Reconcile(args) => {
            let cfg = config::load_config(config_path)?;
            reconcile_cmd::run(&args, &cfg).await?;
        }

        Command::Invoices { command } => {
            let cfg = config::load_config(config_path)?;
            match command {
                InvoiceCommand::Tenant(args) => invoices_cmd::run(InvoiceKind::Tenant, &args, &cfg)?,
                InvoiceCommand::Owner(args) => invoices_cmd::run(InvoiceKind::Owner, &args, &cfg)?,
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(config_path)?,
            ConfigCommand::Show => config::show_config(config_path)?,
        },
    }

    Ok(())
}
