use anyhow::{Context, Result, bail};
use compta_core::ExportOptions;
use compta_invoice::{Issuer, RenderOptions};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub issuer: Issuer,
    pub invoice: InvoiceSection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceSection {
    /// VAT rate applied to tax-inclusive amounts (0.20 = 20 %)
    pub vat_rate: f64,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Ledger CSV separator, a single ASCII character
    pub delimiter: char,
    /// Prefix the ledger CSV with a UTF-8 BOM (spreadsheet apps need it for accents)
    pub bom: bool,
}

impl Default for InvoiceSection {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            vat_rate: render.vat_rate,
            currency_symbol: render.currency_symbol,
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        let export = ExportOptions::default();
        Self {
            delimiter: export.delimiter as char,
            bom: export.bom,
        }
    }
}

impl Config {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            vat_rate: self.invoice.vat_rate,
            currency_symbol: self.invoice.currency_symbol.clone(),
        }
    }

    pub fn export_options(&self) -> Result<ExportOptions> {
        let d = self.export.delimiter;
        if !d.is_ascii() {
            bail!("export.delimiter must be a single ASCII character, got {d:?}");
        }
        Ok(ExportOptions {
            delimiter: d as u8,
            bom: self.export.bom,
        })
    }
}

/// `$HOME/.compta/config.toml`, or `None` when HOME is unset or empty.
pub fn default_config_path() -> Option<PathBuf> {
    config_path_in(std::env::var_os("HOME"))
}

fn config_path_in(home: Option<OsString>) -> Option<PathBuf> {
    let home = home.filter(|h| !h.is_empty())?;
    Some(PathBuf::from(home).join(".compta").join("config.toml"))
}

fn required_path(path: Option<&Path>) -> Result<PathBuf> {
    path.map(Path::to_path_buf)
        .or_else(default_config_path)
        .context("HOME is not set; pass --config <path>")
}

/// Load the config, falling back to defaults when the file does not exist
/// or no location can be derived. Nothing is created on disk.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(p) = path.map(Path::to_path_buf).or_else(default_config_path) else {
        debug!("HOME is not set, using default config");
        return Ok(Config::default());
    };
    if !p.exists() {
        debug!(path = %p.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

/// Write the config, creating its directory when missing.
pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = required_path(path)?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config(path: Option<&Path>) -> Result<()> {
    let cfg = load_config(path)?;
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
