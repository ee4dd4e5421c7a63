//! VAT split of tax-inclusive (TTC) amounts.

use serde::Serialize;

pub const DEFAULT_VAT_RATE: f64 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VatSplit {
    /// Net amount (HT).
    pub ht: f64,
    /// VAT amount (TVA).
    pub tva: f64,
    /// Gross amount (TTC), as given.
    pub ttc: f64,
}

/// Rounded to the cent, with `-0.0` folded into `0.0` so it never prints as `-0.00`.
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

/// HT = TTC / (1 + rate), TVA = TTC - HT, both rounded to the cent.
pub fn split_ttc(ttc: f64, rate: f64) -> VatSplit {
    let ht = round_cents(ttc / (1.0 + rate));
    VatSplit {
        ht,
        tva: round_cents(ttc - ht),
        ttc: ttc + 0.0,
    }
}
