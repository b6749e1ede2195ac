//! Display helpers for amounts, percentages, and ROI.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Rendered in place of non-finite values.
pub const NOT_AVAILABLE: &str = "n/a";

/// How currency amounts are grouped and labelled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub group_separator: String,
    pub decimal_separator: String,
    /// Place the symbol after the amount (`1.234,50 €`) instead of before it (`$1,234.50`).
    #[serde(default)]
    pub symbol_after: bool,
}

impl CurrencyFormat {
    pub fn usd() -> Self {
        Self {
            symbol: "$".to_string(),
            group_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            symbol_after: false,
        }
    }

    pub fn eur() -> Self {
        Self {
            symbol: "€".to_string(),
            group_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            symbol_after: true,
        }
    }

    /// Looks up a preset by ISO code.
    pub fn preset(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Some(Self::usd()),
            "EUR" => Some(Self::eur()),
            _ => None,
        }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::usd()
    }
}

fn push_grouped(out: &mut String, value: u128, separator: &str) {
    let digits = value.to_string();
    let len = digits.len();
    for (idx, digit) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(digit);
    }
}

// Avoids rendering "-0.0" for values that round to zero.
fn round_tenths(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Formats an amount with two fraction digits, e.g. `-$1,234.50`.
pub fn format_currency(amount: f64, format: &CurrencyFormat) -> String {
    if !amount.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u128;
    let mut out = String::with_capacity(16);
    if amount < 0.0 && cents > 0 {
        out.push('-');
    }
    if !format.symbol_after {
        out.push_str(&format.symbol);
    }
    push_grouped(&mut out, cents / 100, &format.group_separator);
    out.push_str(&format.decimal_separator);
    let _ = write!(out, "{:02}", cents % 100);
    if format.symbol_after {
        out.push(' ');
        out.push_str(&format.symbol);
    }
    out
}

/// One decimal place and a `%` suffix, e.g. `12.5%`.
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.1}%", round_tenths(value))
}

/// Like [`format_percentage`] but always signed, e.g. `+345.5%`.
pub fn format_roi(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:+.1}%", round_tenths(value))
}
