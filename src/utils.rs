// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Once;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Weekday};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::weekday_from_iso;
use crate::period::Period;

/// Filter for log output, in `tracing_subscriber::EnvFilter` syntax.
pub const LOG_ENV: &str = "PENNYWISE_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the stderr tracing subscriber. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("pennywise=warn"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<Period> {
    Ok(s.parse::<Period>()?)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Accepts 1 (Monday) to 7 (Sunday) or a weekday name such as `fri`.
pub fn parse_weekday(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u32>() {
        weekday_from_iso(n).with_context(|| format!("Invalid weekday '{}', expected 1-7", s))?;
        return Ok(n);
    }
    let w = s
        .parse::<Weekday>()
        .map_err(|_| anyhow::anyhow!("Invalid weekday '{}', expected 1-7 or a day name", s))?;
    Ok(w.number_from_monday())
}

/// Display currency. Only affects formatting; amounts are never converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
}

const KNOWN_SYMBOLS: [(&str, &str); 12] = [
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("INR", "₹"),
    ("CNY", "¥"),
    ("KRW", "₩"),
    ("BRL", "R$"),
    ("CAD", "C$"),
    ("AUD", "A$"),
    ("CHF", "CHF "),
    ("TRY", "₺"),
];

impl Currency {
    /// Known codes get their usual symbol; others render as `CODE `.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_uppercase();
        let symbol = KNOWN_SYMBOLS
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, s)| s.to_string())
            .unwrap_or_else(|| format!("{} ", code));
        Self { code, symbol }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::from_code("USD")
    }
}

pub fn fmt_money(d: &Decimal, currency: &Currency) -> String {
    let rounded = d.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{:.2}", currency.symbol, rounded.abs())
    } else {
        format!("{}{:.2}", currency.symbol, rounded.abs())
    }
}

pub fn fmt_percent(d: &Decimal) -> String {
    format!("{:.1}%", d.round_dp(1))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
