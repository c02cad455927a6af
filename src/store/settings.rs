// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::error::LedgerError;
use crate::utils::Currency;

pub const CURRENCY_CODE: &str = "currency_code";
pub const CURRENCY_SYMBOL: &str = "currency_symbol";
pub const ONBOARDING_COMPLETED: &str = "onboarding_completed";
pub const CATEGORIES_SEEDED: &str = "categories_seeded";

/// User preferences, loaded once and handed to whatever needs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub currency: Currency,
    pub onboarding_completed: bool,
}

pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>, LedgerError> {
    let v = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| r.get(0))
        .optional()?;
    Ok(v)
}

pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<(), LedgerError> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// True only for the literal stored value `"true"`.
pub fn get_flag(conn: &Connection, key: &str) -> Result<bool, LedgerError> {
    Ok(get_value(conn, key)?.as_deref() == Some("true"))
}

pub fn set_flag(conn: &Connection, key: &str, value: bool) -> Result<(), LedgerError> {
    set_value(conn, key, if value { "true" } else { "false" })
}

pub fn is_onboarding_completed(conn: &Connection) -> Result<bool, LedgerError> {
    get_flag(conn, ONBOARDING_COMPLETED)
}

pub fn get_currency(conn: &Connection) -> Result<Currency, LedgerError> {
    let code = get_value(conn, CURRENCY_CODE)?;
    let symbol = get_value(conn, CURRENCY_SYMBOL)?;
    Ok(match (code, symbol) {
        (Some(code), Some(symbol)) => Currency { code, symbol },
        (Some(code), None) => Currency::from_code(&code),
        _ => Currency::default(),
    })
}

pub fn set_currency(conn: &Connection, currency: &Currency) -> Result<(), LedgerError> {
    set_value(conn, CURRENCY_CODE, &currency.code)?;
    set_value(conn, CURRENCY_SYMBOL, &currency.symbol)
}

pub fn load(conn: &Connection) -> Result<Settings, LedgerError> {
    Ok(Settings {
        currency: get_currency(conn)?,
        onboarding_completed: is_onboarding_completed(conn)?,
    })
}
