// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use super::decimal_column;
use crate::error::LedgerError;
use crate::models::{MonthlyBudget, validate_amount};
use crate::period::Period;

pub fn get_budget(conn: &Connection, period: Period) -> Result<Option<Decimal>, LedgerError> {
    let v = conn
        .query_row(
            "SELECT amount FROM monthly_budgets WHERE year=?1 AND month=?2",
            params![period.year, period.month],
            |r| decimal_column(r, 0),
        )
        .optional()?;
    Ok(v)
}

/// Insert or replace the budget for `period`. Must be positive and at most
/// [`crate::models::MAX_AMOUNT`].
pub fn set_budget(conn: &Connection, period: Period, amount: Decimal) -> Result<(), LedgerError> {
    validate_amount(amount)?;
    conn.execute(
        "INSERT INTO monthly_budgets(year, month, amount) VALUES (?1,?2,?3)
         ON CONFLICT(year, month) DO UPDATE SET amount=excluded.amount",
        params![period.year, period.month, amount.to_string()],
    )?;
    Ok(())
}

/// Returns whether a budget was removed.
pub fn clear_budget(conn: &Connection, period: Period) -> Result<bool, LedgerError> {
    let n = conn.execute(
        "DELETE FROM monthly_budgets WHERE year=?1 AND month=?2",
        params![period.year, period.month],
    )?;
    Ok(n > 0)
}

pub fn list_budgets(conn: &Connection) -> Result<Vec<MonthlyBudget>, LedgerError> {
    let mut stmt =
        conn.prepare("SELECT year, month, amount FROM monthly_budgets ORDER BY year DESC, month DESC")?;
    let rows = stmt.query_map([], |r| {
        Ok(MonthlyBudget {
            year: r.get(0)?,
            month: r.get(1)?,
            amount: decimal_column(r, 2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
