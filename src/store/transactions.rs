// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use super::categories::require_category;
use super::{clean_note, decimal_column, new_id};
use crate::error::LedgerError;
use crate::models::{NewTransaction, Transaction, validate_amount};
use crate::period::Period;

const SELECT: &str = "SELECT id, amount, category_id, date, note, is_income FROM transactions";

fn map_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        amount: decimal_column(r, 1)?,
        category_id: r.get(2)?,
        date: r.get(3)?,
        note: r.get(4)?,
        is_income: r.get(5)?,
    })
}

/// Narrowing options for [`list_transactions`].
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub period: Option<Period>,
    pub category_id: Option<String>,
    pub limit: Option<usize>,
}

pub fn get_transactions(conn: &Connection) -> Result<Vec<Transaction>, LedgerError> {
    list_transactions(conn, &TransactionFilter::default())
}

/// Transactions dated within `[start, end]`, newest first.
pub fn get_transactions_in_range(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Transaction>, LedgerError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} WHERE date BETWEEN ?1 AND ?2 ORDER BY date DESC, rowid DESC"
    ))?;
    let rows = stmt.query_map(params![start, end], map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn list_transactions(
    conn: &Connection,
    filter: &TransactionFilter,
) -> Result<Vec<Transaction>, LedgerError> {
    let mut sql = format!("{SELECT} WHERE 1=1");
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(period) = filter.period {
        let (start, end) = period.date_range_strings();
        sql.push_str(" AND date BETWEEN ? AND ?");
        params_vec.push(start);
        params_vec.push(end);
    }
    if let Some(cat) = &filter.category_id {
        sql.push_str(" AND category_id=?");
        params_vec.push(cat.clone());
    }
    sql.push_str(" ORDER BY date DESC, rowid DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn get_transaction(conn: &Connection, id: &str) -> Result<Option<Transaction>, LedgerError> {
    let t = conn
        .query_row(&format!("{SELECT} WHERE id=?1"), params![id], map_row)
        .optional()?;
    Ok(t)
}

fn validate(conn: &Connection, amount: rust_decimal::Decimal, category_id: &str) -> Result<(), LedgerError> {
    validate_amount(amount)?;
    require_category(conn, category_id)?;
    Ok(())
}

/// Write a fully-formed transaction as is. Callers validate.
pub(crate) fn insert_transaction(conn: &Connection, tx: &Transaction) -> Result<(), LedgerError> {
    conn.execute(
        "INSERT INTO transactions(id, amount, category_id, date, note, is_income)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            tx.id,
            tx.amount.to_string(),
            tx.category_id,
            tx.date,
            tx.note,
            tx.is_income
        ],
    )?;
    Ok(())
}

pub fn add_transaction(conn: &Connection, data: NewTransaction) -> Result<Transaction, LedgerError> {
    validate(conn, data.amount, &data.category_id)?;
    let tx = Transaction {
        id: new_id(),
        amount: data.amount,
        category_id: data.category_id,
        date: data.date,
        note: clean_note(data.note),
        is_income: data.is_income,
    };
    insert_transaction(conn, &tx)?;
    info!(id = %tx.id, date = %tx.date, "added transaction");
    Ok(tx)
}

pub fn update_transaction(conn: &Connection, tx: &Transaction) -> Result<(), LedgerError> {
    validate(conn, tx.amount, &tx.category_id)?;
    let n = conn.execute(
        "UPDATE transactions SET amount=?2, category_id=?3, date=?4, note=?5, is_income=?6
         WHERE id=?1",
        params![
            tx.id,
            tx.amount.to_string(),
            tx.category_id,
            tx.date,
            clean_note(tx.note.clone()),
            tx.is_income
        ],
    )?;
    if n == 0 {
        return Err(LedgerError::TransactionNotFound(tx.id.clone()));
    }
    Ok(())
}

/// Permanent; there is no undo.
pub fn delete_transaction(conn: &Connection, id: &str) -> Result<(), LedgerError> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::TransactionNotFound(id.to_string()));
    }
    info!(id, "deleted transaction");
    Ok(())
}
