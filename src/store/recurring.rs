// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, Savepoint, TransactionBehavior, params};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::categories::require_category;
use super::transactions::insert_transaction;
use super::{clean_note, decimal_column, new_id};
use crate::error::LedgerError;
use crate::models::{NewRecurring, RecurringTransaction, Schedule, validate_amount};
use crate::recurrence::{self, Materialization, compute_next_due_date, initial_next_due};

const SELECT: &str = "SELECT id, amount, is_income, note, category_id, recurrence_type, day, month, \
     weekday, last_processed, next_due, active FROM recurring_transactions";

/// Columns as stored; anchors are checked when turned into a [`Schedule`].
struct RawRecurring {
    id: String,
    amount: Decimal,
    is_income: bool,
    note: Option<String>,
    category_id: String,
    recurrence_type: String,
    day: Option<u32>,
    month: Option<u32>,
    weekday: Option<u32>,
    last_processed: Option<NaiveDate>,
    next_due: Option<NaiveDate>,
    active: bool,
}

impl RawRecurring {
    fn into_model(self) -> Result<RecurringTransaction, LedgerError> {
        let schedule = Schedule::from_parts(&self.recurrence_type, self.day, self.month, self.weekday)
            .map_err(|e| match e {
                LedgerError::Validation(msg) => {
                    LedgerError::validation(format!("recurring transaction {}: {}", self.id, msg))
                }
                other => other,
            })?;
        Ok(RecurringTransaction {
            id: self.id,
            amount: self.amount,
            is_income: self.is_income,
            note: self.note,
            category_id: self.category_id,
            schedule,
            last_processed: self.last_processed,
            next_due: self.next_due,
            active: self.active,
        })
    }
}

fn map_row(r: &Row<'_>) -> rusqlite::Result<RawRecurring> {
    Ok(RawRecurring {
        id: r.get(0)?,
        amount: decimal_column(r, 1)?,
        is_income: r.get(2)?,
        note: r.get(3)?,
        category_id: r.get(4)?,
        recurrence_type: r.get(5)?,
        day: r.get(6)?,
        month: r.get(7)?,
        weekday: r.get(8)?,
        last_processed: r.get(9)?,
        next_due: r.get(10)?,
        active: r.get(11)?,
    })
}

fn query(conn: &Connection, sql: &str) -> Result<Vec<RecurringTransaction>, LedgerError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?.into_model()?);
    }
    Ok(out)
}

pub fn get_recurring_transactions(conn: &Connection) -> Result<Vec<RecurringTransaction>, LedgerError> {
    query(conn, &format!("{SELECT} ORDER BY active DESC, next_due, rowid"))
}

pub fn get_active_recurring_transactions(
    conn: &Connection,
) -> Result<Vec<RecurringTransaction>, LedgerError> {
    query(conn, &format!("{SELECT} WHERE active=1 ORDER BY next_due, rowid"))
}

pub fn get_recurring(conn: &Connection, id: &str) -> Result<Option<RecurringTransaction>, LedgerError> {
    let raw = conn
        .query_row(&format!("{SELECT} WHERE id=?1"), params![id], map_row)
        .optional()?;
    raw.map(RawRecurring::into_model).transpose()
}

pub fn require_recurring(conn: &Connection, id: &str) -> Result<RecurringTransaction, LedgerError> {
    get_recurring(conn, id)?.ok_or_else(|| LedgerError::RecurringNotFound(id.to_string()))
}

fn validate(conn: &Connection, amount: Decimal, category_id: &str, schedule: &Schedule) -> Result<(), LedgerError> {
    validate_amount(amount)?;
    schedule.validate()?;
    require_category(conn, category_id)?;
    Ok(())
}

fn write(conn: &Connection, def: &RecurringTransaction, insert: bool) -> Result<usize, LedgerError> {
    let (kind, day, month, weekday) = def.schedule.to_parts();
    let sql = if insert {
        "INSERT INTO recurring_transactions(id, amount, is_income, note, category_id, recurrence_type,
             day, month, weekday, last_processed, next_due, active)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)"
    } else {
        "UPDATE recurring_transactions SET amount=?2, is_income=?3, note=?4, category_id=?5,
             recurrence_type=?6, day=?7, month=?8, weekday=?9, last_processed=?10, next_due=?11,
             active=?12
         WHERE id=?1"
    };
    let n = conn.execute(
        sql,
        params![
            def.id,
            def.amount.to_string(),
            def.is_income,
            def.note,
            def.category_id,
            kind,
            day,
            month,
            weekday,
            def.last_processed,
            def.next_due,
            def.active
        ],
    )?;
    Ok(n)
}

/// Store a new definition with its first `next_due` on or after `start`.
pub fn add_recurring_transaction(
    conn: &Connection,
    new: NewRecurring,
) -> Result<RecurringTransaction, LedgerError> {
    validate(conn, new.amount, &new.category_id, &new.schedule)?;
    let def = RecurringTransaction {
        id: new_id(),
        amount: new.amount,
        is_income: new.is_income,
        note: clean_note(new.note),
        category_id: new.category_id,
        schedule: new.schedule,
        last_processed: None,
        next_due: Some(initial_next_due(&new.schedule, new.start)?),
        active: true,
    };
    write(conn, &def, true)?;
    info!(id = %def.id, next_due = ?def.next_due, "added recurring transaction");
    Ok(def)
}

/// Save edits to a definition. `next_due` is recomputed from
/// `last_processed`, or from `today` for a definition that never ran.
pub fn update_recurring_transaction(
    conn: &Connection,
    def: &RecurringTransaction,
    today: NaiveDate,
) -> Result<RecurringTransaction, LedgerError> {
    validate(conn, def.amount, &def.category_id, &def.schedule)?;
    let mut updated = def.clone();
    updated.note = clean_note(updated.note);
    updated.next_due = Some(match updated.last_processed {
        Some(last) => compute_next_due_date(&updated.schedule, last)?,
        None => initial_next_due(&updated.schedule, today)?,
    });
    if write(conn, &updated, false)? == 0 {
        return Err(LedgerError::RecurringNotFound(def.id.clone()));
    }
    Ok(updated)
}

/// Pause or resume a definition. Resuming schedules the next occurrence on
/// or after `today`; occurrences missed while paused are not backfilled.
pub fn set_active(
    conn: &Connection,
    id: &str,
    active: bool,
    today: NaiveDate,
) -> Result<RecurringTransaction, LedgerError> {
    let mut def = require_recurring(conn, id)?;
    if def.active == active {
        return Ok(def);
    }
    def.active = active;
    if active {
        def.next_due = Some(initial_next_due(&def.schedule, today)?);
    }
    write(conn, &def, false)?;
    info!(id, active, "changed recurring transaction state");
    Ok(def)
}

/// Stop future occurrences while keeping the definition and its history.
pub fn cancel_schedule(conn: &Connection, id: &str, today: NaiveDate) -> Result<RecurringTransaction, LedgerError> {
    set_active(conn, id, false, today)
}

/// Removes the definition only; transactions it produced stay.
pub fn delete_recurring_transaction(conn: &Connection, id: &str) -> Result<(), LedgerError> {
    let n = conn.execute("DELETE FROM recurring_transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::RecurringNotFound(id.to_string()));
    }
    info!(id, "deleted recurring transaction");
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    /// Definitions whose schedule moved.
    pub definitions: usize,
    /// Transactions written.
    pub materialized: usize,
    /// Definitions stopped by the catch-up limit.
    pub capped: Vec<String>,
    /// Definitions that could not be loaded or written; left untouched.
    pub failed: Vec<String>,
}

/// Ids of active definitions, earliest due first.
pub fn active_ids(conn: &Connection) -> Result<Vec<String>, LedgerError> {
    let mut stmt = conn
        .prepare("SELECT id FROM recurring_transactions WHERE active=1 ORDER BY next_due, rowid")?;
    let rows = stmt.query_map([], |r| r.get(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Load, run and write back one definition inside `sp`.
fn advance(
    sp: &Savepoint<'_>,
    id: &str,
    as_of: NaiveDate,
) -> Result<Option<Materialization>, LedgerError> {
    let Some(def) = get_recurring(sp, id)? else {
        return Ok(None);
    };
    let Some(m) = recurrence::process_definition(&def, as_of)? else {
        return Ok(None);
    };
    for t in &m.transactions {
        insert_transaction(sp, t)?;
    }
    sp.execute(
        "UPDATE recurring_transactions SET last_processed=?2, next_due=?3 WHERE id=?1",
        params![m.definition.id, m.definition.last_processed, m.definition.next_due],
    )?;
    Ok(Some(m))
}

/// Materialize everything due on or before `as_of` and advance schedules.
///
/// Runs in one IMMEDIATE transaction: a second writer blocks until this pass
/// commits and then sees the advanced `next_due` values, so an occurrence is
/// never written twice. Each definition gets its own savepoint, so its new
/// transactions and its schedule update land together or not at all. A
/// definition that fails is rolled back, logged and listed in
/// [`ProcessSummary::failed`]; the others still advance.
pub fn process_due(conn: &mut Connection, as_of: NaiveDate) -> Result<ProcessSummary, LedgerError> {
    let mut tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let ids = active_ids(&tx)?;

    let mut summary = ProcessSummary::default();
    for id in ids {
        let mut sp = tx.savepoint()?;
        match advance(&sp, &id, as_of) {
            Ok(Some(m)) => {
                sp.commit()?;
                summary.definitions += 1;
                summary.materialized += m.transactions.len();
                if m.capped {
                    summary.capped.push(id.clone());
                }
                if !m.transactions.is_empty() {
                    info!(
                        id = %id,
                        count = m.transactions.len(),
                        next_due = ?m.definition.next_due,
                        "materialized recurring transaction"
                    );
                }
            }
            Ok(None) => sp.commit()?,
            Err(e) => {
                sp.rollback()?;
                warn!(id = %id, error = %e, "skipped recurring transaction");
                summary.failed.push(id);
            }
        }
    }
    tx.commit()?;
    Ok(summary)
}
