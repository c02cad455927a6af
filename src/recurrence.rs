// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Due-date math for recurring transactions.
//!
//! Everything here is pure: definitions go in, updated definitions and the
//! transactions they produced come out. Writing them back is the store's job
//! (see [`crate::store::recurring::process_due`]).

use chrono::{Datelike, Days, NaiveDate};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::LedgerError;
use crate::models::{RecurringTransaction, Schedule, Transaction};
use crate::period::{Period, clamped_date};

/// Upper bound on occurrences materialized for one definition in one pass.
pub const MAX_CATCH_UP: usize = 60;

fn out_of_range(from: NaiveDate) -> LedgerError {
    LedgerError::validation(format!("no next occurrence representable after {}", from))
}

/// First occurrence strictly after `from`.
///
/// Monthly and yearly anchors past the end of the target month land on its
/// last day (day 31 in February gives Feb 28/29).
pub fn compute_next_due_date(schedule: &Schedule, from: NaiveDate) -> Result<NaiveDate, LedgerError> {
    schedule.validate()?;
    let next = match *schedule {
        Schedule::Weekly { weekday } => {
            let target = weekday.num_days_from_monday();
            let current = from.weekday().num_days_from_monday();
            let ahead = (7 + target - current) % 7;
            let ahead = if ahead == 0 { 7 } else { ahead };
            from.checked_add_days(Days::new(u64::from(ahead)))
        }
        Schedule::Monthly { day } => match clamped_date(from.year(), from.month(), day) {
            Some(candidate) if candidate > from => Some(candidate),
            _ => {
                let following = Period::containing(from).next();
                clamped_date(following.year, following.month, day)
            }
        },
        Schedule::Yearly { month, day } => match clamped_date(from.year(), month, day) {
            Some(candidate) if candidate > from => Some(candidate),
            _ => clamped_date(from.year() + 1, month, day),
        },
    };
    let next = next.ok_or_else(|| out_of_range(from))?;
    debug!(kind = schedule.kind(), %from, %next, "computed next due date");
    Ok(next)
}

/// First occurrence on or after `start`; used when a definition is created
/// or re-activated and has no processing history to advance from.
pub fn initial_next_due(schedule: &Schedule, start: NaiveDate) -> Result<NaiveDate, LedgerError> {
    let before = start.pred_opt().ok_or_else(|| out_of_range(start))?;
    compute_next_due_date(schedule, before)
}

/// Fill in a missing `next_due`, advancing from `last_processed` when the
/// definition has run before and from `reference` otherwise.
pub fn ensure_next_due(
    definition: &RecurringTransaction,
    reference: NaiveDate,
) -> Result<RecurringTransaction, LedgerError> {
    let mut def = definition.clone();
    if def.next_due.is_none() {
        def.next_due = Some(match def.last_processed {
            Some(last) => compute_next_due_date(&def.schedule, last)?,
            None => initial_next_due(&def.schedule, reference)?,
        });
    }
    Ok(def)
}

/// Result of running one definition up to a reference date.
#[derive(Debug, Clone, PartialEq)]
pub struct Materialization {
    /// The definition with `last_processed`/`next_due` advanced.
    pub definition: RecurringTransaction,
    /// One transaction per occurrence, oldest first.
    pub transactions: Vec<Transaction>,
    /// Set when [`MAX_CATCH_UP`] stopped the catch-up early.
    pub capped: bool,
}

fn materialize(def: &RecurringTransaction, date: NaiveDate) -> Transaction {
    Transaction {
        id: Uuid::new_v4().to_string(),
        amount: def.amount,
        category_id: def.category_id.clone(),
        date,
        note: def.note.clone(),
        is_income: def.is_income,
    }
}

/// Materialize every occurrence of `definition` due on or before `as_of`.
///
/// Returns `None` when nothing changed: the definition is inactive, or its
/// `next_due` is already in the future.
pub fn process_definition(
    definition: &RecurringTransaction,
    as_of: NaiveDate,
) -> Result<Option<Materialization>, LedgerError> {
    if !definition.active {
        return Ok(None);
    }
    let mut updated = ensure_next_due(definition, as_of)?;
    let mut transactions = Vec::new();
    let mut capped = false;

    while let Some(due) = updated.next_due.filter(|due| *due <= as_of) {
        if transactions.len() >= MAX_CATCH_UP {
            warn!(
                id = %updated.id,
                %due,
                limit = MAX_CATCH_UP,
                "catch-up limit reached; remaining occurrences left for the next pass"
            );
            capped = true;
            break;
        }
        debug!(id = %updated.id, %due, "materializing occurrence");
        transactions.push(materialize(&updated, due));
        updated.last_processed = Some(due);
        updated.next_due = Some(compute_next_due_date(&updated.schedule, due)?);
    }

    if transactions.is_empty() && updated == *definition {
        return Ok(None);
    }
    Ok(Some(Materialization {
        definition: updated,
        transactions,
        capped,
    }))
}

/// Run [`process_definition`] over a set of definitions. Inactive ones are
/// skipped; only definitions that changed appear in the output.
pub fn process_due(
    definitions: &[RecurringTransaction],
    as_of: NaiveDate,
) -> Result<Vec<Materialization>, LedgerError> {
    let mut out = Vec::new();
    for def in definitions {
        if let Some(m) = process_definition(def, as_of)? {
            out.push(m);
        }
    }
    Ok(out)
}
