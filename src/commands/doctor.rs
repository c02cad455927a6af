// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{budgets, recurring, transactions};
use crate::utils::{pretty_table, today};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// (issue, detail) pairs for everything that looks inconsistent.
pub fn find_issues(conn: &Connection, as_of: NaiveDate) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) References to categories that no longer exist
    for (table, label) in [
        ("transactions", "orphaned_category"),
        ("recurring_transactions", "recurring_orphaned_category"),
    ] {
        let mut stmt = conn.prepare(&format!(
            "SELECT t.id, t.category_id FROM {table} t
             LEFT JOIN categories c ON c.id=t.category_id
             WHERE c.id IS NULL"
        ))?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: String = r.get(0)?;
            let cat: String = r.get(1)?;
            rows.push(vec![label.into(), format!("{} -> {}", id, cat)]);
        }
    }

    // 2) Active schedules that are unreadable or not current
    for id in recurring::active_ids(conn)? {
        let def = match recurring::get_recurring(conn, &id) {
            Ok(Some(def)) => def,
            Ok(None) => continue,
            Err(e) => {
                rows.push(vec!["recurring_invalid".into(), e.to_string()]);
                continue;
            }
        };
        match def.next_due {
            None => rows.push(vec!["recurring_missing_next_due".into(), def.id]),
            Some(due) if due <= as_of => {
                rows.push(vec!["recurring_overdue".into(), format!("{} due {}", def.id, due)])
            }
            Some(_) => {}
        }
    }

    // 3) Non-positive amounts
    for t in transactions::get_transactions(conn)? {
        if t.amount <= Decimal::ZERO {
            rows.push(vec!["non_positive_amount".into(), format!("{} {}", t.id, t.amount)]);
        }
    }
    for b in budgets::list_budgets(conn)? {
        if b.amount <= Decimal::ZERO {
            rows.push(vec![
                "non_positive_budget".into(),
                format!("{:04}-{:02} {}", b.year, b.month, b.amount),
            ]);
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(conn, today())?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
