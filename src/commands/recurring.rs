// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{NewRecurring, Schedule};
use crate::store::recurring::{self, ProcessSummary};
use crate::store::settings;
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, parse_weekday, pretty_table, today,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("pause", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            recurring::cancel_schedule(conn, id, today())?;
            println!("Paused recurring transaction {}", id);
        }
        Some(("resume", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let def = recurring::set_active(conn, id, true, today())?;
            println!(
                "Resumed recurring transaction {}; next due {}",
                id,
                fmt_date(def.next_due)
            );
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            recurring::delete_recurring_transaction(conn, id)?;
            println!("Deleted recurring transaction {}", id);
        }
        Some(("process", sub)) => {
            let as_of = match sub.get_one::<String>("as-of") {
                Some(d) => parse_date(d)?,
                None => today(),
            };
            let summary = run_due(conn, as_of)?;
            println!(
                "Processed recurring transactions as of {}: {} created",
                as_of, summary.materialized
            );
        }
        _ => {}
    }
    Ok(())
}

/// Materialize due occurrences and warn about definitions that hit the
/// catch-up limit or could not be processed. Called on every start and by
/// `recurring process`.
pub fn run_due(conn: &mut Connection, as_of: NaiveDate) -> Result<ProcessSummary> {
    let summary = recurring::process_due(conn, as_of)
        .context("Could not process recurring transactions")?;
    for id in &summary.capped {
        eprintln!(
            "Recurring transaction {} still has overdue occurrences; run `pennywise recurring process` again",
            id
        );
    }
    for id in &summary.failed {
        eprintln!(
            "Recurring transaction {} was skipped; run `pennywise doctor` for details",
            id
        );
    }
    Ok(summary)
}

fn fmt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn weekday_arg(sub: &clap::ArgMatches) -> Result<Option<u32>> {
    sub.get_one::<String>("weekday")
        .map(|w| parse_weekday(w))
        .transpose()
}

/// Schedule from `--every` and anchor flags. With `current`, flags that are
/// left out keep their current values; returns `None` when nothing was given.
fn schedule_from_args(sub: &clap::ArgMatches, current: Option<&Schedule>) -> Result<Option<Schedule>> {
    let every = sub.get_one::<String>("every");
    let day = sub.get_one::<u32>("day").copied();
    let month = sub.get_one::<u32>("on-month").copied();
    let weekday = weekday_arg(sub)?;
    if every.is_none() && day.is_none() && month.is_none() && weekday.is_none() {
        return Ok(None);
    }

    let (kind, cur_day, cur_month, cur_weekday) = match current {
        Some(s) => s.to_parts(),
        None => ("", None, None, None),
    };
    let target = every.map(|s| s.as_str()).unwrap_or(kind);
    let (cur_day, cur_month, cur_weekday) = if target == kind {
        (cur_day, cur_month, cur_weekday)
    } else {
        (None, None, None)
    };
    let schedule = Schedule::from_parts(
        target,
        day.or(cur_day),
        month.or(cur_month),
        weekday.or(cur_weekday),
    )?;
    Ok(Some(schedule))
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let schedule = schedule_from_args(sub, None)?.context("--every is required")?;
    let start = match sub.get_one::<String>("start") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let def = recurring::add_recurring_transaction(
        conn,
        NewRecurring {
            amount,
            is_income: sub.get_flag("income"),
            note: sub.get_one::<String>("note").cloned(),
            category_id: sub.get_one::<String>("category").unwrap().trim().to_string(),
            schedule,
            start,
        },
    )
    .context("Could not add recurring transaction")?;
    println!(
        "Added recurring transaction {} ({}); next due {}",
        def.id,
        def.schedule,
        fmt_date(def.next_due)
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut def = recurring::require_recurring(conn, id)?;
    if let Some(a) = sub.get_one::<String>("amount") {
        def.amount = parse_decimal(a)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        def.category_id = c.trim().to_string();
    }
    if let Some(n) = sub.get_one::<String>("note") {
        def.note = Some(n.clone());
    }
    if sub.get_flag("income") {
        def.is_income = true;
    } else if sub.get_flag("expense") {
        def.is_income = false;
    }
    if let Some(schedule) = schedule_from_args(sub, Some(&def.schedule))? {
        def.schedule = schedule;
    }
    let def = recurring::update_recurring_transaction(conn, &def, today())?;
    println!(
        "Updated recurring transaction {}; next due {}",
        def.id,
        fmt_date(def.next_due)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = if sub.get_flag("active") {
        recurring::get_active_recurring_transactions(conn)?
    } else {
        recurring::get_recurring_transactions(conn)?
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let currency = settings::get_currency(conn)?;
        let rows = data
            .iter()
            .map(|d| {
                vec![
                    d.id.clone(),
                    if d.is_income { "income" } else { "expense" }.to_string(),
                    fmt_money(&d.amount, &currency),
                    d.category_id.clone(),
                    d.schedule.to_string(),
                    fmt_date(d.last_processed),
                    fmt_date(d.next_due),
                    if d.active { "yes" } else { "paused" }.to_string(),
                    d.note.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Kind", "Amount", "Category", "Schedule", "Last", "Next", "Active",
                    "Note"
                ],
                rows
            )
        );
    }
    Ok(())
}
