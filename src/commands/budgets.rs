// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregation::totals_for_period;
use crate::budget::{BudgetStatus, evaluate};
use crate::period::Period;
use crate::store::{budgets, settings, transactions};
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_decimal, parse_month, pretty_table, today,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("clear", sub)) => {
            let period = parse_month(sub.get_one::<String>("month").unwrap())?;
            if budgets::clear_budget(conn, period)? {
                println!("Budget cleared for {}", period);
            } else {
                println!("No budget set for {}", period);
            }
        }
        Some(("status", sub)) => status(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = parse_month(sub.get_one::<String>("month").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    budgets::set_budget(conn, period, amount)?;
    let currency = settings::get_currency(conn)?;
    println!("Budget set for {} = {}", period, fmt_money(&amount, &currency));
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BudgetReport {
    pub period: String,
    pub budget: Option<Decimal>,
    pub spent: Decimal,
    #[serde(flatten)]
    pub status: BudgetStatus,
}

/// Budget, expense total and evaluation for one month.
pub fn budget_report(conn: &Connection, period: Period) -> Result<BudgetReport> {
    let budget = budgets::get_budget(conn, period)?;
    let (start, end) = period.date_range();
    let txs = transactions::get_transactions_in_range(conn, start, end)?;
    let spent = totals_for_period(&txs, start, end).expense_total;
    Ok(BudgetReport {
        period: period.to_string(),
        budget,
        spent,
        status: evaluate(budget, spent),
    })
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => Period::containing(today()),
    };
    let report = budget_report(conn, period)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let currency = settings::get_currency(conn)?;
    match report.budget {
        None => println!(
            "No budget set for {} (spent {})",
            period,
            fmt_money(&report.spent, &currency)
        ),
        Some(b) => {
            let remaining_label = if report.status.is_over_budget {
                "Over by"
            } else {
                "Remaining"
            };
            let rows = vec![vec![
                period.to_string(),
                fmt_money(&b, &currency),
                fmt_money(&report.spent, &currency),
                fmt_percent(&report.status.percent_used),
                format!(
                    "{} {}",
                    remaining_label,
                    fmt_money(&report.status.remaining.abs(), &currency)
                ),
            ]];
            println!(
                "{}",
                pretty_table(&["Month", "Budget", "Spent", "Used", "Balance"], rows)
            );
            println!("{}", progress_bar(&report.status));
        }
    }
    Ok(())
}

/// Twenty-cell bar for `status.progress()`.
fn progress_bar(status: &BudgetStatus) -> String {
    let filled = (status.progress() / Decimal::from(5))
        .floor()
        .to_usize()
        .unwrap_or(0)
        .min(20);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(20 - filled))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = budgets::list_budgets(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let currency = settings::get_currency(conn)?;
        let rows = data
            .iter()
            .map(|b| {
                vec![
                    format!("{:04}-{:02}", b.year, b.month),
                    fmt_money(&b.amount, &currency),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Budget"], rows));
    }
    Ok(())
}
