// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregation::{
    CategoryShare, MonthTotal, PeriodTotals, category_breakdown, monthly_series, totals_for_period,
};
use crate::commands::budgets::{BudgetReport, budget_report};
use crate::models::Flow;
use crate::period::{Period, year_range};
use crate::store::{categories, settings, transactions};
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_month, pretty_table, today,
};
use anyhow::{Context, Result};
use chrono::Datelike;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("categories", sub)) => by_category(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn period_arg(sub: &clap::ArgMatches) -> Result<Period> {
    match sub.get_one::<String>("month") {
        Some(m) => parse_month(m),
        None => Ok(Period::containing(today())),
    }
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub period: String,
    #[serde(flatten)]
    pub totals: PeriodTotals,
    pub budget: BudgetReport,
}

pub fn period_summary(conn: &Connection, period: Period) -> Result<Summary> {
    let (start, end) = period.date_range();
    let txs = transactions::get_transactions_in_range(conn, start, end)?;
    Ok(Summary {
        period: period.to_string(),
        totals: totals_for_period(&txs, start, end),
        budget: budget_report(conn, period)?,
    })
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_arg(sub)?;
    let s = period_summary(conn, period)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let currency = settings::get_currency(conn)?;
    let budget_cell = match s.budget.budget {
        Some(b) => format!(
            "{} ({} used)",
            fmt_money(&b, &currency),
            fmt_percent(&s.budget.status.percent_used)
        ),
        None => "-".to_string(),
    };
    let rows = vec![vec![
        s.period.clone(),
        fmt_money(&s.totals.income_total, &currency),
        fmt_money(&s.totals.expense_total, &currency),
        fmt_money(&s.totals.net, &currency),
        budget_cell,
    ]];
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Net", "Budget"], rows)
    );
    if s.budget.status.is_over_budget {
        println!(
            "Over budget by {}",
            fmt_money(&s.budget.status.remaining.abs(), &currency)
        );
    }
    Ok(())
}

pub fn period_breakdown(conn: &Connection, period: Period, kind: Flow) -> Result<Vec<CategoryShare>> {
    let (start, end) = period.date_range();
    let txs = transactions::get_transactions_in_range(conn, start, end)?;
    let cats = categories::get_categories(conn)?;
    Ok(category_breakdown(&txs, &cats, start, end, kind))
}

fn by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_arg(sub)?;
    let kind: Flow = sub.get_one::<String>("kind").unwrap().parse()?;
    let data = period_breakdown(conn, period, kind)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let currency = settings::get_currency(conn)?;
    let rows = data
        .iter()
        .map(|s| {
            vec![
                s.category.name.clone(),
                fmt_money(&s.total, &currency),
                fmt_percent(&s.percent),
            ]
        })
        .collect();
    let header = match kind {
        Flow::Income => "Earned",
        Flow::Expense => "Spent",
    };
    println!("{}", pretty_table(&["Category", header, "Share"], rows));
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TrendPoint {
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Income and expense for each month of `year`, January first.
pub fn year_trend(conn: &Connection, year: i32) -> Result<Vec<TrendPoint>> {
    let (start, end) = year_range(year).with_context(|| format!("Year {} is out of range", year))?;
    let txs = transactions::get_transactions_in_range(conn, start, end)?;
    let income: Vec<MonthTotal> = monthly_series(&txs, year, Flow::Income);
    let expense: Vec<MonthTotal> = monthly_series(&txs, year, Flow::Expense);
    Ok(income
        .into_iter()
        .zip(expense)
        .map(|(i, e)| TrendPoint {
            month: i.month,
            income: i.total,
            expense: e.total,
        })
        .collect())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = sub
        .get_one::<i32>("year")
        .copied()
        .unwrap_or_else(|| today().year());
    let data = year_trend(conn, year)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let currency = settings::get_currency(conn)?;
    let rows = data
        .iter()
        .map(|p| {
            vec![
                format!("{:04}-{:02}", year, p.month),
                fmt_money(&p.income, &currency),
                fmt_money(&p.expense, &currency),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Income", "Expense"], rows));
    Ok(())
}
