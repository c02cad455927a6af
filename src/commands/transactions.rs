// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::NewTransaction;
use crate::period::Period;
use crate::store::transactions::{self, TransactionFilter};
use crate::store::{categories, settings};
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table, today,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            transactions::delete_transaction(conn, id)?;
            println!("Deleted transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let category_id = sub.get_one::<String>("category").unwrap().trim().to_string();
    let tx = transactions::add_transaction(
        conn,
        NewTransaction {
            amount,
            category_id,
            date,
            note: sub.get_one::<String>("note").cloned(),
            is_income: sub.get_flag("income"),
        },
    )
    .context("Could not record transaction")?;
    let currency = settings::get_currency(conn)?;
    println!(
        "Recorded {} {} on {} in '{}' (id: {})",
        tx.flow(),
        fmt_money(&tx.amount, &currency),
        tx.date,
        tx.category_id,
        tx.id
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut tx = transactions::get_transaction(conn, id)?
        .with_context(|| format!("Transaction '{}' not found", id))?;
    if let Some(a) = sub.get_one::<String>("amount") {
        tx.amount = parse_decimal(a)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        tx.category_id = c.trim().to_string();
    }
    if let Some(d) = sub.get_one::<String>("date") {
        tx.date = parse_date(d)?;
    }
    if let Some(n) = sub.get_one::<String>("note") {
        tx.note = Some(n.clone());
    }
    if sub.get_flag("income") {
        tx.is_income = true;
    } else if sub.get_flag("expense") {
        tx.is_income = false;
    }
    transactions::update_transaction(conn, &tx)?;
    println!("Updated transaction {}", tx.id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.note.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Kind", "Amount", "Category", "Note", "ID"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub note: String,
}

/// Rows for `tx list`, newest first. Defaults to the current month unless
/// `--month` or `--all` is given.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let period = if sub.get_flag("all") {
        None
    } else {
        Some(match sub.get_one::<String>("month") {
            Some(m) => parse_month(m)?,
            None => Period::containing(today()),
        })
    };
    let filter = TransactionFilter {
        period,
        category_id: sub.get_one::<String>("category").map(|s| s.trim().to_string()),
        limit: sub.get_one::<usize>("limit").copied(),
    };
    let currency = settings::get_currency(conn)?;
    let names: HashMap<String, String> = categories::get_categories(conn)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let data = transactions::list_transactions(conn, &filter)?
        .into_iter()
        .map(|t| {
            let category = names
                .get(&t.category_id)
                .cloned()
                .unwrap_or_else(|| "Uncategorized".to_string());
            TransactionRow {
                kind: t.flow().to_string(),
                date: t.date.to_string(),
                amount: fmt_money(&t.amount, &currency),
                category,
                id: t.id,
                note: t.note.unwrap_or_default(),
            }
        })
        .collect();
    Ok(data)
}
