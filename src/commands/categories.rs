// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Flow;
use crate::store::categories::{self, NewCategory};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            categories::delete_category(conn, id)
                .with_context(|| format!("Could not remove category '{}'", id))?;
            println!("Removed category '{}'", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind: Flow = sub.get_one::<String>("kind").unwrap().parse()?;
    let category = categories::add_category(
        conn,
        NewCategory {
            id: sub.get_one::<String>("id").cloned(),
            name: sub.get_one::<String>("name").unwrap().clone(),
            color: sub.get_one::<String>("color").unwrap().clone(),
            icon: sub.get_one::<String>("icon").unwrap().clone(),
            kind,
        },
    )?;
    println!(
        "Added {} category '{}' (id: {})",
        category.kind, category.name, category.id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind = match sub.get_one::<String>("kind") {
        Some(k) => Some(k.parse::<Flow>()?),
        None => None,
    };
    let data: Vec<_> = categories::get_categories(conn)?
        .into_iter()
        .filter(|c| kind.is_none_or(|k| c.kind == k))
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|c| vec![c.id, c.name, c.kind.to_string(), c.color, c.icon])
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Kind", "Color", "Icon"], rows)
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut category = categories::require_category(conn, id)?;
    if let Some(name) = sub.get_one::<String>("name") {
        category.name = name.trim().to_string();
    }
    if let Some(color) = sub.get_one::<String>("color") {
        category.color = color.trim().to_string();
    }
    if let Some(icon) = sub.get_one::<String>("icon") {
        category.icon = icon.trim().to_string();
    }
    categories::update_category(conn, &category)?;
    println!("Updated category '{}'", category.id);
    Ok(())
}
