// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use super::new_id;
use crate::error::LedgerError;
use crate::models::{Category, Flow};

/// Input for [`add_category`]. A missing `id` gets a generated one.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub id: Option<String>,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub kind: Flow,
}

fn map_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    let kind: String = r.get(4)?;
    let kind = kind
        .parse::<Flow>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        color: r.get(2)?,
        icon: r.get(3)?,
        kind,
    })
}

pub fn validate_color(color: &str) -> Result<(), LedgerError> {
    let hex = color.strip_prefix('#').unwrap_or("");
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(LedgerError::validation(format!(
            "Invalid color '{}', expected #RRGGBB",
            color
        )))
    }
}

fn validate(category: &Category) -> Result<(), LedgerError> {
    if category.id.trim().is_empty() {
        return Err(LedgerError::validation("category id must not be empty"));
    }
    if category.name.trim().is_empty() {
        return Err(LedgerError::validation("category name must not be empty"));
    }
    validate_color(&category.color)
}

pub fn get_categories(conn: &Connection) -> Result<Vec<Category>, LedgerError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, color, icon, kind FROM categories ORDER BY kind DESC, name",
    )?;
    let rows = stmt.query_map([], map_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn get_category(conn: &Connection, id: &str) -> Result<Option<Category>, LedgerError> {
    let c = conn
        .query_row(
            "SELECT id, name, color, icon, kind FROM categories WHERE id=?1",
            params![id],
            map_row,
        )
        .optional()?;
    Ok(c)
}

pub fn require_category(conn: &Connection, id: &str) -> Result<Category, LedgerError> {
    get_category(conn, id)?.ok_or_else(|| LedgerError::CategoryNotFound(id.to_string()))
}

pub fn add_category(conn: &Connection, new: NewCategory) -> Result<Category, LedgerError> {
    let category = Category {
        id: new
            .id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(new_id),
        name: new.name.trim().to_string(),
        color: new.color.trim().to_string(),
        icon: new.icon.trim().to_string(),
        kind: new.kind,
    };
    validate(&category)?;
    if get_category(conn, &category.id)?.is_some() {
        return Err(LedgerError::validation(format!(
            "category id '{}' already exists",
            category.id
        )));
    }
    conn.execute(
        "INSERT INTO categories(id, name, color, icon, kind) VALUES (?1,?2,?3,?4,?5)",
        params![
            category.id,
            category.name,
            category.color,
            category.icon,
            category.kind.as_str()
        ],
    )?;
    info!(id = %category.id, "added category");
    Ok(category)
}

pub fn update_category(conn: &Connection, category: &Category) -> Result<(), LedgerError> {
    validate(category)?;
    let n = conn.execute(
        "UPDATE categories SET name=?2, color=?3, icon=?4, kind=?5 WHERE id=?1",
        params![
            category.id,
            category.name.trim(),
            category.color.trim(),
            category.icon.trim(),
            category.kind.as_str()
        ],
    )?;
    if n == 0 {
        return Err(LedgerError::CategoryNotFound(category.id.clone()));
    }
    Ok(())
}

/// (transactions, recurring definitions) referencing `id`.
pub fn usage(conn: &Connection, id: &str) -> Result<(i64, i64), LedgerError> {
    let txs: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    let recurring: i64 = conn.query_row(
        "SELECT COUNT(*) FROM recurring_transactions WHERE category_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    Ok((txs, recurring))
}

/// Remove an unreferenced category. Fails with
/// [`LedgerError::CategoryInUse`] while anything still points at it.
pub fn delete_category(conn: &Connection, id: &str) -> Result<(), LedgerError> {
    require_category(conn, id)?;
    let (transactions, recurring) = usage(conn, id)?;
    if transactions > 0 || recurring > 0 {
        return Err(LedgerError::CategoryInUse {
            id: id.to_string(),
            transactions,
            recurring,
        });
    }
    conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    info!(id, "deleted category");
    Ok(())
}
