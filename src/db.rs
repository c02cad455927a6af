// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::Flow;
use crate::store::settings;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Pennywise", "pennywise"));

/// Overrides the platform data location when set.
pub const DB_ENV: &str = "PENNYWISE_DB";

/// (id, name, color, icon, kind) seeded on first run.
pub const DEFAULT_CATEGORIES: [(&str, &str, &str, &str, Flow); 14] = [
    ("food", "Food & Dining", "#FF6B6B", "restaurant", Flow::Expense),
    ("transport", "Transportation", "#4ECDC4", "car", Flow::Expense),
    ("shopping", "Shopping", "#45B7D1", "cart", Flow::Expense),
    ("entertainment", "Entertainment", "#96CEB4", "film", Flow::Expense),
    ("bills", "Bills & Utilities", "#FFEAA7", "receipt", Flow::Expense),
    ("health", "Health", "#DDA0DD", "medkit", Flow::Expense),
    ("education", "Education", "#98D8C8", "school", Flow::Expense),
    ("other_expense", "Other", "#B0B0B0", "ellipsis-horizontal", Flow::Expense),
    ("salary", "Salary", "#2ECC71", "briefcase", Flow::Income),
    ("freelance", "Freelance", "#3498DB", "laptop", Flow::Income),
    ("investment", "Investment", "#9B59B6", "trending-up", Flow::Income),
    ("gift", "Gift", "#E67E22", "gift", Flow::Income),
    ("refund", "Refund", "#1ABC9C", "return-down-back", Flow::Income),
    ("other_income", "Other Income", "#95A5A6", "cash", Flow::Income),
];

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("pennywise.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    open_at(&path)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// Create tables if missing and seed default categories once.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        color TEXT NOT NULL,
        icon TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        amount TEXT NOT NULL,
        category_id TEXT NOT NULL,
        date TEXT NOT NULL,
        note TEXT,
        is_income INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE RESTRICT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);

    CREATE TABLE IF NOT EXISTS recurring_transactions(
        id TEXT PRIMARY KEY,
        amount TEXT NOT NULL,
        is_income INTEGER NOT NULL,
        note TEXT,
        category_id TEXT NOT NULL,
        recurrence_type TEXT NOT NULL CHECK(recurrence_type IN ('weekly','monthly','yearly')),
        day INTEGER,
        month INTEGER,
        weekday INTEGER,
        last_processed TEXT,
        next_due TEXT,
        active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE RESTRICT
    );

    CREATE TABLE IF NOT EXISTS monthly_budgets(
        year INTEGER NOT NULL,
        month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
        amount TEXT NOT NULL,
        PRIMARY KEY(year, month)
    );
    "#,
    )?;
    seed_default_categories(conn)?;
    Ok(())
}

fn seed_default_categories(conn: &mut Connection) -> Result<()> {
    if settings::get_flag(conn, settings::CATEGORIES_SEEDED)? {
        return Ok(());
    }
    let tx = conn.transaction()?;
    for (id, name, color, icon, kind) in DEFAULT_CATEGORIES {
        tx.execute(
            "INSERT OR IGNORE INTO categories(id, name, color, icon, kind) VALUES (?1,?2,?3,?4,?5)",
            params![id, name, color, icon, kind.as_str()],
        )?;
    }
    settings::set_flag(&tx, settings::CATEGORIES_SEEDED, true)?;
    tx.commit()?;
    info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
    Ok(())
}
