// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pennywise::models::{Flow, NewRecurring, NewTransaction, Schedule};
use pennywise::store::categories::{self, NewCategory};
use pennywise::store::{recurring, settings, transactions};
use pennywise::{LedgerError, cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn expense(conn: &Connection, category: &str) {
    transactions::add_transaction(
        conn,
        NewTransaction {
            amount: Decimal::new(1250, 2),
            category_id: category.into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            note: Some("lunch".into()),
            is_income: false,
        },
    )
    .unwrap();
}

#[test]
fn defaults_are_seeded() {
    let conn = setup();
    let cats = categories::get_categories(&conn).unwrap();
    assert_eq!(cats.len(), 14);
    assert_eq!(cats.iter().filter(|c| c.kind == Flow::Expense).count(), 8);
    assert_eq!(cats.iter().filter(|c| c.kind == Flow::Income).count(), 6);
    assert!(settings::get_flag(&conn, settings::CATEGORIES_SEEDED).unwrap());
}

#[test]
fn defaults_are_seeded_only_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pennywise.sqlite");
    {
        let conn = db::open_at(&path).unwrap();
        categories::delete_category(&conn, "gift").unwrap();
    }
    let conn = db::open_at(&path).unwrap();
    assert!(categories::get_category(&conn, "gift").unwrap().is_none());
    assert_eq!(categories::get_categories(&conn).unwrap().len(), 13);
}

#[test]
fn referenced_category_cannot_be_deleted() {
    let conn = setup();
    expense(&conn, "food");
    let err = categories::delete_category(&conn, "food").unwrap_err();
    match err {
        LedgerError::CategoryInUse {
            id,
            transactions,
            recurring,
        } => {
            assert_eq!(id, "food");
            assert_eq!(transactions, 1);
            assert_eq!(recurring, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(categories::get_category(&conn, "food").unwrap().is_some());

    categories::delete_category(&conn, "other_income").unwrap();
    assert!(categories::get_category(&conn, "other_income").unwrap().is_none());
}

#[test]
fn recurring_reference_also_blocks_delete() {
    let conn = setup();
    recurring::add_recurring_transaction(
        &conn,
        NewRecurring {
            amount: Decimal::from(15),
            is_income: false,
            note: Some("Streaming".into()),
            category_id: "entertainment".into(),
            schedule: Schedule::Monthly { day: 3 },
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        },
    )
    .unwrap();
    let err = categories::delete_category(&conn, "entertainment").unwrap_err();
    assert!(matches!(
        err,
        LedgerError::CategoryInUse { recurring: 1, transactions: 0, .. }
    ));
    assert!(err.user_message().contains("entertainment"));
}

#[test]
fn deleting_unknown_category_is_not_found() {
    let conn = setup();
    assert!(matches!(
        categories::delete_category(&conn, "nope"),
        Err(LedgerError::CategoryNotFound(_))
    ));
}

#[test]
fn add_validates_and_rejects_duplicate_ids() {
    let conn = setup();
    let new = |id: Option<&str>, color: &str| NewCategory {
        id: id.map(String::from),
        name: "Pets".into(),
        color: color.into(),
        icon: "paw".into(),
        kind: Flow::Expense,
    };
    let bad = categories::add_category(&conn, new(None, "orange")).unwrap_err();
    assert!(matches!(bad, LedgerError::Validation(_)));

    let added = categories::add_category(&conn, new(Some("pets"), "#AA7722")).unwrap();
    assert_eq!(added.id, "pets");
    let dup = categories::add_category(&conn, new(Some("pets"), "#AA7722")).unwrap_err();
    assert!(matches!(dup, LedgerError::Validation(_)));

    let generated = categories::add_category(&conn, new(None, "#AA7722")).unwrap();
    assert!(!generated.id.is_empty());
    assert_ne!(generated.id, "pets");
}

#[test]
fn update_keeps_references_valid() {
    let conn = setup();
    expense(&conn, "food");
    let mut food = categories::require_category(&conn, "food").unwrap();
    food.name = "Groceries".into();
    categories::update_category(&conn, &food).unwrap();
    assert_eq!(
        categories::require_category(&conn, "food").unwrap().name,
        "Groceries"
    );
    assert_eq!(categories::usage(&conn, "food").unwrap(), (1, 0));
}

#[test]
fn cli_rm_surfaces_in_use_error() {
    let conn = setup();
    expense(&conn, "food");
    let matches = cli::build_cli().get_matches_from(["pennywise", "category", "rm", "--id", "food"]);
    let Some(("category", cat_m)) = matches.subcommand() else {
        panic!("no category subcommand");
    };
    let err = commands::categories::handle(&conn, cat_m).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::CategoryInUse { .. })
    ));
}
