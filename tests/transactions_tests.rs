// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pennywise::models::NewTransaction;
use pennywise::period::Period;
use pennywise::store::transactions::{self, TransactionFilter};
use pennywise::{LedgerError, cli, commands, db};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    for i in 1..=3 {
        transactions::add_transaction(
            &conn,
            NewTransaction {
                amount: Decimal::from(10 * i),
                category_id: "food".into(),
                date: NaiveDate::from_ymd_opt(2025, 1, i as u32).unwrap(),
                note: Some(format!("meal {}", i)),
                is_income: false,
            },
        )
        .unwrap();
    }
    conn
}

fn new_tx(amount: Decimal, category: &str) -> NewTransaction {
    NewTransaction {
        amount,
        category_id: category.into(),
        date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        note: None,
        is_income: false,
    }
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["pennywise", "tx", "list", "--all", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = commands::transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
            assert_eq!(rows[0].category, "Food & Dining");
            assert_eq!(rows[0].amount, "$30.00");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_month() {
    let conn = setup();
    transactions::add_transaction(&conn, new_tx(Decimal::from(99), "transport")).unwrap();
    let filter = TransactionFilter {
        period: Some(Period::new(2025, 2).unwrap()),
        ..Default::default()
    };
    let feb = transactions::list_transactions(&conn, &filter).unwrap();
    assert_eq!(feb.len(), 1);
    assert_eq!(feb[0].category_id, "transport");

    let by_cat = TransactionFilter {
        category_id: Some("food".into()),
        ..Default::default()
    };
    assert_eq!(transactions::list_transactions(&conn, &by_cat).unwrap().len(), 3);
}

#[test]
fn add_rejects_bad_input() {
    let conn = setup();
    let zero = transactions::add_transaction(&conn, new_tx(Decimal::ZERO, "food")).unwrap_err();
    assert!(matches!(zero, LedgerError::Validation(_)));
    let negative = transactions::add_transaction(&conn, new_tx(Decimal::from(-5), "food"));
    assert!(matches!(negative, Err(LedgerError::Validation(_))));
    let unknown = transactions::add_transaction(&conn, new_tx(Decimal::ONE, "ghost"));
    assert!(matches!(unknown, Err(LedgerError::CategoryNotFound(_))));
    assert_eq!(transactions::get_transactions(&conn).unwrap().len(), 3);
}

#[test]
fn stored_amounts_keep_their_precision() {
    let conn = setup();
    let tx = transactions::add_transaction(
        &conn,
        new_tx(Decimal::from_str_exact("0.10").unwrap(), "food"),
    )
    .unwrap();
    let stored: String = conn
        .query_row("SELECT amount FROM transactions WHERE id=?1", params![tx.id], |r| r.get(0))
        .unwrap();
    assert_eq!(stored, "0.10");
    let loaded = transactions::get_transaction(&conn, &tx.id).unwrap().unwrap();
    assert_eq!(loaded, tx);
}

#[test]
fn edit_and_delete() {
    let conn = setup();
    let mut tx = transactions::add_transaction(&conn, new_tx(Decimal::from(5), "food")).unwrap();
    tx.is_income = true;
    tx.category_id = "refund".into();
    transactions::update_transaction(&conn, &tx).unwrap();
    let loaded = transactions::get_transaction(&conn, &tx.id).unwrap().unwrap();
    assert!(loaded.is_income);
    assert_eq!(loaded.category_id, "refund");

    transactions::delete_transaction(&conn, &tx.id).unwrap();
    assert!(transactions::get_transaction(&conn, &tx.id).unwrap().is_none());
    assert!(matches!(
        transactions::delete_transaction(&conn, &tx.id),
        Err(LedgerError::TransactionNotFound(_))
    ));
}

#[test]
fn cli_add_records_income() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "pennywise", "tx", "add", "--amount", "2500", "--category", "salary", "--date",
        "2025-01-31", "--income", "--note", "January pay",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    commands::transactions::handle(&conn, tx_m).unwrap();
    let filter = TransactionFilter {
        category_id: Some("salary".into()),
        ..Default::default()
    };
    let rows = transactions::list_transactions(&conn, &filter).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_income);
    assert_eq!(rows[0].note.as_deref(), Some("January pay"));
}
