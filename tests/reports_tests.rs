// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pennywise::commands::doctor::find_issues;
use pennywise::commands::reports::{period_breakdown, period_summary, year_trend};
use pennywise::db;
use pennywise::models::{Flow, NewTransaction};
use pennywise::period::Period;
use pennywise::store::{budgets, transactions};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    for (amount, category, date, income) in [
        ("3200.00", "salary", "2024-03-01", true),
        ("400.00", "freelance", "2024-03-18", true),
        ("210.40", "food", "2024-03-05", false),
        ("89.60", "transport", "2024-03-12", false),
        ("700.00", "bills", "2024-03-31", false),
        ("55.00", "food", "2024-04-02", false),
    ] {
        transactions::add_transaction(
            &conn,
            NewTransaction {
                amount: Decimal::from_str_exact(amount).unwrap(),
                category_id: category.into(),
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                note: None,
                is_income: income,
            },
        )
        .unwrap();
    }
    conn
}

#[test]
fn summary_combines_totals_and_budget() {
    let conn = setup();
    let march = Period::new(2024, 3).unwrap();
    budgets::set_budget(&conn, march, Decimal::from(800)).unwrap();

    let s = period_summary(&conn, march).unwrap();
    assert_eq!(s.period, "2024-03");
    assert_eq!(s.totals.income_total, Decimal::from(3600));
    assert_eq!(s.totals.expense_total, Decimal::from(1000));
    assert_eq!(s.totals.net, Decimal::from(2600));
    assert!(s.budget.status.is_over_budget);
    assert_eq!(s.budget.status.remaining, Decimal::from(-200));

    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(json["period"], "2024-03");
    assert!(json.get("income_total").is_some());
    assert_eq!(json["budget"]["is_over_budget"], true);
}

#[test]
fn breakdown_is_largest_first() {
    let conn = setup();
    let shares = period_breakdown(&conn, Period::new(2024, 3).unwrap(), Flow::Expense).unwrap();
    let ids: Vec<_> = shares.iter().map(|s| s.category.id.as_str()).collect();
    assert_eq!(ids, vec!["bills", "food", "transport"]);
    assert_eq!(shares[0].percent, Decimal::from(70));

    let income = period_breakdown(&conn, Period::new(2024, 3).unwrap(), Flow::Income).unwrap();
    assert_eq!(income.len(), 2);
    assert_eq!(income[0].category.name, "Salary");
}

#[test]
fn trend_has_a_point_per_month() {
    let conn = setup();
    let points = year_trend(&conn, 2024).unwrap();
    assert_eq!(points.len(), 12);
    assert_eq!(points[2].month, 3);
    assert_eq!(points[2].income, Decimal::from(3600));
    assert_eq!(points[2].expense, Decimal::from(1000));
    assert_eq!(points[3].expense, Decimal::from(55));
    assert!(points[0].income.is_zero() && points[0].expense.is_zero());
    assert!(year_trend(&conn, 2023).unwrap().iter().all(|p| p.expense.is_zero()));
}

#[test]
fn doctor_reports_orphans_and_overdue_schedules() {
    let conn = setup();
    assert!(find_issues(&conn, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        .unwrap()
        .is_empty());

    conn.execute_batch(
        "PRAGMA foreign_keys = OFF;
         INSERT INTO transactions(id, amount, category_id, date, is_income)
             VALUES ('t-orphan', '12', 'ghost', '2024-05-01', 0);
         INSERT INTO recurring_transactions(id, amount, is_income, category_id, recurrence_type, day, next_due)
             VALUES ('r-late', '9.99', 0, 'entertainment', 'monthly', 1, '2024-04-01');
         PRAGMA foreign_keys = ON;",
    )
    .unwrap();
    let issues = find_issues(&conn, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).unwrap();
    let labels: Vec<_> = issues.iter().map(|r| r[0].as_str()).collect();
    assert!(labels.contains(&"orphaned_category"));
    assert!(labels.contains(&"recurring_overdue"));
    assert_eq!(issues.len(), 2);
}
