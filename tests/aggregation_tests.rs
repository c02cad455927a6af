// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pennywise::aggregation::{
    PeriodTotals, category_breakdown, category_totals, monthly_series, totals_for_period,
};
use pennywise::models::{Category, Flow, Transaction, UNCATEGORIZED_ID};
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn tx(amount: &str, category: &str, date: NaiveDate, is_income: bool) -> Transaction {
    Transaction {
        id: format!("{}-{}-{}", category, date, amount),
        amount: dec(amount),
        category_id: category.into(),
        date,
        note: None,
        is_income,
    }
}

fn cat(id: &str, name: &str, kind: Flow) -> Category {
    Category {
        id: id.into(),
        name: name.into(),
        color: "#FF5722".into(),
        icon: "pricetag".into(),
        kind,
    }
}

fn sample() -> (Vec<Transaction>, Vec<Category>) {
    let cats = vec![
        cat("food", "Food & Dining", Flow::Expense),
        cat("bills", "Bills & Utilities", Flow::Expense),
        cat("salary", "Salary", Flow::Income),
    ];
    let txs = vec![
        tx("3000.00", "salary", d(2024, 3, 1), true),
        tx("42.50", "food", d(2024, 3, 1), false),
        tx("17.25", "food", d(2024, 3, 14), false),
        tx("120.00", "bills", d(2024, 3, 31), false),
        tx("9.99", "deleted-cat", d(2024, 3, 20), false),
        tx("500.00", "bills", d(2024, 4, 1), false),
        tx("75.00", "food", d(2024, 2, 29), false),
    ];
    (txs, cats)
}

#[test]
fn empty_input_gives_zero_totals() {
    let totals = totals_for_period(&[], d(2024, 3, 1), d(2024, 3, 31));
    assert_eq!(totals, PeriodTotals::default());
    assert_eq!(totals.net, Decimal::ZERO);
    assert!(category_totals(&[], &[], d(2024, 3, 1), d(2024, 3, 31), Flow::Expense).is_empty());
}

#[test]
fn period_bounds_are_inclusive() {
    let (txs, _) = sample();
    let totals = totals_for_period(&txs, d(2024, 3, 1), d(2024, 3, 31));
    assert_eq!(totals.income_total, dec("3000.00"));
    assert_eq!(totals.expense_total, dec("189.74"));
    assert_eq!(totals.net, dec("2810.26"));
    assert_eq!(totals.net, totals.income_total - totals.expense_total);
}

#[test]
fn net_can_be_negative() {
    let txs = vec![
        tx("10", "salary", d(2024, 5, 2), true),
        tx("25", "food", d(2024, 5, 3), false),
    ];
    let totals = totals_for_period(&txs, d(2024, 5, 1), d(2024, 5, 31));
    assert_eq!(totals.net, dec("-15"));
}

#[test]
fn category_sums_match_expense_total() {
    let (txs, cats) = sample();
    let (start, end) = (d(2024, 3, 1), d(2024, 3, 31));
    let by_cat = category_totals(&txs, &cats, start, end, Flow::Expense);
    let sum: Decimal = by_cat.iter().map(|c| c.total).sum();
    assert_eq!(sum, totals_for_period(&txs, start, end).expense_total);

    let lookup = |id: &str| by_cat.iter().find(|c| c.category_id == id).map(|c| c.total);
    assert_eq!(lookup("food"), Some(dec("59.75")));
    assert_eq!(lookup("bills"), Some(dec("120.00")));
    assert_eq!(lookup(UNCATEGORIZED_ID), Some(dec("9.99")));
    assert_eq!(lookup("salary"), None);
}

#[test]
fn breakdown_is_sorted_and_resolves_unknown_categories() {
    let (txs, cats) = sample();
    let shares = category_breakdown(&txs, &cats, d(2024, 3, 1), d(2024, 3, 31), Flow::Expense);
    let names: Vec<_> = shares.iter().map(|s| s.category.name.as_str()).collect();
    assert_eq!(names, vec!["Bills & Utilities", "Food & Dining", "Uncategorized"]);
    assert_eq!(shares[2].category.id, UNCATEGORIZED_ID);

    let pct: Decimal = shares.iter().map(|s| s.percent).sum();
    assert!((pct - Decimal::ONE_HUNDRED).abs() < dec("0.0001"));
}

#[test]
fn breakdown_of_income_only_sees_income() {
    let (txs, cats) = sample();
    let shares = category_breakdown(&txs, &cats, d(2024, 3, 1), d(2024, 3, 31), Flow::Income);
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].category.id, "salary");
    assert_eq!(shares[0].percent, Decimal::ONE_HUNDRED);
}

#[test]
fn monthly_series_has_twelve_zero_filled_points() {
    let (mut txs, _) = sample();
    txs.push(tx("1.00", "food", d(2023, 12, 31), false));
    let series = monthly_series(&txs, 2024, Flow::Expense);
    assert_eq!(series.len(), 12);
    assert_eq!(
        series.iter().map(|p| p.month).collect::<Vec<_>>(),
        (1..=12).collect::<Vec<_>>()
    );
    assert_eq!(series[0].total, Decimal::ZERO);
    assert_eq!(series[1].total, dec("75.00"));
    assert_eq!(series[2].total, dec("189.74"));
    assert_eq!(series[3].total, dec("500.00"));
    assert!(series[4..].iter().all(|p| p.total.is_zero()));

    let empty = monthly_series(&[], 2024, Flow::Income);
    assert_eq!(empty.len(), 12);
    assert!(empty.iter().all(|p| p.total.is_zero()));
}

#[test]
fn huge_sums_saturate_instead_of_overflowing() {
    let txs = vec![
        Transaction {
            amount: Decimal::MAX,
            ..tx("1", "food", d(2024, 3, 2), false)
        },
        Transaction {
            amount: Decimal::MAX,
            ..tx("1", "food", d(2024, 3, 3), false)
        },
        tx("10", "salary", d(2024, 3, 4), true),
    ];
    let (start, end) = (d(2024, 3, 1), d(2024, 3, 31));
    let (_, cats) = sample();

    let totals = totals_for_period(&txs, start, end);
    assert_eq!(totals.expense_total, Decimal::MAX);
    assert_eq!(totals.net, dec("10") - Decimal::MAX);

    let by_cat = category_totals(&txs, &cats, start, end, Flow::Expense);
    assert_eq!(by_cat.len(), 1);
    assert_eq!(by_cat[0].total, Decimal::MAX);

    let shares = category_breakdown(&txs, &cats, start, end, Flow::Expense);
    assert_eq!(shares[0].percent, Decimal::ONE_HUNDRED);

    let series = monthly_series(&txs, 2024, Flow::Expense);
    assert_eq!(series[2].total, Decimal::MAX);
}
