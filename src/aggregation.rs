// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period totals, per-category totals and monthly trend series, computed
//! over transactions already loaded in memory. Sums saturate at
//! `Decimal::MAX` instead of overflowing.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Category, Flow, Transaction, UNCATEGORIZED_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PeriodTotals {
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category_id: String,
    pub total: Decimal,
}

/// A category total joined with its display data and its share of the
/// period's total for that flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total: Decimal,
    pub percent: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    pub month: u32,
    pub total: Decimal,
}

fn in_range(tx: &Transaction, start: NaiveDate, end: NaiveDate) -> bool {
    tx.date >= start && tx.date <= end
}

/// Income, expense and net for transactions dated within `[start, end]`.
pub fn totals_for_period(transactions: &[Transaction], start: NaiveDate, end: NaiveDate) -> PeriodTotals {
    let mut totals = PeriodTotals::default();
    for tx in transactions.iter().filter(|tx| in_range(tx, start, end)) {
        if tx.is_income {
            totals.income_total = totals.income_total.saturating_add(tx.amount);
        } else {
            totals.expense_total = totals.expense_total.saturating_add(tx.amount);
        }
    }
    totals.net = totals.income_total.saturating_sub(totals.expense_total);
    totals
}

/// Sum of `kind` transactions in `[start, end]`, grouped by category.
///
/// References to categories missing from `categories` are pooled under
/// [`UNCATEGORIZED_ID`]. The order of the result is unspecified.
pub fn category_totals(
    transactions: &[Transaction],
    categories: &[Category],
    start: NaiveDate,
    end: NaiveDate,
    kind: Flow,
) -> Vec<CategoryTotal> {
    let known: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    let mut sums: HashMap<&str, Decimal> = HashMap::new();
    for tx in transactions
        .iter()
        .filter(|tx| tx.flow() == kind && in_range(tx, start, end))
    {
        let key = if known.contains(tx.category_id.as_str()) {
            tx.category_id.as_str()
        } else {
            UNCATEGORIZED_ID
        };
        let sum = sums.entry(key).or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(tx.amount);
    }
    sums.into_iter()
        .map(|(id, total)| CategoryTotal {
            category_id: id.to_string(),
            total,
        })
        .collect()
}

/// [`category_totals`] resolved against `categories`, largest first, with
/// each entry's percentage of the flow total.
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
    start: NaiveDate,
    end: NaiveDate,
    kind: Flow,
) -> Vec<CategoryShare> {
    let by_id: HashMap<&str, &Category> = categories.iter().map(|c| (c.id.as_str(), c)).collect();
    let totals = category_totals(transactions, categories, start, end, kind);
    let grand = totals
        .iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.total));

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|t| {
            let category = by_id
                .get(t.category_id.as_str())
                .map(|c| (*c).clone())
                .unwrap_or_else(|| Category::uncategorized(kind));
            let percent = t
                .total
                .checked_div(grand)
                .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::ZERO);
            CategoryShare {
                category,
                total: t.total,
                percent,
            }
        })
        .collect();
    shares.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.name.cmp(&b.category.name)));
    shares
}

/// Twelve points, January to December, for `kind` transactions in `year`.
/// Months without activity are present with a zero total.
pub fn monthly_series(transactions: &[Transaction], year: i32, kind: Flow) -> Vec<MonthTotal> {
    let mut by_month: BTreeMap<u32, Decimal> = (1..=12).map(|m| (m, Decimal::ZERO)).collect();
    for tx in transactions
        .iter()
        .filter(|tx| tx.flow() == kind && tx.date.year() == year)
    {
        let total = by_month.entry(tx.date.month()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(tx.amount);
    }
    by_month
        .into_iter()
        .map(|(month, total)| MonthTotal { month, total })
        .collect()
}
