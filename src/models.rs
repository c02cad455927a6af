// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::period::days_in_month;

pub const UNCATEGORIZED_ID: &str = "uncategorized";

/// Direction of money: a transaction, a category and a report series are
/// each either income or expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Income,
    Expense,
}

impl Flow {
    pub fn from_is_income(is_income: bool) -> Self {
        if is_income { Flow::Income } else { Flow::Expense }
    }

    pub fn is_income(self) -> bool {
        matches!(self, Flow::Income)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Flow::Income => "income",
            Flow::Expense => "expense",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flow {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Flow::Income),
            "expense" => Ok(Flow::Expense),
            other => Err(LedgerError::validation(format!(
                "Unknown kind '{}' (use income|expense)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String, // #RRGGBB
    pub icon: String,
    pub kind: Flow,
}

impl Category {
    /// Stand-in for a category reference that no longer resolves.
    pub fn uncategorized(kind: Flow) -> Self {
        Self {
            id: UNCATEGORIZED_ID.to_string(),
            name: "Uncategorized".to_string(),
            color: "#9E9E9E".to_string(),
            icon: "help-circle".to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    pub category_id: String,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub is_income: bool,
}

impl Transaction {
    pub fn flow(&self) -> Flow {
        Flow::from_is_income(self.is_income)
    }
}

/// Input for a transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub category_id: String,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub is_income: bool,
}

/// When a recurring transaction falls due. Only the anchors that matter for
/// each cadence exist on its variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schedule {
    Weekly { weekday: Weekday },
    Monthly { day: u32 },
    Yearly { month: u32, day: u32 },
}

pub fn weekday_from_iso(n: u32) -> Option<Weekday> {
    match n {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

impl Schedule {
    pub fn kind(&self) -> &'static str {
        match self {
            Schedule::Weekly { .. } => "weekly",
            Schedule::Monthly { .. } => "monthly",
            Schedule::Yearly { .. } => "yearly",
        }
    }

    /// Build from the flat storage columns. Anchors irrelevant to `kind` are
    /// ignored; a missing relevant anchor is a validation error.
    pub fn from_parts(
        kind: &str,
        day: Option<u32>,
        month: Option<u32>,
        weekday: Option<u32>,
    ) -> Result<Self, LedgerError> {
        let missing = |field: &str| {
            LedgerError::validation(format!("{} schedule requires '{}'", kind.trim(), field))
        };
        let schedule = match kind.trim().to_ascii_lowercase().as_str() {
            "weekly" => {
                let n = weekday.ok_or_else(|| missing("weekday"))?;
                let weekday = weekday_from_iso(n).ok_or_else(|| {
                    LedgerError::validation(format!(
                        "weekday must be 1 (Monday) to 7 (Sunday), got {}",
                        n
                    ))
                })?;
                Schedule::Weekly { weekday }
            }
            "monthly" => Schedule::Monthly {
                day: day.ok_or_else(|| missing("day"))?,
            },
            "yearly" => Schedule::Yearly {
                month: month.ok_or_else(|| missing("month"))?,
                day: day.ok_or_else(|| missing("day"))?,
            },
            other => {
                return Err(LedgerError::validation(format!(
                    "Unknown recurrence type '{}' (use weekly|monthly|yearly)",
                    other
                )));
            }
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Flat `(kind, day, month, weekday)` columns for storage.
    pub fn to_parts(&self) -> (&'static str, Option<u32>, Option<u32>, Option<u32>) {
        match *self {
            Schedule::Weekly { weekday } => {
                ("weekly", None, None, Some(weekday.number_from_monday()))
            }
            Schedule::Monthly { day } => ("monthly", Some(day), None, None),
            Schedule::Yearly { month, day } => ("yearly", Some(day), Some(month), None),
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        match *self {
            Schedule::Weekly { .. } => Ok(()),
            Schedule::Monthly { day } => {
                if (1..=31).contains(&day) {
                    Ok(())
                } else {
                    Err(LedgerError::validation(format!(
                        "day must be between 1 and 31, got {}",
                        day
                    )))
                }
            }
            Schedule::Yearly { month, day } => {
                if !(1..=12).contains(&month) {
                    return Err(LedgerError::validation(format!(
                        "month must be between 1 and 12, got {}",
                        month
                    )));
                }
                // Leap year so that Feb 29 is accepted; it clamps in other years.
                let max = days_in_month(2000, month);
                if day == 0 || day > max {
                    return Err(LedgerError::validation(format!(
                        "day must be between 1 and {} for month {}, got {}",
                        max, month, day
                    )));
                }
                Ok(())
            }
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            Schedule::Weekly { weekday } => format!("Weekly on {}", weekday),
            Schedule::Monthly { day } => format!("Monthly on day {}", day),
            Schedule::Yearly { month, day } => format!("Yearly on {:02}-{:02}", month, day),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTransaction {
    pub id: String,
    pub amount: Decimal,
    pub is_income: bool,
    pub note: Option<String>,
    pub category_id: String,
    pub schedule: Schedule,
    pub last_processed: Option<NaiveDate>,
    pub next_due: Option<NaiveDate>,
    pub active: bool,
}

/// Input for a recurring transaction that has not been stored yet. `start`
/// is the first day an occurrence may fall on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecurring {
    pub amount: Decimal,
    pub is_income: bool,
    pub note: Option<String>,
    pub category_id: String,
    pub schedule: Schedule,
    pub start: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBudget {
    pub year: i32,
    pub month: u32,
    pub amount: Decimal,
}

/// Largest amount accepted for a transaction, recurring definition or budget.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "amount must be greater than zero, got {}",
            amount
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::validation(format!(
            "amount must not exceed {}, got {}",
            MAX_AMOUNT, amount
        )));
    }
    Ok(())
}
