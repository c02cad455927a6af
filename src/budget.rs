// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub is_set: bool,
    /// Not capped at 100. Saturates at `Decimal::MAX`.
    pub percent_used: Decimal,
    /// Negative once spending passes the budget.
    pub remaining: Decimal,
    pub is_over_budget: bool,
}

impl BudgetStatus {
    pub fn unset() -> Self {
        Self {
            is_set: false,
            percent_used: Decimal::ZERO,
            remaining: Decimal::ZERO,
            is_over_budget: false,
        }
    }

    /// `percent_used` clamped to 0..=100 for progress bars.
    pub fn progress(&self) -> Decimal {
        self.percent_used.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }
}

/// Compare a period's expense total with its budget, if one is set.
///
/// Budgets are validated as positive when stored; a non-positive value here
/// is reported as unset rather than dividing by it.
pub fn evaluate(budget: Option<Decimal>, expense_total: Decimal) -> BudgetStatus {
    match budget {
        Some(amount) if amount > Decimal::ZERO => BudgetStatus {
            is_set: true,
            percent_used: expense_total
                .checked_div(amount)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::MAX),
            remaining: amount.saturating_sub(expense_total),
            is_over_budget: expense_total > amount,
        },
        _ => BudgetStatus::unset(),
    }
}
