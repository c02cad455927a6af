// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures surfaced by the engines and the store.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error(
        "Category '{id}' is in use by {transactions} transaction(s) and {recurring} recurring transaction(s)"
    )]
    CategoryInUse {
        id: String,
        transactions: i64,
        recurring: i64,
    },
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Recurring transaction not found: {0}")]
    RecurringNotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    /// Message shown to the user. Storage failures get a generic retry hint;
    /// everything else is specific enough to act on.
    pub fn user_message(&self) -> String {
        match self {
            LedgerError::Storage(_) => {
                "Could not read or save your data. Nothing was changed; please try again.".into()
            }
            LedgerError::CategoryInUse { id, .. } => format!(
                "{}. Reassign or delete those entries before removing '{}'.",
                self, id
            ),
            other => other.to_string(),
        }
    }
}
