// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::settings;
use crate::utils::{Currency, maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let s = settings::load(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                let rows = vec![
                    vec!["Currency".into(), s.currency.code.clone()],
                    vec!["Symbol".into(), s.currency.symbol.clone()],
                    vec![
                        "Onboarding completed".into(),
                        s.onboarding_completed.to_string(),
                    ],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("currency", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().trim();
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(anyhow!("Invalid currency code '{}', expected e.g. USD", code));
            }
            let mut currency = Currency::from_code(code);
            if let Some(sym) = sub.get_one::<String>("symbol") {
                currency.symbol = sym.clone();
            }
            settings::set_currency(conn, &currency)?;
            println!("Currency set to {} ({})", currency.code, currency.symbol);
        }
        Some(("onboarding", sub)) => {
            let done = *sub.get_one::<bool>("completed").unwrap();
            settings::set_flag(conn, settings::ONBOARDING_COMPLETED, done)?;
            println!("Onboarding completed: {}", done);
        }
        _ => {}
    }
    Ok(())
}
