// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::process::ExitCode;

use anyhow::Result;
use tracing::{error, warn};

use pennywise::{LedgerError, cli, commands, db, utils};

fn run() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;

    // Every start brings recurring transactions up to date before anything
    // reads from the store; `recurring process` does this itself.
    let explicit_process = matches!(
        matches.subcommand(),
        Some(("recurring", sub)) if matches!(sub.subcommand(), Some(("process", _)))
    );
    // A failed pass is reported but never blocks the requested command.
    if !explicit_process {
        match commands::recurring::run_due(&mut conn, utils::today()) {
            Ok(summary) if summary.materialized > 0 => println!(
                "Added {} recurring transaction(s) that came due",
                summary.materialized
            ),
            Ok(_) => {}
            Err(err) => {
                warn!(error = ?err, "startup recurring pass failed");
                eprintln!("Warning: {}", describe(&err));
            }
        }
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub)?,
        Some(("recurring", sub)) => commands::recurring::handle(&mut conn, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<LedgerError>() {
        Some(e @ LedgerError::Storage(_)) => format!("{} ({})", e.user_message(), err.root_cause()),
        Some(e) => e.user_message(),
        None => format!("{:#}", err),
    }
}

fn main() -> ExitCode {
    utils::init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = ?err, "command failed");
            eprintln!("Error: {}", describe(&err));
            ExitCode::FAILURE
        }
    }
}
