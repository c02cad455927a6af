// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pennywise::store::settings;
use pennywise::utils::{Currency, fmt_money, fmt_percent, parse_weekday};
use pennywise::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["pennywise", "settings"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("settings", m)) = matches.subcommand() else {
        panic!("no settings subcommand");
    };
    commands::settings::handle(conn, m)
}

#[test]
fn onboarding_flag_reads_stored_value_directly() {
    let conn = setup();
    assert!(!settings::is_onboarding_completed(&conn).unwrap());
    settings::set_value(&conn, settings::ONBOARDING_COMPLETED, "false").unwrap();
    assert!(!settings::is_onboarding_completed(&conn).unwrap());
    settings::set_value(&conn, settings::ONBOARDING_COMPLETED, "yes").unwrap();
    assert!(!settings::is_onboarding_completed(&conn).unwrap());

    run(&conn, &["onboarding", "--completed", "true"]).unwrap();
    assert!(settings::is_onboarding_completed(&conn).unwrap());
}

#[test]
fn currency_defaults_to_usd_and_persists() {
    let conn = setup();
    assert_eq!(settings::get_currency(&conn).unwrap(), Currency::default());

    run(&conn, &["currency", "--code", "eur"]).unwrap();
    let c = settings::get_currency(&conn).unwrap();
    assert_eq!(c.code, "EUR");
    assert_eq!(c.symbol, "€");

    run(&conn, &["currency", "--code", "SEK", "--symbol", "kr "]).unwrap();
    assert_eq!(settings::load(&conn).unwrap().currency.symbol, "kr ");

    assert!(run(&conn, &["currency", "--code", "EURO"]).is_err());
}

#[test]
fn money_formatting_uses_symbol_and_two_places() {
    let usd = Currency::default();
    assert_eq!(fmt_money(&Decimal::new(123450, 2), &usd), "$1234.50");
    assert_eq!(fmt_money(&Decimal::from(-50), &usd), "-$50.00");
    assert_eq!(fmt_money(&Decimal::new(6, 3), &usd), "$0.01");
    assert_eq!(fmt_money(&Decimal::ZERO, &Currency::from_code("inr")), "₹0.00");
    assert_eq!(fmt_money(&Decimal::ONE, &Currency::from_code("XYZ")), "XYZ 1.00");
    assert_eq!(fmt_percent(&Decimal::new(33333, 3)), "33.3%");
}

#[test]
fn weekday_accepts_numbers_and_names() {
    assert_eq!(parse_weekday("1").unwrap(), 1);
    assert_eq!(parse_weekday("7").unwrap(), 7);
    assert_eq!(parse_weekday("Friday").unwrap(), 5);
    assert_eq!(parse_weekday("sun").unwrap(), 7);
    assert!(parse_weekday("0").is_err());
    assert!(parse_weekday("someday").is_err());
}
