// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as a pretty JSON array"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn month_arg(required: bool) -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .required(required)
        .help(if required {
            "Calendar month"
        } else {
            "Calendar month (defaults to the current month)"
        })
}

fn kind_arg() -> Arg {
    Arg::new("kind")
        .long("kind")
        .value_parser(["income", "expense"])
        .default_value("expense")
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true)
}

fn schedule_args(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("every")
            .long("every")
            .value_parser(["weekly", "monthly", "yearly"])
            .required(required)
            .help("Recurrence type"),
    )
    .arg(
        Arg::new("day")
            .long("day")
            .value_parser(value_parser!(u32))
            .help("Day of month (monthly, yearly)"),
    )
    .arg(
        Arg::new("on-month")
            .long("on-month")
            .value_parser(value_parser!(u32))
            .help("Month of year, 1-12 (yearly)"),
    )
    .arg(
        Arg::new("weekday")
            .long("weekday")
            .help("1 (Monday) to 7 (Sunday), or a day name (weekly)"),
    )
}

pub fn build_cli() -> Command {
    Command::new("pennywise")
        .about("Track income and expenses, recurring transactions and monthly budgets")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database and default categories"))
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["income", "expense"])
                                .required(true),
                        )
                        .arg(Arg::new("color").long("color").default_value("#B0B0B0"))
                        .arg(Arg::new("icon").long("icon").default_value("pricetag"))
                        .arg(Arg::new("id").long("id").help("Explicit id (generated if omitted)")),
                )
                .subcommand(json_args(
                    Command::new("list").arg(
                        Arg::new("kind")
                            .long("kind")
                            .value_parser(["income", "expense"]),
                    ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("color").long("color"))
                        .arg(Arg::new("icon").long("icon")),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to today"),
                        )
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::SetTrue)
                                .help("Record as income (default is expense)"),
                        ),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .arg(month_arg(false))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("month")
                                .help("Do not restrict to a month"),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("expense"),
                        )
                        .arg(
                            Arg::new("expense")
                                .long("expense")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("recurring")
                .about("Manage recurring transactions")
                .subcommand(schedule_args(
                    Command::new("add")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("start")
                                .long("start")
                                .value_name("YYYY-MM-DD")
                                .help("First day an occurrence may fall on (defaults to today)"),
                        ),
                    true,
                ))
                .subcommand(json_args(
                    Command::new("list").arg(
                        Arg::new("active")
                            .long("active")
                            .action(ArgAction::SetTrue)
                            .help("Only active definitions"),
                    ),
                ))
                .subcommand(schedule_args(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("expense"),
                        )
                        .arg(
                            Arg::new("expense")
                                .long("expense")
                                .action(ArgAction::SetTrue),
                        ),
                    false,
                ))
                .subcommand(Command::new("pause").arg(id_arg()))
                .subcommand(Command::new("resume").arg(id_arg()))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("process")
                        .about("Materialize due occurrences")
                        .arg(
                            Arg::new("as-of")
                                .long("as-of")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to today"),
                        ),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly spending budgets")
                .subcommand(
                    Command::new("set")
                        .arg(month_arg(true))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(Command::new("clear").arg(month_arg(true)))
                .subcommand(json_args(Command::new("status").arg(month_arg(false))))
                .subcommand(json_args(Command::new("list"))),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries over a month or a year")
                .subcommand(json_args(Command::new("summary").arg(month_arg(false))))
                .subcommand(json_args(
                    Command::new("categories")
                        .arg(month_arg(false))
                        .arg(kind_arg()),
                ))
                .subcommand(json_args(
                    Command::new("trend").arg(
                        Arg::new("year")
                            .long("year")
                            .value_parser(value_parser!(i32))
                            .help("Defaults to the current year"),
                    ),
                )),
        )
        .subcommand(
            Command::new("settings")
                .about("Display preferences")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("currency")
                        .arg(Arg::new("code").long("code").required(true))
                        .arg(Arg::new("symbol").long("symbol")),
                )
                .subcommand(
                    Command::new("onboarding").arg(
                        Arg::new("completed")
                            .long("completed")
                            .value_parser(value_parser!(bool))
                            .required(true),
                    ),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}
