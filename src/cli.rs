// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn path_arg() -> Arg {
    Arg::new("path")
        .long("path")
        .short('p')
        .required(true)
        .help("CSV file with transaction_id,date,amount,account,category,vendor,policy_code")
}

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn sort_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("sort")
            .long("sort")
            .value_parser(crate::commands::SORT_FIELDS)
            .help("Column to sort by"),
    )
    .arg(
        Arg::new("desc")
            .long("desc")
            .action(ArgAction::SetTrue)
            .help("Sort descending"),
    )
}

pub fn build_cli() -> Command {
    Command::new("auditclip")
        .version(crate_version!())
        .about("Flag transactions for audit and summarize spend and policy compliance")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to an audit config JSON file"),
        )
        .subcommand(
            json_args(
                Command::new("audit")
                    .about("Run every audit check and print the summary dashboard")
                    .arg(path_arg())
                    .arg(
                        Arg::new("top")
                            .long("top")
                            .value_parser(value_parser!(usize))
                            .default_value("20")
                            .help("How many flagged transactions to list"),
                    ),
            ),
        )
        .subcommand(json_args(sort_args(
            Command::new("transactions")
                .about("List every transaction with its audit status (sorted by date unless --sort)")
                .arg(path_arg()),
        )))
        .subcommand(json_args(sort_args(
            Command::new("flagged")
                .about("List flagged transactions with their risk reasons")
                .arg(path_arg()),
        )))
        .subcommand(json_args(
            Command::new("violations")
                .about("List policy violations")
                .arg(path_arg())
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_parser(["missing", "invalid", "amount"])
                        .help("Only show one violation kind"),
                ),
        ))
        .subcommand(
            Command::new("export")
                .about("Export audit results to CSV or JSON")
                .arg(path_arg())
                .arg(
                    Arg::new("dataset")
                        .long("dataset")
                        .default_value("flagged")
                        .help("all | flagged | violations"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv | json"),
                )
                .arg(Arg::new("out").long("out").short('o').required(true)),
        )
        .subcommand(
            Command::new("insights")
                .about("Ask the narrative model to comment on flagged transactions")
                .arg(path_arg())
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize))
                        .default_value("20"),
                )
                .arg(Arg::new("model").long("model")),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect the effective audit configuration")
                .subcommand(json_args(Command::new("show"))),
        )
}
