// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{arg, Command};

fn output_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print as a JSON document").required(false))
        .arg(arg!(--jsonl "Print as JSON lines").required(false))
}

pub fn build_cli() -> Command {
    Command::new("moneylens")
        .about("Personal finance tracking, aggregation, and reporting")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("expense")
                .about("Track expenses")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--category <CATEGORY>).required(false))
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today").required(false))
                        .arg(arg!(--note <NOTE>).required(false)),
                )
                .subcommand(output_flags(
                    Command::new("list")
                        .arg(arg!(--month <MONTH> "Restrict to YYYY-MM").required(false)),
                )),
        )
        .subcommand(
            Command::new("debt")
                .about("Track debts in both directions")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--counterparty <NAME>).required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--due <DATE>).required(false))
                        .arg(arg!(--note <NOTE>).required(false))
                        .arg(arg!(--"owed-to-me" "Money owed to me, not by me").required(false)),
                )
                .subcommand(output_flags(Command::new("list")))
                .subcommand(
                    Command::new("settle")
                        .arg(arg!(--id <ID>).required(true))
                        .arg(arg!(--status <STATUS> "Paid or Cleared").required(false)),
                ),
        )
        .subcommand(
            Command::new("sip")
                .about("Systematic investment plans")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--monthly <AMOUNT>).required(true))
                        .arg(arg!(--rate <PERCENT> "Expected annual return").required(true))
                        .arg(arg!(--duration <MONTHS>).required(true))
                        .arg(arg!(--start <DATE>).required(false)),
                )
                .subcommand(output_flags(Command::new("list")))
                .subcommand(Command::new("complete").arg(arg!(--id <ID>).required(true))),
        )
        .subcommand(
            Command::new("stock")
                .about("Stock holdings")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--quantity <QTY>).required(true))
                        .arg(arg!(--"buy-price" <PRICE>).required(true))
                        .arg(arg!(--"current-price" <PRICE>).required(true))
                        .arg(arg!(--date <DATE> "Buy date").required(false)),
                )
                .subcommand(output_flags(Command::new("list")))
                .subcommand(
                    Command::new("sell")
                        .arg(arg!(--id <ID>).required(true))
                        .arg(arg!(--quantity <QTY>).required(true))
                        .arg(arg!(--price <PRICE>).required(true))
                        .arg(arg!(--date <DATE> "Sell date, defaults to today").required(false)),
                ),
        )
        .subcommand(
            Command::new("loan")
                .about("Loans and interest payments")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--organization <NAME>).required(true))
                        .arg(arg!(--principal <AMOUNT>).required(true))
                        .arg(arg!(--rate <PERCENT> "Annual interest rate").required(true))
                        .arg(arg!(--due <DATE>).required(false))
                        .arg(arg!(--reason <REASON>).required(false)),
                )
                .subcommand(output_flags(Command::new("list")))
                .subcommand(Command::new("mark-paid").arg(arg!(--id <ID>).required(true)))
                .subcommand(Command::new("pay-interest").arg(arg!(--id <ID>).required(true))),
        )
        .subcommand(
            Command::new("tax")
                .about("Tax obligations")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--label <TYPE> "e.g. Income Tax").required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--due <DATE>).required(true))
                        .arg(arg!(--note <NOTE>).required(false)),
                )
                .subcommand(output_flags(Command::new("list")))
                .subcommand(Command::new("pay").arg(arg!(--id <ID>).required(true))),
        )
        .subcommand(
            Command::new("violation")
                .about("Traffic-violation fines")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--label <TYPE> "e.g. Speeding").required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--date <DATE> "Violation date").required(true))
                        .arg(arg!(--due <DATE> "Defaults to 30 days after the violation")
                            .required(false))
                        .arg(arg!(--note <NOTE>).required(false)),
                )
                .subcommand(output_flags(Command::new("list")))
                .subcommand(Command::new("pay").arg(arg!(--id <ID>).required(true))),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly overall budget")
                .subcommand(
                    Command::new("set")
                        .arg(arg!(--month <MONTH> "YYYY-MM").required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true)),
                )
                .subcommand(output_flags(
                    Command::new("status")
                        .arg(arg!(--month <MONTH> "YYYY-MM, defaults to this month")
                            .required(false)),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Build and export reports")
                .subcommand(output_flags(
                    Command::new("generate")
                        .arg(arg!(--type <TYPE> "monthly|category|comprehensive|comparison")
                            .required(true))
                        .arg(arg!(--start <DATE>).required(true))
                        .arg(arg!(--end <DATE>).required(true)),
                ))
                .subcommand(
                    Command::new("export")
                        .arg(arg!(--type <TYPE> "monthly|category|comprehensive|comparison")
                            .required(true))
                        .arg(arg!(--start <DATE>).required(true))
                        .arg(arg!(--end <DATE>).required(true))
                        .arg(arg!(--format <FORMAT> "json|csv|html").required(true))
                        .arg(arg!(--out <FILE>).required(true)),
                ),
        )
        .subcommand(
            Command::new("analytics")
                .about("Aggregated spending views")
                .subcommand(output_flags(Command::new("distribution")))
                .subcommand(output_flags(Command::new("weekly")))
                .subcommand(output_flags(
                    Command::new("trends")
                        .arg(arg!(--periods <N> "Number of windows, default 12").required(false))
                        .arg(arg!(--granularity <G> "day|week|month|quarter|year")
                            .required(false)),
                ))
                .subcommand(output_flags(
                    Command::new("performance")
                        .arg(arg!(--periods <N> "Number of windows, default 12").required(false))
                        .arg(arg!(--granularity <G> "day|week|month|quarter|year")
                            .required(false)),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Dump raw records")
                .subcommand(
                    Command::new("records")
                        .arg(arg!(--format <FORMAT> "csv|json").required(true))
                        .arg(arg!(--out <FILE>).required(true)),
                ),
        )
}
