// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use moneylens::models::ObligationKind;
use moneylens::{cli, commands, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("expense", sub)) => commands::expenses::handle(&conn, sub)?,
        Some(("debt", sub)) => commands::debts::handle(&conn, sub)?,
        Some(("sip", sub)) => commands::investments::handle_sip(&conn, sub)?,
        Some(("stock", sub)) => commands::investments::handle_stock(&conn, sub)?,
        Some(("loan", sub)) => commands::obligations::handle_loan(&conn, sub)?,
        Some(("tax", sub)) => {
            commands::obligations::handle_obligation(&conn, ObligationKind::Tax, sub)?
        }
        Some(("violation", sub)) => {
            commands::obligations::handle_obligation(&conn, ObligationKind::Violation, sub)?
        }
        Some(("budget", sub)) => commands::budgets::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("analytics", sub)) => commands::analytics::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
