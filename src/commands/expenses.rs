// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{params, Connection};

use crate::engine::normalize;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| normalize::UNCATEGORIZED.to_string());
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw.trim())?,
        None => chrono::Local::now().date_naive(),
    };
    let note = sub.get_one::<String>("note").map(|s| s.trim().to_string());
    conn.execute(
        "INSERT INTO expenses(amount, category, date, note) VALUES (?1,?2,?3,?4)",
        params![amount.to_string(), category, date.to_string(), note],
    )?;
    println!("Added expense {} in {} on {}", amount, category, date);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let snapshot = crate::db::load_snapshot(conn)?;
    let month = sub.get_one::<String>("month").map(|s| s.trim().to_string());

    let expenses: Vec<_> = snapshot
        .expenses
        .iter()
        .filter(|e| match (&month, e.occurred_at) {
            (Some(m), Some(at)) => at.format("%Y-%m").to_string() == *m,
            (Some(_), None) => false,
            (None, _) => true,
        })
        .collect();

    if maybe_print_json(json_flag, jsonl_flag, &expenses)? {
        return Ok(());
    }
    let rows = expenses
        .into_iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.occurred_at
                    .map(|at| at.date().to_string())
                    .unwrap_or_else(|| "N/A".into()),
                e.category.clone(),
                fmt_money(&e.amount),
                e.note.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Date", "Category", "Amount", "Note"], rows)
    );
    Ok(())
}
