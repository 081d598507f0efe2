// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};

use crate::engine::formulas::deadline;
use crate::models::{DebtDirection, DebtStatus};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("settle", sub)) => settle(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let counterparty = sub.get_one::<String>("counterparty").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let due = sub
        .get_one::<String>("due")
        .map(|s| parse_date(s.trim()))
        .transpose()?;
    let note = sub.get_one::<String>("note").map(|s| s.trim().to_string());
    let direction = if sub.get_flag("owed-to-me") {
        "to_me"
    } else {
        "by_me"
    };
    conn.execute(
        "INSERT INTO debts(direction, counterparty, amount, due_date, note)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            direction,
            counterparty,
            amount.to_string(),
            due.map(|d| d.to_string()),
            note
        ],
    )?;
    println!("Added debt of {} with {}", amount, counterparty);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let snapshot = crate::db::load_snapshot(conn)?;
    if maybe_print_json(json_flag, jsonl_flag, &snapshot.debts)? {
        return Ok(());
    }
    let today = chrono::Local::now().date_naive();
    let rows = snapshot
        .debts
        .iter()
        .map(|d| {
            let due = match d.due_date {
                Some(due) => {
                    let dl = deadline(due, today);
                    if d.status != DebtStatus::Pending {
                        due.to_string()
                    } else if dl.overdue {
                        format!("{} (overdue by {}d)", due, dl.days_remaining.abs())
                    } else {
                        format!("{} ({}d left)", due, dl.days_remaining)
                    }
                }
                None => "N/A".into(),
            };
            vec![
                d.id.to_string(),
                match d.direction {
                    DebtDirection::OwedByMe => "owed by me".into(),
                    DebtDirection::OwedToMe => "owed to me".into(),
                },
                d.counterparty.clone(),
                fmt_money(&d.amount),
                due,
                d.status.as_str().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Direction", "Counterparty", "Amount", "Due", "Status"],
            rows
        )
    );
    Ok(())
}

fn settle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = sub.get_one::<String>("id").unwrap().trim().parse()?;
    let status = DebtStatus::parse(
        sub.get_one::<String>("status")
            .map(|s| s.as_str())
            .unwrap_or("Paid"),
    );
    let updated = conn.execute(
        "UPDATE debts SET status=?1 WHERE id=?2",
        params![status.as_str(), id],
    )?;
    if updated == 0 {
        return Err(anyhow!("Debt {} not found", id));
    }
    println!("Debt {} marked {}", id, status.as_str());
    Ok(())
}
