// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap().trim())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    conn.execute(
        "INSERT INTO budgets(month, amount) VALUES (?1,?2)
         ON CONFLICT(month) DO UPDATE SET amount=excluded.amount",
        params![month, amount.to_string()],
    )?;
    println!("Budget set for {} = {}", month, amount);
    Ok(())
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = match sub.get_one::<String>("month") {
        Some(raw) => parse_month(raw.trim())?,
        None => chrono::Local::now().date_naive().format("%Y-%m").to_string(),
    };

    let budget_s: Option<String> = conn
        .query_row(
            "SELECT amount FROM budgets WHERE month=?1",
            params![&month],
            |r| r.get(0),
        )
        .optional()?;
    let budget = match budget_s {
        Some(s) => s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid budget amount '{}' for {}", s, month))?,
        None => Decimal::ZERO,
    };

    let snapshot = crate::db::load_snapshot(conn)?;
    let spent: Decimal = snapshot
        .expenses
        .iter()
        .filter(|e| {
            e.occurred_at
                .is_some_and(|at| at.format("%Y-%m").to_string() == month)
        })
        .map(|e| e.amount)
        .sum();

    let remaining = budget - spent;
    let over_budget = remaining < Decimal::ZERO;
    let percent_used = if budget.is_zero() {
        Decimal::ZERO
    } else {
        (spent / budget * Decimal::from(100)).round_dp(1)
    };

    if json_flag || jsonl_flag {
        let value = serde_json::json!({
            "month": month,
            "budget": budget,
            "spent": spent,
            "remaining": remaining,
            "over_budget": over_budget,
            "percent_used": percent_used,
        });
        maybe_print_json(json_flag, jsonl_flag, &value)?;
        return Ok(());
    }
    let rows = vec![vec![
        month,
        fmt_money(&budget),
        fmt_money(&spent),
        fmt_money(&remaining),
        format!("{}%", percent_used),
        if over_budget { "OVER".into() } else { "ok".to_string() },
    ]];
    println!(
        "{}",
        pretty_table(
            &["Month", "Budget", "Spent", "Remaining", "Used", ""],
            rows
        )
    );
    Ok(())
}
