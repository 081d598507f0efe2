// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};

use crate::engine::formulas::{position, sell, sip_projection, SaleOutcome};
use crate::models::{SipStatus, StockHolding, StockStatus};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle_sip(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => sip_add(conn, sub)?,
        Some(("list", sub)) => sip_list(conn, sub)?,
        Some(("complete", sub)) => sip_complete(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn handle_stock(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => stock_add(conn, sub)?,
        Some(("list", sub)) => stock_list(conn, sub)?,
        Some(("sell", sub)) => stock_sell(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn sip_add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let monthly = parse_decimal(sub.get_one::<String>("monthly").unwrap().trim())?;
    let rate = parse_decimal(sub.get_one::<String>("rate").unwrap().trim())?;
    let duration: u32 = sub.get_one::<String>("duration").unwrap().trim().parse()?;
    let start = match sub.get_one::<String>("start") {
        Some(raw) => parse_date(raw.trim())?,
        None => chrono::Local::now().date_naive(),
    };
    conn.execute(
        "INSERT INTO sips(name, monthly_amount, annual_return_rate, duration_months, start_date)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            name,
            monthly.to_string(),
            rate.to_string(),
            duration,
            start.to_string()
        ],
    )?;
    println!(
        "Added SIP {} at {}/month for {} months",
        name, monthly, duration
    );
    Ok(())
}

fn sip_list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let snapshot = crate::db::load_snapshot(conn)?;
    let today = chrono::Local::now().date_naive();

    let projected: Vec<_> = snapshot
        .sips
        .iter()
        .map(|s| (s, sip_projection(s, today)))
        .collect();
    if json_flag || jsonl_flag {
        let values: Vec<serde_json::Value> = projected
            .iter()
            .map(|(s, p)| {
                serde_json::json!({
                    "sip": s,
                    "projection": p,
                })
            })
            .collect();
        maybe_print_json(json_flag, jsonl_flag, &values)?;
        return Ok(());
    }
    let rows = projected
        .into_iter()
        .map(|(s, p)| {
            vec![
                s.id.to_string(),
                s.name.clone(),
                fmt_money(&s.monthly_amount),
                format!("{}%", s.annual_return_rate),
                format!("{}/{}", p.months_elapsed, s.duration_months),
                fmt_money(&p.total_invested),
                fmt_money(&p.future_value),
                format!("{}%", p.display_progress()),
                s.status.as_str().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Name", "Monthly", "Rate", "Months", "Invested", "Est. Value", "Progress",
                "Status"
            ],
            rows
        )
    );
    Ok(())
}

fn sip_complete(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = sub.get_one::<String>("id").unwrap().trim().parse()?;
    let updated = conn.execute(
        "UPDATE sips SET status=?1 WHERE id=?2",
        params![SipStatus::Completed.as_str(), id],
    )?;
    if updated == 0 {
        return Err(anyhow!("SIP {} not found", id));
    }
    println!("SIP {} marked Completed", id);
    Ok(())
}

fn stock_add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let quantity = parse_decimal(sub.get_one::<String>("quantity").unwrap().trim())?.abs();
    let buy_price = parse_decimal(sub.get_one::<String>("buy-price").unwrap().trim())?;
    let current_price = parse_decimal(sub.get_one::<String>("current-price").unwrap().trim())?;
    let date = sub
        .get_one::<String>("date")
        .map(|s| parse_date(s.trim()))
        .transpose()?;
    conn.execute(
        "INSERT INTO stocks(name, quantity, buy_price, current_price, buy_date)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            name,
            quantity.to_string(),
            buy_price.to_string(),
            current_price.to_string(),
            date.map(|d| d.to_string())
        ],
    )?;
    println!("Added holding {} x {} @ {}", quantity, name, buy_price);
    Ok(())
}

fn stock_list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let snapshot = crate::db::load_snapshot(conn)?;

    let economics: Vec<_> = snapshot
        .stocks
        .iter()
        .map(|s| (s, position(s)))
        .collect();
    if json_flag || jsonl_flag {
        let values: Vec<serde_json::Value> = economics
            .iter()
            .map(|(s, p)| {
                serde_json::json!({
                    "holding": s,
                    "economics": p,
                })
            })
            .collect();
        maybe_print_json(json_flag, jsonl_flag, &values)?;
        return Ok(());
    }
    let rows = economics
        .into_iter()
        .map(|(s, p)| {
            vec![
                s.id.to_string(),
                s.name.clone(),
                format!("{}", s.quantity),
                fmt_money(&s.buy_price),
                fmt_money(&s.current_price),
                fmt_money(&p.total_invested),
                fmt_money(&p.current_value),
                format!("{} ({}%)", fmt_money(&p.gain_loss), p.gain_loss_percent),
                s.status.as_str().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Name", "Qty", "Buy", "Current", "Invested", "Value", "Gain/Loss", "Status"
            ],
            rows
        )
    );
    Ok(())
}

fn stock_sell(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = sub.get_one::<String>("id").unwrap().trim().parse()?;
    let quantity = parse_decimal(sub.get_one::<String>("quantity").unwrap().trim())?;
    let price = parse_decimal(sub.get_one::<String>("price").unwrap().trim())?;
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw.trim())?,
        None => chrono::Local::now().date_naive(),
    };

    let snapshot = crate::db::load_snapshot(conn)?;
    let holding = snapshot
        .stocks
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| anyhow!("Holding {} not found", id))?;

    match sell(holding, quantity, price, date) {
        Some(SaleOutcome::Full(sold)) => {
            update_sold(conn, &sold)?;
            println!("Sold all {} of {} @ {}", sold.quantity, sold.name, price);
        }
        Some(SaleOutcome::Partial { retained, sold }) => {
            conn.execute(
                "UPDATE stocks SET quantity=?1 WHERE id=?2",
                params![retained.quantity.to_string(), retained.id],
            )?;
            conn.execute(
                "INSERT INTO stocks(name, quantity, buy_price, current_price, buy_date, status,
                                    sell_quantity, sell_price, sell_date)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
                params![
                    sold.name,
                    sold.quantity.to_string(),
                    sold.buy_price.to_string(),
                    sold.current_price.to_string(),
                    sold.buy_date.map(|d| d.to_string()),
                    StockStatus::Sold.as_str(),
                    sold.sell_quantity.map(|q| q.to_string()),
                    sold.sell_price.map(|p| p.to_string()),
                    sold.sell_date.map(|d| d.to_string())
                ],
            )?;
            println!(
                "Sold {} of {}; {} remain",
                sold.quantity, sold.name, retained.quantity
            );
        }
        None => {
            return Err(anyhow!(
                "Cannot sell {} of holding {} (quantity {}, status {})",
                quantity,
                id,
                holding.quantity,
                holding.status.as_str()
            ));
        }
    }
    Ok(())
}

fn update_sold(conn: &Connection, sold: &StockHolding) -> Result<()> {
    conn.execute(
        "UPDATE stocks SET status=?1, sell_quantity=?2, sell_price=?3, sell_date=?4 WHERE id=?5",
        params![
            StockStatus::Sold.as_str(),
            sold.sell_quantity.map(|q| q.to_string()),
            sold.sell_price.map(|p| p.to_string()),
            sold.sell_date.map(|d| d.to_string()),
            sold.id
        ],
    )?;
    Ok(())
}
