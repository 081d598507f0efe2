// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::engine::normalize::all_records;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("records", sub)) => export_records(conn, sub),
        _ => Ok(()),
    }
}

fn export_records(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let snapshot = crate::db::load_snapshot(conn)?;
    let records = all_records(&snapshot);

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["kind", "date", "category", "amount", "status"])?;
            for r in &records {
                wtr.write_record([
                    r.kind.as_str().to_string(),
                    r.occurred_at
                        .map(|at| at.date().to_string())
                        .unwrap_or_default(),
                    r.category.clone(),
                    r.amount.to_string(),
                    r.status.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<serde_json::Value> = records
                .iter()
                .map(|r| {
                    json!({
                        "kind": r.kind.as_str(),
                        "date": r.occurred_at.map(|at| at.date().to_string()),
                        "category": r.category,
                        "amount": r.amount,
                        "status": r.status,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} records to {}", records.len(), out);
    Ok(())
}
