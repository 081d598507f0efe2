// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

use crate::engine::export::{encode, ExportFormat};
use crate::engine::report::{build, PeriodRange, Report, ReportType};
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("generate", sub)) => generate(conn, sub)?,
        Some(("export", sub)) => export(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_args(sub: &clap::ArgMatches) -> Result<(ReportType, PeriodRange)> {
    let raw_type = sub.get_one::<String>("type").unwrap();
    let ty = ReportType::parse(raw_type).ok_or_else(|| {
        anyhow!(
            "Unknown report type '{}' (use monthly|category|comprehensive|comparison)",
            raw_type
        )
    })?;
    let start = parse_date(sub.get_one::<String>("start").unwrap().trim())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap().trim())?;
    if end < start {
        return Err(anyhow!("Period end {} precedes start {}", end, start));
    }
    Ok((ty, PeriodRange { start, end }))
}

fn generate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (ty, period) = parse_args(sub)?;
    let snapshot = crate::db::load_snapshot(conn)?;
    let report = build(&snapshot, ty, period);
    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }
    print_report(&report);
    Ok(())
}

fn export(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (ty, period) = parse_args(sub)?;
    let raw_format = sub.get_one::<String>("format").unwrap();
    let format = ExportFormat::parse(raw_format)
        .ok_or_else(|| anyhow!("Unknown format '{}' (use json|csv|html)", raw_format))?;
    let out = sub.get_one::<String>("out").unwrap();

    let snapshot = crate::db::load_snapshot(conn)?;
    let report = build(&snapshot, ty, period);
    std::fs::write(out, encode(&report, format)?)?;
    println!("Exported {} to {}", report.report_type, out);
    Ok(())
}

fn print_report(report: &Report) {
    println!("{} ({})", report.report_type, report.period_label);

    let summary_rows = report
        .summary
        .iter()
        .map(|(key, value)| vec![key.clone(), value.to_string()])
        .collect();
    println!("{}", pretty_table(&["Metric", "Value"], summary_rows));

    if let Some(breakdown) = &report.category_breakdown {
        if !breakdown.is_empty() {
            let rows = breakdown
                .iter()
                .map(|share| {
                    vec![
                        share.category.clone(),
                        fmt_money(&share.amount),
                        format!("{}%", share.percentage_of_total),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["Category", "Amount", "Share"], rows));
        }
    }

    if let Some(categories) = &report.categories {
        let rows = categories
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    fmt_money(&c.total),
                    c.count.to_string(),
                    fmt_money(&c.average),
                    fmt_money(&c.max),
                    fmt_money(&c.min),
                    format!("{}%", c.percentage_of_total),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Total", "Count", "Avg", "Max", "Min", "Share"],
                rows
            )
        );
    }

    if let Some(health) = &report.financial_health {
        let rows = vec![
            vec!["net_worth".into(), fmt_money(&health.net_worth)],
            vec!["total_assets".into(), fmt_money(&health.total_assets)],
            vec![
                "total_liabilities".into(),
                fmt_money(&health.total_liabilities),
            ],
            vec![
                "expense_to_income_ratio".into(),
                format!("{}%", health.expense_to_income_ratio),
            ],
            vec![
                "debt_to_asset_ratio".into(),
                format!("{}%", health.debt_to_asset_ratio),
            ],
        ];
        println!("{}", pretty_table(&["Financial Health", "Value"], rows));
    }

    if let Some(comparison) = &report.comparison {
        let rows = vec![
            vec![
                comparison.current.label.clone(),
                fmt_money(&comparison.current.total),
                comparison.current.count.to_string(),
            ],
            vec![
                comparison.previous.label.clone(),
                fmt_money(&comparison.previous.total),
                comparison.previous.count.to_string(),
            ],
        ];
        println!("{}", pretty_table(&["Period", "Total", "Count"], rows));
        println!(
            "Change: {} ({}%), {} transactions",
            fmt_money(&comparison.total_change),
            comparison.percentage_change,
            comparison.count_change
        );
    }

    for insight in &report.insights {
        println!("- {}", insight);
    }
    if let Some(recommendations) = &report.recommendations {
        for recommendation in recommendations {
            println!("* {}", recommendation);
        }
    }
}
