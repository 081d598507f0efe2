// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The dashboard-style views: every figure here comes from the one
//! engine rather than a per-view recomputation.

use anyhow::Result;
use rusqlite::Connection;

use crate::engine::aggregate::{aggregate_by_window, distribution, weekly_pattern};
use crate::engine::formulas::budget_performance;
use crate::engine::normalize::expense_records;
use crate::engine::trend::category_trends;
use crate::engine::windows::{build_windows, Granularity};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

const TREND_CATEGORIES: usize = 6;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("distribution", sub)) => distribution_view(conn, sub)?,
        Some(("weekly", sub)) => weekly_view(conn, sub)?,
        Some(("trends", sub)) => trends_view(conn, sub)?,
        Some(("performance", sub)) => performance_view(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn periods_arg(sub: &clap::ArgMatches) -> usize {
    sub.get_one::<String>("periods")
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(12)
}

fn granularity_arg(sub: &clap::ArgMatches) -> Result<Granularity> {
    match sub.get_one::<String>("granularity") {
        Some(raw) => Granularity::parse(raw).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown granularity '{}' (use day|week|month|quarter|year)",
                raw
            )
        }),
        None => Ok(Granularity::Month),
    }
}

fn distribution_view(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let snapshot = crate::db::load_snapshot(conn)?;
    let buckets = distribution(&expense_records(&snapshot));
    if maybe_print_json(json_flag, jsonl_flag, &buckets)? {
        return Ok(());
    }
    let rows = buckets
        .into_iter()
        .map(|b| {
            vec![
                b.range,
                b.count.to_string(),
                format!("{}%", b.percentage),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Range", "Count", "Share"], rows));
    Ok(())
}

fn weekly_view(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let snapshot = crate::db::load_snapshot(conn)?;
    let pattern = weekly_pattern(&expense_records(&snapshot));
    if maybe_print_json(json_flag, jsonl_flag, &pattern)? {
        return Ok(());
    }
    let rows = pattern
        .into_iter()
        .map(|p| {
            vec![
                p.day.to_string(),
                fmt_money(&p.average_amount),
                p.transaction_count.to_string(),
                fmt_money(&p.total_amount),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Day", "Avg Amount", "Count", "Total"], rows)
    );
    Ok(())
}

fn trends_view(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let periods = periods_arg(sub);
    let granularity = granularity_arg(sub)?;
    let snapshot = crate::db::load_snapshot(conn)?;
    let today = chrono::Local::now().date_naive();
    let windows = build_windows(today, granularity, periods);
    let trends = category_trends(&expense_records(&snapshot), &windows, TREND_CATEGORIES);
    if maybe_print_json(json_flag, jsonl_flag, &trends)? {
        return Ok(());
    }
    let rows = trends
        .into_iter()
        .map(|t| {
            let series = t
                .points
                .iter()
                .map(|p| p.amount.round_dp(0).to_string())
                .collect::<Vec<_>>()
                .join(" ");
            vec![
                t.category,
                fmt_money(&t.total_amount),
                t.direction.as_str().to_string(),
                series,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Total", "Trend", "Series"], rows)
    );
    Ok(())
}

fn performance_view(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let periods = periods_arg(sub);
    let granularity = granularity_arg(sub)?;
    let snapshot = crate::db::load_snapshot(conn)?;
    let today = chrono::Local::now().date_naive();
    let windows = build_windows(today, granularity, periods);
    let actuals: Vec<(String, rust_decimal::Decimal)> =
        aggregate_by_window(&expense_records(&snapshot), &windows)
            .into_iter()
            .map(|agg| (agg.window.label, agg.total_amount))
            .collect();
    let performance = budget_performance(&actuals);
    if maybe_print_json(json_flag, jsonl_flag, &performance)? {
        return Ok(());
    }
    let rows = performance
        .into_iter()
        .map(|p| {
            vec![
                p.period,
                fmt_money(&p.budget),
                fmt_money(&p.actual),
                fmt_money(&p.variance),
                format!("{}%", p.performance_percent),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Period", "Budget (avg)", "Actual", "Variance", "Performance"],
            rows
        )
    );
    Ok(())
}
