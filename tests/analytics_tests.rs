// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneylens::db;
use moneylens::engine::aggregate::{aggregate_by_window, distribution, weekly_pattern};
use moneylens::engine::formulas::budget_performance;
use moneylens::engine::normalize::expense_records;
use moneylens::engine::trend::{category_trends, TrendDirection};
use moneylens::engine::windows::{build_windows, Granularity};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn seeded_conn() -> Connection {
    let conn = db::open_in_memory().unwrap();
    // Groceries ramp up over six months; Transport stays flat
    conn.execute_batch(
        r#"
        INSERT INTO expenses(amount, category, date) VALUES
            ('100', 'Groceries', '2025-02-10'),
            ('200', 'Groceries', '2025-03-10'),
            ('300', 'Groceries', '2025-04-10'),
            ('400', 'Groceries', '2025-05-10'),
            ('500', 'Groceries', '2025-06-10'),
            ('600', 'Groceries', '2025-07-10'),
            ('50', 'Transport', '2025-02-15'),
            ('50', 'Transport', '2025-03-15'),
            ('50', 'Transport', '2025-04-15'),
            ('50', 'Transport', '2025-05-15'),
            ('50', 'Transport', '2025-06-15'),
            ('50', 'Transport', '2025-07-15');
        "#,
    )
    .unwrap();
    conn
}

#[test]
fn windowed_aggregates_conserve_category_sums() {
    let conn = seeded_conn();
    let snapshot = db::load_snapshot(&conn).unwrap();
    let records = expense_records(&snapshot);
    let windows = build_windows(
        NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
        Granularity::Month,
        6,
    );
    let aggregates = aggregate_by_window(&records, &windows);
    assert_eq!(aggregates.len(), 6);
    for agg in &aggregates {
        let share_sum: Decimal = agg.by_category.iter().map(|c| c.amount).sum();
        assert_eq!(share_sum, agg.total_amount);
    }
    // July: 600 groceries + 50 transport
    assert_eq!(aggregates[5].total_amount, Decimal::from(650));
    assert_eq!(aggregates[5].transaction_count, 2);
}

#[test]
fn rising_category_classifies_as_increasing() {
    let conn = seeded_conn();
    let snapshot = db::load_snapshot(&conn).unwrap();
    let records = expense_records(&snapshot);
    let windows = build_windows(
        NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
        Granularity::Month,
        6,
    );
    let trends = category_trends(&records, &windows, 6);
    assert_eq!(trends.len(), 2);
    let groceries = &trends[0];
    assert_eq!(groceries.category, "Groceries");
    assert_eq!(groceries.direction, TrendDirection::Increasing);
    assert_eq!(groceries.total_amount, Decimal::from(2100));
    assert_eq!(groceries.points.len(), 6);
    let transport = &trends[1];
    assert_eq!(transport.total_amount, Decimal::from(300));
    assert_eq!(transport.direction, TrendDirection::Stable);
}

#[test]
fn distribution_and_weekly_pattern_from_store() {
    let conn = seeded_conn();
    let snapshot = db::load_snapshot(&conn).unwrap();
    let records = expense_records(&snapshot);

    let dist = distribution(&records);
    let total_pct: Decimal = dist.iter().map(|b| b.percentage).sum();
    assert!((total_pct - Decimal::from(100)).abs() <= Decimal::new(2, 1));
    assert_eq!(dist.iter().map(|b| b.count).sum::<usize>(), records.len());

    let pattern = weekly_pattern(&records);
    assert_eq!(pattern.len(), 7);
    assert_eq!(
        pattern.iter().map(|p| p.transaction_count).sum::<usize>(),
        records.len()
    );
}

#[test]
fn budget_performance_over_monthly_actuals() {
    let conn = seeded_conn();
    let snapshot = db::load_snapshot(&conn).unwrap();
    let windows = build_windows(
        NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
        Granularity::Month,
        2,
    );
    let actuals: Vec<(String, Decimal)> =
        aggregate_by_window(&expense_records(&snapshot), &windows)
            .into_iter()
            .map(|agg| (agg.window.label, agg.total_amount))
            .collect();
    // June 550, July 650 -> average budget 600
    let performance = budget_performance(&actuals);
    assert_eq!(performance[0].budget, Decimal::from(600));
    assert_eq!(performance[0].variance, Decimal::from(-50));
    assert_eq!(performance[1].variance, Decimal::from(50));
    // under budget in June, over in July
    assert!(performance[0].performance_percent > Decimal::ZERO);
    assert!(performance[1].performance_percent < Decimal::ZERO);
}
