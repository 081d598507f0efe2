// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Sums, counts, shares, and histograms over canonical records. Amounts
//! stay in `Decimal` end to end, so per-category sums reconcile exactly
//! with window totals; only percentages are rounded (one decimal place).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::windows::{assign_to_window, TimeWindow};
use crate::models::Record;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    pub percentage_of_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Aggregate {
    pub window: TimeWindow,
    pub total_amount: Decimal,
    pub transaction_count: usize,
    pub by_category: Vec<CategoryShare>,
}

fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        (part / whole * Decimal::from(100)).round_dp(1)
    }
}

/// Shares per category, largest first, with percentage of the grand
/// total. An empty or zero-total input yields no shares.
pub fn category_shares(records: &[&Record]) -> Vec<CategoryShare> {
    let mut by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut total = Decimal::ZERO;
    for r in records {
        *by_category.entry(r.category.as_str()).or_insert(Decimal::ZERO) += r.amount;
        total += r.amount;
    }
    if total.is_zero() {
        return Vec::new();
    }
    let mut shares: Vec<CategoryShare> = by_category
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category: category.to_string(),
            percentage_of_total: percentage(amount, total),
            amount,
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));
    shares
}

/// One aggregate per window. Records without a resolved timestamp, or
/// outside every window, are excluded here (never from non-windowed
/// totals computed elsewhere).
pub fn aggregate_by_window(records: &[Record], windows: &[TimeWindow]) -> Vec<Aggregate> {
    let mut buckets: Vec<Vec<&Record>> = vec![Vec::new(); windows.len()];
    for r in records {
        if let Some(idx) = r.occurred_at.and_then(|at| assign_to_window(at, windows)) {
            buckets[idx].push(r);
        }
    }
    windows
        .iter()
        .zip(buckets)
        .map(|(window, bucket)| Aggregate {
            window: window.clone(),
            total_amount: bucket.iter().map(|r| r.amount).sum(),
            transaction_count: bucket.len(),
            by_category: category_shares(&bucket),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionBucket {
    pub range: String,
    pub count: usize,
    pub percentage: Decimal,
}

const DISTRIBUTION_EDGES: [(i64, &str); 6] = [
    (100, "0-100"),
    (500, "100-500"),
    (1_000, "500-1K"),
    (5_000, "1K-5K"),
    (10_000, "5K-10K"),
    (i64::MAX, "10K+"),
];

/// Fixed-edge amount histogram over `[edge_{i-1}, edge_i)` ranges.
/// Empty input yields an empty distribution; otherwise buckets appear in
/// edge order with zero-count buckets skipped.
pub fn distribution(records: &[Record]) -> Vec<DistributionBucket> {
    if records.is_empty() {
        return Vec::new();
    }
    let mut counts = [0usize; DISTRIBUTION_EDGES.len()];
    for r in records {
        let slot = DISTRIBUTION_EDGES
            .iter()
            .position(|(edge, _)| r.amount < Decimal::from(*edge))
            .unwrap_or(DISTRIBUTION_EDGES.len() - 1);
        counts[slot] += 1;
    }
    let total = Decimal::from(records.len() as i64);
    DISTRIBUTION_EDGES
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|((_, label), count)| DistributionBucket {
            range: label.to_string(),
            count,
            percentage: percentage(Decimal::from(count as i64), total),
        })
        .collect()
}

pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, Serialize)]
pub struct WeekdayPattern {
    pub day: &'static str,
    pub average_amount: Decimal,
    pub transaction_count: usize,
    pub total_amount: Decimal,
}

/// Average and total spend per day of week (Sunday first). Always seven
/// entries; weekdays with no records average zero.
pub fn weekly_pattern(records: &[Record]) -> Vec<WeekdayPattern> {
    let mut totals = [Decimal::ZERO; 7];
    let mut counts = [0usize; 7];
    for r in records {
        if let Some(at) = r.occurred_at {
            let idx = chrono::Datelike::weekday(&at.date()).num_days_from_sunday() as usize;
            totals[idx] += r.amount;
            counts[idx] += 1;
        }
    }
    WEEKDAYS
        .iter()
        .enumerate()
        .map(|(i, day)| WeekdayPattern {
            day,
            average_amount: if counts[i] == 0 {
                Decimal::ZERO
            } else {
                (totals[i] / Decimal::from(counts[i] as i64)).round_dp(2)
            },
            transaction_count: counts[i],
            total_amount: totals[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::windows::{build_windows, Granularity};
    use crate::models::RecordKind;
    use chrono::NaiveDate;

    fn expense(amount: i64, category: &str, date: &str) -> Record {
        Record {
            kind: RecordKind::Expense,
            amount: Decimal::from(amount),
            occurred_at: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            category: category.to_string(),
            status: String::new(),
        }
    }

    #[test]
    fn category_sums_reconcile_with_total() {
        let records = vec![
            expense(300, "Food", "2025-03-01"),
            expense(150, "Travel", "2025-03-05"),
            expense(50, "Food", "2025-03-20"),
        ];
        let windows = build_windows(
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            Granularity::Month,
            1,
        );
        let aggs = aggregate_by_window(&records, &windows);
        assert_eq!(aggs.len(), 1);
        let agg = &aggs[0];
        assert_eq!(agg.total_amount, Decimal::from(500));
        assert_eq!(agg.transaction_count, 3);
        let share_sum: Decimal = agg.by_category.iter().map(|c| c.amount).sum();
        assert_eq!(share_sum, agg.total_amount);
        let pct_sum: Decimal = agg.by_category.iter().map(|c| c.percentage_of_total).sum();
        assert!((pct_sum - Decimal::from(100)).abs() <= Decimal::new(1, 1));
        assert_eq!(agg.by_category[0].category, "Food");
    }

    #[test]
    fn undated_records_stay_out_of_windows() {
        let mut undated = expense(999, "Food", "2025-03-01");
        undated.occurred_at = None;
        let windows = build_windows(
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            Granularity::Month,
            1,
        );
        let aggs = aggregate_by_window(&[undated], &windows);
        assert_eq!(aggs[0].transaction_count, 0);
        assert_eq!(aggs[0].total_amount, Decimal::ZERO);
    }

    #[test]
    fn distribution_classifies_half_open_ranges() {
        let records = vec![
            expense(99, "a", "2025-03-01"),
            expense(100, "b", "2025-03-01"),
            expense(4_999, "c", "2025-03-01"),
            expense(25_000, "d", "2025-03-01"),
        ];
        let dist = distribution(&records);
        let ranges: Vec<&str> = dist.iter().map(|b| b.range.as_str()).collect();
        assert_eq!(ranges, vec!["0-100", "100-500", "1K-5K", "10K+"]);
        assert!(dist.iter().all(|b| b.count == 1));
        assert_eq!(dist[0].percentage, Decimal::from(25));
    }

    #[test]
    fn distribution_of_nothing_is_empty() {
        assert!(distribution(&[]).is_empty());
    }

    #[test]
    fn weekly_pattern_has_seven_entries() {
        // 2025-03-02 is a Sunday
        let records = vec![
            expense(100, "a", "2025-03-02"),
            expense(300, "b", "2025-03-09"),
        ];
        let pattern = weekly_pattern(&records);
        assert_eq!(pattern.len(), 7);
        assert_eq!(pattern[0].day, "Sunday");
        assert_eq!(pattern[0].transaction_count, 2);
        assert_eq!(pattern[0].average_amount, Decimal::from(200));
        assert!(pattern[1..].iter().all(|p| p.average_amount.is_zero()));
    }
}
