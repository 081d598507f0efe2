// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Trend labeling for short, noisy series: compare the mean of a leading
//! and a trailing window of ⌈n/3⌉ points (min 1, capped at 3) against
//! asymmetric ±10% thresholds. Deterministic for a given input order.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::aggregate::aggregate_by_window;
use crate::engine::windows::TimeWindow;
use crate::models::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().copied().sum::<Decimal>() / Decimal::from(values.len() as i64)
}

pub fn classify(series: &[Decimal]) -> TrendDirection {
    if series.len() < 2 {
        return TrendDirection::Stable;
    }
    let window = series.len().div_ceil(3).clamp(1, 3);
    let earlier = mean(&series[..window]);
    let recent = mean(&series[series.len() - window..]);
    // 1.1 / 0.9 hysteresis tolerates noise in low-volume series
    if recent > earlier * Decimal::new(11, 1) {
        TrendDirection::Increasing
    } else if recent < earlier * Decimal::new(9, 1) {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub period: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendSeries {
    pub category: String,
    pub points: Vec<TrendPoint>,
    pub direction: TrendDirection,
    pub total_amount: Decimal,
}

/// Per-category amount series over the given windows, classified and
/// sorted by total spend, trimmed to the `top` biggest categories.
pub fn category_trends(records: &[Record], windows: &[TimeWindow], top: usize) -> Vec<TrendSeries> {
    let mut categories: Vec<String> = records.iter().map(|r| r.category.clone()).collect();
    categories.sort();
    categories.dedup();

    let mut series: Vec<TrendSeries> = categories
        .into_iter()
        .map(|category| {
            let subset: Vec<Record> = records
                .iter()
                .filter(|r| r.category == category)
                .cloned()
                .collect();
            let points: Vec<TrendPoint> = aggregate_by_window(&subset, windows)
                .into_iter()
                .map(|agg| TrendPoint {
                    period: agg.window.label,
                    amount: agg.total_amount,
                })
                .collect();
            let amounts: Vec<Decimal> = points.iter().map(|p| p.amount).collect();
            TrendSeries {
                direction: classify(&amounts),
                total_amount: amounts.iter().copied().sum(),
                category,
                points,
            }
        })
        .collect();
    series.sort_by(|a, b| b.total_amount.cmp(&a.total_amount).then(a.category.cmp(&b.category)));
    series.truncate(top);
    series
}
