// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar bucketing. Windows are half-open `[start, end)` instants,
//! contiguous within a sequence, most recent last.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::utils::{add_months, month_start};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Some(Granularity::Day),
            "week" => Some(Granularity::Week),
            "month" => Some(Granularity::Month),
            "quarter" => Some(Granularity::Quarter),
            "year" => Some(Granularity::Year),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }
}

fn midnight(d: NaiveDate) -> NaiveDateTime {
    d.and_hms_opt(0, 0, 0).expect("midnight is always valid")
}

fn quarter_start(d: NaiveDate) -> NaiveDate {
    let month = (d.month0() / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(d.year(), month, 1).expect("quarter start is always valid")
}

fn window(start: NaiveDate, end: NaiveDate, label: String) -> TimeWindow {
    TimeWindow {
        label,
        start: midnight(start),
        end: midnight(end),
    }
}

/// Build `periods` windows at the given granularity, ending with the
/// window containing `reference`. Consecutive windows are contiguous and
/// non-overlapping; each spans `[start, end)`.
pub fn build_windows(
    reference: NaiveDate,
    granularity: Granularity,
    periods: usize,
) -> Vec<TimeWindow> {
    let mut out = Vec::with_capacity(periods);
    for i in (0..periods).rev() {
        let i = i as i32;
        let w = match granularity {
            Granularity::Day => {
                let day = reference - Days::new(i as u64);
                window(day, day + Days::new(1), day.format("%Y-%m-%d").to_string())
            }
            Granularity::Week => {
                // 7-day spans aligned so the reference day closes the last window
                let end = reference + Days::new(1) - Days::new(7 * i as u64);
                let start = end - Days::new(7);
                window(start, end, format!("Week of {}", start.format("%Y-%m-%d")))
            }
            Granularity::Month => {
                let start = month_start(add_months(reference, -i));
                window(start, add_months(start, 1), start.format("%b %Y").to_string())
            }
            Granularity::Quarter => {
                let start = quarter_start(add_months(quarter_start(reference), -3 * i));
                let label = format!("Q{} {}", start.month0() / 3 + 1, start.year());
                window(start, add_months(start, 3), label)
            }
            Granularity::Year => {
                let year = reference.year() - i;
                let start = NaiveDate::from_ymd_opt(year, 1, 1)
                    .expect("January 1st is always valid");
                window(start, add_months(start, 12), year.to_string())
            }
        };
        out.push(w);
    }
    out
}

/// Index of the unique window containing `at`, if any. Records outside
/// all windows stay out of the windowed view but are never dropped from
/// non-windowed totals by callers.
pub fn assign_to_window(at: NaiveDateTime, windows: &[TimeWindow]) -> Option<usize> {
    windows.iter().position(|w| w.contains(at))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_windows_are_contiguous_half_open() {
        let ws = build_windows(d(2025, 3, 15), Granularity::Month, 4);
        assert_eq!(ws.len(), 4);
        assert_eq!(ws[0].label, "Dec 2024");
        assert_eq!(ws[3].label, "Mar 2025");
        for w in &ws {
            assert!(w.start < w.end);
        }
        for pair in ws.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        // half-open: the first instant of April is outside the March window
        let april1 = d(2025, 4, 1).and_hms_opt(0, 0, 0).unwrap();
        assert!(!ws[3].contains(april1));
        let march31 = d(2025, 3, 31).and_hms_opt(23, 59, 59).unwrap();
        assert!(ws[3].contains(march31));
    }

    #[test]
    fn quarter_windows_wrap_years() {
        let ws = build_windows(d(2025, 2, 10), Granularity::Quarter, 3);
        assert_eq!(
            ws.iter().map(|w| w.label.as_str()).collect::<Vec<_>>(),
            vec!["Q3 2024", "Q4 2024", "Q1 2025"]
        );
        assert_eq!(ws[0].start.date(), d(2024, 7, 1));
        assert_eq!(ws[2].end.date(), d(2025, 4, 1));
    }

    #[test]
    fn year_and_day_windows() {
        let ys = build_windows(d(2025, 6, 30), Granularity::Year, 2);
        assert_eq!(ys[0].label, "2024");
        assert_eq!(ys[1].start.date(), d(2025, 1, 1));
        assert_eq!(ys[1].end.date(), d(2026, 1, 1));

        let ds = build_windows(d(2025, 3, 1), Granularity::Day, 2);
        assert_eq!(ds[0].start.date(), d(2025, 2, 28));
        assert_eq!(ds[1].end.date(), d(2025, 3, 2));
    }

    #[test]
    fn assignment_is_unique() {
        let ws = build_windows(d(2025, 3, 15), Granularity::Month, 3);
        let at = d(2025, 2, 1).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(assign_to_window(at, &ws), Some(1));
        let outside = d(2024, 12, 31).and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(assign_to_window(outside, &ws), None);
    }
}
