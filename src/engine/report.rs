// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report composition: assembles windowing, aggregation, trends, and the
//! formula engine into one of four report shapes. The composer never
//! raises; an empty snapshot produces a zeroed summary and no insights.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::aggregate::{category_shares, CategoryShare};
use crate::engine::normalize::expense_records;
use crate::models::{Record, Snapshot};
use crate::utils::fmt_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportType {
    Monthly,
    Category,
    Comprehensive,
    Comparison,
}

impl ReportType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Some(ReportType::Monthly),
            "category" => Some(ReportType::Category),
            "comprehensive" => Some(ReportType::Comprehensive),
            "comparison" => Some(ReportType::Comparison),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportType::Monthly => "Monthly Report",
            ReportType::Category => "Category Analysis Report",
            ReportType::Comprehensive => "Comprehensive Financial Report",
            ReportType::Comparison => "Period Comparison Report",
        }
    }
}

/// Inclusive calendar date range; windowed filtering treats it as the
/// half-open instant range `[start 00:00, end+1d 00:00)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodRange {
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%d %b %Y"),
            self.end.format("%d %b %Y")
        )
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let date = at.date();
        self.start <= date && date <= self.end
    }

    /// The immediately preceding period of identical length.
    pub fn previous(&self) -> PeriodRange {
        let span = (self.end - self.start).num_days().max(0) as u64;
        let end = self.start - Days::new(1);
        PeriodRange {
            start: end - Days::new(span),
            end,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Amount(Decimal),
    Count(i64),
    Text(String),
}

impl fmt::Display for SummaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryValue::Amount(d) => write!(f, "{}", fmt_money(d)),
            SummaryValue::Count(n) => write!(f, "{}", n),
            SummaryValue::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySpend {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
    pub max: Decimal,
    pub min: Decimal,
    pub percentage_of_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialHealth {
    pub net_worth: Decimal,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    /// Percent of estimated income consumed by expenses.
    pub expense_to_income_ratio: Decimal,
    pub debt_to_asset_ratio: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub label: String,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodComparison {
    pub current: PeriodSummary,
    pub previous: PeriodSummary,
    pub total_change: Decimal,
    pub percentage_change: Decimal,
    pub count_change: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub report_type: String,
    pub period_label: String,
    pub summary: BTreeMap<String, SummaryValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_breakdown: Option<Vec<CategoryShare>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_spending: Option<Vec<DailySpend>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_expenses: Option<Vec<Record>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_health: Option<FinancialHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<PeriodComparison>,
    pub insights: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

impl Report {
    fn empty(ty: ReportType, period: PeriodRange) -> Report {
        Report {
            report_type: ty.title().to_string(),
            period_label: period.label(),
            summary: BTreeMap::new(),
            category_breakdown: None,
            daily_spending: None,
            top_expenses: None,
            categories: None,
            financial_health: None,
            comparison: None,
            insights: Vec::new(),
            recommendations: None,
        }
    }
}

fn hundred() -> Decimal {
    Decimal::from(100)
}

fn ratio_percent(num: Decimal, den: Decimal) -> Decimal {
    if den.is_zero() {
        Decimal::ZERO
    } else {
        (num / den * hundred()).round_dp(1)
    }
}

fn in_period(records: Vec<Record>, period: PeriodRange) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| r.occurred_at.is_some_and(|at| period.contains(at)))
        .collect()
}

fn daily_spending(expenses: &[Record]) -> Vec<DailySpend> {
    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for e in expenses {
        if let Some(at) = e.occurred_at {
            *by_day.entry(at.date()).or_insert(Decimal::ZERO) += e.amount;
        }
    }
    by_day
        .into_iter()
        .map(|(date, amount)| DailySpend { date, amount })
        .collect()
}

fn top_expenses(expenses: &[Record], limit: usize) -> Vec<Record> {
    let mut sorted: Vec<Record> = expenses.to_vec();
    sorted.sort_by(|a, b| b.amount.cmp(&a.amount));
    sorted.truncate(limit);
    sorted
}

fn spending_insights(
    expenses: &[Record],
    breakdown: &[CategoryShare],
    daily: &[DailySpend],
) -> Vec<String> {
    let mut insights = Vec::new();
    if expenses.is_empty() {
        return insights;
    }
    if let Some(top) = breakdown.first() {
        insights.push(format!(
            "Your highest spending category is {} ({}% of total)",
            top.category, top.percentage_of_total
        ));
    }
    if let Some(peak) = daily.iter().max_by_key(|d| d.amount) {
        insights.push(format!(
            "Your highest spending day was {} with {}",
            peak.date.format("%d %b"),
            fmt_money(&peak.amount)
        ));
    }
    let total: Decimal = expenses.iter().map(|e| e.amount).sum();
    let avg = total / Decimal::from(expenses.len() as i64);
    insights.push(format!(
        "Your average transaction amount is {}",
        fmt_money(&avg)
    ));
    insights
}

fn monthly_report(snapshot: &Snapshot, period: PeriodRange) -> Report {
    let expenses = in_period(expense_records(snapshot), period);
    let refs: Vec<&Record> = expenses.iter().collect();
    let total_expenses: Decimal = expenses.iter().map(|e| e.amount).sum();
    // Outstanding-debt and investment totals are not time-scoped
    let total_debts: Decimal = snapshot.debts_owed_by_me().map(|d| d.amount).sum();
    let total_sips: Decimal = snapshot.sips.iter().map(|s| s.monthly_amount).sum();
    let total_stocks: Decimal = snapshot
        .stocks
        .iter()
        .map(|s| s.quantity * s.buy_price)
        .sum();
    let total_investments = total_sips + total_stocks;

    let breakdown = category_shares(&refs);
    let daily = daily_spending(&expenses);
    let insights = spending_insights(&expenses, &breakdown, &daily);

    let mut report = Report::empty(ReportType::Monthly, period);
    report.summary.insert(
        "total_expenses".into(),
        SummaryValue::Amount(total_expenses),
    );
    report
        .summary
        .insert("total_debts".into(), SummaryValue::Amount(total_debts));
    report.summary.insert(
        "total_investments".into(),
        SummaryValue::Amount(total_investments),
    );
    report.summary.insert(
        "transaction_count".into(),
        SummaryValue::Count(expenses.len() as i64),
    );
    report.summary.insert(
        "avg_daily_spending".into(),
        SummaryValue::Amount((total_expenses / Decimal::from(period.days())).round_dp(2)),
    );
    report.summary.insert(
        "net_worth".into(),
        SummaryValue::Amount(total_investments - total_debts),
    );
    report.category_breakdown = Some(breakdown);
    report.daily_spending = Some(daily);
    report.top_expenses = Some(top_expenses(&expenses, 10));
    report.insights = insights;
    report
}

fn category_report(snapshot: &Snapshot, period: PeriodRange) -> Report {
    let expenses = in_period(expense_records(snapshot), period);
    let total_spent: Decimal = expenses.iter().map(|e| e.amount).sum();

    let mut grouped: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    for e in &expenses {
        grouped.entry(e.category.as_str()).or_default().push(e);
    }
    let mut stats: Vec<CategoryStats> = grouped
        .into_iter()
        .map(|(category, records)| {
            let total: Decimal = records.iter().map(|r| r.amount).sum();
            let count = records.len();
            let max = records.iter().map(|r| r.amount).max().unwrap_or(Decimal::ZERO);
            let min = records.iter().map(|r| r.amount).min().unwrap_or(Decimal::ZERO);
            CategoryStats {
                category: category.to_string(),
                total,
                count,
                average: (total / Decimal::from(count.max(1) as i64)).round_dp(2),
                max,
                min,
                percentage_of_total: ratio_percent(total, total_spent),
            }
        })
        .collect();
    stats.sort_by(|a, b| b.total.cmp(&a.total).then(a.category.cmp(&b.category)));

    let mut report = Report::empty(ReportType::Category, period);
    report.summary.insert(
        "total_categories".into(),
        SummaryValue::Count(stats.len() as i64),
    );
    report
        .summary
        .insert("total_expenses".into(), SummaryValue::Amount(total_spent));
    report.summary.insert(
        "avg_per_category".into(),
        SummaryValue::Amount(if stats.is_empty() {
            Decimal::ZERO
        } else {
            (total_spent / Decimal::from(stats.len() as i64)).round_dp(2)
        }),
    );
    if let Some(top) = stats.first() {
        report.insights.push(format!(
            "{} accounts for {}% of your spending",
            top.category, top.percentage_of_total
        ));
        report.insights.push(format!(
            "You made {} transactions in {}",
            top.count, top.category
        ));
        report.insights.push(format!(
            "Average {} expense: {}",
            top.category,
            fmt_money(&top.average)
        ));
    }
    report.categories = Some(stats);
    report
}

fn comprehensive_report(snapshot: &Snapshot, period: PeriodRange) -> Report {
    let mut report = monthly_report(snapshot, period);
    report.report_type = ReportType::Comprehensive.title().to_string();

    let total_expenses: Decimal = in_period(expense_records(snapshot), period)
        .iter()
        .map(|e| e.amount)
        .sum();
    let total_debts: Decimal = snapshot.debts_owed_by_me().map(|d| d.amount).sum();
    let total_sips: Decimal = snapshot.sips.iter().map(|s| s.monthly_amount).sum();
    let total_stocks: Decimal = snapshot
        .stocks
        .iter()
        .map(|s| s.quantity * s.buy_price)
        .sum();
    let total_loans: Decimal = snapshot.loans.iter().map(|l| l.principal).sum();

    let total_assets = total_sips + total_stocks;
    let total_liabilities = total_debts + total_loans;
    let net_worth = total_assets - total_liabilities;
    // Estimated annual income proxied by a year of SIP contributions
    let annual_income = total_sips * Decimal::from(12);
    let expense_to_income_ratio =
        ratio_percent(total_expenses * Decimal::from(12), annual_income);
    let debt_to_asset_ratio = ratio_percent(total_liabilities, total_assets);

    let mut recommendations = Vec::new();
    if expense_to_income_ratio > Decimal::from(80) {
        recommendations
            .push("Consider reducing expenses as they exceed 80% of estimated income".to_string());
    }
    if let Some(top) = report.category_breakdown.as_ref().and_then(|b| b.first()) {
        if top.percentage_of_total > Decimal::from(30) {
            recommendations.push(format!(
                "Consider diversifying spending - {} represents {}% of expenses",
                top.category, top.percentage_of_total
            ));
        }
    }
    if net_worth < Decimal::ZERO {
        recommendations.push(
            "Focus on debt reduction and increasing investments to improve net worth".to_string(),
        );
    }

    report.financial_health = Some(FinancialHealth {
        net_worth,
        total_assets,
        total_liabilities,
        expense_to_income_ratio,
        debt_to_asset_ratio,
    });
    report.recommendations = Some(recommendations);
    report
}

fn period_summary(snapshot: &Snapshot, period: PeriodRange) -> PeriodSummary {
    let expenses = in_period(expense_records(snapshot), period);
    PeriodSummary {
        label: period.label(),
        total: expenses.iter().map(|e| e.amount).sum(),
        count: expenses.len(),
    }
}

fn comparison_report(snapshot: &Snapshot, period: PeriodRange) -> Report {
    let current = period_summary(snapshot, period);
    let previous = period_summary(snapshot, period.previous());
    let total_change = current.total - previous.total;
    let percentage_change = ratio_percent(total_change, previous.total);
    let count_change = current.count as i64 - previous.count as i64;

    let mut report = Report::empty(ReportType::Comparison, period);
    report
        .summary
        .insert("current_total".into(), SummaryValue::Amount(current.total));
    report.summary.insert(
        "current_count".into(),
        SummaryValue::Count(current.count as i64),
    );
    report
        .summary
        .insert("previous_total".into(), SummaryValue::Amount(previous.total));
    report.summary.insert(
        "previous_count".into(),
        SummaryValue::Count(previous.count as i64),
    );
    report
        .summary
        .insert("total_change".into(), SummaryValue::Amount(total_change));
    report.summary.insert(
        "percentage_change".into(),
        SummaryValue::Text(format!("{}%", percentage_change)),
    );
    report.comparison = Some(PeriodComparison {
        current,
        previous,
        total_change,
        percentage_change,
        count_change,
    });
    report
}

/// The engine's report entry point. Always returns a best-effort report;
/// an empty snapshot yields zeroed summary values and no insights.
pub fn build(snapshot: &Snapshot, ty: ReportType, period: PeriodRange) -> Report {
    match ty {
        ReportType::Monthly => monthly_report(snapshot, period),
        ReportType::Category => category_report(snapshot, period),
        ReportType::Comprehensive => comprehensive_report(snapshot, period),
        ReportType::Comparison => comparison_report(snapshot, period),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn previous_period_has_identical_length() {
        let period = PeriodRange {
            start: d(2025, 7, 1),
            end: d(2025, 7, 31),
        };
        let prev = period.previous();
        assert_eq!(prev.end, d(2025, 6, 30));
        assert_eq!(prev.start, d(2025, 5, 31));
        assert_eq!(
            (prev.end - prev.start).num_days(),
            (period.end - period.start).num_days()
        );
    }

    #[test]
    fn empty_snapshot_builds_zeroed_monthly_report() {
        let snapshot = Snapshot::default();
        let period = PeriodRange {
            start: d(2025, 7, 1),
            end: d(2025, 7, 31),
        };
        let report = build(&snapshot, ReportType::Monthly, period);
        assert_eq!(report.report_type, "Monthly Report");
        assert!(report.insights.is_empty());
        for (key, value) in &report.summary {
            match value {
                SummaryValue::Amount(a) => assert!(a.is_zero(), "{} not zero", key),
                SummaryValue::Count(c) => assert_eq!(*c, 0, "{} not zero", key),
                SummaryValue::Text(_) => {}
            }
        }
        assert!(report
            .category_breakdown
            .as_ref()
            .is_some_and(|b| b.is_empty()));
    }

    #[test]
    fn empty_snapshot_never_divides_by_zero_anywhere() {
        let snapshot = Snapshot::default();
        let period = PeriodRange {
            start: d(2025, 7, 1),
            end: d(2025, 7, 31),
        };
        for ty in [
            ReportType::Monthly,
            ReportType::Category,
            ReportType::Comprehensive,
            ReportType::Comparison,
        ] {
            let report = build(&snapshot, ty, period);
            assert_eq!(report.report_type, ty.title());
        }
    }
}
