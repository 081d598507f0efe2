// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ingress normalization: stored records carry dates either as full
//! instants or as bare `YYYY-MM-DD` strings, and numeric fields may be
//! missing or malformed. Everything funnels through here into one
//! canonical shape before aggregation. Normalization never fails the
//! caller: unresolvable dates become `None`, unresolvable numbers become
//! zero, and a missing category becomes `"Uncategorized"`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{
    Debt, DebtDirection, Expense, Loan, Obligation, Record, RecordKind, Sip, Snapshot,
    StockHolding,
};

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Recoverable normalization faults. These are reported by the low-level
/// resolvers and swallowed by the `*_or_*` helpers; nothing propagates
/// past this module.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("unparseable date '{0}'")]
    UnparseableDate(String),
}

/// Resolve a stored timestamp. Accepts an RFC 3339 instant, a bare
/// `YYYY-MM-DDTHH:MM:SS` timestamp, or a plain `YYYY-MM-DD` date; bare
/// dates resolve to local midnight.
pub fn resolve_instant(raw: &str) -> Result<NaiveDateTime, NormalizeError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(NormalizeError::MissingField("date"));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(NormalizeError::UnparseableDate(s.to_string()))
}

/// `occurredAt` resolution: absent or unparseable dates yield `None` and
/// the record stays out of time-windowed views only.
pub fn occurred_at(raw: Option<&str>) -> Option<NaiveDateTime> {
    raw.and_then(|s| resolve_instant(s).ok())
}

/// Plain-date resolution for due/start/buy dates; instants are truncated
/// to their calendar date.
pub fn date_only(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| resolve_instant(s).ok()).map(|dt| dt.date())
}

/// Missing or malformed numeric fields default to zero.
pub fn amount_or_zero(raw: Option<&str>) -> Decimal {
    raw.and_then(|s| s.trim().parse::<Decimal>().ok())
        .unwrap_or(Decimal::ZERO)
}

pub fn int_or_zero(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(0)
}

pub fn category_or_default(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNCATEGORIZED.to_string(),
    }
}

pub fn expense_record(e: &Expense) -> Record {
    Record {
        kind: RecordKind::Expense,
        amount: e.amount,
        occurred_at: e.occurred_at,
        category: e.category.clone(),
        status: String::new(),
    }
}

pub fn debt_record(d: &Debt) -> Record {
    Record {
        kind: match d.direction {
            DebtDirection::OwedByMe => RecordKind::DebtOwedByMe,
            DebtDirection::OwedToMe => RecordKind::DebtOwedToMe,
        },
        amount: d.amount,
        occurred_at: d.due_date.and_then(|d| d.and_hms_opt(0, 0, 0)),
        category: d.counterparty.clone(),
        status: d.status.as_str().to_string(),
    }
}

pub fn sip_record(s: &Sip) -> Record {
    Record {
        kind: RecordKind::InvestmentPlan,
        amount: s.monthly_amount,
        occurred_at: s.start_date.and_then(|d| d.and_hms_opt(0, 0, 0)),
        category: s.name.clone(),
        status: s.status.as_str().to_string(),
    }
}

pub fn stock_record(s: &StockHolding) -> Record {
    Record {
        kind: RecordKind::StockHolding,
        amount: s.quantity * s.buy_price,
        occurred_at: s.buy_date.and_then(|d| d.and_hms_opt(0, 0, 0)),
        category: s.name.clone(),
        status: s.status.as_str().to_string(),
    }
}

pub fn loan_record(l: &Loan) -> Record {
    Record {
        kind: RecordKind::Loan,
        amount: l.principal,
        occurred_at: l.due_date.and_then(|d| d.and_hms_opt(0, 0, 0)),
        category: l.organization.clone(),
        status: l.status.as_str().to_string(),
    }
}

pub fn obligation_record(o: &Obligation) -> Record {
    Record {
        kind: match o.kind {
            crate::models::ObligationKind::Tax => RecordKind::Tax,
            crate::models::ObligationKind::Violation => RecordKind::Violation,
        },
        amount: o.amount,
        occurred_at: o.due_date.and_then(|d| d.and_hms_opt(0, 0, 0)),
        category: o.label.clone(),
        status: o.status.as_str().to_string(),
    }
}

/// Flatten every kind in the snapshot to canonical records, for record
/// export and kind-agnostic views.
pub fn all_records(snapshot: &Snapshot) -> Vec<Record> {
    let mut out = Vec::new();
    out.extend(snapshot.expenses.iter().map(expense_record));
    out.extend(snapshot.debts.iter().map(debt_record));
    out.extend(snapshot.sips.iter().map(sip_record));
    out.extend(snapshot.stocks.iter().map(stock_record));
    out.extend(snapshot.loans.iter().map(loan_record));
    out.extend(snapshot.taxes.iter().map(obligation_record));
    out.extend(snapshot.violations.iter().map(obligation_record));
    out
}

/// The expense view feeding windowed aggregation, category breakdowns,
/// distributions, and weekly patterns.
pub fn expense_records(snapshot: &Snapshot) -> Vec<Record> {
    snapshot.expenses.iter().map(expense_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_bare_date_to_midnight() {
        let dt = resolve_instant("2025-08-08").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2025, 8, 8).unwrap());
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn resolves_rfc3339_instant() {
        let dt = resolve_instant("2025-08-08T13:45:00+00:00").unwrap();
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(13, 45, 0).unwrap());
    }

    #[test]
    fn unparseable_dates_recover_to_none() {
        assert_eq!(
            resolve_instant("08/08/2025"),
            Err(NormalizeError::UnparseableDate("08/08/2025".into()))
        );
        assert_eq!(occurred_at(Some("not a date")), None);
        assert_eq!(occurred_at(None), None);
    }

    #[test]
    fn numeric_and_category_defaults() {
        assert_eq!(amount_or_zero(Some("12.50")), Decimal::new(1250, 2));
        assert_eq!(amount_or_zero(Some("garbage")), Decimal::ZERO);
        assert_eq!(amount_or_zero(None), Decimal::ZERO);
        assert_eq!(category_or_default(Some("  ")), UNCATEGORIZED);
        assert_eq!(category_or_default(Some("Food")), "Food");
    }
}
