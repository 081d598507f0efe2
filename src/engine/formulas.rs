// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-kind financial arithmetic. Pure functions, `Decimal` throughout;
//! every ratio is zero-guarded and nothing here raises on partial data.

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{InterestPayment, Loan, Obligation, ObligationKind, PayStatus, Sip,
    StockHolding, StockStatus};
use crate::utils::add_months;

const MONTHS_PER_YEAR_TIMES_PERCENT: i64 = 1200;

fn hundred() -> Decimal {
    Decimal::from(100)
}

/// Whole calendar months from `start` to `now`, never negative.
pub fn months_elapsed(start: NaiveDate, now: NaiveDate) -> u32 {
    let diff = (now.year() - start.year()) * 12 + now.month() as i32 - start.month() as i32;
    diff.max(0) as u32
}

/// `(1 + r)^n` by repeated multiplication; exact within Decimal precision
/// and independent of any float round-trip.
fn compound(one_plus_r: Decimal, n: u32) -> Decimal {
    let mut factor = Decimal::ONE;
    for _ in 0..n {
        factor *= one_plus_r;
    }
    factor
}

#[derive(Debug, Clone, Serialize)]
pub struct SipProjection {
    pub months_elapsed: u32,
    pub total_invested: Decimal,
    pub future_value: Decimal,
    /// Raw progress; may exceed 100 for plans past their duration.
    pub progress_percent: Decimal,
}

impl SipProjection {
    /// Progress capped at 100 for display; the raw value is retained.
    pub fn display_progress(&self) -> Decimal {
        self.progress_percent.min(hundred())
    }
}

/// Annuity-due future value of a systematic investment plan: each
/// monthly contribution compounds for the remainder of its own period
/// plus one extra period. Contributions stop at `duration_months`.
pub fn sip_projection(sip: &Sip, now: NaiveDate) -> SipProjection {
    let elapsed = sip
        .start_date
        .map(|start| months_elapsed(start, now))
        .unwrap_or(0);
    let n = elapsed.min(sip.duration_months);
    let total_invested = sip.monthly_amount * Decimal::from(n);
    let r = sip.annual_return_rate / Decimal::from(MONTHS_PER_YEAR_TIMES_PERCENT);
    let future_value = if r.is_zero() {
        total_invested
    } else {
        let growth = compound(Decimal::ONE + r, n);
        sip.monthly_amount * ((growth - Decimal::ONE) / r) * (Decimal::ONE + r)
    };
    let progress_percent = if sip.duration_months == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(n) / Decimal::from(sip.duration_months) * hundred()).round_dp(1)
    };
    SipProjection {
        months_elapsed: n,
        total_invested,
        future_value: future_value.round_dp(2),
        progress_percent,
    }
}

/// Simple monthly interest on the outstanding principal; paying interest
/// never reduces the principal.
pub fn monthly_interest(principal: Decimal, annual_rate_percent: Decimal) -> Decimal {
    (principal * annual_rate_percent / Decimal::from(MONTHS_PER_YEAR_TIMES_PERCENT)).round_dp(2)
}

/// One calendar month after the last interest payment, or the loan's own
/// due date when no payment has been made yet.
pub fn next_interest_due(loan: &Loan) -> Option<NaiveDate> {
    loan.last_interest_paid
        .map(|paid| add_months(paid, 1))
        .or(loan.due_date)
}

pub fn is_interest_due(loan: &Loan, now: NaiveDate) -> bool {
    loan.status != PayStatus::Paid
        && next_interest_due(loan).is_some_and(|due| now >= due)
}

/// The payment record appended to the loan's history when interest is
/// paid today.
pub fn interest_payment(loan: &Loan, now: NaiveDate) -> InterestPayment {
    InterestPayment {
        date: now,
        amount: monthly_interest(loan.principal, loan.annual_interest_rate),
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Deadline {
    /// Negative when overdue.
    pub days_remaining: i64,
    pub overdue: bool,
}

pub fn deadline(due: NaiveDate, now: NaiveDate) -> Deadline {
    let days_remaining = (due - now).num_days();
    Deadline {
        days_remaining,
        overdue: days_remaining < 0,
    }
}

/// A violation without its own due date falls due 30 days after the
/// violation itself.
pub fn obligation_due_date(o: &Obligation) -> Option<NaiveDate> {
    o.due_date.or_else(|| match o.kind {
        ObligationKind::Violation => o.event_date.map(|d| d + Days::new(30)),
        ObligationKind::Tax => None,
    })
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PositionEconomics {
    pub total_invested: Decimal,
    pub current_value: Decimal,
    pub gain_loss: Decimal,
    pub gain_loss_percent: Decimal,
}

pub fn position(stock: &StockHolding) -> PositionEconomics {
    let total_invested = stock.quantity * stock.buy_price;
    let current_value = stock.quantity * stock.current_price;
    let gain_loss = current_value - total_invested;
    let gain_loss_percent = if total_invested.is_zero() {
        Decimal::ZERO
    } else {
        (gain_loss / total_invested * hundred()).round_dp(2)
    };
    PositionEconomics {
        total_invested,
        current_value,
        gain_loss,
        gain_loss_percent,
    }
}

#[derive(Debug, Clone)]
pub enum SaleOutcome {
    /// The whole position was sold; the existing record flips to Sold.
    Full(StockHolding),
    /// Part of the position was sold: the original keeps the remainder
    /// and a new Sold record carries the sold quantity. Quantity is
    /// conserved across the pair.
    Partial {
        retained: StockHolding,
        sold: StockHolding,
    },
}

/// Sell `quantity` units at `price` on `date`. Returns `None` for a
/// non-positive or oversized quantity, or for an already-sold holding.
pub fn sell(
    stock: &StockHolding,
    quantity: Decimal,
    price: Decimal,
    date: NaiveDate,
) -> Option<SaleOutcome> {
    if stock.status == StockStatus::Sold
        || quantity <= Decimal::ZERO
        || quantity > stock.quantity
    {
        return None;
    }
    let mut sold = stock.clone();
    sold.status = StockStatus::Sold;
    sold.sell_quantity = Some(quantity);
    sold.sell_price = Some(price);
    sold.sell_date = Some(date);
    if quantity == stock.quantity {
        Some(SaleOutcome::Full(sold))
    } else {
        let mut retained = stock.clone();
        retained.quantity -= quantity;
        sold.id = 0; // new record, id assigned by the store
        sold.quantity = quantity;
        Some(SaleOutcome::Partial { retained, sold })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetPeriod {
    pub period: String,
    pub budget: Decimal,
    pub actual: Decimal,
    /// `actual - budget`; positive means overspend.
    pub variance: Decimal,
    /// `(budget - actual) / budget * 100`; positive means under budget.
    pub performance_percent: Decimal,
}

/// Variance of each period's actual spend against the average across all
/// periods, the reference budget the original dashboard assumed.
pub fn budget_performance(actuals: &[(String, Decimal)]) -> Vec<BudgetPeriod> {
    if actuals.is_empty() {
        return Vec::new();
    }
    let total: Decimal = actuals.iter().map(|(_, a)| *a).sum();
    let avg = (total / Decimal::from(actuals.len() as i64)).round_dp(2);
    actuals
        .iter()
        .map(|(period, actual)| BudgetPeriod {
            period: period.clone(),
            budget: avg,
            actual: *actual,
            variance: *actual - avg,
            performance_percent: if avg.is_zero() {
                Decimal::ZERO
            } else {
                ((avg - *actual) / avg * hundred()).round_dp(1)
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SipStatus;
    use std::str::FromStr;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sip(monthly: i64, rate: &str, duration: u32, start: NaiveDate) -> Sip {
        Sip {
            id: 1,
            name: "Index Fund".into(),
            monthly_amount: Decimal::from(monthly),
            annual_return_rate: Decimal::from_str(rate).unwrap(),
            duration_months: duration,
            start_date: Some(start),
            status: SipStatus::Active,
        }
    }

    #[test]
    fn annuity_due_future_value_after_one_year() {
        // 1000/month at 12% for 12 months:
        // 1000 * ((1.01^12 - 1) / 0.01) * 1.01 = 12_809.3280...
        let p = sip_projection(&sip(1000, "12", 60, d(2024, 8, 1)), d(2025, 8, 1));
        assert_eq!(p.months_elapsed, 12);
        assert_eq!(p.total_invested, Decimal::from(12_000));
        let expected = Decimal::from_str("12809.3280").unwrap();
        assert!((p.future_value - expected).abs() < Decimal::from_str("0.01").unwrap());
    }

    #[test]
    fn zero_rate_future_value_is_contributions() {
        let p = sip_projection(&sip(500, "0", 24, d(2024, 8, 1)), d(2025, 2, 1));
        assert_eq!(p.months_elapsed, 6);
        assert_eq!(p.future_value, Decimal::from(3_000));
    }

    #[test]
    fn contributions_stop_at_duration() {
        let p = sip_projection(&sip(1000, "12", 6, d(2020, 1, 1)), d(2025, 8, 1));
        assert_eq!(p.months_elapsed, 6);
        assert_eq!(p.total_invested, Decimal::from(6_000));
        assert_eq!(p.progress_percent, Decimal::from(100));
        assert_eq!(p.display_progress(), Decimal::from(100));
    }

    #[test]
    fn monthly_interest_is_exact() {
        assert_eq!(
            monthly_interest(Decimal::from(100_000), Decimal::from(12)),
            Decimal::from_str("1000.00").unwrap()
        );
    }

    #[test]
    fn next_due_prefers_payment_history() {
        let mut loan = Loan {
            id: 1,
            organization: "Bank".into(),
            principal: Decimal::from(100_000),
            annual_interest_rate: Decimal::from(12),
            due_date: Some(d(2025, 1, 15)),
            status: PayStatus::Pending,
            last_interest_paid: None,
            interest_payments: Vec::new(),
            reason: None,
        };
        assert_eq!(next_interest_due(&loan), Some(d(2025, 1, 15)));
        assert!(is_interest_due(&loan, d(2025, 1, 15)));
        assert!(!is_interest_due(&loan, d(2025, 1, 14)));

        loan.last_interest_paid = Some(d(2025, 1, 31));
        assert_eq!(next_interest_due(&loan), Some(d(2025, 2, 28)));

        loan.status = PayStatus::Paid;
        assert!(!is_interest_due(&loan, d(2025, 12, 31)));
    }

    #[test]
    fn deadline_arithmetic() {
        let now = d(2025, 8, 8);
        let ahead = deadline(now + Days::new(5), now);
        assert_eq!(ahead.days_remaining, 5);
        assert!(!ahead.overdue);
        let behind = deadline(d(2025, 8, 5), now);
        assert_eq!(behind.days_remaining, -3);
        assert!(behind.overdue);
    }

    #[test]
    fn violation_due_defaults_thirty_days_after_event() {
        let v = Obligation {
            id: 1,
            kind: ObligationKind::Violation,
            label: "Speeding".into(),
            amount: Decimal::from(500),
            due_date: None,
            event_date: Some(d(2025, 7, 1)),
            status: PayStatus::Pending,
            note: None,
        };
        assert_eq!(obligation_due_date(&v), Some(d(2025, 7, 31)));
    }

    fn holding(quantity: i64) -> StockHolding {
        StockHolding {
            id: 7,
            name: "ACME".into(),
            quantity: Decimal::from(quantity),
            buy_price: Decimal::from(10),
            current_price: Decimal::from(12),
            buy_date: Some(d(2024, 1, 1)),
            status: StockStatus::Holding,
            sell_quantity: None,
            sell_price: None,
            sell_date: None,
        }
    }

    #[test]
    fn position_economics_guard_zero_investment() {
        let p = position(&holding(100));
        assert_eq!(p.total_invested, Decimal::from(1_000));
        assert_eq!(p.current_value, Decimal::from(1_200));
        assert_eq!(p.gain_loss, Decimal::from(200));
        assert_eq!(p.gain_loss_percent, Decimal::from(20));

        let empty = position(&holding(0));
        assert_eq!(empty.gain_loss_percent, Decimal::ZERO);
    }

    #[test]
    fn partial_sale_conserves_quantity() {
        let stock = holding(100);
        let outcome = sell(&stock, Decimal::from(30), Decimal::from(12), d(2025, 8, 1));
        match outcome {
            Some(SaleOutcome::Partial { retained, sold }) => {
                assert_eq!(retained.quantity, Decimal::from(70));
                assert_eq!(sold.quantity, Decimal::from(30));
                assert_eq!(retained.quantity + sold.quantity, stock.quantity);
                assert_eq!(sold.status, StockStatus::Sold);
                assert_eq!(sold.buy_price, stock.buy_price);
                assert_eq!(sold.buy_date, stock.buy_date);
                assert_eq!(retained.status, StockStatus::Holding);
            }
            other => panic!("expected partial sale, got {:?}", other.is_some()),
        }
    }

    #[test]
    fn full_sale_flips_existing_record() {
        let stock = holding(100);
        match sell(&stock, Decimal::from(100), Decimal::from(15), d(2025, 8, 1)) {
            Some(SaleOutcome::Full(sold)) => {
                assert_eq!(sold.id, stock.id);
                assert_eq!(sold.status, StockStatus::Sold);
                assert_eq!(sold.sell_quantity, Some(Decimal::from(100)));
            }
            _ => panic!("expected full sale"),
        }
    }

    #[test]
    fn invalid_sales_are_rejected() {
        let stock = holding(100);
        assert!(sell(&stock, Decimal::ZERO, Decimal::from(12), d(2025, 8, 1)).is_none());
        assert!(sell(&stock, Decimal::from(101), Decimal::from(12), d(2025, 8, 1)).is_none());
        let mut sold = stock.clone();
        sold.status = StockStatus::Sold;
        assert!(sell(&sold, Decimal::from(10), Decimal::from(12), d(2025, 8, 1)).is_none());
    }

    #[test]
    fn budget_performance_against_average() {
        let actuals = vec![
            ("Jun 2025".to_string(), Decimal::from(900)),
            ("Jul 2025".to_string(), Decimal::from(1_100)),
        ];
        let perf = budget_performance(&actuals);
        assert_eq!(perf.len(), 2);
        assert_eq!(perf[0].budget, Decimal::from(1_000));
        assert_eq!(perf[0].variance, Decimal::from(-100));
        assert_eq!(perf[0].performance_percent, Decimal::from(10));
        assert_eq!(perf[1].variance, Decimal::from(100));
        assert_eq!(perf[1].performance_percent, Decimal::from(-10));
        assert!(budget_performance(&[]).is_empty());
    }
}
