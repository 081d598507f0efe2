// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The eight persisted record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Expense,
    DebtOwedByMe,
    DebtOwedToMe,
    InvestmentPlan,
    StockHolding,
    Loan,
    Tax,
    Violation,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Expense => "expense",
            RecordKind::DebtOwedByMe => "debt-owed-by-me",
            RecordKind::DebtOwedToMe => "debt-owed-to-me",
            RecordKind::InvestmentPlan => "sip",
            RecordKind::StockHolding => "stock",
            RecordKind::Loan => "loan",
            RecordKind::Tax => "tax",
            RecordKind::Violation => "violation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtDirection {
    OwedByMe,
    OwedToMe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtStatus {
    Pending,
    Paid,
    Cleared,
}

impl DebtStatus {
    /// Lenient parse of stored text; unknown text is treated as Pending.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "paid" => DebtStatus::Paid,
            "cleared" => DebtStatus::Cleared,
            _ => DebtStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DebtStatus::Pending => "Pending",
            DebtStatus::Paid => "Paid",
            DebtStatus::Cleared => "Cleared",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SipStatus {
    Active,
    Completed,
    Cancelled,
}

impl SipStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "completed" => SipStatus::Completed,
            "cancelled" => SipStatus::Cancelled,
            _ => SipStatus::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SipStatus::Active => "Active",
            SipStatus::Completed => "Completed",
            SipStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    Holding,
    Sold,
}

impl StockStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sold" => StockStatus::Sold,
            _ => StockStatus::Holding,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Holding => "Holding",
            StockStatus::Sold => "Sold",
        }
    }
}

/// Shared by loans, taxes, and violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayStatus {
    Pending,
    Paid,
}

impl PayStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "paid" => PayStatus::Paid,
            _ => PayStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayStatus::Pending => "Pending",
            PayStatus::Paid => "Paid",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub amount: Decimal,
    pub category: String,
    pub occurred_at: Option<NaiveDateTime>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: i64,
    pub direction: DebtDirection,
    pub counterparty: String,
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
    pub status: DebtStatus,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sip {
    pub id: i64,
    pub name: String,
    pub monthly_amount: Decimal,
    pub annual_return_rate: Decimal, // percent
    pub duration_months: u32,
    pub start_date: Option<NaiveDate>,
    pub status: SipStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockHolding {
    pub id: i64,
    pub name: String,
    pub quantity: Decimal,
    pub buy_price: Decimal,
    pub current_price: Decimal,
    pub buy_date: Option<NaiveDate>,
    pub status: StockStatus,
    pub sell_quantity: Option<Decimal>,
    pub sell_price: Option<Decimal>,
    pub sell_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestPayment {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub organization: String,
    pub principal: Decimal,
    pub annual_interest_rate: Decimal, // percent
    pub due_date: Option<NaiveDate>,
    pub status: PayStatus,
    pub last_interest_paid: Option<NaiveDate>,
    pub interest_payments: Vec<InterestPayment>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObligationKind {
    Tax,
    Violation,
}

/// A dated payment obligation: a tax or a traffic-violation fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obligation {
    pub id: i64,
    pub kind: ObligationKind,
    pub label: String,
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
    /// For violations, the date the violation occurred.
    pub event_date: Option<NaiveDate>,
    pub status: PayStatus,
    pub note: Option<String>,
}

/// Canonical flattened record consumed by the aggregator. Derived, never
/// stored; `occurred_at = None` keeps a record out of windowed views but
/// not out of non-time-scoped totals.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub kind: RecordKind,
    pub amount: Decimal,
    pub occurred_at: Option<NaiveDateTime>,
    pub category: String,
    pub status: String,
}

/// An immutable snapshot of every stored record, loaded in full by the
/// store. Every engine computation is a function of one snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub expenses: Vec<Expense>,
    pub debts: Vec<Debt>,
    pub sips: Vec<Sip>,
    pub stocks: Vec<StockHolding>,
    pub loans: Vec<Loan>,
    pub taxes: Vec<Obligation>,
    pub violations: Vec<Obligation>,
}

impl Snapshot {
    pub fn debts_owed_by_me(&self) -> impl Iterator<Item = &Debt> {
        self.debts
            .iter()
            .filter(|d| d.direction == DebtDirection::OwedByMe)
    }

    pub fn debts_owed_to_me(&self) -> impl Iterator<Item = &Debt> {
        self.debts
            .iter()
            .filter(|d| d.direction == DebtDirection::OwedToMe)
    }
}
