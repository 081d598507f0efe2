// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::normalize;
use crate::models::{
    Debt, DebtDirection, DebtStatus, Expense, InterestPayment, Loan, Obligation,
    ObligationKind, PayStatus, Sip, SipStatus, Snapshot, StockHolding, StockStatus,
};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Moneylens", "moneylens"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("moneylens.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    open_at(&path)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    init_schema(&mut conn)?;
    Ok(conn)
}

fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount TEXT NOT NULL,
        category TEXT NOT NULL DEFAULT 'Uncategorized',
        date TEXT,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

    CREATE TABLE IF NOT EXISTS debts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        direction TEXT NOT NULL CHECK(direction IN ('by_me','to_me')),
        counterparty TEXT NOT NULL,
        amount TEXT NOT NULL,
        due_date TEXT,
        status TEXT NOT NULL DEFAULT 'Pending',
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS sips(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        monthly_amount TEXT NOT NULL,
        annual_return_rate TEXT NOT NULL,
        duration_months INTEGER NOT NULL,
        start_date TEXT,
        status TEXT NOT NULL DEFAULT 'Active'
    );

    CREATE TABLE IF NOT EXISTS stocks(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        quantity TEXT NOT NULL,
        buy_price TEXT NOT NULL,
        current_price TEXT NOT NULL,
        buy_date TEXT,
        status TEXT NOT NULL DEFAULT 'Holding',
        sell_quantity TEXT,
        sell_price TEXT,
        sell_date TEXT
    );

    CREATE TABLE IF NOT EXISTS loans(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        organization TEXT NOT NULL,
        principal TEXT NOT NULL,
        annual_interest_rate TEXT NOT NULL,
        due_date TEXT,
        status TEXT NOT NULL DEFAULT 'Pending',
        last_interest_paid TEXT,
        reason TEXT
    );

    CREATE TABLE IF NOT EXISTS loan_interest_payments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        loan_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        FOREIGN KEY(loan_id) REFERENCES loans(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS obligations(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL CHECK(kind IN ('tax','violation')),
        label TEXT NOT NULL,
        amount TEXT NOT NULL,
        due_date TEXT,
        event_date TEXT,
        status TEXT NOT NULL DEFAULT 'Pending',
        note TEXT
    );

    -- one overall budget per calendar month, in YYYY-MM
    CREATE TABLE IF NOT EXISTS budgets(
        month TEXT PRIMARY KEY,
        amount TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}

/// Load every stored record into an immutable snapshot. Malformed stored
/// values degrade through the normalizer (zero amounts, `None` dates)
/// rather than failing the load.
pub fn load_snapshot(conn: &Connection) -> Result<Snapshot> {
    let mut snapshot = Snapshot::default();

    let mut stmt =
        conn.prepare("SELECT id, amount, category, date, note FROM expenses ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
        ))
    })?;
    for row in rows {
        let (id, amount, category, date, note) = row?;
        snapshot.expenses.push(Expense {
            id,
            amount: normalize::amount_or_zero(amount.as_deref()),
            category: normalize::category_or_default(category.as_deref()),
            occurred_at: normalize::occurred_at(date.as_deref()),
            note,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT id, direction, counterparty, amount, due_date, status, note FROM debts ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;
    for row in rows {
        let (id, direction, counterparty, amount, due_date, status, note) = row?;
        snapshot.debts.push(Debt {
            id,
            direction: if direction == "to_me" {
                DebtDirection::OwedToMe
            } else {
                DebtDirection::OwedByMe
            },
            counterparty: counterparty.unwrap_or_default(),
            amount: normalize::amount_or_zero(amount.as_deref()),
            due_date: normalize::date_only(due_date.as_deref()),
            status: DebtStatus::parse(status.as_deref().unwrap_or("")),
            note,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT id, name, monthly_amount, annual_return_rate, duration_months, start_date, status
         FROM sips ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, i64>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;
    for row in rows {
        let (id, name, monthly_amount, annual_return_rate, duration_months, start_date, status) =
            row?;
        snapshot.sips.push(Sip {
            id,
            name: name.unwrap_or_default(),
            monthly_amount: normalize::amount_or_zero(monthly_amount.as_deref()),
            annual_return_rate: normalize::amount_or_zero(annual_return_rate.as_deref()),
            duration_months: u32::try_from(duration_months).unwrap_or(0),
            start_date: normalize::date_only(start_date.as_deref()),
            status: SipStatus::parse(status.as_deref().unwrap_or("")),
        });
    }

    let mut stmt = conn.prepare(
        "SELECT id, name, quantity, buy_price, current_price, buy_date, status,
                sell_quantity, sell_price, sell_date
         FROM stocks ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, Option<String>>(7)?,
            r.get::<_, Option<String>>(8)?,
            r.get::<_, Option<String>>(9)?,
        ))
    })?;
    for row in rows {
        let (id, name, quantity, buy_price, current_price, buy_date, status, sq, sp, sd) = row?;
        snapshot.stocks.push(StockHolding {
            id,
            name: name.unwrap_or_default(),
            quantity: normalize::amount_or_zero(quantity.as_deref()),
            buy_price: normalize::amount_or_zero(buy_price.as_deref()),
            current_price: normalize::amount_or_zero(current_price.as_deref()),
            buy_date: normalize::date_only(buy_date.as_deref()),
            status: StockStatus::parse(status.as_deref().unwrap_or("")),
            sell_quantity: sq.map(|s| normalize::amount_or_zero(Some(&s))),
            sell_price: sp.map(|s| normalize::amount_or_zero(Some(&s))),
            sell_date: normalize::date_only(sd.as_deref()),
        });
    }

    let mut stmt = conn.prepare(
        "SELECT id, organization, principal, annual_interest_rate, due_date, status,
                last_interest_paid, reason
         FROM loans ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, Option<String>>(7)?,
        ))
    })?;
    for row in rows {
        let (id, organization, principal, rate, due_date, status, last_paid, reason) = row?;
        snapshot.loans.push(Loan {
            id,
            organization: organization.unwrap_or_default(),
            principal: normalize::amount_or_zero(principal.as_deref()),
            annual_interest_rate: normalize::amount_or_zero(rate.as_deref()),
            due_date: normalize::date_only(due_date.as_deref()),
            status: PayStatus::parse(status.as_deref().unwrap_or("")),
            last_interest_paid: normalize::date_only(last_paid.as_deref()),
            interest_payments: Vec::new(),
            reason,
        });
    }

    let mut stmt = conn
        .prepare("SELECT loan_id, date, amount FROM loan_interest_payments ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, Option<String>>(2)?,
        ))
    })?;
    for row in rows {
        let (loan_id, date, amount) = row?;
        if let Some(loan) = snapshot.loans.iter_mut().find(|l| l.id == loan_id) {
            if let Some(date) = normalize::date_only(date.as_deref()) {
                loan.interest_payments.push(InterestPayment {
                    date,
                    amount: normalize::amount_or_zero(amount.as_deref()),
                });
            }
        }
    }

    let mut stmt = conn.prepare(
        "SELECT id, kind, label, amount, due_date, event_date, status, note
         FROM obligations ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, Option<String>>(7)?,
        ))
    })?;
    for row in rows {
        let (id, kind, label, amount, due_date, event_date, status, note) = row?;
        let obligation = Obligation {
            id,
            kind: if kind == "violation" {
                ObligationKind::Violation
            } else {
                ObligationKind::Tax
            },
            label: label.unwrap_or_default(),
            amount: normalize::amount_or_zero(amount.as_deref()),
            due_date: normalize::date_only(due_date.as_deref()),
            event_date: normalize::date_only(event_date.as_deref()),
            status: PayStatus::parse(status.as_deref().unwrap_or("")),
            note,
        };
        match obligation.kind {
            ObligationKind::Tax => snapshot.taxes.push(obligation),
            ObligationKind::Violation => snapshot.violations.push(obligation),
        }
    }

    Ok(snapshot)
}
