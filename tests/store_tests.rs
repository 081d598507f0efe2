// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneylens::db;
use moneylens::engine::formulas::next_interest_due;
use rust_decimal::Decimal;
use tempfile::tempdir;

#[test]
fn on_disk_store_round_trips_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("moneylens.sqlite");
    {
        let conn = db::open_at(&path).unwrap();
        conn.execute(
            "INSERT INTO expenses(amount, category, date) VALUES ('42.50', 'Food', '2025-08-01')",
            [],
        )
        .unwrap();
    }
    let conn = db::open_at(&path).unwrap();
    let snapshot = db::load_snapshot(&conn).unwrap();
    assert_eq!(snapshot.expenses.len(), 1);
    let expense = &snapshot.expenses[0];
    assert_eq!(expense.amount, Decimal::new(4250, 2));
    assert_eq!(expense.category, "Food");
    assert_eq!(
        expense.occurred_at.map(|at| at.date()),
        NaiveDate::from_ymd_opt(2025, 8, 1)
    );
}

#[test]
fn malformed_stored_values_degrade_instead_of_failing() {
    let conn = db::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO expenses(amount, category, date) VALUES ('garbage', '', '31/12/2025');
        INSERT INTO sips(name, monthly_amount, annual_return_rate, duration_months, start_date)
            VALUES ('Fund', 'NaN', '12', '24', NULL);
        "#,
    )
    .unwrap();
    let snapshot = db::load_snapshot(&conn).unwrap();
    let expense = &snapshot.expenses[0];
    assert_eq!(expense.amount, Decimal::ZERO);
    assert_eq!(expense.category, "Uncategorized");
    assert!(expense.occurred_at.is_none());
    assert_eq!(snapshot.sips[0].monthly_amount, Decimal::ZERO);
    assert!(snapshot.sips[0].start_date.is_none());
}

#[test]
fn stored_instants_and_bare_dates_share_a_timeline() {
    let conn = db::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO expenses(amount, category, date) VALUES
            ('10', 'Food', '2025-08-01T09:30:00+00:00'),
            ('20', 'Food', '2025-08-01');
        "#,
    )
    .unwrap();
    let snapshot = db::load_snapshot(&conn).unwrap();
    let dates: Vec<_> = snapshot
        .expenses
        .iter()
        .map(|e| e.occurred_at.unwrap().date())
        .collect();
    assert_eq!(dates[0], dates[1]);
    // the bare date resolves to midnight, ordering before the instant
    assert!(snapshot.expenses[1].occurred_at < snapshot.expenses[0].occurred_at);
}

#[test]
fn stored_status_text_parses_leniently_and_renders_canonically() {
    let conn = db::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO debts(direction, counterparty, amount, status) VALUES
            ('by_me', 'Alice', '100', 'paid'),
            ('by_me', 'Bob', '100', 'CLEARED'),
            ('by_me', 'Carol', '100', 'something else');
        "#,
    )
    .unwrap();
    let snapshot = db::load_snapshot(&conn).unwrap();
    let statuses: Vec<&str> = snapshot.debts.iter().map(|d| d.status.as_str()).collect();
    assert_eq!(statuses, vec!["Paid", "Cleared", "Pending"]);
}

#[test]
fn loan_interest_history_loads_in_order() {
    let conn = db::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO loans(organization, principal, annual_interest_rate, due_date, last_interest_paid)
            VALUES ('Bank', '100000', '12', '2025-01-15', '2025-07-10');
        INSERT INTO loan_interest_payments(loan_id, date, amount) VALUES
            (1, '2025-06-10', '1000'),
            (1, '2025-07-10', '1000');
        "#,
    )
    .unwrap();
    let snapshot = db::load_snapshot(&conn).unwrap();
    let loan = &snapshot.loans[0];
    assert_eq!(loan.interest_payments.len(), 2);
    assert_eq!(
        loan.interest_payments[1].date,
        NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()
    );
    // the accrual clock follows the last payment, not the original due date
    assert_eq!(
        next_interest_due(loan),
        NaiveDate::from_ymd_opt(2025, 8, 10)
    );
}
