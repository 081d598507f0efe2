// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};

use crate::engine::formulas::{
    deadline, interest_payment, is_interest_due, monthly_interest, next_interest_due,
    obligation_due_date,
};
use crate::models::{Obligation, ObligationKind, PayStatus};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle_loan(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => loan_add(conn, sub)?,
        Some(("list", sub)) => loan_list(conn, sub)?,
        Some(("mark-paid", sub)) => loan_mark_paid(conn, sub)?,
        Some(("pay-interest", sub)) => loan_pay_interest(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn handle_obligation(
    conn: &Connection,
    kind: ObligationKind,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => obligation_add(conn, kind, sub)?,
        Some(("list", sub)) => obligation_list(conn, kind, sub)?,
        Some(("pay", sub)) => obligation_pay(conn, kind, sub)?,
        _ => {}
    }
    Ok(())
}

fn loan_add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let organization = sub
        .get_one::<String>("organization")
        .unwrap()
        .trim()
        .to_string();
    let principal = parse_decimal(sub.get_one::<String>("principal").unwrap().trim())?;
    let rate = parse_decimal(sub.get_one::<String>("rate").unwrap().trim())?;
    let due = sub
        .get_one::<String>("due")
        .map(|s| parse_date(s.trim()))
        .transpose()?;
    let reason = sub.get_one::<String>("reason").map(|s| s.trim().to_string());
    conn.execute(
        "INSERT INTO loans(organization, principal, annual_interest_rate, due_date, reason)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            organization,
            principal.to_string(),
            rate.to_string(),
            due.map(|d| d.to_string()),
            reason
        ],
    )?;
    println!(
        "Added loan of {} from {} at {}% (monthly interest {})",
        principal,
        organization,
        rate,
        monthly_interest(principal, rate)
    );
    Ok(())
}

fn loan_list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let snapshot = crate::db::load_snapshot(conn)?;
    if maybe_print_json(json_flag, jsonl_flag, &snapshot.loans)? {
        return Ok(());
    }
    let today = chrono::Local::now().date_naive();
    let rows = snapshot
        .loans
        .iter()
        .map(|l| {
            let overdue = l
                .due_date
                .is_some_and(|due| deadline(due, today).overdue && l.status != PayStatus::Paid);
            let mut flags = Vec::new();
            if overdue {
                flags.push("Overdue");
            }
            if is_interest_due(l, today) {
                flags.push("Interest Due");
            }
            vec![
                l.id.to_string(),
                l.organization.clone(),
                fmt_money(&l.principal),
                format!(
                    "{}% ({}/mo)",
                    l.annual_interest_rate,
                    monthly_interest(l.principal, l.annual_interest_rate)
                ),
                l.due_date.map(|d| d.to_string()).unwrap_or_else(|| "N/A".into()),
                next_interest_due(l)
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "N/A".into()),
                l.status.as_str().to_string(),
                flags.join(", "),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Organization", "Principal", "Interest", "Due", "Next Interest", "Status",
                "Flags"
            ],
            rows
        )
    );
    Ok(())
}

fn loan_mark_paid(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = sub.get_one::<String>("id").unwrap().trim().parse()?;
    let updated = conn.execute(
        "UPDATE loans SET status=?1 WHERE id=?2",
        params![PayStatus::Paid.as_str(), id],
    )?;
    if updated == 0 {
        return Err(anyhow!("Loan {} not found", id));
    }
    println!("Loan {} marked Paid", id);
    Ok(())
}

/// Appends a month of interest to the payment history and advances the
/// accrual clock. The principal is untouched.
fn loan_pay_interest(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = sub.get_one::<String>("id").unwrap().trim().parse()?;
    let snapshot = crate::db::load_snapshot(conn)?;
    let loan = snapshot
        .loans
        .iter()
        .find(|l| l.id == id)
        .ok_or_else(|| anyhow!("Loan {} not found", id))?;
    if loan.status == PayStatus::Paid {
        return Err(anyhow!("Loan {} is already settled", id));
    }
    let today = chrono::Local::now().date_naive();
    let payment = interest_payment(loan, today);
    conn.execute(
        "INSERT INTO loan_interest_payments(loan_id, date, amount) VALUES (?1,?2,?3)",
        params![id, payment.date.to_string(), payment.amount.to_string()],
    )?;
    conn.execute(
        "UPDATE loans SET last_interest_paid=?1 WHERE id=?2",
        params![payment.date.to_string(), id],
    )?;
    println!(
        "Paid {} interest on loan {}; next due {}",
        payment.amount,
        id,
        crate::utils::add_months(payment.date, 1)
    );
    Ok(())
}

fn obligation_add(conn: &Connection, kind: ObligationKind, sub: &clap::ArgMatches) -> Result<()> {
    let label = sub.get_one::<String>("label").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let note = sub.get_one::<String>("note").map(|s| s.trim().to_string());
    let (due, event) = match kind {
        ObligationKind::Tax => (
            Some(parse_date(sub.get_one::<String>("due").unwrap().trim())?),
            None,
        ),
        ObligationKind::Violation => (
            sub.get_one::<String>("due")
                .map(|s| parse_date(s.trim()))
                .transpose()?,
            Some(parse_date(sub.get_one::<String>("date").unwrap().trim())?),
        ),
    };
    conn.execute(
        "INSERT INTO obligations(kind, label, amount, due_date, event_date, note)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            kind_key(kind),
            label,
            amount.to_string(),
            due.map(|d| d.to_string()),
            event.map(|d| d.to_string()),
            note
        ],
    )?;
    println!("Added {} {} of {}", kind_key(kind), label, amount);
    Ok(())
}

fn obligation_list(conn: &Connection, kind: ObligationKind, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let snapshot = crate::db::load_snapshot(conn)?;
    let items: &[Obligation] = match kind {
        ObligationKind::Tax => &snapshot.taxes,
        ObligationKind::Violation => &snapshot.violations,
    };
    if maybe_print_json(json_flag, jsonl_flag, &items)? {
        return Ok(());
    }
    let today = chrono::Local::now().date_naive();
    let rows = items
        .iter()
        .map(|o| {
            let due_text = match obligation_due_date(o) {
                Some(due) if o.status == PayStatus::Pending => {
                    let dl = deadline(due, today);
                    if dl.overdue {
                        format!("{} (overdue by {}d)", due, dl.days_remaining.abs())
                    } else {
                        format!("{} ({}d left)", due, dl.days_remaining)
                    }
                }
                Some(due) => due.to_string(),
                None => "N/A".into(),
            };
            vec![
                o.id.to_string(),
                o.label.clone(),
                fmt_money(&o.amount),
                due_text,
                o.status.as_str().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Type", "Amount", "Due", "Status"], rows)
    );
    Ok(())
}

fn obligation_pay(conn: &Connection, kind: ObligationKind, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = sub.get_one::<String>("id").unwrap().trim().parse()?;
    let updated = conn.execute(
        "UPDATE obligations SET status=?1 WHERE id=?2 AND kind=?3",
        params![PayStatus::Paid.as_str(), id, kind_key(kind)],
    )?;
    if updated == 0 {
        return Err(anyhow!("{} {} not found", kind_key(kind), id));
    }
    println!("Marked {} {} Paid", kind_key(kind), id);
    Ok(())
}

fn kind_key(kind: ObligationKind) -> &'static str {
    match kind {
        ObligationKind::Tax => "tax",
        ObligationKind::Violation => "violation",
    }
}
