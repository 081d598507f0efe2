// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use moneylens::commands::{exporter, reports};
use moneylens::{cli, db};
use rusqlite::Connection;
use tempfile::tempdir;

fn seeded_conn() -> Connection {
    let conn = db::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO expenses(amount, category, date) VALUES
            ('600', 'Food', '2025-07-05'),
            ('400', 'Travel', '2025-07-12');
        INSERT INTO debts(direction, counterparty, amount) VALUES
            ('by_me', 'Alice', '500');
        "#,
    )
    .unwrap();
    conn
}

#[test]
fn export_records_writes_csv_with_every_kind() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("records.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "moneylens",
        "export",
        "records",
        "--format",
        "csv",
        "--out",
        &out_str,
    ]);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(&conn, export_m).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("kind,date,category,amount,status"));
    assert!(contents.contains("expense,2025-07-05,Food,600,"));
    assert!(contents.contains("debt-owed-by-me,,Alice,500,Pending"));
}

#[test]
fn export_records_writes_parseable_json() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("records.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "moneylens",
        "export",
        "records",
        "--format",
        "json",
        "--out",
        &out_str,
    ]);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(&conn, export_m).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["kind"], "expense");
    assert_eq!(items[2]["category"], "Alice");
}

#[test]
fn report_export_writes_html_document() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("report.html");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "moneylens",
        "report",
        "export",
        "--type",
        "monthly",
        "--start",
        "2025-07-01",
        "--end",
        "2025-07-31",
        "--format",
        "html",
        "--out",
        &out_str,
    ]);
    let Some(("report", report_m)) = matches.subcommand() else {
        panic!("no report subcommand");
    };
    reports::handle(&conn, report_m).unwrap();

    let html = std::fs::read_to_string(&out_path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h1>Monthly Report</h1>"));
    assert!(html.contains("Food"));
    assert!(html.contains("<ul>"));
}

#[test]
fn report_export_rejects_unknown_type() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("report.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "moneylens",
        "report",
        "export",
        "--type",
        "yearly",
        "--start",
        "2025-07-01",
        "--end",
        "2025-07-31",
        "--format",
        "json",
        "--out",
        &out_str,
    ]);
    let Some(("report", report_m)) = matches.subcommand() else {
        panic!("no report subcommand");
    };
    assert!(reports::handle(&conn, report_m).is_err());
    assert!(!out_path.exists());
}
