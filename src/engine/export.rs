// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report serialization to JSON, sectioned CSV, and a minimal HTML
//! document. Text only; writing to disk belongs to the caller.

use anyhow::Result;
use std::fmt::Write as _;

use crate::engine::report::Report;
use crate::utils::fmt_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Html,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "html" => Some(ExportFormat::Html),
            _ => None,
        }
    }
}

pub fn encode(report: &Report, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ExportFormat::Csv => Ok(to_csv(report)),
        ExportFormat::Html => Ok(to_html(report)),
    }
}

fn to_csv(report: &Report) -> String {
    let mut csv = format!("Financial Report - {}\n", report.report_type);
    csv.push('\n');
    csv.push_str("Summary\n");
    for (key, value) in &report.summary {
        let _ = writeln!(csv, "{},{}", key, value);
    }
    if let Some(breakdown) = &report.category_breakdown {
        csv.push('\n');
        csv.push_str("Category Breakdown\n");
        csv.push_str("Category,Amount,Percentage\n");
        for share in breakdown {
            let _ = writeln!(
                csv,
                "{},{},{}%",
                share.category,
                fmt_money(&share.amount),
                share.percentage_of_total
            );
        }
    }
    csv
}

fn to_html(report: &Report) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    let _ = writeln!(html, "<title>{}</title>", report.report_type);
    html.push_str(
        "<style>\nbody { font-family: Arial, sans-serif; margin: 40px; }\n\
         table { width: 100%; border-collapse: collapse; margin: 20px 0; }\n\
         th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n\
         th { background-color: #f2f2f2; }\n</style>\n",
    );
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{}</h1>", report.report_type);
    let _ = writeln!(
        html,
        "<p><strong>Period:</strong> {}</p>",
        report.period_label
    );
    html.push_str("<h2>Summary</h2>\n");
    for (key, value) in &report.summary {
        let _ = writeln!(html, "<p><strong>{}:</strong> {}</p>", key, value);
    }
    if let Some(breakdown) = &report.category_breakdown {
        html.push_str("<h2>Category Breakdown</h2>\n<table>\n");
        html.push_str("<tr><th>Category</th><th>Amount</th><th>Percentage</th></tr>\n");
        for share in breakdown {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}%</td></tr>",
                share.category,
                fmt_money(&share.amount),
                share.percentage_of_total
            );
        }
        html.push_str("</table>\n");
    }
    if !report.insights.is_empty() {
        html.push_str("<h2>Insights</h2>\n<ul>\n");
        for insight in &report.insights {
            let _ = writeln!(html, "<li>{}</li>", insight);
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::report::{build, PeriodRange, ReportType};
    use crate::models::Snapshot;
    use chrono::NaiveDate;

    fn sample_report() -> Report {
        build(
            &Snapshot::default(),
            ReportType::Monthly,
            PeriodRange {
                start: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
            },
        )
    }

    #[test]
    fn csv_layout_has_header_and_sections() {
        let csv = encode(&sample_report(), ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Financial Report - Monthly Report"));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("Summary"));
        assert!(csv.lines().any(|l| l.starts_with("total_expenses,")));
        assert!(csv.contains("Category Breakdown\nCategory,Amount,Percentage\n"));
    }

    #[test]
    fn html_is_a_minimal_document() {
        let html = encode(&sample_report(), ExportFormat::Html).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Monthly Report</h1>"));
        assert!(html.contains("<strong>net_worth:</strong>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn json_round_trips_summary_keys() {
        let json = encode(&sample_report(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["summary"]["total_expenses"].is_string());
        assert_eq!(value["report_type"], "Monthly Report");
    }
}
