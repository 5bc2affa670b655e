// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::load_and_process;
use crate::config::AuditConfig;
use crate::models::FlaggedTransaction;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Flat export shape: risk reasons collapse into a single `; `-joined field.
#[derive(Debug, Serialize)]
pub struct ExportRow {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub account: String,
    pub category: String,
    pub vendor: String,
    pub policy_code: String,
    pub risk_reasons: String,
    pub is_flagged: bool,
}

impl From<&FlaggedTransaction> for ExportRow {
    fn from(f: &FlaggedTransaction) -> Self {
        let t = &f.transaction;
        Self {
            transaction_id: t.transaction_id.clone(),
            date: t.date,
            amount: t.amount,
            account: t.account.clone(),
            category: t.category.clone(),
            vendor: t.vendor.clone(),
            policy_code: t.policy_code.clone().unwrap_or_default(),
            risk_reasons: f.joined_reasons(),
            is_flagged: f.is_flagged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
}

fn parse_format(s: &str) -> Result<Format> {
    match s.trim().to_lowercase().as_str() {
        "csv" => Ok(Format::Csv),
        "json" => Ok(Format::Json),
        other => Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
}

fn write_rows<T: Serialize>(fmt: Format, out: &Path, rows: &[T]) -> Result<()> {
    if rows.is_empty() {
        return Err(anyhow!("No data available for this report."));
    }
    match fmt {
        Format::Csv => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        Format::Json => {
            std::fs::write(out, serde_json::to_string_pretty(rows)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
    }
    Ok(())
}

pub fn handle(cfg: &AuditConfig, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = parse_format(sub.get_one::<String>("format").unwrap())?;
    let dataset = sub.get_one::<String>("dataset").unwrap().trim().to_lowercase();
    let out = Path::new(sub.get_one::<String>("out").unwrap().trim());
    if !matches!(dataset.as_str(), "all" | "flagged" | "violations") {
        return Err(anyhow!(
            "Unknown dataset: {} (use all|flagged|violations)",
            dataset
        ));
    }

    let (data, _) = load_and_process(cfg, sub)?;
    let count = match dataset.as_str() {
        "violations" => {
            write_rows(fmt, out, &data.policy_violations)?;
            data.policy_violations.len()
        }
        "all" => {
            let rows: Vec<ExportRow> = data
                .all_transactions_with_flags
                .iter()
                .map(ExportRow::from)
                .collect();
            write_rows(fmt, out, &rows)?;
            rows.len()
        }
        _ => {
            let rows: Vec<ExportRow> = data
                .flagged_transactions
                .iter()
                .map(ExportRow::from)
                .collect();
            write_rows(fmt, out, &rows)?;
            rows.len()
        }
    };
    info!(dataset = %dataset, count, "export written");
    println!("Exported {} {} rows to {}", count, dataset, out.display());
    Ok(())
}
