// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod audit;
pub mod config;
pub mod exporter;
pub mod flagged;
pub mod insights;
pub mod transactions;
pub mod violations;

use crate::config::AuditConfig;
use crate::engine::process_transactions;
use crate::ingest::{read_transactions_from_path, RowError};
use crate::models::{FlaggedTransaction, ProcessedData};
use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::path::Path;

/// Load the `--path` CSV and run the engine over it.
pub fn load_and_process(
    cfg: &AuditConfig,
    sub: &clap::ArgMatches,
) -> Result<(ProcessedData, Vec<RowError>)> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let batch = read_transactions_from_path(Path::new(path))
        .with_context(|| format!("Load transactions from {}", path))?;
    report_row_errors(&batch.errors);
    Ok((process_transactions(&batch.transactions, cfg), batch.errors))
}

pub fn report_row_errors(errors: &[RowError]) {
    for e in errors {
        eprintln!("row {}: {}", e.row, e.message);
    }
}

pub const SORT_FIELDS: [&str; 8] = [
    "transaction_id",
    "date",
    "amount",
    "account",
    "category",
    "vendor",
    "policy_code",
    "risk_reasons",
];

fn compare_by(field: &str, a: &FlaggedTransaction, b: &FlaggedTransaction) -> Ordering {
    let (x, y) = (&a.transaction, &b.transaction);
    match field {
        "transaction_id" => x.transaction_id.cmp(&y.transaction_id),
        "date" => x.date.cmp(&y.date),
        "amount" => x.amount.cmp(&y.amount),
        "account" => x.account.cmp(&y.account),
        "category" => x.category.cmp(&y.category),
        "vendor" => x.vendor.cmp(&y.vendor),
        // absent codes sort as empty strings
        "policy_code" => x
            .policy_code
            .as_deref()
            .unwrap_or("")
            .cmp(y.policy_code.as_deref().unwrap_or("")),
        "risk_reasons" => a.joined_reasons().cmp(&b.joined_reasons()),
        _ => Ordering::Equal,
    }
}

/// Stable sort on one column; ties keep batch order in both directions.
pub fn sort_rows(rows: &mut [FlaggedTransaction], field: &str, desc: bool) {
    rows.sort_by(|a, b| {
        let ord = compare_by(field, a, b);
        if desc { ord.reverse() } else { ord }
    });
}
