// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::load_and_process;
use crate::config::AuditConfig;
use crate::models::{PolicyViolation, ViolationKind};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

fn parse_kind(s: &str) -> Result<ViolationKind> {
    match s.trim().to_lowercase().as_str() {
        "missing" => Ok(ViolationKind::MissingPolicyCode),
        "invalid" => Ok(ViolationKind::InvalidPolicyCode),
        "amount" => Ok(ViolationKind::AmountViolation),
        other => Err(anyhow!("Unknown violation kind '{}' (use missing|invalid|amount)", other)),
    }
}

pub fn query_rows(cfg: &AuditConfig, sub: &clap::ArgMatches) -> Result<Vec<PolicyViolation>> {
    let kind = sub.get_one::<String>("kind").map(|k| parse_kind(k)).transpose()?;
    let (data, _) = load_and_process(cfg, sub)?;
    Ok(data
        .policy_violations
        .into_iter()
        .filter(|v| kind.is_none_or(|k| v.reason == k))
        .collect())
}

pub fn handle(cfg: &AuditConfig, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let rows = query_rows(cfg, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let data = rows
        .into_iter()
        .map(|v| {
            vec![
                v.transaction_id,
                v.date.to_string(),
                fmt_money(&v.amount),
                v.category,
                v.vendor,
                v.reason.label().to_string(),
                v.details,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Amount", "Category", "Vendor", "Violation", "Details"],
            data
        )
    );
    Ok(())
}
