// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{load_and_process, sort_rows};
use crate::config::AuditConfig;
use crate::models::FlaggedTransaction;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn query_rows(cfg: &AuditConfig, sub: &clap::ArgMatches) -> Result<Vec<FlaggedTransaction>> {
    let field = sub
        .get_one::<String>("sort")
        .map(String::as_str)
        .unwrap_or("date");
    let (data, _) = load_and_process(cfg, sub)?;
    let mut rows = data.all_transactions_with_flags;
    sort_rows(&mut rows, field, sub.get_flag("desc"));
    Ok(rows)
}

pub fn handle(cfg: &AuditConfig, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let rows = query_rows(cfg, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|f| {
            let t = &f.transaction;
            vec![
                t.transaction_id.clone(),
                t.date.to_string(),
                fmt_money(&t.amount),
                t.category.clone(),
                t.vendor.clone(),
                t.account.clone(),
                t.policy_code.clone().unwrap_or_default(),
                if f.is_flagged {
                    f.joined_reasons()
                } else {
                    "N/A".to_string()
                },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Amount", "Category", "Vendor", "Account", "Policy", "Risk Reasons"],
            data
        )
    );
    Ok(())
}
