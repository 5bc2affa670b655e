// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::load_and_process;
use crate::config::AuditConfig;
use crate::ingest::RowError;
use crate::models::{ProcessedData, SpendingLeader};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AuditReport {
    #[serde(flatten)]
    pub data: ProcessedData,
    pub row_errors: Vec<RowError>,
}

pub fn run(cfg: &AuditConfig, sub: &clap::ArgMatches) -> Result<AuditReport> {
    let (data, row_errors) = load_and_process(cfg, sub)?;
    Ok(AuditReport { data, row_errors })
}

pub fn handle(cfg: &AuditConfig, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let top_n = *sub.get_one::<usize>("top").unwrap_or(&20);
    let report = run(cfg, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }
    let data = &report.data;
    let s = &data.audit_summary;

    println!(
        "{}",
        pretty_table(
            &["Transactions", "Total Amount", "Flagged", "Policy Violations"],
            vec![vec![
                s.total_transactions.to_string(),
                fmt_money(&s.total_amount),
                s.flagged_for_audit_count.to_string(),
                s.policy_violations_count.to_string(),
            ]],
        )
    );

    for (title, leaders) in [
        ("Category", &data.highest_spending_categories),
        ("Vendor", &data.highest_spending_vendors),
        ("Account", &data.highest_spending_accounts),
    ] {
        println!("{}", pretty_table(&[title, "Spent"], leader_rows(leaders)));
    }

    let trend = data
        .spend_trend
        .iter()
        .map(|p| vec![p.date.clone(), fmt_money(&p.amount)])
        .collect();
    println!("{}", pretty_table(&["Month", "Spent"], trend));

    let compliance = data
        .policy_compliance
        .iter()
        .map(|p| vec![p.name.label().to_string(), p.value.to_string()])
        .collect();
    println!("{}", pretty_table(&["Compliance", "Transactions"], compliance));

    if !data.flagged_transactions.is_empty() {
        let rows = data
            .flagged_transactions
            .iter()
            .take(top_n)
            .map(|f| {
                vec![
                    f.transaction.transaction_id.clone(),
                    f.transaction.date.to_string(),
                    fmt_money(&f.transaction.amount),
                    f.transaction.category.clone(),
                    f.joined_reasons(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Amount", "Category", "Risk Reasons"], rows)
        );
    }
    Ok(())
}

fn leader_rows(leaders: &[SpendingLeader]) -> Vec<Vec<String>> {
    leaders
        .iter()
        .map(|l| vec![l.name.clone(), fmt_money(&l.amount)])
        .collect()
}
