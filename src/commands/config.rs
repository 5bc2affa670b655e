// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{AuditConfig, default_config_path};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(cfg: &AuditConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(cfg: &AuditConfig, sub: &clap::ArgMatches) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), cfg)? {
        return Ok(());
    }
    let codes: Vec<&str> = cfg.valid_policy_codes.iter().map(String::as_str).collect();
    let mut rows = vec![
        vec!["valid_policy_codes".to_string(), codes.join(", ")],
        vec!["general_threshold".to_string(), fmt_money(&cfg.general_threshold)],
        vec![
            "outlier_std_dev_factor".to_string(),
            cfg.outlier_std_dev_factor.to_string(),
        ],
        vec![
            "min_samples_for_outlier_detection".to_string(),
            cfg.min_samples_for_outlier_detection.to_string(),
        ],
        vec![
            "duplicate_policy".to_string(),
            format!("{:?}", cfg.duplicate_policy).to_lowercase(),
        ],
    ];
    for (category, limit) in &cfg.category_thresholds {
        rows.push(vec![format!("threshold: {}", category), fmt_money(limit)]);
    }
    if let Some(p) = default_config_path() {
        rows.push(vec!["config_file".to_string(), p.display().to_string()]);
    }
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}
