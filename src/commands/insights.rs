// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::load_and_process;
use crate::config::AuditConfig;
use crate::insights::{narrate, GeminiClient, InsightProvider, DEFAULT_LIMIT, DEFAULT_MODEL};
use anyhow::Result;

pub fn run(
    cfg: &AuditConfig,
    sub: &clap::ArgMatches,
    provider: &dyn InsightProvider,
) -> Result<String> {
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&DEFAULT_LIMIT);
    let (data, _) = load_and_process(cfg, sub)?;
    Ok(narrate(provider, &data.flagged_transactions, limit)?)
}

pub fn handle(cfg: &AuditConfig, sub: &clap::ArgMatches) -> Result<()> {
    let model = sub
        .get_one::<String>("model")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_MODEL);
    let client = GeminiClient::from_env(model)?;
    println!("{}", run(cfg, sub, &client)?);
    Ok(())
}
