// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The audit engine: a pure function from one batch of transactions to the
//! full [`ProcessedData`] bundle.
//!
//! Reasons are always assembled in the same order: amount threshold, policy
//! code, duplicate id, statistical outlier. The engine keeps no state between
//! calls and only reads the [`AuditConfig`] it is given.

pub mod aggregate;
pub mod checks;
pub mod duplicates;
pub mod outliers;

use crate::config::AuditConfig;
use crate::models::{AuditSummary, FlaggedTransaction, ProcessedData, Transaction};
use aggregate::{
    add_saturating, compliance_breakdown, compliance_bucket, flagged_subset, monthly_trend,
    spending_leaders, top, ViolationLedger, TOP_LEADERS,
};
use checks::{check_amount_threshold, check_policy_code};
use duplicates::detect_duplicates;
use outliers::detect_outliers;
use rust_decimal::Decimal;
use tracing::info;

pub fn process_transactions(transactions: &[Transaction], cfg: &AuditConfig) -> ProcessedData {
    let duplicate_reasons = detect_duplicates(transactions, cfg.duplicate_policy);
    let outlier_reasons = detect_outliers(transactions, cfg);

    let mut ledger = ViolationLedger::default();
    let mut buckets = Vec::with_capacity(transactions.len());
    let mut all = Vec::with_capacity(transactions.len());
    let mut total_amount = Decimal::ZERO;

    for ((t, dup), outlier) in transactions
        .iter()
        .zip(duplicate_reasons)
        .zip(outlier_reasons)
    {
        total_amount = add_saturating(total_amount, t.amount);

        let amount_hit = check_amount_threshold(t, cfg);
        let policy_hit = check_policy_code(t, cfg);

        let mut reasons = Vec::new();
        if let Some(hit) = &amount_hit {
            reasons.push(hit.reason.clone());
        }
        if let Some(hit) = &policy_hit {
            reasons.push(hit.reason.clone());
        }
        reasons.extend(dup);
        reasons.extend(outlier);

        if let Some(hit) = &policy_hit {
            ledger.record(t, hit.kind, &hit.reason);
        }
        if let Some(hit) = &amount_hit {
            ledger.record(t, hit.kind, &hit.reason);
        }

        buckets.push(compliance_bucket(
            policy_hit.as_ref().map(|h| h.kind),
            amount_hit.is_some(),
        ));
        all.push(FlaggedTransaction::new(t.clone(), reasons));
    }

    let flagged = flagged_subset(&all);
    let policy_violations = ledger.into_vec();

    let audit_summary = AuditSummary {
        total_transactions: transactions.len(),
        total_amount,
        flagged_for_audit_count: flagged.len(),
        policy_violations_count: policy_violations.len(),
    };

    let spend_by_category = spending_leaders(transactions, |t| t.category.as_str());
    let highest_spending_categories = top(&spend_by_category, TOP_LEADERS);
    let highest_spending_vendors = top(
        &spending_leaders(transactions, |t| t.vendor.as_str()),
        TOP_LEADERS,
    );
    let highest_spending_accounts = top(
        &spending_leaders(transactions, |t| t.account.as_str()),
        TOP_LEADERS,
    );

    info!(
        total = audit_summary.total_transactions,
        flagged = audit_summary.flagged_for_audit_count,
        violations = audit_summary.policy_violations_count,
        "processed transaction batch"
    );

    ProcessedData {
        all_transactions_with_flags: all,
        flagged_transactions: flagged,
        audit_summary,
        policy_violations,
        spend_by_category,
        policy_compliance: compliance_breakdown(buckets),
        spend_trend: monthly_trend(transactions),
        highest_spending_categories,
        highest_spending_vendors,
        highest_spending_accounts,
    }
}
