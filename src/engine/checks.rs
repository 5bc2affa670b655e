// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-transaction rule checks. Each returns at most one reason.

use crate::config::AuditConfig;
use crate::models::{Transaction, ViolationKind};
use crate::utils::fmt_grouped;

pub const MISSING_POLICY_CODE: &str = "Missing policy code.";

/// Outcome of a single rule check: which kind fired and the human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub kind: ViolationKind,
    pub reason: String,
}

/// A configured category limit takes precedence; the general limit only applies
/// to categories without one.
pub fn check_amount_threshold(t: &Transaction, cfg: &AuditConfig) -> Option<RuleHit> {
    let reason = match cfg.category_threshold(&t.category) {
        Some(limit) if t.amount > limit => format!(
            "Amount exceeds category threshold (${}) for {}.",
            fmt_grouped(limit),
            t.category
        ),
        Some(_) => return None,
        None if t.amount > cfg.general_threshold => format!(
            "Amount exceeds general high value threshold (${}).",
            fmt_grouped(cfg.general_threshold)
        ),
        None => return None,
    };
    Some(RuleHit {
        kind: ViolationKind::AmountViolation,
        reason,
    })
}

/// A code that is absent or only whitespace is missing. Anything else is
/// matched against the allow-list as given, so `"P001 "` is not `"P001"`.
pub fn check_policy_code(t: &Transaction, cfg: &AuditConfig) -> Option<RuleHit> {
    let code = match t.policy_code.as_deref() {
        Some(code) if !code.trim().is_empty() => code,
        _ => {
            return Some(RuleHit {
                kind: ViolationKind::MissingPolicyCode,
                reason: MISSING_POLICY_CODE.to_string(),
            });
        }
    };
    if cfg.is_valid_code(code) {
        None
    } else {
        Some(RuleHit {
            kind: ViolationKind::InvalidPolicyCode,
            reason: format!("Invalid policy code: {}.", code),
        })
    }
}
