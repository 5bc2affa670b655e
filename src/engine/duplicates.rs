// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::DuplicatePolicy;
use crate::models::Transaction;
use std::collections::{HashMap, HashSet};

pub fn duplicate_reason(id: &str) -> String {
    format!("Duplicate transaction ID: {}.", id)
}

/// One optional reason per batch position, aligned with `transactions`.
pub fn detect_duplicates(
    transactions: &[Transaction],
    policy: DuplicatePolicy,
) -> Vec<Option<String>> {
    match policy {
        DuplicatePolicy::Subsequent => {
            let mut seen: HashSet<&str> = HashSet::with_capacity(transactions.len());
            transactions
                .iter()
                .map(|t| {
                    if seen.insert(t.transaction_id.as_str()) {
                        None
                    } else {
                        Some(duplicate_reason(&t.transaction_id))
                    }
                })
                .collect()
        }
        DuplicatePolicy::All => {
            let mut counts: HashMap<&str, usize> = HashMap::with_capacity(transactions.len());
            for t in transactions {
                *counts.entry(t.transaction_id.as_str()).or_insert(0) += 1;
            }
            transactions
                .iter()
                .map(|t| {
                    (counts[t.transaction_id.as_str()] > 1)
                        .then(|| duplicate_reason(&t.transaction_id))
                })
                .collect()
        }
    }
}
