// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{
    ComplianceBucket, FlaggedTransaction, PolicyComplianceDataPoint, PolicyViolation,
    SpendingLeader, TimeSeriesDataPoint, Transaction, ViolationKind,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

pub const TOP_LEADERS: usize = 5;

/// Add two amounts, clamping at the decimal range instead of panicking.
pub fn add_saturating(acc: Decimal, amount: Decimal) -> Decimal {
    match acc.checked_add(amount) {
        Some(sum) => sum,
        None => {
            warn!(%acc, %amount, "amount total overflowed, clamping");
            if amount.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        }
    }
}

/// Sum amounts per key, keeping first-seen order, then sort descending by amount.
/// The sort is stable so equal totals stay in first-seen order.
pub fn spending_leaders<'a, I, F>(transactions: I, key: F) -> Vec<SpendingLeader>
where
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut leaders: Vec<SpendingLeader> = Vec::new();
    for t in transactions {
        let name = key(t);
        let slot = *index.entry(name).or_insert_with(|| {
            leaders.push(SpendingLeader {
                name: name.to_string(),
                amount: Decimal::ZERO,
            });
            leaders.len() - 1
        });
        leaders[slot].amount = add_saturating(leaders[slot].amount, t.amount);
    }
    leaders.sort_by(|a, b| b.amount.cmp(&a.amount));
    leaders
}

pub fn top(leaders: &[SpendingLeader], n: usize) -> Vec<SpendingLeader> {
    leaders.iter().take(n).cloned().collect()
}

pub fn monthly_trend<'a, I>(transactions: I) -> Vec<TimeSeriesDataPoint>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut map: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in transactions {
        let total = map.entry(t.month()).or_insert(Decimal::ZERO);
        *total = add_saturating(*total, t.amount);
    }
    map.into_iter()
        .map(|(date, amount)| TimeSeriesDataPoint { date, amount })
        .collect()
}

/// Exactly one bucket per transaction: missing code, else invalid code, else
/// amount violation, else compliant.
pub fn compliance_bucket(
    policy_kind: Option<ViolationKind>,
    has_amount_violation: bool,
) -> ComplianceBucket {
    match policy_kind {
        Some(ViolationKind::MissingPolicyCode) => ComplianceBucket::MissingPolicyCode,
        Some(ViolationKind::InvalidPolicyCode) => ComplianceBucket::InvalidPolicyCode,
        _ if has_amount_violation => ComplianceBucket::AmountViolation,
        _ => ComplianceBucket::Compliant,
    }
}

pub fn compliance_breakdown<I>(buckets: I) -> Vec<PolicyComplianceDataPoint>
where
    I: IntoIterator<Item = ComplianceBucket>,
{
    let mut counts: HashMap<ComplianceBucket, usize> = HashMap::new();
    for b in buckets {
        *counts.entry(b).or_insert(0) += 1;
    }
    ComplianceBucket::ALL
        .iter()
        .filter_map(|b| {
            counts
                .get(b)
                .filter(|&&n| n > 0)
                .map(|&value| PolicyComplianceDataPoint { name: *b, value })
        })
        .collect()
}

/// Collects violations keyed by (transaction id, kind). A repeat keeps the
/// slot of the first sighting but carries the latest record.
#[derive(Debug, Default)]
pub struct ViolationLedger {
    slots: HashMap<(String, ViolationKind), usize>,
    items: Vec<PolicyViolation>,
}

impl ViolationLedger {
    pub fn record(&mut self, t: &Transaction, kind: ViolationKind, details: &str) {
        let violation = PolicyViolation {
            transaction_id: t.transaction_id.clone(),
            date: t.date,
            amount: t.amount,
            category: t.category.clone(),
            vendor: t.vendor.clone(),
            reason: kind,
            details: details.to_string(),
        };
        match self.slots.get(&(t.transaction_id.clone(), kind)) {
            Some(&slot) => self.items[slot] = violation,
            None => {
                self.slots
                    .insert((t.transaction_id.clone(), kind), self.items.len());
                self.items.push(violation);
            }
        }
    }

    pub fn into_vec(self) -> Vec<PolicyViolation> {
        self.items
    }
}

pub fn flagged_subset(all: &[FlaggedTransaction]) -> Vec<FlaggedTransaction> {
    all.iter().filter(|t| t.is_flagged).cloned().collect()
}
