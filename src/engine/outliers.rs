// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-category statistical outliers: amount > mean + factor * population stddev.

use crate::config::AuditConfig;
use crate::models::Transaction;
use crate::utils::{fmt_grouped, fmt_grouped_f64};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl CategoryStats {
    pub fn threshold(&self, factor: f64) -> f64 {
        self.mean + factor * self.std_dev
    }
}

/// Population mean and standard deviation (divides by N, not N - 1).
pub fn mean_std(vals: &[f64]) -> Option<CategoryStats> {
    if vals.is_empty() {
        return None;
    }
    let n = vals.len() as f64;
    let mean = vals.iter().sum::<f64>() / n;
    let sq_diff: f64 = vals.iter().map(|v| (v - mean).powi(2)).sum();
    Some(CategoryStats {
        count: vals.len(),
        mean,
        std_dev: (sq_diff / n).sqrt(),
    })
}

/// Population statistics over the decimal amounts themselves, so identical
/// amounts have exactly zero spread. Only the square root goes through `f64`.
/// Falls back to [`mean_std`] when the decimal range would overflow.
pub fn decimal_stats(amounts: &[Decimal]) -> Option<CategoryStats> {
    if amounts.is_empty() {
        return None;
    }
    let n = Decimal::from(amounts.len());
    let exact = || -> Option<(Decimal, Decimal)> {
        let sum = amounts
            .iter()
            .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(*a))?;
        let mean = sum.checked_div(n)?;
        let sq_diff = amounts.iter().try_fold(Decimal::ZERO, |acc, a| {
            let d = a.checked_sub(mean)?;
            acc.checked_add(d.checked_mul(d)?)
        })?;
        Some((mean, sq_diff.checked_div(n)?))
    };
    match exact() {
        Some((mean, variance)) => Some(CategoryStats {
            count: amounts.len(),
            mean: mean.to_f64()?,
            std_dev: if variance.is_zero() {
                0.0
            } else {
                variance.to_f64()?.sqrt()
            },
        }),
        None => {
            let vals: Vec<f64> = amounts.iter().map(|a| a.to_f64().unwrap_or(0.0)).collect();
            mean_std(&vals)
        }
    }
}

/// Batch positions grouped by category, categories in first-seen order.
pub fn group_by_category(transactions: &[Transaction]) -> Vec<(&str, Vec<usize>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    for (pos, t) in transactions.iter().enumerate() {
        let slot = *index.entry(t.category.as_str()).or_insert_with(|| {
            groups.push((t.category.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(pos);
    }
    groups
}

/// One optional reason per batch position, aligned with `transactions`.
pub fn detect_outliers(transactions: &[Transaction], cfg: &AuditConfig) -> Vec<Option<String>> {
    let mut reasons: Vec<Option<String>> = vec![None; transactions.len()];
    let factor = cfg.outlier_std_dev_factor;

    for (category, members) in group_by_category(transactions) {
        if members.len() < cfg.min_samples_for_outlier_detection {
            continue;
        }
        let amounts: Vec<Decimal> = members.iter().map(|&i| transactions[i].amount).collect();
        // identical amounts: no spread, nothing can stand out
        if amounts.windows(2).all(|w| w[0] == w[1]) {
            continue;
        }
        let Some(stats) = decimal_stats(&amounts) else {
            continue;
        };
        if stats.std_dev == 0.0 {
            continue;
        }
        let threshold = stats.threshold(factor);
        debug!(
            category,
            count = stats.count,
            mean = stats.mean,
            std_dev = stats.std_dev,
            threshold,
            "outlier bounds"
        );

        for (&pos, amount) in members.iter().zip(&amounts) {
            if amount.to_f64().is_some_and(|a| a > threshold) {
                reasons[pos] = Some(format!(
                    "Outlier: Amount ${} is significantly higher than category '{}' average of ${} (>${}).",
                    fmt_grouped(transactions[pos].amount),
                    category,
                    fmt_grouped_f64(stats.mean),
                    fmt_grouped_f64(threshold)
                ));
            }
        }
    }
    reasons
}
