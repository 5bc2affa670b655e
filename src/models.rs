// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub account: String,
    pub category: String,
    pub vendor: String,
    pub policy_code: Option<String>,
}

impl Transaction {
    /// Year-month bucket (YYYY-MM) used by the spend trend.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub risk_reasons: Vec<String>,
    pub is_flagged: bool,
}

impl FlaggedTransaction {
    pub fn new(transaction: Transaction, risk_reasons: Vec<String>) -> Self {
        let is_flagged = !risk_reasons.is_empty();
        Self {
            transaction,
            risk_reasons,
            is_flagged,
        }
    }

    pub fn joined_reasons(&self) -> String {
        self.risk_reasons.join("; ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    #[serde(rename = "Missing Policy Code")]
    MissingPolicyCode,
    #[serde(rename = "Invalid Policy Code")]
    InvalidPolicyCode,
    #[serde(rename = "Amount Violation")]
    AmountViolation,
}

impl ViolationKind {
    pub fn label(&self) -> &'static str {
        match self {
            ViolationKind::MissingPolicyCode => "Missing Policy Code",
            ViolationKind::InvalidPolicyCode => "Invalid Policy Code",
            ViolationKind::AmountViolation => "Amount Violation",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyViolation {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub vendor: String,
    pub reason: ViolationKind,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_transactions: usize,
    pub total_amount: Decimal,
    pub flagged_for_audit_count: usize,
    pub policy_violations_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingLeader {
    pub name: String,
    pub amount: Decimal,
}

pub type CategorySpending = SpendingLeader;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesDataPoint {
    pub date: String, // YYYY-MM
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceBucket {
    Compliant,
    #[serde(rename = "Missing Policy Code")]
    MissingPolicyCode,
    #[serde(rename = "Invalid Policy Code")]
    InvalidPolicyCode,
    #[serde(rename = "Amount Violation")]
    AmountViolation,
}

impl ComplianceBucket {
    pub const ALL: [ComplianceBucket; 4] = [
        ComplianceBucket::Compliant,
        ComplianceBucket::MissingPolicyCode,
        ComplianceBucket::InvalidPolicyCode,
        ComplianceBucket::AmountViolation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ComplianceBucket::Compliant => "Compliant",
            ComplianceBucket::MissingPolicyCode => "Missing Policy Code",
            ComplianceBucket::InvalidPolicyCode => "Invalid Policy Code",
            ComplianceBucket::AmountViolation => "Amount Violation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyComplianceDataPoint {
    pub name: ComplianceBucket,
    pub value: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedData {
    pub all_transactions_with_flags: Vec<FlaggedTransaction>,
    pub flagged_transactions: Vec<FlaggedTransaction>,
    pub audit_summary: AuditSummary,
    pub policy_violations: Vec<PolicyViolation>,
    pub spend_by_category: Vec<CategorySpending>,
    pub policy_compliance: Vec<PolicyComplianceDataPoint>,
    pub spend_trend: Vec<TimeSeriesDataPoint>,
    pub highest_spending_categories: Vec<SpendingLeader>,
    pub highest_spending_vendors: Vec<SpendingLeader>,
    pub highest_spending_accounts: Vec<SpendingLeader>,
}
