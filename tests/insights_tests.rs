// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use auditclip::config::AuditConfig;
use auditclip::insights::{
    build_prompt, classify_failure, narrate, InsightError, InsightProvider, NO_FLAGGED_MESSAGE,
};
use auditclip::models::{FlaggedTransaction, Transaction};
use auditclip::{cli, commands};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cell::{Cell, RefCell};
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Default)]
struct RecordingProvider {
    calls: Cell<usize>,
    seen: RefCell<Vec<String>>,
}

impl InsightProvider for RecordingProvider {
    fn summarize(&self, flagged: &[FlaggedTransaction]) -> Result<String, InsightError> {
        self.calls.set(self.calls.get() + 1);
        self.seen.borrow_mut().extend(
            flagged
                .iter()
                .map(|f| f.transaction.transaction_id.clone()),
        );
        Ok(format!("{} transactions reviewed", flagged.len()))
    }
}

struct FailingProvider;

impl InsightProvider for FailingProvider {
    fn summarize(&self, _flagged: &[FlaggedTransaction]) -> Result<String, InsightError> {
        Err(InsightError::EmptyResponse)
    }
}

fn flagged(id: &str, reasons: &[&str]) -> FlaggedTransaction {
    FlaggedTransaction::new(
        Transaction {
            transaction_id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(),
            amount: Decimal::from(12_500),
            account: "Ops".to_string(),
            category: "Consulting Services".to_string(),
            vendor: "BigCo".to_string(),
            policy_code: None,
        },
        reasons.iter().map(|r| r.to_string()).collect(),
    )
}

#[test]
fn nothing_flagged_skips_the_provider() {
    let provider = RecordingProvider::default();
    let text = narrate(&provider, &[], 20).unwrap();
    assert_eq!(text, NO_FLAGGED_MESSAGE);
    assert_eq!(provider.calls.get(), 0);
}

#[test]
fn only_the_first_n_flagged_are_sent() {
    let provider = RecordingProvider::default();
    let items: Vec<FlaggedTransaction> = (0..25)
        .map(|i| flagged(&format!("F{}", i), &["Missing policy code."]))
        .collect();
    let text = narrate(&provider, &items, 20).unwrap();
    assert_eq!(text, "20 transactions reviewed");
    assert_eq!(provider.seen.borrow().first().map(String::as_str), Some("F0"));
    assert_eq!(provider.seen.borrow().last().map(String::as_str), Some("F19"));
}

#[test]
fn provider_errors_pass_through() {
    let items = vec![flagged("F1", &["Missing policy code."])];
    let err = narrate(&FailingProvider, &items, 5).unwrap_err();
    assert!(matches!(err, InsightError::EmptyResponse));
}

#[test]
fn prompt_lists_each_transaction_with_reasons() {
    let prompt = build_prompt(&[flagged(
        "TX9",
        &["Missing policy code.", "Duplicate transaction ID: TX9."],
    )]);
    assert!(prompt.contains("You are an expert audit assistant."));
    assert!(prompt.contains(
        "- ID: TX9, Date: 2025-07-04, Amount: $12,500, Category: Consulting Services, Vendor: BigCo, Reasons: Missing policy code., Duplicate transaction ID: TX9."
    ));
    assert!(prompt.contains("Overall Summary and Key Concerns:"));
}

#[test]
fn invalid_key_failures_are_classified() {
    assert!(matches!(
        classify_failure("400 Bad Request: API key not valid. Please pass a valid API key."),
        InsightError::InvalidApiKey
    ));
    assert!(matches!(
        classify_failure("{\"reason\": \"API_KEY_INVALID\"}"),
        InsightError::InvalidApiKey
    ));
    match classify_failure("503 Service Unavailable") {
        InsightError::Request(msg) => assert_eq!(msg, "503 Service Unavailable"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn each_failure_has_a_distinct_message() {
    let messages: Vec<String> = [
        InsightError::MissingApiKey,
        InsightError::InvalidApiKey,
        InsightError::EmptyResponse,
        InsightError::Request("timeout".into()),
    ]
    .iter()
    .map(|e| e.to_string())
    .collect();
    for (i, a) in messages.iter().enumerate() {
        for b in &messages[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert!(messages[3].ends_with("timeout"));
}

#[test]
fn insights_command_feeds_flagged_rows_to_provider() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "transaction_id,date,amount,account,category,vendor,policy_code\n\
         N1,2025-01-01,10,A,Office Supplies,V,P001\n\
         N2,2025-01-02,10,A,Office Supplies,V,\n\
         N3,2025-01-03,10,A,Office Supplies,V,NOPE"
    )
    .unwrap();
    file.flush().unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let matches =
        cli::build_cli().get_matches_from(["auditclip", "insights", "--path", &path, "--limit", "1"]);
    let provider = RecordingProvider::default();
    if let Some(("insights", sub)) = matches.subcommand() {
        let text = commands::insights::run(&AuditConfig::default(), sub, &provider).unwrap();
        assert_eq!(text, "1 transactions reviewed");
    } else {
        panic!("no insights subcommand");
    }
    assert_eq!(*provider.seen.borrow(), vec!["N2".to_string()]);
}
