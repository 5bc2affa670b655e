// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use auditclip::ingest::{read_transactions, read_transactions_from_path, IngestError};
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "transaction_id,date,amount,account,category,vendor,policy_code";

#[test]
fn reads_rows_and_trims_fields() {
    let csv = format!(
        "{}\n TX1 , 2025-01-15 , 1200.50 , Ops , Travel & Expenses , Delta , P001 \nTX2,2025-01-16,-20,Ops,Office Supplies,Staples,\n",
        HEADER
    );
    let batch = read_transactions(csv.as_bytes()).unwrap();
    assert!(batch.errors.is_empty());
    assert_eq!(batch.transactions.len(), 2);

    let first = &batch.transactions[0];
    assert_eq!(first.transaction_id, "TX1");
    assert_eq!(first.amount, Decimal::new(120050, 2));
    assert_eq!(first.category, "Travel & Expenses");
    assert_eq!(first.policy_code.as_deref(), Some("P001"));
    assert_eq!(first.month(), "2025-01");

    assert_eq!(batch.transactions[1].policy_code, None);
    assert_eq!(batch.transactions[1].amount, Decimal::from(-20));
}

#[test]
fn header_names_are_trimmed_and_order_is_free() {
    let csv = " vendor , policy_code, category ,amount,date,transaction_id, account\nAcme,P002,Legal Fees,10,2025-02-01,L1,Main\n";
    let batch = read_transactions(csv.as_bytes()).unwrap();
    assert_eq!(batch.transactions.len(), 1);
    assert_eq!(batch.transactions[0].vendor, "Acme");
    assert_eq!(batch.transactions[0].account, "Main");
    assert_eq!(batch.transactions[0].transaction_id, "L1");
}

#[test]
fn missing_headers_are_fatal() {
    let csv = "transaction_id,date,amount,account,category\nA,2025-01-01,1,x,y\n";
    let err = read_transactions(csv.as_bytes()).unwrap_err();
    match &err {
        IngestError::MissingHeaders(missing) => {
            assert_eq!(missing, &vec!["vendor".to_string(), "policy_code".to_string()]);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(err.to_string(), "Missing required CSV headers: vendor, policy_code");
}

#[test]
fn malformed_rows_are_reported_without_blocking_valid_rows() {
    let csv = format!(
        "{}\nOK1,2025-03-01,10,A,Cat,V,P001\n,2025-03-01,10,A,Cat,V,P001\nBAD2,2025-03-01,ten,A,Cat,V,P001\nBAD3,03/01/2025,10,A,Cat,V,P001\nBAD4,2025-03-01,10,A,,V,P001\nOK2,2025-03-02,5,A,Cat,V\n",
        HEADER
    );
    let batch = read_transactions(csv.as_bytes()).unwrap();
    let ids: Vec<&str> = batch
        .transactions
        .iter()
        .map(|t| t.transaction_id.as_str())
        .collect();
    assert_eq!(ids, vec!["OK1", "OK2"]);

    let rows: Vec<usize> = batch.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![2, 3, 4, 5]);
    assert!(batch.errors[0].message.contains("transaction_id"));
    assert!(batch.errors[1].message.contains("Invalid decimal"));
    assert!(batch.errors[2].message.contains("Invalid date"));
    assert!(batch.errors[3].message.contains("category"));
}

#[test]
fn empty_lines_are_skipped() {
    let csv = format!("{}\n\nA,2025-01-01,1,x,y,z,P001\n\n", HEADER);
    let batch = read_transactions(csv.as_bytes()).unwrap();
    assert_eq!(batch.transactions.len(), 1);
    assert!(batch.errors.is_empty());
}

#[test]
fn reads_from_file_and_reports_missing_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}\nF1,2025-04-01,99.99,A,Cat,V,P004", HEADER).unwrap();
    file.flush().unwrap();
    let batch = read_transactions_from_path(file.path()).unwrap();
    assert_eq!(batch.transactions.len(), 1);

    let dir = tempfile::tempdir().unwrap();
    let err = read_transactions_from_path(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, IngestError::Open { .. }));
}
