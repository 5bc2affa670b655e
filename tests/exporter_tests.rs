// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use auditclip::config::AuditConfig;
use auditclip::{cli, commands::exporter};
use std::io::Write;
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};

fn sample_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "transaction_id,date,amount,account,category,vendor,policy_code\n\
         E1,2025-01-02,12.34,Ops,Office Supplies,Corner Shop,P001\n\
         E2,2025-01-03,1500,Ops,Travel & Expenses,Delta,\n\
         E3,2025-01-04,20,Ops,Office Supplies,Corner Shop,XX9"
    )
    .unwrap();
    file.flush().unwrap();
    file
}

fn run_export(input: &Path, dataset: &str, format: &str, out: &Path) -> anyhow::Result<()> {
    let input_str = input.to_string_lossy().to_string();
    let out_str = out.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "auditclip",
        "export",
        "--path",
        &input_str,
        "--dataset",
        dataset,
        "--format",
        format,
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&AuditConfig::default(), export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_flagged_csv_joins_reasons() {
    let input = sample_csv();
    let dir = tempdir().unwrap();
    let out = dir.path().join("flagged.csv");
    run_export(input.path(), "flagged", "csv", &out).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "transaction_id",
            "date",
            "amount",
            "account",
            "category",
            "vendor",
            "policy_code",
            "risk_reasons",
            "is_flagged"
        ]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "E2");
    assert_eq!(
        &rows[0][7],
        "Amount exceeds category threshold ($1,000) for Travel & Expenses.; Missing policy code."
    );
    assert_eq!(&rows[0][8], "true");
    assert_eq!(&rows[1][7], "Invalid policy code: XX9.");
}

#[test]
fn export_violations_json() {
    let input = sample_csv();
    let dir = tempdir().unwrap();
    let out = dir.path().join("violations.json");
    run_export(input.path(), "violations", "json", &out).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["transaction_id"], "E2");
    assert_eq!(items[0]["reason"], "Missing Policy Code");
    assert_eq!(items[1]["reason"], "Amount Violation");
    assert_eq!(items[2]["reason"], "Invalid Policy Code");
    assert_eq!(items[2]["date"], "2025-01-04");
}

#[test]
fn export_all_includes_unflagged_rows() {
    let input = sample_csv();
    let dir = tempdir().unwrap();
    let out = dir.path().join("all.json");
    run_export(input.path(), "all", "json", &out).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["is_flagged"], false);
    assert_eq!(items[0]["risk_reasons"], "");
}

#[test]
fn export_rejects_unknown_format() {
    let input = sample_csv();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.unknown");
    assert!(run_export(input.path(), "flagged", "xml", &out).is_err());
    assert!(!out.exists());
}

#[test]
fn export_rejects_unknown_dataset() {
    let input = sample_csv();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.csv");
    let err = run_export(input.path(), "everything", "csv", &out).unwrap_err();
    assert!(err.to_string().contains("Unknown dataset"));
    assert!(!out.exists());
}

#[test]
fn export_refuses_empty_dataset() {
    let mut input = NamedTempFile::new().unwrap();
    writeln!(
        input,
        "transaction_id,date,amount,account,category,vendor,policy_code\n\
         OK1,2025-01-02,12.34,Ops,Office Supplies,Corner Shop,P001"
    )
    .unwrap();
    input.flush().unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("flagged.csv");
    let err = run_export(input.path(), "flagged", "csv", &out).unwrap_err();
    assert!(err.to_string().contains("No data available for this report."));
    assert!(!out.exists());
}
