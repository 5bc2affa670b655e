// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! CSV batch loading. Malformed rows are reported, not fatal; a missing
//! header or an unreadable file is.

use crate::models::Transaction;
use crate::utils::{parse_date, parse_decimal};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const CSV_HEADERS: [&str; 7] = [
    "transaction_id",
    "date",
    "amount",
    "account",
    "category",
    "vendor",
    "policy_code",
];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open CSV {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Missing required CSV headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A row that was skipped; `row` counts data rows from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Batch {
    pub transactions: Vec<Transaction>,
    pub errors: Vec<RowError>,
}

struct Columns([usize; 7]);

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, IngestError> {
        let mut idx = [0usize; 7];
        let mut missing = Vec::new();
        for (slot, name) in idx.iter_mut().zip(CSV_HEADERS) {
            match headers.iter().position(|h| h == name) {
                Some(i) => *slot = i,
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(IngestError::MissingHeaders(missing));
        }
        Ok(Columns(idx))
    }

    fn get<'r>(&self, rec: &'r StringRecord, field: usize) -> &'r str {
        rec.get(self.0[field]).unwrap_or("")
    }
}

fn parse_row(cols: &Columns, rec: &StringRecord) -> Result<Transaction, String> {
    let id = cols.get(rec, 0);
    let date_raw = cols.get(rec, 1);
    let amount_raw = cols.get(rec, 2);
    let category = cols.get(rec, 4);

    let missing: Vec<&str> = [
        ("transaction_id", id),
        ("date", date_raw),
        ("amount", amount_raw),
        ("category", category),
    ]
    .iter()
    .filter(|(_, v)| v.is_empty())
    .map(|(k, _)| *k)
    .collect();
    if !missing.is_empty() {
        return Err(format!("missing required field(s): {}", missing.join(", ")));
    }

    let date = parse_date(date_raw).map_err(|e| e.to_string())?;
    let amount = parse_decimal(amount_raw).map_err(|e| e.to_string())?;
    let policy_code = Some(cols.get(rec, 6))
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(Transaction {
        transaction_id: id.to_string(),
        date,
        amount,
        account: cols.get(rec, 3).to_string(),
        category: category.to_string(),
        vendor: cols.get(rec, 5).to_string(),
        policy_code,
    })
}

pub fn read_transactions<R: Read>(reader: R) -> Result<Batch, IngestError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let cols = Columns::resolve(rdr.headers()?)?;

    let mut batch = Batch::default();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let parsed = result
            .map_err(|e| e.to_string())
            .and_then(|rec| parse_row(&cols, &rec));
        match parsed {
            Ok(t) => batch.transactions.push(t),
            Err(message) => {
                warn!(row, %message, "skipping malformed row");
                batch.errors.push(RowError { row, message });
            }
        }
    }
    debug!(
        rows = batch.transactions.len(),
        errors = batch.errors.len(),
        "csv batch loaded"
    );
    Ok(batch)
}

pub fn read_transactions_from_path(path: &Path) -> Result<Batch, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Open {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    read_transactions(file)
}
