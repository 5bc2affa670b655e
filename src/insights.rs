// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Narrative commentary on flagged transactions from an external text model.

use crate::models::FlaggedTransaction;
use crate::utils::{fmt_grouped, http_client};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_LIMIT: usize = 20;
pub const NO_FLAGGED_MESSAGE: &str =
    "No transactions were flagged for audit, so no AI insights to generate.";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

static INVALID_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)api key not valid|API_KEY_INVALID").expect("static regex"));

#[derive(Debug, Error)]
pub enum InsightError {
    #[error(
        "Gemini API key is not available. Set the GEMINI_API_KEY (or API_KEY) environment variable."
    )]
    MissingApiKey,
    #[error("Gemini API key is not valid. Please check your GEMINI_API_KEY configuration.")]
    InvalidApiKey,
    #[error("Received an empty or invalid response from Gemini API.")]
    EmptyResponse,
    #[error("Gemini API request failed: {0}")]
    Request(String),
}

/// Anything that can turn flagged transactions into prose.
pub trait InsightProvider {
    fn summarize(&self, flagged: &[FlaggedTransaction]) -> Result<String, InsightError>;
}

/// Summarize at most `limit` flagged transactions. Skips the provider entirely
/// when nothing was flagged.
pub fn narrate(
    provider: &dyn InsightProvider,
    flagged: &[FlaggedTransaction],
    limit: usize,
) -> Result<String, InsightError> {
    if flagged.is_empty() {
        return Ok(NO_FLAGGED_MESSAGE.to_string());
    }
    let slice = &flagged[..flagged.len().min(limit)];
    debug!(count = slice.len(), "requesting narrative insights");
    provider.summarize(slice)
}

pub fn build_prompt(flagged: &[FlaggedTransaction]) -> String {
    let lines: Vec<String> = flagged
        .iter()
        .map(|f| {
            let t = &f.transaction;
            format!(
                "- ID: {}, Date: {}, Amount: ${}, Category: {}, Vendor: {}, Reasons: {}",
                t.transaction_id,
                t.date,
                fmt_grouped(t.amount),
                t.category,
                t.vendor,
                f.risk_reasons.join(", ")
            )
        })
        .collect();
    format!(
        "You are an expert audit assistant. Analyze the following financial transactions that have been flagged for potential audit.\n\
         Provide a concise summary of the overall risk profile indicated by these flagged transactions.\n\
         Then, for each transaction, briefly highlight the most critical risk factors.\n\
         Keep your analysis clear, actionable, and suitable for an auditor's review.\n\n\
         Flagged Transactions:\n{}\n\n\
         Overall Summary and Key Concerns:\n[Your summary here]\n\n\
         Detailed Breakdown (Highlight critical risks per transaction):\n\
         [Your breakdown here, focusing on the most severe/unusual flags for each]\n",
        lines.join("\n")
    )
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

fn extract_text(resp: GenerateResponse) -> Result<String, InsightError> {
    let text: String = resp
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .collect();
    if text.trim().is_empty() {
        warn!("Gemini API returned an empty text response");
        return Err(InsightError::EmptyResponse);
    }
    Ok(text)
}

/// Map a failed HTTP exchange to the user-facing error kind.
pub fn classify_failure(message: &str) -> InsightError {
    if INVALID_KEY.is_match(message) {
        InsightError::InvalidApiKey
    } else {
        InsightError::Request(message.to_string())
    }
}

pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reads the key from `GEMINI_API_KEY`, falling back to `API_KEY`.
    pub fn from_env(model: &str) -> Result<Self, InsightError> {
        let key = KEY_VARS
            .iter()
            .filter_map(|v| std::env::var(v).ok())
            .map(|k| k.trim().to_string())
            .find(|k| !k.is_empty())
            .ok_or(InsightError::MissingApiKey)?;
        Ok(Self::new(key, model))
    }
}

impl InsightProvider for GeminiClient {
    fn summarize(&self, flagged: &[FlaggedTransaction]) -> Result<String, InsightError> {
        if flagged.is_empty() {
            return Ok(NO_FLAGGED_MESSAGE.to_string());
        }
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(flagged) }] }],
            "generationConfig": { "temperature": 0.3, "topP": 0.9, "topK": 40 }
        });
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let client = http_client().map_err(|e| InsightError::Request(e.to_string()))?;
        let resp = client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| InsightError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            warn!(%status, "Gemini API call failed");
            return Err(classify_failure(&format!("{}: {}", status, text)));
        }
        let parsed: GenerateResponse = resp
            .json()
            .map_err(|_| InsightError::EmptyResponse)?;
        extract_text(parsed)
    }
}
