// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Audit sensitivity settings.
//!
//! Everything that tunes how aggressively transactions get flagged lives in
//! [`AuditConfig`]. It is loaded once at startup and handed to the engine by
//! reference, so every call sees the same read-only values.

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Auditclip", "auditclip"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which occurrences of a repeated transaction id carry a duplicate reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Second and later occurrences only; the first sighting stays clean.
    #[default]
    Subsequent,
    /// Every occurrence of an id that appears more than once.
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub valid_policy_codes: BTreeSet<String>,
    pub category_thresholds: BTreeMap<String, Decimal>,
    pub general_threshold: Decimal,
    pub outlier_std_dev_factor: f64,
    pub min_samples_for_outlier_detection: usize,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for AuditConfig {
    fn default() -> Self {
        let valid_policy_codes = (1..=10).map(|n| format!("P{:03}", n)).collect();
        let category_thresholds = [
            ("Software Licensing", 2000),
            ("Consulting Services", 5000),
            ("Travel & Expenses", 1000),
            ("Hardware Purchases", 3000),
            ("Marketing & Advertising", 2500),
            ("Office Supplies", 500),
            ("Legal Fees", 7000),
            ("Training & Development", 1500),
        ]
        .into_iter()
        .map(|(name, limit)| (name.to_string(), Decimal::from(limit)))
        .collect();
        Self {
            valid_policy_codes,
            category_thresholds,
            general_threshold: Decimal::from(10_000),
            outlier_std_dev_factor: 2.5,
            min_samples_for_outlier_detection: 10,
            duplicate_policy: DuplicatePolicy::Subsequent,
        }
    }
}

impl AuditConfig {
    pub fn category_threshold(&self, category: &str) -> Option<Decimal> {
        self.category_thresholds.get(category).copied()
    }

    pub fn is_valid_code(&self, code: &str) -> bool {
        self.valid_policy_codes.contains(code)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.outlier_std_dev_factor.is_finite() || self.outlier_std_dev_factor < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "outlier_std_dev_factor must be a non-negative number, got {}",
                self.outlier_std_dev_factor
            )));
        }
        if self.min_samples_for_outlier_detection == 0 {
            return Err(ConfigError::Invalid(
                "min_samples_for_outlier_detection must be at least 1".into(),
            ));
        }
        if self.general_threshold.is_sign_negative() {
            return Err(ConfigError::Invalid(format!(
                "general_threshold must not be negative, got {}",
                self.general_threshold
            )));
        }
        if let Some((name, limit)) = self
            .category_thresholds
            .iter()
            .find(|(_, limit)| limit.is_sign_negative())
        {
            return Err(ConfigError::Invalid(format!(
                "threshold for '{}' must not be negative, got {}",
                name, limit
            )));
        }
        Ok(())
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: AuditConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP.0, APP.1, APP.2).map(|p| p.config_dir().join("auditclip.json"))
}

/// Resolve the effective config: explicit path, then the per-user file, then defaults.
pub fn load(explicit: Option<&Path>) -> Result<AuditConfig, ConfigError> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "loading audit config");
        return AuditConfig::from_path(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => {
            info!(path = %path.display(), "loading audit config");
            AuditConfig::from_path(&path)
        }
        _ => {
            debug!("no config file found, using built-in defaults");
            Ok(AuditConfig::default())
        }
    }
}
