// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod config;
pub mod engine;
pub mod ingest;
pub mod insights;
pub mod models;
pub mod utils;
pub mod commands;

pub use config::AuditConfig;
pub use engine::process_transactions;
