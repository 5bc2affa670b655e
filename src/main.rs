// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use auditclip::{cli, commands, config};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("auditclip=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = config::load(matches.get_one::<String>("config").map(|p| Path::new(p.trim())))?;

    match matches.subcommand() {
        Some(("audit", sub)) => commands::audit::handle(&cfg, sub)?,
        Some(("transactions", sub)) => commands::transactions::handle(&cfg, sub)?,
        Some(("flagged", sub)) => commands::flagged::handle(&cfg, sub)?,
        Some(("violations", sub)) => commands::violations::handle(&cfg, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&cfg, sub)?,
        Some(("insights", sub)) => commands::insights::handle(&cfg, sub)?,
        Some(("config", sub)) => commands::config::handle(&cfg, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
