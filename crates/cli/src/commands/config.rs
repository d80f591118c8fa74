// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sq config`

use crate::config::Config;
use crate::output::{print_json, OutputFormat};
use anyhow::Result;

/// Print the effective configuration after file and environment layering
pub fn handle(config: Config, format: OutputFormat) -> Result<()> {
    let config = config.effective();
    match format {
        OutputFormat::Text => print!("{}", config.to_toml()?),
        OutputFormat::Json => print_json(&config)?,
    }
    Ok(())
}
