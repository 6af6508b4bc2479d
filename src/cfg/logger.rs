// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global tracing subscriber: RUST_LOG-style filtering with
/// a fallback level, compact output on stderr.
pub fn init_logger(default_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("failed to parse log level from env or default")?;

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set global subscriber: {e}"))?;

    Ok(())
}
