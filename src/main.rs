// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fs;

use anyhow::{Context, Result, bail};
use keyfile_codec_rs::{
    cfg::{cli::absolute_keyfile_path, logger::init_logger},
    keyfile::{ReadOptions, read_connection, warn::HandlerVerdict},
    store::KeyfileStore,
};

/// Reads a keyfile, decodes it into a connection profile and dumps the
/// result as JSON. Warnings go to stderr.
fn main() -> Result<()> {
    init_logger("info")?;

    let Some(arg) = std::env::args().nth(1) else {
        bail!("usage: keyfile_inspect <keyfile>");
    };
    let path = absolute_keyfile_path(&arg)?;

    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let store = KeyfileStore::parse(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let mut handler = |_: &KeyfileStore,
                       _: &keyfile_codec_rs::settings::Connection,
                       warning: &keyfile_codec_rs::keyfile::warn::KeyfileWarning| {
        eprintln!("{warning}");
        HandlerVerdict::Continue
    };

    let connection = read_connection(
        &store,
        ReadOptions {
            keyfile_name: Some(&path),
            base_dir: None,
            handler: Some(&mut handler),
        },
    )?;

    println!("{}", serde_json::to_string_pretty(&connection)?);
    Ok(())
}
