// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

#![allow(clippy::all)]

mod unit_tests {
    use anyhow::Result;
    use keyfile_codec_rs::{
        keyfile::{ReadOptions, read_connection},
        settings::Connection,
        store::KeyfileStore,
    };

    // Helper to decode keyfile text without an embedder handler.
    fn read_text(text: &str) -> Result<Connection> {
        let store = KeyfileStore::parse(text)?;
        read_connection(&store, ReadOptions::default())
    }

    pub mod test_read;
    pub mod test_roundtrip;
    pub mod test_warnings;
    pub mod test_write;
}
