// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Certificate values carried by 802.1X properties.

use std::path::PathBuf;

use bytes::Bytes;
use serde::Serialize;

/// On-disk scheme prefixes. A bare path without any prefix is also
/// accepted on read and normalized to [`CertValue::Path`].
pub const PREFIX_PATH: &str = "file://";
pub const PREFIX_PKCS11: &str = "pkcs11:";
pub const PREFIX_BLOB: &str = "data:;base64,";

/// A certificate (or private key) reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertValue {
    /// Absolute path on the local filesystem.
    Path(PathBuf),
    /// A PKCS#11 URI, stored verbatim.
    Pkcs11(String),
    /// Raw certificate data.
    Blob(Bytes),
    /// Scheme could not be determined; the value is dropped on write.
    Unknown,
}

impl CertValue {
    pub fn is_unknown(&self) -> bool {
        matches!(self, CertValue::Unknown)
    }
}
