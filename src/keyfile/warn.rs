// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Structured warnings and embedder handler types.
//!
//! Every lenient acceptance of a quirky input surfaces here. The embedder
//! sees each warning as it happens and may veto it; a veto latches an
//! error into the active context and the whole operation unwinds.

use core::fmt;

use crate::settings::{cert::CertValue, value::SecretStorageFlags};

/// How serious a warning is.
///
/// * `Info`: deprecated-but-accepted syntax.
/// * `InfoMissingFile`: a referenced path does not exist, value kept.
/// * `Warn`: a value was discarded or replaced with its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarnSeverity {
    Info,
    InfoMissingFile,
    Warn,
}

impl fmt::Display for WarnSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WarnSeverity::Info => "info",
            WarnSeverity::InfoMissingFile => "info-missing-file",
            WarnSeverity::Warn => "warn",
        })
    }
}

/// One warning, attributed to the group/setting/property that was being
/// processed when it fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyfileWarning {
    pub group: Option<String>,
    pub setting: Option<String>,
    pub property: Option<String>,
    pub severity: WarnSeverity,
    pub message: String,
}

impl fmt::Display for KeyfileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.group, &self.property) {
            (Some(g), Some(p)) => write!(f, "{}: {g}.{p}: {}", self.severity, self.message),
            (Some(g), None) => write!(f, "{}: {g}: {}", self.severity, self.message),
            _ => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Handler answer: keep going, or veto the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerVerdict {
    Continue,
    /// The handler fully took care of the event itself (write events
    /// only); the codec skips its default behavior. Equivalent to
    /// [`HandlerVerdict::Continue`] for plain warnings.
    Handled,
    Abort,
}

/// Events delivered to a write handler.
#[derive(Debug)]
pub enum WriteEvent<'e> {
    Warn(&'e KeyfileWarning),
    /// A certificate value is about to be serialized. Answering
    /// [`HandlerVerdict::Handled`] suppresses the default encoding so the
    /// embedder can apply its own storage policy.
    Cert {
        setting: &'e str,
        property: &'e str,
        cert: &'e CertValue,
    },
    /// The codec asks which storage the given secret uses. The handler
    /// may rewrite `flags`; anything other than empty flags keeps the
    /// secret out of the file.
    SecretFlags {
        setting: &'e str,
        property: &'e str,
        flags: &'e mut SecretStorageFlags,
    },
}
