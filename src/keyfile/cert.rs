// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Certificate scheme codec.
//!
//! On disk a certificate property is one of three prefixed forms
//! (`file://`, `pkcs11:`, `data:;base64,`) or a bare path, which is only
//! recognized through a deliberately narrow heuristic (UTF-8, 1–500
//! bytes, a `/` somewhere or a well-known extension). That heuristic
//! disambiguates paths from raw blob data and must not be loosened.

use std::path::{Path, PathBuf};

use anyhow::Result;
use bytes::Bytes;
use tracing::debug;

use crate::{
    keyfile::{
        engine::set_or_warn,
        reader::ReadContext,
        scalar,
        warn::{HandlerVerdict, WarnSeverity, WriteEvent},
        writer::WriteContext,
    },
    settings::{
        Setting, SettingData,
        cert::{CertValue, PREFIX_BLOB, PREFIX_PATH, PREFIX_PKCS11},
        value::{PropertySpec, Variant},
    },
};

/// Extensions that make a bare value look like a certificate path.
const CERT_EXTENSIONS: &[&str] =
    &[".pem", ".cert", ".crt", ".cer", ".p12", ".der", ".key"];

/// Longest bare value still considered a path candidate.
const CERT_BARE_PATH_MAX: usize = 500;

pub fn cert_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let raw = match ctx.store.get_string(group, spec.name) {
        Ok(v) => v,
        Err(err) => {
            ctx.warn(
                WarnSeverity::Warn,
                Some(spec.name),
                format!("ignoring invalid value: {err}"),
            )?;
            return Ok(());
        },
    };
    let blob = scalar::blob_from_string(&raw, false, true);
    if blob.is_empty() {
        ctx.warn(WarnSeverity::Warn, Some(spec.name), "ignoring empty certificate")?;
        return Ok(());
    }

    if let Some(rest) = blob.strip_prefix(PREFIX_PATH.as_bytes()) {
        let rest = strip_trailing_nul(rest);
        let Ok(path) = std::str::from_utf8(rest) else {
            ctx.warn(
                WarnSeverity::Warn,
                Some(spec.name),
                "ignoring certificate path that is not UTF-8",
            )?;
            return Ok(());
        };
        if path.is_empty() {
            ctx.warn(WarnSeverity::Warn, Some(spec.name), "ignoring empty certificate path")?;
            return Ok(());
        }
        let resolved = resolve_path(ctx, path);
        probe_exists(ctx, spec, &resolved)?;
        return set_or_warn(ctx, setting, spec, Variant::Cert(CertValue::Path(resolved)));
    }

    if blob.starts_with(PREFIX_PKCS11.as_bytes()) {
        let Ok(uri) = std::str::from_utf8(strip_trailing_nul(&blob)) else {
            ctx.warn(
                WarnSeverity::Warn,
                Some(spec.name),
                "ignoring pkcs11 URI that is not UTF-8",
            )?;
            return Ok(());
        };
        if uri.len() == PREFIX_PKCS11.len() {
            ctx.warn(WarnSeverity::Warn, Some(spec.name), "ignoring empty pkcs11 URI")?;
            return Ok(());
        }
        return set_or_warn(
            ctx,
            setting,
            spec,
            Variant::Cert(CertValue::Pkcs11(uri.to_string())),
        );
    }

    if let Some(rest) = blob.strip_prefix(PREFIX_BLOB.as_bytes()) {
        let rest = strip_trailing_nul(rest);
        let payload = match std::str::from_utf8(rest) {
            Ok(p) => p,
            Err(_) => {
                ctx.warn(
                    WarnSeverity::Warn,
                    Some(spec.name),
                    "ignoring invalid base64 certificate data",
                )?;
                return Ok(());
            },
        };
        match scalar::decode_base64_strict(payload) {
            Ok(data) => {
                return set_or_warn(
                    ctx,
                    setting,
                    spec,
                    Variant::Cert(CertValue::Blob(Bytes::from(data))),
                );
            },
            Err(err) => {
                ctx.warn(
                    WarnSeverity::Warn,
                    Some(spec.name),
                    format!("ignoring invalid base64 certificate data: {err}"),
                )?;
                return Ok(());
            },
        }
    }

    // No scheme prefix: maybe a bare path, else raw blob data.
    let bare = strip_trailing_nul(&blob);
    if let Ok(text) = std::str::from_utf8(bare)
        && !text.is_empty()
        && text.len() <= CERT_BARE_PATH_MAX
        && looks_like_path(text)
    {
        let resolved = resolve_path(ctx, text);
        probe_exists(ctx, spec, &resolved)?;
        return set_or_warn(ctx, setting, spec, Variant::Cert(CertValue::Path(resolved)));
    }
    set_or_warn(ctx, setting, spec, Variant::Cert(CertValue::Blob(blob)))
}

fn looks_like_path(text: &str) -> bool {
    text.contains('/') || CERT_EXTENSIONS.iter().any(|ext| text.ends_with(ext))
}

fn strip_trailing_nul(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == 0 {
        end -= 1;
    }
    &bytes[..end]
}

fn resolve_path(ctx: &ReadContext<'_>, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        ctx.base_dir.join(p)
    }
}

fn probe_exists(
    ctx: &mut ReadContext<'_>,
    spec: &PropertySpec,
    path: &Path,
) -> Result<()> {
    if !path.exists() {
        ctx.warn(
            WarnSeverity::InfoMissingFile,
            Some(spec.name),
            format!("certificate file {} does not exist", path.display()),
        )?;
    }
    Ok(())
}

pub fn cert_writer(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(Variant::Cert(cert)) = setting.get(spec.name) else {
        return Ok(());
    };

    // The embedder may serialize certificates itself (custom storage
    // policies).
    let verdict = ctx.dispatch_event(WriteEvent::Cert {
        setting: setting.name(),
        property: spec.name,
        cert: &cert,
    })?;
    if verdict == HandlerVerdict::Handled {
        return Ok(());
    }

    match cert {
        CertValue::Path(path) => {
            let absolute = if path.is_absolute() {
                path
            } else {
                std::env::current_dir()?.join(path)
            };
            ctx.store.set_string(
                group,
                spec.name,
                &format!("{PREFIX_PATH}{}", absolute.display()),
            );
        },
        CertValue::Blob(data) => {
            ctx.store.set_string(
                group,
                spec.name,
                &format!("{PREFIX_BLOB}{}", scalar::encode_base64(&data)),
            );
        },
        CertValue::Pkcs11(uri) => ctx.store.set_string(group, spec.name, &uri),
        CertValue::Unknown => {
            debug!(property = spec.name, "not writing certificate of unknown scheme");
        },
    }
    Ok(())
}
