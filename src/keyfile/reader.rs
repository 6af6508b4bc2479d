// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Read path: drives the property engine over every group of a store and
//! assembles a [`Connection`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use md5::{Digest, Md5};
use tracing::debug;

use crate::{
    keyfile::{
        VPN_SECRETS_GROUP, engine,
        warn::{HandlerVerdict, KeyfileWarning, WarnSeverity},
    },
    settings::{Connection, SettingData, alias_for_setting, new_setting, resolve_setting_name},
    store::KeyfileStore,
};

/// Read-side warning callback. Returning [`HandlerVerdict::Abort`] vetoes
/// the warning and aborts the whole read.
pub type ReadHandler<'h> =
    dyn FnMut(&KeyfileStore, &Connection, &KeyfileWarning) -> HandlerVerdict + 'h;

/// Inputs of [`read_connection`] beyond the store itself.
pub struct ReadOptions<'a> {
    /// Name of the file the store came from; used to synthesize `id` and
    /// `uuid` when the profile carries none.
    pub keyfile_name: Option<&'a Path>,
    /// Base directory for resolving relative certificate paths. Defaults
    /// to the directory of `keyfile_name` (when absolute), else the
    /// current working directory.
    pub base_dir: Option<&'a Path>,
    pub handler: Option<&'a mut ReadHandler<'a>>,
}

impl Default for ReadOptions<'_> {
    fn default() -> Self {
        Self {
            keyfile_name: None,
            base_dir: None,
            handler: None,
        }
    }
}

/// State of one read operation. Holds the store and the connection being
/// built, plus the warning attribution cursor and the latched veto.
pub struct ReadContext<'a> {
    pub store: &'a KeyfileStore,
    pub connection: Connection,
    pub base_dir: PathBuf,
    handler: Option<&'a mut ReadHandler<'a>>,
    aborted: Option<String>,
    pub group: Option<String>,
    pub setting_name: Option<&'static str>,
}

impl<'a> ReadContext<'a> {
    fn new(
        store: &'a KeyfileStore,
        base_dir: PathBuf,
        handler: Option<&'a mut ReadHandler<'a>>,
    ) -> Self {
        Self {
            store,
            connection: Connection::new(),
            base_dir,
            handler,
            aborted: None,
            group: None,
            setting_name: None,
        }
    }

    /// Errors out once a previous warning was vetoed; every codec step
    /// goes through here before doing further work.
    pub fn check_aborted(&self) -> Result<()> {
        if let Some(msg) = &self.aborted {
            bail!("read aborted by warning handler: {msg}");
        }
        Ok(())
    }

    /// Delivers a warning to the embedder. A veto latches the error and
    /// fails this call and every later one.
    pub fn warn(
        &mut self,
        severity: WarnSeverity,
        property: Option<&str>,
        message: impl Into<String>,
    ) -> Result<()> {
        self.check_aborted()?;
        let warning = KeyfileWarning {
            group: self.group.clone(),
            setting: self.setting_name.map(str::to_string),
            property: property.map(str::to_string),
            severity,
            message: message.into(),
        };
        match severity {
            WarnSeverity::Warn => tracing::warn!(%warning, "keyfile read"),
            _ => debug!(%warning, "keyfile read"),
        }
        if let Some(handler) = self.handler.as_mut()
            && handler(self.store, &self.connection, &warning) == HandlerVerdict::Abort
        {
            self.aborted = Some(warning.message.clone());
            bail!("read aborted by warning handler: {}", warning.message);
        }
        Ok(())
    }
}

/// Decodes a whole store into a connection. The result is deliberately
/// not verified; validation is the caller's job.
pub fn read_connection<'a>(
    store: &'a KeyfileStore,
    options: ReadOptions<'a>,
) -> Result<Connection> {
    let base_dir = match options.base_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_base_dir(options.keyfile_name)?,
    };
    let mut ctx = ReadContext::new(store, base_dir, options.handler);

    let mut saw_vpn_secrets = false;
    let groups: Vec<String> = store.groups().map(str::to_string).collect();
    for group in &groups {
        if group == VPN_SECRETS_GROUP {
            // Decoded last, once the vpn setting exists.
            saw_vpn_secrets = true;
            continue;
        }
        read_setting_group(&mut ctx, group)?;
    }

    ensure_connection_setting(&mut ctx, options.keyfile_name)?;
    read_deprecated_interface_name(&mut ctx)?;
    if saw_vpn_secrets {
        read_vpn_secrets(&mut ctx)?;
    }

    Ok(ctx.connection)
}

fn read_setting_group(ctx: &mut ReadContext<'_>, group: &str) -> Result<()> {
    ctx.check_aborted()?;
    ctx.group = Some(group.to_string());
    ctx.setting_name = None;

    let canonical = resolve_setting_name(group);
    let Some(mut setting) = new_setting(canonical) else {
        ctx.warn(
            WarnSeverity::Warn,
            None,
            format!("invalid setting name {group:?}"),
        )?;
        return Ok(());
    };
    ctx.setting_name = Some(setting.name());

    for spec in setting.properties() {
        engine::read_property(ctx, &mut setting, spec, group)?;
    }
    ctx.connection.add(setting);
    Ok(())
}

/// Guarantees a `connection` setting and fills in `id`/`uuid` from the
/// keyfile name when the profile does not carry them.
fn ensure_connection_setting(
    ctx: &mut ReadContext<'_>,
    keyfile_name: Option<&Path>,
) -> Result<()> {
    ctx.check_aborted()?;
    if ctx.connection.connection().is_none() {
        let setting = new_setting("connection").context("catalog lacks connection")?;
        ctx.connection.add(setting);
    }
    let Some(path) = keyfile_name else {
        return Ok(());
    };
    let conn = ctx
        .connection
        .connection_mut()
        .context("connection setting just added")?;
    if conn.id.is_none()
        && let Some(base) = path.file_name()
    {
        conn.id = Some(base.to_string_lossy().into_owned());
    }
    if conn.uuid.is_none() {
        conn.uuid = Some(uuid_for_keyfile(&path.to_string_lossy()));
    }
    Ok(())
}

/// Historical location: `interface-name` inside the connection-type's own
/// group. Read-only compatibility; never written back there.
fn read_deprecated_interface_name(ctx: &mut ReadContext<'_>) -> Result<()> {
    ctx.check_aborted()?;
    let Some(conn) = ctx.connection.connection() else {
        return Ok(());
    };
    if conn.interface_name.is_some() {
        return Ok(());
    }
    let Some(conn_type) = conn.conn_type.clone() else {
        return Ok(());
    };

    let mut candidates = vec![conn_type.clone()];
    if let Some(alias) = alias_for_setting(&conn_type) {
        candidates.push(alias.to_string());
    }
    for group in candidates {
        if ctx.store.has_group(&group)
            && ctx.store.has_key(&group, "interface-name").unwrap_or(false)
            && let Ok(name) = ctx.store.get_string(&group, "interface-name")
        {
            debug!(group, "using deprecated interface-name location");
            if let Some(conn) = ctx.connection.connection_mut() {
                conn.interface_name = Some(name);
            }
            return Ok(());
        }
    }
    Ok(())
}

/// Decodes the reserved `vpn-secrets` group into the vpn setting's
/// secrets map.
fn read_vpn_secrets(ctx: &mut ReadContext<'_>) -> Result<()> {
    ctx.check_aborted()?;
    if ctx.connection.vpn().is_none() {
        return Ok(());
    }
    ctx.group = Some(VPN_SECRETS_GROUP.to_string());
    ctx.setting_name = Some("vpn");

    let keys: Vec<String> = ctx
        .store
        .keys(VPN_SECRETS_GROUP)
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut pairs = Vec::with_capacity(keys.len());
    for key in keys {
        match ctx.store.get_string(VPN_SECRETS_GROUP, &key) {
            Ok(value) => pairs.push((key, value)),
            Err(err) => ctx.warn(
                WarnSeverity::Warn,
                Some(&key),
                format!("ignoring invalid VPN secret: {err}"),
            )?,
        }
    }
    if let Some(vpn) = ctx.connection.vpn_mut() {
        for (key, value) in pairs {
            vpn.secrets.insert(key, value);
        }
    }
    Ok(())
}

fn default_base_dir(keyfile_name: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = keyfile_name
        && path.is_absolute()
        && let Some(parent) = path.parent()
    {
        return Ok(parent.to_path_buf());
    }
    std::env::current_dir().context("cannot get current working dir")
}

/// Stable UUID derived from the keyfile name: md5 over the pair
/// `("keyfile", name)`, with version and variant bits forced to an
/// RFC 4122 version-3 value.
pub fn uuid_for_keyfile(keyfile_name: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(b"keyfile");
    hasher.update([0u8]);
    hasher.update(keyfile_name.as_bytes());
    let mut bytes: [u8; 16] = hasher.finalize().into();
    bytes[6] = (bytes[6] & 0x0f) | 0x30;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let h = hex::encode(bytes);
    format!(
        "{}-{}-{}-{}-{}",
        &h[0..8],
        &h[8..12],
        &h[12..16],
        &h[16..20],
        &h[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_is_stable_and_well_formed() {
        let a = uuid_for_keyfile("/etc/profiles/home.nmconnection");
        let b = uuid_for_keyfile("/etc/profiles/home.nmconnection");
        let c = uuid_for_keyfile("/etc/profiles/work.nmconnection");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 36);
        assert_eq!(a.as_bytes()[14], b'3');
    }
}
