// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Write path: renders a connection into a fresh store.

use anyhow::{Result, bail};
use tracing::debug;

use crate::{
    keyfile::{
        engine,
        warn::{HandlerVerdict, KeyfileWarning, WarnSeverity, WriteEvent},
    },
    settings::{Connection, SettingData, alias_for_setting},
    store::KeyfileStore,
};

/// Write-side event callback; sees warnings plus the certificate and
/// secret-storage interception points.
pub type WriteHandler<'h> =
    dyn FnMut(&KeyfileStore, &Connection, WriteEvent<'_>) -> HandlerVerdict + 'h;

/// Inputs of [`write_connection`] beyond the connection itself.
pub struct WriteOptions<'a> {
    /// Caller-side verification, run before anything is written. The
    /// codec itself never validates cross-field semantics.
    pub verify: Option<&'a dyn Fn(&Connection) -> Result<()>>,
    pub handler: Option<&'a mut WriteHandler<'a>>,
}

impl Default for WriteOptions<'_> {
    fn default() -> Self {
        Self {
            verify: None,
            handler: None,
        }
    }
}

/// State of one write operation.
pub struct WriteContext<'a> {
    pub connection: &'a Connection,
    pub store: KeyfileStore,
    handler: Option<&'a mut WriteHandler<'a>>,
    aborted: Option<String>,
    pub setting_name: Option<&'static str>,
}

impl<'a> WriteContext<'a> {
    fn new(connection: &'a Connection, handler: Option<&'a mut WriteHandler<'a>>) -> Self {
        Self {
            connection,
            store: KeyfileStore::new(),
            handler,
            aborted: None,
            setting_name: None,
        }
    }

    pub fn check_aborted(&self) -> Result<()> {
        if let Some(msg) = &self.aborted {
            bail!("write aborted by handler: {msg}");
        }
        Ok(())
    }

    pub fn warn(
        &mut self,
        severity: WarnSeverity,
        property: Option<&str>,
        message: impl Into<String>,
    ) -> Result<()> {
        self.check_aborted()?;
        let warning = KeyfileWarning {
            group: self.setting_name.map(str::to_string),
            setting: self.setting_name.map(str::to_string),
            property: property.map(str::to_string),
            severity,
            message: message.into(),
        };
        match severity {
            WarnSeverity::Warn => tracing::warn!(%warning, "keyfile write"),
            _ => debug!(%warning, "keyfile write"),
        }
        if let Some(handler) = self.handler.as_mut()
            && handler(&self.store, self.connection, WriteEvent::Warn(&warning))
                == HandlerVerdict::Abort
        {
            self.aborted = Some(warning.message.clone());
            bail!("write aborted by handler: {}", warning.message);
        }
        Ok(())
    }

    /// Delivers a non-warning write event (certificate serialization,
    /// secret storage query). Returns the verdict; `Abort` latches.
    pub fn dispatch_event(&mut self, event: WriteEvent<'_>) -> Result<HandlerVerdict> {
        self.check_aborted()?;
        let Some(handler) = self.handler.as_mut() else {
            return Ok(HandlerVerdict::Continue);
        };
        let verdict = handler(&self.store, self.connection, event);
        if verdict == HandlerVerdict::Abort {
            let msg = "event vetoed".to_string();
            self.aborted = Some(msg.clone());
            bail!("write aborted by handler: {msg}");
        }
        Ok(verdict)
    }
}

/// Encodes a connection into a fresh store. Runs the caller's `verify`
/// hook first and refuses to write anything if it fails.
pub fn write_connection<'a>(
    connection: &'a Connection,
    options: WriteOptions<'a>,
) -> Result<KeyfileStore> {
    if let Some(verify) = options.verify {
        verify(connection)?;
    }

    let mut ctx = WriteContext::new(connection, options.handler);
    for setting in connection.iter() {
        ctx.setting_name = Some(setting.name());
        let group = alias_for_setting(setting.name()).unwrap_or(setting.name());
        for spec in setting.properties() {
            engine::write_property(&mut ctx, setting, spec, group)?;
        }
    }
    Ok(ctx.store)
}
