// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Generic property engine: the type-directed default codec that runs
//! wherever the dispatch table has no override.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::{
    keyfile::{
        dispatch,
        reader::ReadContext,
        warn::{WarnSeverity, WriteEvent},
        writer::WriteContext,
    },
    settings::{
        Setting, SettingData,
        value::{PropertyKind, PropertySpec, SecretStorageFlags, Variant},
        vpn::VpnSetting,
    },
    store,
};

/// Stores a decoded value into the setting; a rejection becomes a WARN
/// (vetoable) instead of a hard error.
pub(crate) fn set_or_warn(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    value: Variant,
) -> Result<()> {
    if let Err(err) = setting.set(spec.name, value) {
        ctx.warn(
            WarnSeverity::Warn,
            Some(spec.name),
            format!("ignoring invalid value: {err}"),
        )?;
    }
    Ok(())
}

/// Reads one property of a setting, honoring the dispatch table.
pub fn read_property(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    ctx.check_aborted()?;
    if !spec.is_writable() || spec.name == "name" {
        return Ok(());
    }

    let info = dispatch::lookup(setting.name(), spec.name);
    if info.is_some_and(|i| i.skip_read) {
        return Ok(());
    }

    if !info.is_some_and(|i| i.no_check_key) {
        match ctx.store.has_key(group, spec.name) {
            Ok(true) => {},
            Ok(false) => return Ok(()),
            Err(err) => {
                ctx.warn(
                    WarnSeverity::Warn,
                    Some(spec.name),
                    format!("error looking up key: {err}"),
                )?;
                return Ok(());
            },
        }
    }

    if let Some(reader) = info.and_then(|i| i.reader) {
        return reader(ctx, setting, spec, group);
    }
    read_generic(ctx, setting, spec, group)
}

fn read_generic(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let key = spec.name;

    macro_rules! or_skip {
        ($res:expr) => {
            match $res {
                Ok(v) => v,
                Err(err) => {
                    ctx.warn(
                        WarnSeverity::Warn,
                        Some(key),
                        format!("ignoring invalid value: {err}"),
                    )?;
                    return Ok(());
                },
            }
        };
    }

    match spec.kind {
        PropertyKind::Str => {
            let v = or_skip!(ctx.store.get_string(group, key));
            set_or_warn(ctx, setting, spec, Variant::Str(v))
        },
        PropertyKind::Int32 => {
            let v = or_skip!(ctx.store.get_integer(group, key));
            set_or_warn(ctx, setting, spec, Variant::Int32(v))
        },
        PropertyKind::Uint32 => {
            let v = or_skip!(ctx.store.get_int64(group, key));
            if v < 0 || v > i64::from(u32::MAX) {
                ctx.warn(
                    WarnSeverity::Warn,
                    Some(key),
                    format!("value {v} out of range for unsigned 32-bit property"),
                )?;
                return Ok(());
            }
            set_or_warn(ctx, setting, spec, Variant::Uint32(v as u32))
        },
        PropertyKind::Int64 => {
            let v = or_skip!(ctx.store.get_int64(group, key));
            set_or_warn(ctx, setting, spec, Variant::Int64(v))
        },
        PropertyKind::Uint64 => {
            let raw = or_skip!(ctx.store.get_string(group, key));
            let v = or_skip!(raw.trim().parse::<u64>());
            set_or_warn(ctx, setting, spec, Variant::Uint64(v))
        },
        PropertyKind::Bool => {
            let v = or_skip!(ctx.store.get_boolean(group, key));
            set_or_warn(ctx, setting, spec, Variant::Bool(v))
        },
        PropertyKind::Char => {
            let v = or_skip!(ctx.store.get_integer(group, key));
            if !(-128..=127).contains(&v) {
                ctx.warn(
                    WarnSeverity::Warn,
                    Some(key),
                    format!("value {v} out of range for char property"),
                )?;
                return Ok(());
            }
            set_or_warn(ctx, setting, spec, Variant::Char(v as i8))
        },
        PropertyKind::Bytes => {
            let list = or_skip!(ctx.store.get_integer_list(group, key));
            let mut bytes = Vec::with_capacity(list.len());
            let mut clamped = false;
            for v in list {
                match u8::try_from(v) {
                    Ok(b) => bytes.push(b),
                    Err(_) => clamped = true,
                }
            }
            if clamped {
                ctx.warn(
                    WarnSeverity::Warn,
                    Some(key),
                    "ignoring byte elements outside the 0-255 range",
                )?;
            }
            set_or_warn(ctx, setting, spec, Variant::Bytes(bytes.into()))
        },
        PropertyKind::StrList => {
            let v = or_skip!(ctx.store.get_string_list(group, key));
            set_or_warn(ctx, setting, spec, Variant::StrList(v))
        },
        PropertyKind::StrMap => read_map(ctx, setting, spec, group),
        PropertyKind::UintArray => {
            let list = or_skip!(ctx.store.get_integer_list(group, key));
            if list.iter().any(|v| *v < 0) {
                ctx.warn(
                    WarnSeverity::Warn,
                    Some(key),
                    "ignoring array with negative elements",
                )?;
                return Ok(());
            }
            let v: Vec<u32> = list.into_iter().map(|v| v as u32).collect();
            set_or_warn(ctx, setting, spec, Variant::UintArray(v))
        },
        PropertyKind::Enum => {
            let v = or_skip!(ctx.store.get_integer(group, key));
            set_or_warn(ctx, setting, spec, Variant::Enum(v))
        },
        PropertyKind::Flags => {
            let raw = or_skip!(ctx.store.get_string(group, key));
            let v = or_skip!(raw.trim().parse::<u64>());
            if v > u64::from(u32::MAX) {
                ctx.warn(
                    WarnSeverity::Warn,
                    Some(key),
                    format!("flags value {v} out of range"),
                )?;
                return Ok(());
            }
            set_or_warn(ctx, setting, spec, Variant::Flags(v as u32))
        },
        _ => ctx.warn(
            WarnSeverity::Warn,
            Some(key),
            format!("unhandled property type {:?}", spec.kind),
        ),
    }
}

/// Whole-group maps are setting-kind-aware: vpn data items, bond options
/// and user data each collect the group's keys their own way; any other
/// setting has no implicit map behavior.
fn read_map(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let keys = unique_keys(ctx.store.keys(group));
    let mut map = BTreeMap::new();

    match (setting.name(), spec.name) {
        (VpnSetting::NAME, "data") => {
            for key in keys {
                if setting.properties().iter().any(|p| p.name == key) {
                    continue;
                }
                if let Ok(value) = ctx.store.get_string(group, &key) {
                    map.insert(key, value);
                }
            }
        },
        ("bond", "options") => {
            for key in keys {
                if key == "interface-name" {
                    continue;
                }
                if let Ok(value) = ctx.store.get_string(group, &key) {
                    map.insert(key, value);
                }
            }
        },
        ("user", "data") => {
            for key in keys {
                if let Ok(value) = ctx.store.get_string(group, &key) {
                    map.insert(store::decode_key(&key), value);
                }
            }
        },
        _ => return Ok(()),
    }

    if map.is_empty() {
        return Ok(());
    }
    set_or_warn(ctx, setting, spec, Variant::StrMap(map))
}

fn unique_keys(keys: Vec<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keys.len());
    for key in keys {
        if !out.iter().any(|k| k == key) {
            out.push(key.to_string());
        }
    }
    out
}

/// Writes one property of a setting, honoring the dispatch table, secret
/// storage flags and default suppression.
pub fn write_property(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    ctx.check_aborted()?;
    if spec.name == "name" {
        return Ok(());
    }

    let info = dispatch::lookup(setting.name(), spec.name);
    if info.is_some_and(|i| i.skip_write) {
        return Ok(());
    }

    // VPN secrets are gated per item by the plugin, not here.
    if spec.is_secret() && setting.name() != VpnSetting::NAME {
        let flags = secret_storage_flags(ctx, setting, spec)?;
        if !flags.is_empty() {
            return Ok(());
        }
    }

    let Some(value) = setting.get(spec.name) else {
        return Ok(());
    };
    if spec.matches_default(&value) && !info.is_some_and(|i| i.persist_default) {
        return Ok(());
    }

    if let Some(writer) = info.and_then(|i| i.writer) {
        return writer(ctx, setting, spec, group);
    }
    write_generic(ctx, setting, spec, group, value)
}

/// Storage flags of a secret: the companion `<name>-flags` property,
/// unless the embedder's handler overrides it.
fn secret_storage_flags(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
) -> Result<SecretStorageFlags> {
    let companion = secret_flags_property(spec.name);
    let mut flags = match setting.get(&companion) {
        Some(Variant::Flags(v)) => SecretStorageFlags::from_bits_truncate(v),
        _ => SecretStorageFlags::empty(),
    };
    ctx.dispatch_event(WriteEvent::SecretFlags {
        setting: setting.name(),
        property: spec.name,
        flags: &mut flags,
    })?;
    Ok(flags)
}

fn secret_flags_property(name: &str) -> String {
    // The four WEP keys share one flags property.
    if let Some(rest) = name.strip_prefix("wep-key")
        && rest.len() == 1
        && rest.chars().all(|c| c.is_ascii_digit())
    {
        return "wep-key-flags".to_string();
    }
    format!("{name}-flags")
}

fn write_generic(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
    value: Variant,
) -> Result<()> {
    let key = spec.name;
    match value {
        Variant::Str(v) => ctx.store.set_string(group, key, &v),
        Variant::Int32(v) => ctx.store.set_integer(group, key, v),
        Variant::Uint32(v) => ctx.store.set_uint64(group, key, u64::from(v)),
        Variant::Int64(v) => ctx.store.set_int64(group, key, v),
        Variant::Uint64(v) => ctx.store.set_uint64(group, key, v),
        Variant::Bool(v) => ctx.store.set_boolean(group, key, v),
        Variant::Char(v) => ctx.store.set_integer(group, key, i32::from(v)),
        Variant::Bytes(v) => ctx.store.set_byte_list(group, key, &v),
        Variant::StrList(v) => ctx.store.set_string_list(group, key, &v),
        Variant::StrMap(map) => write_map(ctx, setting, group, &map),
        Variant::UintArray(v) => ctx.store.set_uint_list(group, key, &v),
        Variant::Enum(v) => ctx.store.set_integer(group, key, v),
        Variant::Flags(v) => ctx.store.set_uint64(group, key, u64::from(v)),
        other => {
            ctx.warn(
                WarnSeverity::Warn,
                Some(key),
                format!("unhandled property type {:?}", other.kind()),
            )?;
        },
    }
    Ok(())
}

fn write_map(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    group: &str,
    map: &BTreeMap<String, String>,
) {
    let encode = setting.name() == "user";
    for (key, value) in map {
        if encode {
            ctx.store.set_string(group, &store::encode_key(key), value);
        } else {
            ctx.store.set_string(group, key, value);
        }
    }
}
