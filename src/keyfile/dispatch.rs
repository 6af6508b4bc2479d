// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Per-(setting, property) dispatch table.
//!
//! The table is sorted lexicographically by setting name, and within a
//! setting by property name; lookup is a two-level binary search. The
//! sort order is a structural invariant, asserted on first use and by a
//! unit test.

use anyhow::Result;
use once_cell::sync::Lazy;

use crate::{
    keyfile::{
        VPN_SECRETS_GROUP, cert, compound,
        engine::set_or_warn,
        ip,
        reader::ReadContext,
        scalar,
        warn::WarnSeverity,
        writer::WriteContext,
    },
    settings::{
        Setting, SettingData, infiniband::InfinibandSetting, resolve_setting_name,
        serial::SerialParity,
        value::{PropertySpec, Variant},
    },
};

pub type PropReader =
    fn(&mut ReadContext<'_>, &mut Setting, &PropertySpec, &str) -> Result<()>;
pub type PropWriter =
    fn(&mut WriteContext<'_>, &Setting, &PropertySpec, &str) -> Result<()>;

/// Dispatch record of one property.
pub struct PropertyInfo {
    pub property: &'static str,
    pub reader: Option<PropReader>,
    pub writer: Option<PropWriter>,
    pub skip_read: bool,
    pub skip_write: bool,
    /// Suppress the key-existence probe; required when the value comes
    /// from multiple keys (indexed arrays, whole-group maps).
    pub no_check_key: bool,
    /// Write the property even when it equals its declared default.
    pub persist_default: bool,
}

impl PropertyInfo {
    const fn new(property: &'static str) -> Self {
        Self {
            property,
            reader: None,
            writer: None,
            skip_read: false,
            skip_write: false,
            no_check_key: false,
            persist_default: false,
        }
    }

    const fn reader(mut self, f: PropReader) -> Self {
        self.reader = Some(f);
        self
    }

    const fn writer(mut self, f: PropWriter) -> Self {
        self.writer = Some(f);
        self
    }

    const fn skip_read(mut self) -> Self {
        self.skip_read = true;
        self
    }

    const fn skip_write(mut self) -> Self {
        self.skip_write = true;
        self
    }

    const fn no_check_key(mut self) -> Self {
        self.no_check_key = true;
        self
    }

    const fn persist_default(mut self) -> Self {
        self.persist_default = true;
        self
    }
}

pub struct SettingInfo {
    pub setting: &'static str,
    pub properties: &'static [PropertyInfo],
}

pub static DISPATCH_TABLE: &[SettingInfo] = &[
    SettingInfo {
        setting: "802-11-wireless",
        properties: &[
            PropertyInfo::new("bssid").reader(mac_reader).writer(mac_writer),
            PropertyInfo::new("cloned-mac-address").reader(cloned_mac_reader),
            PropertyInfo::new("mac-address").reader(mac_reader).writer(mac_writer),
            PropertyInfo::new("ssid").reader(ssid_reader).writer(ssid_writer),
        ],
    },
    SettingInfo {
        setting: "802-1x",
        properties: &[
            PropertyInfo::new("ca-cert")
                .reader(cert::cert_reader)
                .writer(cert::cert_writer),
            PropertyInfo::new("client-cert")
                .reader(cert::cert_reader)
                .writer(cert::cert_writer),
            PropertyInfo::new("password-raw")
                .reader(password_raw_reader)
                .writer(password_raw_writer),
            PropertyInfo::new("phase2-ca-cert")
                .reader(cert::cert_reader)
                .writer(cert::cert_writer),
            PropertyInfo::new("phase2-client-cert")
                .reader(cert::cert_reader)
                .writer(cert::cert_writer),
            PropertyInfo::new("phase2-private-key")
                .reader(cert::cert_reader)
                .writer(cert::cert_writer),
            PropertyInfo::new("private-key")
                .reader(cert::cert_reader)
                .writer(cert::cert_writer),
        ],
    },
    SettingInfo {
        setting: "802-3-ethernet",
        properties: &[
            PropertyInfo::new("cloned-mac-address").reader(cloned_mac_reader),
            PropertyInfo::new("mac-address").reader(mac_reader).writer(mac_writer),
        ],
    },
    SettingInfo {
        setting: "bond",
        properties: &[PropertyInfo::new("options").no_check_key()],
    },
    SettingInfo {
        setting: "bridge",
        properties: &[
            PropertyInfo::new("mac-address").reader(mac_reader).writer(mac_writer),
        ],
    },
    SettingInfo {
        setting: "connection",
        properties: &[PropertyInfo::new("type").reader(conn_type_reader)],
    },
    SettingInfo {
        setting: "infiniband",
        properties: &[
            PropertyInfo::new("mac-address").reader(mac_reader).writer(mac_writer),
        ],
    },
    SettingInfo {
        setting: "ipv4",
        properties: &[
            PropertyInfo::new("addresses")
                .reader(ip::addresses_reader)
                .writer(ip::addresses_writer)
                .no_check_key(),
            PropertyInfo::new("dns").reader(ip::dns_reader),
            PropertyInfo::new("gateway").skip_write(),
            PropertyInfo::new("method").persist_default(),
            PropertyInfo::new("routes")
                .reader(ip::routes_reader)
                .writer(ip::routes_writer)
                .no_check_key(),
        ],
    },
    SettingInfo {
        setting: "ipv6",
        properties: &[
            PropertyInfo::new("addr-gen-mode")
                .reader(ip::addr_gen_mode_reader)
                .writer(ip::addr_gen_mode_writer),
            PropertyInfo::new("addresses")
                .reader(ip::addresses_reader)
                .writer(ip::addresses_writer)
                .no_check_key(),
            PropertyInfo::new("dns").reader(ip::dns_reader),
            PropertyInfo::new("gateway").skip_write(),
            PropertyInfo::new("method").persist_default(),
            PropertyInfo::new("routes")
                .reader(ip::routes_reader)
                .writer(ip::routes_writer)
                .no_check_key(),
        ],
    },
    SettingInfo {
        setting: "serial",
        properties: &[
            PropertyInfo::new("parity").reader(parity_reader).writer(parity_writer),
        ],
    },
    SettingInfo {
        setting: "sriov",
        properties: &[
            PropertyInfo::new("vfs")
                .reader(compound::vfs_reader)
                .writer(compound::vfs_writer)
                .no_check_key(),
        ],
    },
    SettingInfo {
        setting: "tc",
        properties: &[
            PropertyInfo::new("qdiscs")
                .reader(compound::qdiscs_reader)
                .writer(compound::qdiscs_writer)
                .no_check_key(),
            PropertyInfo::new("tfilters")
                .reader(compound::tfilters_reader)
                .writer(compound::tfilters_writer)
                .no_check_key(),
        ],
    },
    SettingInfo {
        setting: "user",
        properties: &[PropertyInfo::new("data").no_check_key()],
    },
    SettingInfo {
        setting: "vpn",
        properties: &[
            PropertyInfo::new("data").no_check_key(),
            PropertyInfo::new("secrets")
                .skip_read()
                .writer(vpn_secrets_writer)
                .no_check_key(),
        ],
    },
];

static TABLE_SORTED: Lazy<()> = Lazy::new(|| {
    for pair in DISPATCH_TABLE.windows(2) {
        assert!(
            pair[0].setting < pair[1].setting,
            "dispatch table settings out of order: {} vs {}",
            pair[0].setting,
            pair[1].setting
        );
    }
    for info in DISPATCH_TABLE {
        for pair in info.properties.windows(2) {
            assert!(
                pair[0].property < pair[1].property,
                "dispatch table properties out of order in {}: {} vs {}",
                info.setting,
                pair[0].property,
                pair[1].property
            );
        }
    }
});

/// Binary-search lookup of the dispatch record for a property.
pub fn lookup(setting: &str, property: &str) -> Option<&'static PropertyInfo> {
    Lazy::force(&TABLE_SORTED);
    let si = DISPATCH_TABLE
        .binary_search_by(|info| info.setting.cmp(setting))
        .ok()?;
    let properties = DISPATCH_TABLE[si].properties;
    let pi = properties
        .binary_search_by(|info| info.property.cmp(property))
        .ok()?;
    Some(&properties[pi])
}

// ── scalar property handlers ───────────────────────────────────────────

fn get_string_or_warn(
    ctx: &mut ReadContext<'_>,
    spec: &PropertySpec,
    group: &str,
) -> Result<Option<String>> {
    match ctx.store.get_string(group, spec.name) {
        Ok(v) => Ok(Some(v)),
        Err(err) => {
            ctx.warn(
                WarnSeverity::Warn,
                Some(spec.name),
                format!("ignoring invalid value: {err}"),
            )?;
            Ok(None)
        },
    }
}

/// `connection.type` accepts legacy short names and stores the canonical
/// setting name.
fn conn_type_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(raw) = get_string_or_warn(ctx, spec, group)? else {
        return Ok(());
    };
    let canonical = resolve_setting_name(&raw).to_string();
    set_or_warn(ctx, setting, spec, Variant::Str(canonical))
}

fn expected_mac_len(setting: &Setting) -> usize {
    if setting.name() == InfinibandSetting::NAME {
        20
    } else {
        6
    }
}

fn mac_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(raw) = get_string_or_warn(ctx, spec, group)? else {
        return Ok(());
    };
    match scalar::parse_mac(&raw, Some(expected_mac_len(setting))) {
        Ok(bytes) => set_or_warn(ctx, setting, spec, Variant::Bytes(bytes.into())),
        Err(err) => ctx.warn(
            WarnSeverity::Warn,
            Some(spec.name),
            format!("ignoring invalid hardware address: {err}"),
        ),
    }
}

fn mac_writer(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    if let Some(Variant::Bytes(bytes)) = setting.get(spec.name) {
        ctx.store.set_string(group, spec.name, &scalar::format_mac(&bytes));
    }
    Ok(())
}

/// Cloned-MAC accepts the reserved tokens verbatim; everything else must
/// be a hardware address and is canonicalized.
fn cloned_mac_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(raw) = get_string_or_warn(ctx, spec, group)? else {
        return Ok(());
    };
    if scalar::is_special_cloned_mac(&raw) {
        return set_or_warn(ctx, setting, spec, Variant::Str(raw));
    }
    match scalar::parse_mac(&raw, Some(6)) {
        Ok(bytes) => {
            set_or_warn(ctx, setting, spec, Variant::Str(scalar::format_mac(&bytes)))
        },
        Err(err) => ctx.warn(
            WarnSeverity::Warn,
            Some(spec.name),
            format!("ignoring invalid cloned MAC address: {err}"),
        ),
    }
}

fn ssid_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(raw) = get_string_or_warn(ctx, spec, group)? else {
        return Ok(());
    };
    let blob = scalar::blob_from_string(&raw, false, true);
    set_or_warn(ctx, setting, spec, Variant::Bytes(blob))
}

/// SSIDs that are printable ASCII are written as a string (semicolons
/// escaped); anything else falls back to the legacy integer list.
fn ssid_writer(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(Variant::Bytes(bytes)) = setting.get(spec.name) else {
        return Ok(());
    };
    if scalar::is_printable_ascii(&bytes) {
        let text = String::from_utf8_lossy(&bytes);
        let escaped =
            scalar::escape_semicolons(&crate::store::escape_value(&text, false));
        ctx.store.set_raw(group, spec.name, &escaped);
    } else {
        ctx.store.set_byte_list(group, spec.name, &bytes);
    }
    Ok(())
}

fn password_raw_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(raw) = get_string_or_warn(ctx, spec, group)? else {
        return Ok(());
    };
    let blob = scalar::blob_from_string(&raw, false, false);
    set_or_warn(ctx, setting, spec, Variant::Bytes(blob))
}

/// Raw passwords always use the legacy integer-list form on disk.
fn password_raw_writer(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    if let Some(Variant::Bytes(bytes)) = setting.get(spec.name) {
        ctx.store.set_byte_list(group, spec.name, &bytes);
    }
    Ok(())
}

/// Parity accepts the ASCII code or the single-character string.
fn parity_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(raw) = get_string_or_warn(ctx, spec, group)? else {
        return Ok(());
    };
    let trimmed = raw.trim();
    let code = if let Ok(num) = trimmed.parse::<i64>() {
        u8::try_from(num).ok()
    } else if trimmed.chars().count() == 1 {
        trimmed.chars().next().map(|c| c as u8)
    } else {
        None
    };
    match code.and_then(SerialParity::from_ascii) {
        Some(parity) => {
            set_or_warn(ctx, setting, spec, Variant::Char(parity.as_ascii() as i8))
        },
        None => ctx.warn(
            WarnSeverity::Warn,
            Some(spec.name),
            format!("ignoring invalid parity {raw:?}"),
        ),
    }
}

fn parity_writer(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    if let Some(Variant::Char(code)) = setting.get(spec.name) {
        ctx.store.set_integer(group, spec.name, i32::from(code));
    }
    Ok(())
}

/// VPN secrets are persisted to the reserved group, not inline.
fn vpn_secrets_writer(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    _group: &str,
) -> Result<()> {
    if let Some(Variant::StrMap(map)) = setting.get(spec.name) {
        for (key, value) in &map {
            ctx.store.set_string(VPN_SECRETS_GROUP, key, value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_for_binary_search() {
        Lazy::force(&TABLE_SORTED);
        for pair in DISPATCH_TABLE.windows(2) {
            assert!(pair[0].setting < pair[1].setting);
        }
        for info in DISPATCH_TABLE {
            for pair in info.properties.windows(2) {
                assert!(pair[0].property < pair[1].property);
            }
        }
    }

    #[test]
    fn lookup_finds_known_overrides() {
        assert!(lookup("ipv4", "addresses").is_some_and(|i| i.no_check_key));
        assert!(lookup("ipv4", "gateway").is_some_and(|i| i.skip_write));
        assert!(lookup("ipv4", "method").is_some_and(|i| i.persist_default));
        assert!(lookup("vpn", "secrets").is_some_and(|i| i.skip_read));
        assert!(lookup("802-1x", "ca-cert").is_some_and(|i| i.reader.is_some()));
        assert!(lookup("ipv4", "mtu").is_none());
        assert!(lookup("wimax", "mac-address").is_none());
    }
}
