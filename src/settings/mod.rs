// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The settings catalog: every setting kind the codec understands, the
//! generic property surface over them, and the [`Connection`] container.

pub mod bond;
pub mod bridge;
pub mod cert;
pub mod connection;
pub mod infiniband;
pub mod ip;
pub mod ip4;
pub mod ip6;
pub mod proxy;
pub mod security_8021x;
pub mod serial;
pub mod sriov;
pub mod tc;
pub mod user;
pub mod value;
pub mod vlan;
pub mod vpn;
pub mod wired;
pub mod wireless;
pub mod wireless_security;

use anyhow::Result;
use enum_dispatch::enum_dispatch;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::settings::{
    bond::BondSetting,
    bridge::BridgeSetting,
    connection::ConnectionSetting,
    infiniband::InfinibandSetting,
    ip4::Ip4Setting,
    ip6::Ip6Setting,
    proxy::ProxySetting,
    security_8021x::Security8021xSetting,
    serial::SerialSetting,
    sriov::SriovSetting,
    tc::TcSetting,
    user::UserSetting,
    value::{PropertySpec, Variant},
    vlan::VlanSetting,
    vpn::VpnSetting,
    wired::WiredSetting,
    wireless::WirelessSetting,
    wireless_security::WirelessSecuritySetting,
};

/// Generic property access over a setting: a stable property roster plus
/// `get`/`set` by property name. The synthetic `name` property is readable
/// through `get` but rejected by `set`.
#[enum_dispatch]
pub trait SettingData {
    /// Canonical setting name (also the keyfile group name).
    fn name(&self) -> &'static str;

    /// Declared properties in catalog order.
    fn properties(&self) -> &'static [PropertySpec];

    /// Current value of a property; `None` when the property is unset or
    /// unknown.
    fn get(&self, property: &str) -> Option<Variant>;

    /// Stores a value; fails on unknown properties or kind mismatches.
    fn set(&mut self, property: &str, value: Variant) -> Result<()>;
}

/// One setting of a connection profile.
#[enum_dispatch(SettingData)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Setting {
    ConnectionSetting(ConnectionSetting),
    WiredSetting(WiredSetting),
    WirelessSetting(WirelessSetting),
    WirelessSecuritySetting(WirelessSecuritySetting),
    Security8021xSetting(Security8021xSetting),
    InfinibandSetting(InfinibandSetting),
    Ip4Setting(Ip4Setting),
    Ip6Setting(Ip6Setting),
    VpnSetting(VpnSetting),
    BondSetting(BondSetting),
    BridgeSetting(BridgeSetting),
    VlanSetting(VlanSetting),
    SerialSetting(SerialSetting),
    SriovSetting(SriovSetting),
    TcSetting(TcSetting),
    UserSetting(UserSetting),
    ProxySetting(ProxySetting),
}

/// Legacy short group names, mapped to canonical setting names.
const SETTING_ALIASES: &[(&str, &str)] = &[
    ("ethernet", WiredSetting::NAME),
    ("wifi", WirelessSetting::NAME),
    ("wifi-security", WirelessSecuritySetting::NAME),
];

/// Resolves a group name through the alias table. Unknown names pass
/// through unchanged.
pub fn resolve_setting_name(name: &str) -> &str {
    SETTING_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

/// The short alias of a canonical setting name, if one exists.
pub fn alias_for_setting(canonical: &str) -> Option<&'static str> {
    SETTING_ALIASES
        .iter()
        .find(|(_, c)| *c == canonical)
        .map(|(alias, _)| *alias)
}

/// Produces a fresh setting for a canonical name, or `None` for names the
/// catalog does not know.
pub fn new_setting(name: &str) -> Option<Setting> {
    Some(match name {
        ConnectionSetting::NAME => ConnectionSetting::default().into(),
        WiredSetting::NAME => WiredSetting::default().into(),
        WirelessSetting::NAME => WirelessSetting::default().into(),
        WirelessSecuritySetting::NAME => WirelessSecuritySetting::default().into(),
        Security8021xSetting::NAME => Security8021xSetting::default().into(),
        InfinibandSetting::NAME => InfinibandSetting::default().into(),
        Ip4Setting::NAME => Ip4Setting::default().into(),
        Ip6Setting::NAME => Ip6Setting::default().into(),
        VpnSetting::NAME => VpnSetting::default().into(),
        BondSetting::NAME => BondSetting::default().into(),
        BridgeSetting::NAME => BridgeSetting::default().into(),
        VlanSetting::NAME => VlanSetting::default().into(),
        SerialSetting::NAME => SerialSetting::default().into(),
        SriovSetting::NAME => SriovSetting::default().into(),
        TcSetting::NAME => TcSetting::default().into(),
        UserSetting::NAME => UserSetting::default().into(),
        ProxySetting::NAME => ProxySetting::default().into(),
        _ => return None,
    })
}

/// An ordered, name-unique collection of settings. Adding a setting whose
/// name is already present replaces the previous one in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Connection {
    settings: Vec<Setting>,
}

impl Connection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, setting: Setting) {
        let name = setting.name();
        if let Some(slot) = self.settings.iter_mut().find(|s| s.name() == name) {
            *slot = setting;
        } else {
            self.settings.push(setting);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Setting> {
        self.settings.iter().find(|s| s.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Setting> {
        self.settings.iter_mut().find(|s| s.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.settings.iter()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn connection(&self) -> Option<&ConnectionSetting> {
        match self.get(ConnectionSetting::NAME) {
            Some(Setting::ConnectionSetting(s)) => Some(s),
            _ => None,
        }
    }

    pub fn connection_mut(&mut self) -> Option<&mut ConnectionSetting> {
        match self.get_mut(ConnectionSetting::NAME) {
            Some(Setting::ConnectionSetting(s)) => Some(s),
            _ => None,
        }
    }

    pub fn vpn(&self) -> Option<&VpnSetting> {
        match self.get(VpnSetting::NAME) {
            Some(Setting::VpnSetting(s)) => Some(s),
            _ => None,
        }
    }

    pub fn vpn_mut(&mut self) -> Option<&mut VpnSetting> {
        match self.get_mut(VpnSetting::NAME) {
            Some(Setting::VpnSetting(s)) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for Connection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        let mut map = serializer.serialize_map(Some(self.settings.len()))?;
        for setting in &self.settings {
            map.serialize_entry(setting.name(), setting)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_resolution_is_bidirectional() {
        assert_eq!(resolve_setting_name("ethernet"), "802-3-ethernet");
        assert_eq!(resolve_setting_name("802-3-ethernet"), "802-3-ethernet");
        assert_eq!(alias_for_setting("802-11-wireless"), Some("wifi"));
        assert_eq!(alias_for_setting("ipv4"), None);
    }

    #[test]
    fn catalog_produces_every_kind() {
        for name in [
            "connection",
            "802-3-ethernet",
            "802-11-wireless",
            "802-11-wireless-security",
            "802-1x",
            "infiniband",
            "ipv4",
            "ipv6",
            "vpn",
            "bond",
            "bridge",
            "vlan",
            "serial",
            "sriov",
            "tc",
            "user",
            "proxy",
        ] {
            let setting = new_setting(name).expect("known setting");
            assert_eq!(setting.name(), name);
            assert!(setting.properties().iter().any(|p| p.name == "name"));
        }
        assert!(new_setting("wimax").is_none());
    }

    #[test]
    fn add_replaces_same_name() {
        let mut conn = Connection::new();
        conn.add(
            ConnectionSetting {
                id: Some("a".into()),
                ..Default::default()
            }
            .into(),
        );
        conn.add(
            ConnectionSetting {
                id: Some("b".into()),
                ..Default::default()
            }
            .into(),
        );
        assert_eq!(conn.len(), 1);
        assert_eq!(conn.connection().and_then(|c| c.id.clone()).as_deref(), Some("b"));
    }
}
