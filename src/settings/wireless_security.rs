// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `802-11-wireless-security` setting (alias `wifi-security`).

use anyhow::{Result, bail};
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WirelessSecuritySetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_mgmt: Option<String>,
    pub wep_tx_keyidx: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_alg: Option<String>,
    pub proto: Vec<String>,
    pub pairwise: Vec<String>,
    pub group: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leap_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wep_key0: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wep_key1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wep_key2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wep_key3: Option<String>,
    pub wep_key_flags: u32,
    pub wep_key_type: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psk: Option<String>,
    pub psk_flags: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leap_password: Option<String>,
    pub leap_password_flags: u32,
}

impl WirelessSecuritySetting {
    pub const NAME: &'static str = "802-11-wireless-security";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("key-mgmt", PropertyKind::Str),
        PropertySpec::new("wep-tx-keyidx", PropertyKind::Uint32),
        PropertySpec::new("auth-alg", PropertyKind::Str),
        PropertySpec::new("proto", PropertyKind::StrList),
        PropertySpec::new("pairwise", PropertyKind::StrList),
        PropertySpec::new("group", PropertyKind::StrList),
        PropertySpec::new("leap-username", PropertyKind::Str),
        PropertySpec::new("wep-key0", PropertyKind::Str).secret(),
        PropertySpec::new("wep-key1", PropertyKind::Str).secret(),
        PropertySpec::new("wep-key2", PropertyKind::Str).secret(),
        PropertySpec::new("wep-key3", PropertyKind::Str).secret(),
        PropertySpec::new("wep-key-flags", PropertyKind::Flags),
        PropertySpec::new("wep-key-type", PropertyKind::Enum),
        PropertySpec::new("psk", PropertyKind::Str).secret(),
        PropertySpec::new("psk-flags", PropertyKind::Flags),
        PropertySpec::new("leap-password", PropertyKind::Str).secret(),
        PropertySpec::new("leap-password-flags", PropertyKind::Flags),
    ];
}

impl SettingData for WirelessSecuritySetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "key-mgmt" => self.key_mgmt.clone().map(Variant::Str),
            "wep-tx-keyidx" => Some(Variant::Uint32(self.wep_tx_keyidx)),
            "auth-alg" => self.auth_alg.clone().map(Variant::Str),
            "proto" => Some(Variant::StrList(self.proto.clone())),
            "pairwise" => Some(Variant::StrList(self.pairwise.clone())),
            "group" => Some(Variant::StrList(self.group.clone())),
            "leap-username" => self.leap_username.clone().map(Variant::Str),
            "wep-key0" => self.wep_key0.clone().map(Variant::Str),
            "wep-key1" => self.wep_key1.clone().map(Variant::Str),
            "wep-key2" => self.wep_key2.clone().map(Variant::Str),
            "wep-key3" => self.wep_key3.clone().map(Variant::Str),
            "wep-key-flags" => Some(Variant::Flags(self.wep_key_flags)),
            "wep-key-type" => Some(Variant::Enum(self.wep_key_type)),
            "psk" => self.psk.clone().map(Variant::Str),
            "psk-flags" => Some(Variant::Flags(self.psk_flags)),
            "leap-password" => self.leap_password.clone().map(Variant::Str),
            "leap-password-flags" => Some(Variant::Flags(self.leap_password_flags)),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("key-mgmt", Variant::Str(v)) => self.key_mgmt = Some(v),
            ("wep-tx-keyidx", Variant::Uint32(v)) => self.wep_tx_keyidx = v,
            ("auth-alg", Variant::Str(v)) => self.auth_alg = Some(v),
            ("proto", Variant::StrList(v)) => self.proto = v,
            ("pairwise", Variant::StrList(v)) => self.pairwise = v,
            ("group", Variant::StrList(v)) => self.group = v,
            ("leap-username", Variant::Str(v)) => self.leap_username = Some(v),
            ("wep-key0", Variant::Str(v)) => self.wep_key0 = Some(v),
            ("wep-key1", Variant::Str(v)) => self.wep_key1 = Some(v),
            ("wep-key2", Variant::Str(v)) => self.wep_key2 = Some(v),
            ("wep-key3", Variant::Str(v)) => self.wep_key3 = Some(v),
            ("wep-key-flags", Variant::Flags(v)) => self.wep_key_flags = v,
            ("wep-key-type", Variant::Enum(v)) => self.wep_key_type = v,
            ("psk", Variant::Str(v)) => self.psk = Some(v),
            ("psk-flags", Variant::Flags(v)) => self.psk_flags = v,
            ("leap-password", Variant::Str(v)) => self.leap_password = Some(v),
            ("leap-password-flags", Variant::Flags(v)) => self.leap_password_flags = v,
            (prop, value) => bail!(
                "cannot set 802-11-wireless-security.{prop} from {:?}",
                value.kind()
            ),
        }
        Ok(())
    }
}
