// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `802-3-ethernet` setting (alias `ethernet`).

use anyhow::{Result, bail};
use bytes::Bytes;
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropDefault, PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WiredSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    pub speed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplex: Option<String>,
    pub auto_negotiate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloned_mac_address: Option<String>,
    pub mac_address_blacklist: Vec<String>,
    pub mtu: u32,
    pub wake_on_lan: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wake_on_lan_password: Option<String>,
}

impl Default for WiredSetting {
    fn default() -> Self {
        Self {
            port: None,
            speed: 0,
            duplex: None,
            auto_negotiate: false,
            mac_address: None,
            cloned_mac_address: None,
            mac_address_blacklist: Vec::new(),
            mtu: 0,
            wake_on_lan: 0x1,
            wake_on_lan_password: None,
        }
    }
}

impl WiredSetting {
    pub const NAME: &'static str = "802-3-ethernet";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("port", PropertyKind::Str),
        PropertySpec::new("speed", PropertyKind::Uint32),
        PropertySpec::new("duplex", PropertyKind::Str),
        PropertySpec::new("auto-negotiate", PropertyKind::Bool),
        PropertySpec::new("mac-address", PropertyKind::Bytes),
        PropertySpec::new("cloned-mac-address", PropertyKind::Str),
        PropertySpec::new("mac-address-blacklist", PropertyKind::StrList),
        PropertySpec::new("mtu", PropertyKind::Uint32),
        PropertySpec::new("wake-on-lan", PropertyKind::Flags)
            .with_default(PropDefault::Uint(0x1)),
        PropertySpec::new("wake-on-lan-password", PropertyKind::Str),
    ];
}

impl SettingData for WiredSetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "port" => self.port.clone().map(Variant::Str),
            "speed" => Some(Variant::Uint32(self.speed)),
            "duplex" => self.duplex.clone().map(Variant::Str),
            "auto-negotiate" => Some(Variant::Bool(self.auto_negotiate)),
            "mac-address" => self.mac_address.clone().map(Variant::Bytes),
            "cloned-mac-address" => self.cloned_mac_address.clone().map(Variant::Str),
            "mac-address-blacklist" => {
                Some(Variant::StrList(self.mac_address_blacklist.clone()))
            },
            "mtu" => Some(Variant::Uint32(self.mtu)),
            "wake-on-lan" => Some(Variant::Flags(self.wake_on_lan)),
            "wake-on-lan-password" => {
                self.wake_on_lan_password.clone().map(Variant::Str)
            },
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("port", Variant::Str(v)) => self.port = Some(v),
            ("speed", Variant::Uint32(v)) => self.speed = v,
            ("duplex", Variant::Str(v)) => self.duplex = Some(v),
            ("auto-negotiate", Variant::Bool(v)) => self.auto_negotiate = v,
            ("mac-address", Variant::Bytes(v)) => self.mac_address = Some(v),
            ("cloned-mac-address", Variant::Str(v)) => self.cloned_mac_address = Some(v),
            ("mac-address-blacklist", Variant::StrList(v)) => {
                self.mac_address_blacklist = v
            },
            ("mtu", Variant::Uint32(v)) => self.mtu = v,
            ("wake-on-lan", Variant::Flags(v)) => self.wake_on_lan = v,
            ("wake-on-lan-password", Variant::Str(v)) => {
                self.wake_on_lan_password = Some(v)
            },
            (prop, value) => {
                bail!("cannot set 802-3-ethernet.{prop} from {:?}", value.kind())
            },
        }
        Ok(())
    }
}
