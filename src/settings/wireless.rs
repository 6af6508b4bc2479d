// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `802-11-wireless` setting (alias `wifi`).

use anyhow::{Result, bail};
use bytes::Bytes;
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WirelessSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssid: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<String>,
    pub channel: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bssid: Option<Bytes>,
    pub rate: u32,
    pub tx_power: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloned_mac_address: Option<String>,
    pub mac_address_blacklist: Vec<String>,
    pub mtu: u32,
    pub seen_bssids: Vec<String>,
    pub hidden: bool,
    pub powersave: u32,
}

impl WirelessSetting {
    pub const NAME: &'static str = "802-11-wireless";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("ssid", PropertyKind::Bytes),
        PropertySpec::new("mode", PropertyKind::Str),
        PropertySpec::new("band", PropertyKind::Str),
        PropertySpec::new("channel", PropertyKind::Uint32),
        PropertySpec::new("bssid", PropertyKind::Bytes),
        PropertySpec::new("rate", PropertyKind::Uint32),
        PropertySpec::new("tx-power", PropertyKind::Uint32),
        PropertySpec::new("mac-address", PropertyKind::Bytes),
        PropertySpec::new("cloned-mac-address", PropertyKind::Str),
        PropertySpec::new("mac-address-blacklist", PropertyKind::StrList),
        PropertySpec::new("mtu", PropertyKind::Uint32),
        PropertySpec::new("seen-bssids", PropertyKind::StrList),
        PropertySpec::new("hidden", PropertyKind::Bool),
        PropertySpec::new("powersave", PropertyKind::Uint32),
    ];
}

impl SettingData for WirelessSetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "ssid" => self.ssid.clone().map(Variant::Bytes),
            "mode" => self.mode.clone().map(Variant::Str),
            "band" => self.band.clone().map(Variant::Str),
            "channel" => Some(Variant::Uint32(self.channel)),
            "bssid" => self.bssid.clone().map(Variant::Bytes),
            "rate" => Some(Variant::Uint32(self.rate)),
            "tx-power" => Some(Variant::Uint32(self.tx_power)),
            "mac-address" => self.mac_address.clone().map(Variant::Bytes),
            "cloned-mac-address" => self.cloned_mac_address.clone().map(Variant::Str),
            "mac-address-blacklist" => {
                Some(Variant::StrList(self.mac_address_blacklist.clone()))
            },
            "mtu" => Some(Variant::Uint32(self.mtu)),
            "seen-bssids" => Some(Variant::StrList(self.seen_bssids.clone())),
            "hidden" => Some(Variant::Bool(self.hidden)),
            "powersave" => Some(Variant::Uint32(self.powersave)),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("ssid", Variant::Bytes(v)) => self.ssid = Some(v),
            ("mode", Variant::Str(v)) => self.mode = Some(v),
            ("band", Variant::Str(v)) => self.band = Some(v),
            ("channel", Variant::Uint32(v)) => self.channel = v,
            ("bssid", Variant::Bytes(v)) => self.bssid = Some(v),
            ("rate", Variant::Uint32(v)) => self.rate = v,
            ("tx-power", Variant::Uint32(v)) => self.tx_power = v,
            ("mac-address", Variant::Bytes(v)) => self.mac_address = Some(v),
            ("cloned-mac-address", Variant::Str(v)) => self.cloned_mac_address = Some(v),
            ("mac-address-blacklist", Variant::StrList(v)) => {
                self.mac_address_blacklist = v
            },
            ("mtu", Variant::Uint32(v)) => self.mtu = v,
            ("seen-bssids", Variant::StrList(v)) => self.seen_bssids = v,
            ("hidden", Variant::Bool(v)) => self.hidden = v,
            ("powersave", Variant::Uint32(v)) => self.powersave = v,
            (prop, value) => {
                bail!("cannot set 802-11-wireless.{prop} from {:?}", value.kind())
            },
        }
        Ok(())
    }
}
