// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `infiniband` setting. Hardware addresses here are 20 bytes long.

use anyhow::{Result, bail};
use bytes::Bytes;
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropDefault, PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfinibandSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<Bytes>,
    pub mtu: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_mode: Option<String>,
    pub p_key: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Default for InfinibandSetting {
    fn default() -> Self {
        Self {
            mac_address: None,
            mtu: 0,
            transport_mode: None,
            p_key: -1,
            parent: None,
        }
    }
}

impl InfinibandSetting {
    pub const NAME: &'static str = "infiniband";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("mac-address", PropertyKind::Bytes),
        PropertySpec::new("mtu", PropertyKind::Uint32),
        PropertySpec::new("transport-mode", PropertyKind::Str),
        PropertySpec::new("p-key", PropertyKind::Int32).with_default(PropDefault::Int(-1)),
        PropertySpec::new("parent", PropertyKind::Str),
    ];
}

impl SettingData for InfinibandSetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "mac-address" => self.mac_address.clone().map(Variant::Bytes),
            "mtu" => Some(Variant::Uint32(self.mtu)),
            "transport-mode" => self.transport_mode.clone().map(Variant::Str),
            "p-key" => Some(Variant::Int32(self.p_key)),
            "parent" => self.parent.clone().map(Variant::Str),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("mac-address", Variant::Bytes(v)) => self.mac_address = Some(v),
            ("mtu", Variant::Uint32(v)) => self.mtu = v,
            ("transport-mode", Variant::Str(v)) => self.transport_mode = Some(v),
            ("p-key", Variant::Int32(v)) => self.p_key = v,
            ("parent", Variant::Str(v)) => self.parent = Some(v),
            (prop, value) => {
                bail!("cannot set infiniband.{prop} from {:?}", value.kind())
            },
        }
        Ok(())
    }
}
