// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `bridge` setting.

use anyhow::{Result, bail};
use bytes::Bytes;
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropDefault, PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<Bytes>,
    pub stp: bool,
    pub priority: u32,
    pub forward_delay: u32,
    pub hello_time: u32,
    pub max_age: u32,
    pub ageing_time: u32,
    pub group_forward_mask: u32,
    pub multicast_snooping: bool,
}

impl Default for BridgeSetting {
    fn default() -> Self {
        Self {
            mac_address: None,
            stp: true,
            priority: 0x8000,
            forward_delay: 15,
            hello_time: 2,
            max_age: 20,
            ageing_time: 300,
            group_forward_mask: 0,
            multicast_snooping: true,
        }
    }
}

impl BridgeSetting {
    pub const NAME: &'static str = "bridge";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("mac-address", PropertyKind::Bytes),
        PropertySpec::new("stp", PropertyKind::Bool).with_default(PropDefault::Bool(true)),
        PropertySpec::new("priority", PropertyKind::Uint32)
            .with_default(PropDefault::Uint(0x8000)),
        PropertySpec::new("forward-delay", PropertyKind::Uint32)
            .with_default(PropDefault::Uint(15)),
        PropertySpec::new("hello-time", PropertyKind::Uint32)
            .with_default(PropDefault::Uint(2)),
        PropertySpec::new("max-age", PropertyKind::Uint32)
            .with_default(PropDefault::Uint(20)),
        PropertySpec::new("ageing-time", PropertyKind::Uint32)
            .with_default(PropDefault::Uint(300)),
        PropertySpec::new("group-forward-mask", PropertyKind::Uint32),
        PropertySpec::new("multicast-snooping", PropertyKind::Bool)
            .with_default(PropDefault::Bool(true)),
    ];
}

impl SettingData for BridgeSetting {
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
            "stp" => Some(Variant::Bool(self.stp)),
            "priority" => Some(Variant::Uint32(self.priority)),
            "forward-delay" => Some(Variant::Uint32(self.forward_delay)),
            "hello-time" => Some(Variant::Uint32(self.hello_time)),
            "max-age" => Some(Variant::Uint32(self.max_age)),
            "ageing-time" => Some(Variant::Uint32(self.ageing_time)),
            "group-forward-mask" => Some(Variant::Uint32(self.group_forward_mask)),
            "multicast-snooping" => Some(Variant::Bool(self.multicast_snooping)),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("mac-address", Variant::Bytes(v)) => self.mac_address = Some(v),
            ("stp", Variant::Bool(v)) => self.stp = v,
            ("priority", Variant::Uint32(v)) => self.priority = v,
            ("forward-delay", Variant::Uint32(v)) => self.forward_delay = v,
            ("hello-time", Variant::Uint32(v)) => self.hello_time = v,
            ("max-age", Variant::Uint32(v)) => self.max_age = v,
            ("ageing-time", Variant::Uint32(v)) => self.ageing_time = v,
            ("group-forward-mask", Variant::Uint32(v)) => self.group_forward_mask = v,
            ("multicast-snooping", Variant::Bool(v)) => self.multicast_snooping = v,
            (prop, value) => bail!("cannot set bridge.{prop} from {:?}", value.kind()),
        }
        Ok(())
    }
}
