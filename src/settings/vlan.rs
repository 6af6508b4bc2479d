// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `vlan` setting.

use anyhow::{Result, bail};
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropDefault, PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VlanSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub id: u32,
    pub flags: u32,
}

impl Default for VlanSetting {
    fn default() -> Self {
        Self {
            parent: None,
            id: 0,
            flags: 1,
        }
    }
}

impl VlanSetting {
    pub const NAME: &'static str = "vlan";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("parent", PropertyKind::Str),
        PropertySpec::new("id", PropertyKind::Uint32),
        PropertySpec::new("flags", PropertyKind::Flags)
            .with_default(PropDefault::Uint(1)),
    ];
}

impl SettingData for VlanSetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "parent" => self.parent.clone().map(Variant::Str),
            "id" => Some(Variant::Uint32(self.id)),
            "flags" => Some(Variant::Flags(self.flags)),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("parent", Variant::Str(v)) => self.parent = Some(v),
            ("id", Variant::Uint32(v)) => self.id = v,
            ("flags", Variant::Flags(v)) => self.flags = v,
            (prop, value) => bail!("cannot set vlan.{prop} from {:?}", value.kind()),
        }
        Ok(())
    }
}
