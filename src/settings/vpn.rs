// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `vpn` setting. Plugin-specific configuration lives in the `data`
//! map; secrets live in the `secrets` map and are persisted to the
//! reserved `vpn-secrets` group.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VpnSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub persistent: bool,
    pub data: BTreeMap<String, String>,
    #[serde(skip_serializing)]
    pub secrets: BTreeMap<String, String>,
    pub timeout: u32,
}

impl VpnSetting {
    pub const NAME: &'static str = "vpn";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("service-type", PropertyKind::Str),
        PropertySpec::new("user-name", PropertyKind::Str),
        PropertySpec::new("persistent", PropertyKind::Bool),
        PropertySpec::new("timeout", PropertyKind::Uint32),
        PropertySpec::new("data", PropertyKind::StrMap),
        PropertySpec::new("secrets", PropertyKind::StrMap).secret(),
    ];
}

impl SettingData for VpnSetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "service-type" => self.service_type.clone().map(Variant::Str),
            "user-name" => self.user_name.clone().map(Variant::Str),
            "persistent" => Some(Variant::Bool(self.persistent)),
            "timeout" => Some(Variant::Uint32(self.timeout)),
            "data" => Some(Variant::StrMap(self.data.clone())),
            "secrets" => Some(Variant::StrMap(self.secrets.clone())),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("service-type", Variant::Str(v)) => self.service_type = Some(v),
            ("user-name", Variant::Str(v)) => self.user_name = Some(v),
            ("persistent", Variant::Bool(v)) => self.persistent = v,
            ("timeout", Variant::Uint32(v)) => self.timeout = v,
            ("data", Variant::StrMap(v)) => self.data = v,
            ("secrets", Variant::StrMap(v)) => self.secrets = v,
            (prop, value) => bail!("cannot set vpn.{prop} from {:?}", value.kind()),
        }
        Ok(())
    }
}
