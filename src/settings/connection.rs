// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `connection` setting: profile identity and activation policy.

use anyhow::{Result, bail};
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropDefault, PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub conn_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,
    pub autoconnect: bool,
    pub autoconnect_priority: i32,
    pub timestamp: u64,
    pub read_only: bool,
    pub permissions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slave_type: Option<String>,
    pub secondaries: Vec<String>,
    pub metered: i32,
    pub lldp: i32,
}

impl Default for ConnectionSetting {
    fn default() -> Self {
        Self {
            id: None,
            uuid: None,
            stable_id: None,
            conn_type: None,
            interface_name: None,
            autoconnect: true,
            autoconnect_priority: 0,
            timestamp: 0,
            read_only: false,
            permissions: Vec::new(),
            zone: None,
            master: None,
            slave_type: None,
            secondaries: Vec::new(),
            metered: 0,
            lldp: -1,
        }
    }
}

impl ConnectionSetting {
    pub const NAME: &'static str = "connection";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("id", PropertyKind::Str),
        PropertySpec::new("uuid", PropertyKind::Str),
        PropertySpec::new("stable-id", PropertyKind::Str),
        PropertySpec::new("type", PropertyKind::Str),
        PropertySpec::new("interface-name", PropertyKind::Str),
        PropertySpec::new("autoconnect", PropertyKind::Bool)
            .with_default(PropDefault::Bool(true)),
        PropertySpec::new("autoconnect-priority", PropertyKind::Int32),
        PropertySpec::new("timestamp", PropertyKind::Uint64),
        PropertySpec::new("read-only", PropertyKind::Bool),
        PropertySpec::new("permissions", PropertyKind::StrList),
        PropertySpec::new("zone", PropertyKind::Str),
        PropertySpec::new("master", PropertyKind::Str),
        PropertySpec::new("slave-type", PropertyKind::Str),
        PropertySpec::new("secondaries", PropertyKind::StrList),
        PropertySpec::new("metered", PropertyKind::Enum),
        PropertySpec::new("lldp", PropertyKind::Enum).with_default(PropDefault::Int(-1)),
    ];
}

impl SettingData for ConnectionSetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "id" => self.id.clone().map(Variant::Str),
            "uuid" => self.uuid.clone().map(Variant::Str),
            "stable-id" => self.stable_id.clone().map(Variant::Str),
            "type" => self.conn_type.clone().map(Variant::Str),
            "interface-name" => self.interface_name.clone().map(Variant::Str),
            "autoconnect" => Some(Variant::Bool(self.autoconnect)),
            "autoconnect-priority" => Some(Variant::Int32(self.autoconnect_priority)),
            "timestamp" => Some(Variant::Uint64(self.timestamp)),
            "read-only" => Some(Variant::Bool(self.read_only)),
            "permissions" => Some(Variant::StrList(self.permissions.clone())),
            "zone" => self.zone.clone().map(Variant::Str),
            "master" => self.master.clone().map(Variant::Str),
            "slave-type" => self.slave_type.clone().map(Variant::Str),
            "secondaries" => Some(Variant::StrList(self.secondaries.clone())),
            "metered" => Some(Variant::Enum(self.metered)),
            "lldp" => Some(Variant::Enum(self.lldp)),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("id", Variant::Str(v)) => self.id = Some(v),
            ("uuid", Variant::Str(v)) => self.uuid = Some(v),
            ("stable-id", Variant::Str(v)) => self.stable_id = Some(v),
            ("type", Variant::Str(v)) => self.conn_type = Some(v),
            ("interface-name", Variant::Str(v)) => self.interface_name = Some(v),
            ("autoconnect", Variant::Bool(v)) => self.autoconnect = v,
            ("autoconnect-priority", Variant::Int32(v)) => self.autoconnect_priority = v,
            ("timestamp", Variant::Uint64(v)) => self.timestamp = v,
            ("read-only", Variant::Bool(v)) => self.read_only = v,
            ("permissions", Variant::StrList(v)) => self.permissions = v,
            ("zone", Variant::Str(v)) => self.zone = Some(v),
            ("master", Variant::Str(v)) => self.master = Some(v),
            ("slave-type", Variant::Str(v)) => self.slave_type = Some(v),
            ("secondaries", Variant::StrList(v)) => self.secondaries = v,
            ("metered", Variant::Enum(v)) => self.metered = v,
            ("lldp", Variant::Enum(v)) => self.lldp = v,
            (prop, value) => {
                bail!("cannot set connection.{prop} from {:?}", value.kind())
            },
        }
        Ok(())
    }
}
