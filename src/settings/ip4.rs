// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `ipv4` setting.

use anyhow::{Result, bail};
use serde::Serialize;

use crate::settings::{
    SettingData,
    ip::{IpAddress, IpRoute, ROUTE_METRIC_UNSET},
    value::{PropDefault, PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ip4Setting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub dns: Vec<String>,
    pub dns_search: Vec<String>,
    pub dns_options: Vec<String>,
    pub dns_priority: i32,
    pub addresses: Vec<IpAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    pub routes: Vec<IpRoute>,
    pub route_metric: i64,
    pub route_table: u32,
    pub ignore_auto_routes: bool,
    pub ignore_auto_dns: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_hostname: Option<String>,
    pub dhcp_send_hostname: bool,
    pub dhcp_timeout: i32,
    pub never_default: bool,
    pub may_fail: bool,
    pub dad_timeout: i32,
}

impl Default for Ip4Setting {
    fn default() -> Self {
        Self {
            method: None,
            dns: Vec::new(),
            dns_search: Vec::new(),
            dns_options: Vec::new(),
            dns_priority: 0,
            addresses: Vec::new(),
            gateway: None,
            routes: Vec::new(),
            route_metric: ROUTE_METRIC_UNSET,
            route_table: 0,
            ignore_auto_routes: false,
            ignore_auto_dns: false,
            dhcp_client_id: None,
            dhcp_hostname: None,
            dhcp_send_hostname: true,
            dhcp_timeout: 0,
            never_default: false,
            may_fail: true,
            dad_timeout: -1,
        }
    }
}

impl Ip4Setting {
    pub const NAME: &'static str = "ipv4";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("method", PropertyKind::Str),
        PropertySpec::new("dns", PropertyKind::StrList),
        PropertySpec::new("dns-search", PropertyKind::StrList),
        PropertySpec::new("dns-options", PropertyKind::StrList),
        PropertySpec::new("dns-priority", PropertyKind::Int32),
        PropertySpec::new("addresses", PropertyKind::Addresses),
        PropertySpec::new("gateway", PropertyKind::Str),
        PropertySpec::new("routes", PropertyKind::Routes),
        PropertySpec::new("route-metric", PropertyKind::Int64)
            .with_default(PropDefault::Int(ROUTE_METRIC_UNSET)),
        PropertySpec::new("route-table", PropertyKind::Uint32),
        PropertySpec::new("ignore-auto-routes", PropertyKind::Bool),
        PropertySpec::new("ignore-auto-dns", PropertyKind::Bool),
        PropertySpec::new("dhcp-client-id", PropertyKind::Str),
        PropertySpec::new("dhcp-hostname", PropertyKind::Str),
        PropertySpec::new("dhcp-send-hostname", PropertyKind::Bool)
            .with_default(PropDefault::Bool(true)),
        PropertySpec::new("dhcp-timeout", PropertyKind::Int32),
        PropertySpec::new("never-default", PropertyKind::Bool),
        PropertySpec::new("may-fail", PropertyKind::Bool)
            .with_default(PropDefault::Bool(true)),
        PropertySpec::new("dad-timeout", PropertyKind::Int32)
            .with_default(PropDefault::Int(-1)),
    ];
}

impl SettingData for Ip4Setting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "method" => self.method.clone().map(Variant::Str),
            "dns" => Some(Variant::StrList(self.dns.clone())),
            "dns-search" => Some(Variant::StrList(self.dns_search.clone())),
            "dns-options" => Some(Variant::StrList(self.dns_options.clone())),
            "dns-priority" => Some(Variant::Int32(self.dns_priority)),
            "addresses" => Some(Variant::Addresses(self.addresses.clone())),
            "gateway" => self.gateway.clone().map(Variant::Str),
            "routes" => Some(Variant::Routes(self.routes.clone())),
            "route-metric" => Some(Variant::Int64(self.route_metric)),
            "route-table" => Some(Variant::Uint32(self.route_table)),
            "ignore-auto-routes" => Some(Variant::Bool(self.ignore_auto_routes)),
            "ignore-auto-dns" => Some(Variant::Bool(self.ignore_auto_dns)),
            "dhcp-client-id" => self.dhcp_client_id.clone().map(Variant::Str),
            "dhcp-hostname" => self.dhcp_hostname.clone().map(Variant::Str),
            "dhcp-send-hostname" => Some(Variant::Bool(self.dhcp_send_hostname)),
            "dhcp-timeout" => Some(Variant::Int32(self.dhcp_timeout)),
            "never-default" => Some(Variant::Bool(self.never_default)),
            "may-fail" => Some(Variant::Bool(self.may_fail)),
            "dad-timeout" => Some(Variant::Int32(self.dad_timeout)),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("method", Variant::Str(v)) => self.method = Some(v),
            ("dns", Variant::StrList(v)) => self.dns = v,
            ("dns-search", Variant::StrList(v)) => self.dns_search = v,
            ("dns-options", Variant::StrList(v)) => self.dns_options = v,
            ("dns-priority", Variant::Int32(v)) => self.dns_priority = v,
            ("addresses", Variant::Addresses(v)) => self.addresses = v,
            ("gateway", Variant::Str(v)) => self.gateway = Some(v),
            ("routes", Variant::Routes(v)) => self.routes = v,
            ("route-metric", Variant::Int64(v)) => self.route_metric = v,
            ("route-table", Variant::Uint32(v)) => self.route_table = v,
            ("ignore-auto-routes", Variant::Bool(v)) => self.ignore_auto_routes = v,
            ("ignore-auto-dns", Variant::Bool(v)) => self.ignore_auto_dns = v,
            ("dhcp-client-id", Variant::Str(v)) => self.dhcp_client_id = Some(v),
            ("dhcp-hostname", Variant::Str(v)) => self.dhcp_hostname = Some(v),
            ("dhcp-send-hostname", Variant::Bool(v)) => self.dhcp_send_hostname = v,
            ("dhcp-timeout", Variant::Int32(v)) => self.dhcp_timeout = v,
            ("never-default", Variant::Bool(v)) => self.never_default = v,
            ("may-fail", Variant::Bool(v)) => self.may_fail = v,
            ("dad-timeout", Variant::Int32(v)) => self.dad_timeout = v,
            (prop, value) => bail!("cannot set ipv4.{prop} from {:?}", value.kind()),
        }
        Ok(())
    }
}
