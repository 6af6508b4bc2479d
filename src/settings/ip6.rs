// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `ipv6` setting.

use anyhow::{Result, bail};
use serde::Serialize;

use crate::settings::{
    SettingData,
    ip::{AddrGenMode, IpAddress, IpRoute, ROUTE_METRIC_UNSET},
    value::{PropDefault, PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ip6Setting {
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
    pub addr_gen_mode: AddrGenMode,
    pub ip6_privacy: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_duid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_hostname: Option<String>,
    pub dhcp_send_hostname: bool,
    pub never_default: bool,
    pub may_fail: bool,
}

impl Default for Ip6Setting {
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
            addr_gen_mode: AddrGenMode::Eui64,
            ip6_privacy: -1,
            token: None,
            dhcp_duid: None,
            dhcp_hostname: None,
            dhcp_send_hostname: true,
            never_default: false,
            may_fail: true,
        }
    }
}

impl Ip6Setting {
    pub const NAME: &'static str = "ipv6";

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
        PropertySpec::new("addr-gen-mode", PropertyKind::Enum),
        PropertySpec::new("ip6-privacy", PropertyKind::Enum)
            .with_default(PropDefault::Int(-1)),
        PropertySpec::new("token", PropertyKind::Str),
        PropertySpec::new("dhcp-duid", PropertyKind::Str),
        PropertySpec::new("dhcp-hostname", PropertyKind::Str),
        PropertySpec::new("dhcp-send-hostname", PropertyKind::Bool)
            .with_default(PropDefault::Bool(true)),
        PropertySpec::new("never-default", PropertyKind::Bool),
        PropertySpec::new("may-fail", PropertyKind::Bool)
            .with_default(PropDefault::Bool(true)),
    ];
}

impl SettingData for Ip6Setting {
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
            "addr-gen-mode" => Some(Variant::Enum(self.addr_gen_mode.as_raw())),
            "ip6-privacy" => Some(Variant::Enum(self.ip6_privacy)),
            "token" => self.token.clone().map(Variant::Str),
            "dhcp-duid" => self.dhcp_duid.clone().map(Variant::Str),
            "dhcp-hostname" => self.dhcp_hostname.clone().map(Variant::Str),
            "dhcp-send-hostname" => Some(Variant::Bool(self.dhcp_send_hostname)),
            "never-default" => Some(Variant::Bool(self.never_default)),
            "may-fail" => Some(Variant::Bool(self.may_fail)),
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
            ("addr-gen-mode", Variant::Enum(v)) => {
                self.addr_gen_mode = AddrGenMode::from_raw(v)
                    .ok_or_else(|| anyhow::anyhow!("invalid addr-gen-mode {v}"))?
            },
            ("ip6-privacy", Variant::Enum(v)) => self.ip6_privacy = v,
            ("token", Variant::Str(v)) => self.token = Some(v),
            ("dhcp-duid", Variant::Str(v)) => self.dhcp_duid = Some(v),
            ("dhcp-hostname", Variant::Str(v)) => self.dhcp_hostname = Some(v),
            ("dhcp-send-hostname", Variant::Bool(v)) => self.dhcp_send_hostname = v,
            ("never-default", Variant::Bool(v)) => self.never_default = v,
            ("may-fail", Variant::Bool(v)) => self.may_fail = v,
            (prop, value) => bail!("cannot set ipv6.{prop} from {:?}", value.kind()),
        }
        Ok(())
    }
}
