// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! IP-layer domain values shared by the ipv4 and ipv6 settings.

use std::{collections::BTreeMap, net::IpAddr};

use serde::Serialize;

/// Metric value meaning "unset" on routes.
pub const ROUTE_METRIC_UNSET: i64 = -1;

/// A configured address: `address/prefix`, optionally with the gateway the
/// profile associates with it. Only the first address of a setting may
/// carry a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpAddress {
    pub address: IpAddr,
    pub prefix: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<IpAddr>,
}

impl IpAddress {
    pub fn new(address: IpAddr, prefix: u32) -> Self {
        Self {
            address,
            prefix,
            gateway: None,
        }
    }

    pub fn is_ipv4(&self) -> bool {
        self.address.is_ipv4()
    }
}

/// A typed route attribute. The closed universe mirrors what the kernel
/// accepts per route: plain strings, 32-bit unsigned scalars, booleans and
/// addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RouteAttr {
    Str(String),
    Uint32(u32),
    Bool(bool),
    Addr(IpAddr),
}

/// A configured route: destination, optional next hop, metric and typed
/// attributes. `metric == -1` means "no explicit metric".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpRoute {
    pub dest: IpAddr,
    pub prefix: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop: Option<IpAddr>,
    pub metric: i64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, RouteAttr>,
}

impl IpRoute {
    pub fn new(dest: IpAddr, prefix: u32) -> Self {
        Self {
            dest,
            prefix,
            next_hop: None,
            metric: ROUTE_METRIC_UNSET,
            attributes: BTreeMap::new(),
        }
    }

    pub fn is_ipv4(&self) -> bool {
        self.dest.is_ipv4()
    }

    pub fn has_metric(&self) -> bool {
        self.metric != ROUTE_METRIC_UNSET
    }
}

/// IPv6 interface-identifier generation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddrGenMode {
    #[default]
    Eui64,
    StablePrivacy,
}

impl AddrGenMode {
    pub fn from_keyfile(s: &str) -> Option<Self> {
        match s {
            "eui64" => Some(Self::Eui64),
            "stable-privacy" => Some(Self::StablePrivacy),
            _ => None,
        }
    }

    pub fn as_keyfile(self) -> &'static str {
        match self {
            Self::Eui64 => "eui64",
            Self::StablePrivacy => "stable-privacy",
        }
    }

    pub fn from_raw(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::Eui64),
            1 => Some(Self::StablePrivacy),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            Self::Eui64 => 0,
            Self::StablePrivacy => 1,
        }
    }
}
