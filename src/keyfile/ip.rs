// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Compound IP grammar: address/route lines, indexed key arrays, route
//! attributes, DNS lists and the IPv6 address-generation mode.
//!
//! Address and route lines share one grammar where `/`, `;` and `,` are
//! interchangeable separators:
//!
//! ```text
//! address [ SEP prefix_len ] [ SEP gateway ] [ SEP metric ]
//! ```
//!
//! The metric field exists only for routes. Historical sloppiness in this
//! grammar is accepted with warnings and never re-emitted.

use std::{collections::BTreeMap, net::IpAddr};

use anyhow::Result;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::{
    keyfile::{
        engine::set_or_warn,
        reader::ReadContext,
        scalar::parse_bounded_u64,
        warn::WarnSeverity,
        writer::WriteContext,
    },
    settings::{
        Setting, SettingData,
        ip::{AddrGenMode, IpAddress, IpRoute, RouteAttr},
        ip4::Ip4Setting,
        value::{PropertySpec, Variant},
    },
};

const DELIMITERS: [char; 3] = ['/', ';', ','];

fn is_addr_char(c: char) -> bool {
    c.is_ascii_hexdigit() || matches!(c, ':' | '.' | '%')
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Splits a value into fields, each drawn from a per-field character
/// class, with any of the three separators between them.
struct FieldScanner<'s> {
    rest: &'s str,
    trailing_separator: bool,
}

impl<'s> FieldScanner<'s> {
    fn new(s: &'s str) -> Self {
        Self {
            rest: s,
            trailing_separator: false,
        }
    }

    /// The next field, or `None` when the value is exhausted. An error
    /// means the line cannot be salvaged (unexpected character, empty
    /// field).
    fn next_field(&mut self, allowed: fn(char) -> bool) -> Result<Option<&'s str>, String> {
        if self.rest.is_empty() {
            return Ok(None);
        }
        let end = self
            .rest
            .find(|c: char| !allowed(c))
            .unwrap_or(self.rest.len());
        let field = &self.rest[..end];
        self.rest = &self.rest[end..];

        match self.rest.chars().next() {
            None => {},
            Some(c) if DELIMITERS.contains(&c) => {
                self.rest = &self.rest[c.len_utf8()..];
                if self.rest.is_empty() {
                    self.trailing_separator = true;
                }
            },
            Some(c) => return Err(format!("unexpected character {c:?}")),
        }
        if field.is_empty() {
            return Err("empty field".to_string());
        }
        Ok(Some(field))
    }

    fn finished(&self) -> bool {
        self.rest.is_empty()
    }
}

struct ParsedLine {
    addr: IpAddr,
    prefix: u32,
    gateway: Option<IpAddr>,
    metric: Option<u32>,
}

/// Parses one address or route line. Returns `None` when the line was
/// discarded (with a WARN); every quirk acceptance also warns.
fn parse_ip_line(
    ctx: &mut ReadContext<'_>,
    key: &str,
    value: &str,
    is_ipv4: bool,
    is_route: bool,
) -> Result<Option<ParsedLine>> {
    let what = if is_route { "route" } else { "address" };
    let discard = |ctx: &mut ReadContext<'_>, reason: String| {
        ctx.warn(
            WarnSeverity::Warn,
            Some(key),
            format!("ignoring invalid {what}: {reason}"),
        )
    };

    let mut sc = FieldScanner::new(value.trim());

    let addr_str = match sc.next_field(is_addr_char) {
        Ok(Some(f)) => f,
        Ok(None) => {
            discard(ctx, "missing address".to_string())?;
            return Ok(None);
        },
        Err(e) => {
            discard(ctx, e)?;
            return Ok(None);
        },
    };
    let addr: IpAddr = match addr_str.parse() {
        Ok(a) => a,
        Err(_) => {
            discard(ctx, format!("not an IP address: {addr_str:?}"))?;
            return Ok(None);
        },
    };
    if addr.is_ipv4() != is_ipv4 {
        discard(ctx, format!("address family mismatch: {addr_str:?}"))?;
        return Ok(None);
    }

    let max_prefix: u32 = if is_ipv4 { 32 } else { 128 };
    let mut prefix = match sc.next_field(is_digit) {
        Ok(Some(f)) => match parse_bounded_u64(f, 0, u64::from(max_prefix)) {
            Ok(v) => Some(v as u32),
            Err(e) => {
                discard(ctx, format!("invalid prefix length: {e}"))?;
                return Ok(None);
            },
        },
        Ok(None) => None,
        Err(e) => {
            discard(ctx, e)?;
            return Ok(None);
        },
    };
    // A route prefix of zero was never written intentionally; treat it
    // like a missing field.
    if is_route && prefix == Some(0) {
        prefix = None;
    }

    let mut metric: Option<u32> = None;
    let gateway = match sc.next_field(is_addr_char) {
        Ok(Some(f)) => match f.parse::<IpAddr>() {
            Ok(gw) if gw.is_ipv4() == is_ipv4 => {
                if gw.is_unspecified() {
                    None
                } else {
                    Some(gw)
                }
            },
            Ok(_) => {
                discard(ctx, format!("gateway family mismatch: {f:?}"))?;
                return Ok(None);
            },
            Err(_) => {
                // Files from a historically broken writer carry the metric
                // in the gateway slot of IPv6 routes. Accepted on read,
                // never written back.
                let next = sc.next_field(is_digit);
                match (is_route && !is_ipv4, f.parse::<u32>(), next) {
                    (true, Ok(m), Ok(None)) => {
                        metric = Some(m);
                        None
                    },
                    _ => {
                        discard(ctx, format!("not a gateway: {f:?}"))?;
                        return Ok(None);
                    },
                }
            },
        },
        Ok(None) => None,
        Err(e) => {
            discard(ctx, e)?;
            return Ok(None);
        },
    };

    if is_route && metric.is_none() {
        match sc.next_field(is_digit) {
            Ok(Some(f)) => match parse_bounded_u64(f, 0, u64::from(u32::MAX)) {
                Ok(v) => metric = Some(v as u32),
                Err(e) => {
                    discard(ctx, format!("invalid metric: {e}"))?;
                    return Ok(None);
                },
            },
            Ok(None) => {},
            Err(e) => {
                discard(ctx, e)?;
                return Ok(None);
            },
        }
    }

    if !sc.finished() {
        discard(ctx, format!("garbage at the end: {:?}", sc.rest))?;
        return Ok(None);
    }

    let prefix = match prefix {
        Some(p) => p,
        None => {
            let default = match (is_ipv4, is_route) {
                (true, _) => 24,
                (false, false) => 64,
                (false, true) => 128,
            };
            ctx.warn(
                WarnSeverity::Warn,
                Some(key),
                format!("missing prefix length, defaulting to {default}"),
            )?;
            default
        },
    };

    if sc.trailing_separator {
        ctx.warn(
            WarnSeverity::Info,
            Some(key),
            "deprecated semicolon at the end of the value",
        )?;
    }

    Ok(Some(ParsedLine {
        addr,
        prefix,
        gateway,
        metric,
    }))
}

// ── indexed key collection ─────────────────────────────────────────────

/// Strict index suffix: the literal `0`, or a decimal starting 1–9.
fn parse_index(s: &str) -> Option<i64> {
    if s == "0" {
        return Some(0);
    }
    let first = s.chars().next()?;
    if !('1'..='9').contains(&first) || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<i64>().ok()
}

fn classify_key(key: &str, singular: &str, plural: &str) -> Option<(i64, u8)> {
    for (base, kind) in [(singular, 0u8), (plural, 1u8)] {
        if key == base {
            return Some((-1, kind));
        }
        if let Some(suffix) = key.strip_prefix(base)
            && let Some(idx) = parse_index(suffix)
        {
            return Some((idx, kind));
        }
    }
    None
}

/// Collects the indexed keys of one array property and orders them by
/// `(index, kind, key)` where the unindexed form sorts first and the
/// singular base before the plural. Consecutive duplicates collapse; the
/// store lookup takes the later occurrence anyway.
fn indexed_key_order(keys: Vec<&str>, singular: &str, plural: &str) -> Vec<String> {
    let mut tagged: Vec<(i64, u8, String)> = keys
        .into_iter()
        .filter_map(|key| {
            classify_key(key, singular, plural).map(|(idx, kind)| (idx, kind, key.to_string()))
        })
        .collect();
    tagged.sort();
    tagged.dedup();
    tagged.into_iter().map(|(_, _, key)| key).collect()
}

// ── addresses ──────────────────────────────────────────────────────────

pub fn addresses_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let is_ipv4 = setting.name() == Ip4Setting::NAME;
    let keys = indexed_key_order(ctx.store.keys(group), "address", "addresses");
    if keys.is_empty() {
        return Ok(());
    }

    let mut addresses: Vec<IpAddress> = Vec::new();
    let mut gateway: Option<IpAddr> = None;
    for key in &keys {
        let raw = match ctx.store.get_string(group, key) {
            Ok(v) => v,
            Err(err) => {
                ctx.warn(
                    WarnSeverity::Warn,
                    Some(key),
                    format!("ignoring invalid value: {err}"),
                )?;
                continue;
            },
        };
        let Some(line) = parse_ip_line(ctx, key, &raw, is_ipv4, false)? else {
            continue;
        };
        let mut address = IpAddress::new(line.addr, line.prefix);
        if let Some(gw) = line.gateway {
            if addresses.is_empty() {
                address.gateway = Some(gw);
                gateway = Some(gw);
            } else {
                debug!(key, "ignoring gateway on non-first address");
            }
        }
        addresses.push(address);
    }

    if addresses.is_empty() {
        return Ok(());
    }
    set_or_warn(ctx, setting, spec, Variant::Addresses(addresses))?;
    if let Some(gw) = gateway {
        // The explicit `gateway` key, when present, is read later and
        // overrides this.
        setting.set("gateway", Variant::Str(gw.to_string())).ok();
    }
    Ok(())
}

pub fn addresses_writer(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(Variant::Addresses(addresses)) = setting.get(spec.name) else {
        return Ok(());
    };
    let gateway = match setting.get("gateway") {
        Some(Variant::Str(s)) => Some(s),
        _ => addresses
            .first()
            .and_then(|a| a.gateway.map(|g| g.to_string())),
    };
    for (i, address) in addresses.iter().enumerate() {
        let key = format!("address{}", i + 1);
        let mut value = format!("{}/{}", address.address, address.prefix);
        if i == 0 && let Some(gw) = &gateway {
            value.push(',');
            value.push_str(gw);
        }
        ctx.store.set_string(group, &key, &value);
    }
    Ok(())
}

// ── routes ─────────────────────────────────────────────────────────────

pub fn routes_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let is_ipv4 = setting.name() == Ip4Setting::NAME;
    let keys = indexed_key_order(ctx.store.keys(group), "route", "routes");
    if keys.is_empty() {
        return Ok(());
    }

    let mut routes: Vec<IpRoute> = Vec::new();
    for key in &keys {
        let raw = match ctx.store.get_string(group, key) {
            Ok(v) => v,
            Err(err) => {
                ctx.warn(
                    WarnSeverity::Warn,
                    Some(key),
                    format!("ignoring invalid value: {err}"),
                )?;
                continue;
            },
        };
        let Some(line) = parse_ip_line(ctx, key, &raw, is_ipv4, true)? else {
            continue;
        };
        let mut route = IpRoute::new(line.addr, line.prefix);
        route.next_hop = line.gateway;
        if let Some(metric) = line.metric {
            route.metric = i64::from(metric);
        }

        let options_key = format!("{key}_options");
        if ctx.store.has_key(group, &options_key).unwrap_or(false)
            && let Ok(raw_options) = ctx.store.get_string(group, &options_key)
        {
            route.attributes = parse_route_attributes(&raw_options, is_ipv4);
        }
        routes.push(route);
    }

    if routes.is_empty() {
        return Ok(());
    }
    set_or_warn(ctx, setting, spec, Variant::Routes(routes))
}

pub fn routes_writer(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(Variant::Routes(routes)) = setting.get(spec.name) else {
        return Ok(());
    };
    let unspec = if setting.name() == Ip4Setting::NAME {
        "0.0.0.0"
    } else {
        "::"
    };
    for (i, route) in routes.iter().enumerate() {
        let key = format!("route{}", i + 1);
        let mut value = format!("{}/{}", route.dest, route.prefix);
        if route.next_hop.is_some() || route.has_metric() {
            value.push(',');
            match route.next_hop {
                Some(nh) => value.push_str(&nh.to_string()),
                None => value.push_str(unspec),
            }
        }
        if route.has_metric() {
            value.push(',');
            value.push_str(&route.metric.to_string());
        }
        ctx.store.set_string(group, &key, &value);

        if !route.attributes.is_empty() {
            let rendered = route
                .attributes
                .iter()
                .map(|(name, attr)| format!("{name}={}", format_route_attr(attr)))
                .collect::<Vec<_>>()
                .join(",");
            ctx.store.set_string(group, &format!("{key}_options"), &rendered);
        }
    }
    Ok(())
}

// ── route attributes ───────────────────────────────────────────────────

enum AttrKind {
    Uint32,
    Bool,
    Addr,
    AddrV6Only,
    RouteType,
}

static ROUTE_ATTRIBUTES: Lazy<BTreeMap<&'static str, AttrKind>> = Lazy::new(|| {
    BTreeMap::from([
        ("cwnd", AttrKind::Uint32),
        ("from", AttrKind::AddrV6Only),
        ("initcwnd", AttrKind::Uint32),
        ("initrwnd", AttrKind::Uint32),
        ("lock-cwnd", AttrKind::Bool),
        ("lock-mtu", AttrKind::Bool),
        ("lock-window", AttrKind::Bool),
        ("mtu", AttrKind::Uint32),
        ("onlink", AttrKind::Bool),
        ("src", AttrKind::Addr),
        ("table", AttrKind::Uint32),
        ("tos", AttrKind::Uint32),
        ("type", AttrKind::RouteType),
        ("window", AttrKind::Uint32),
    ])
});

const ROUTE_TYPES: &[&str] = &["unicast", "local", "blackhole", "unreachable", "prohibit"];

/// Parses a `name=value,...` attribute list against the closed schema.
/// Unknown and invalid attributes are dropped without a warning.
fn parse_route_attributes(raw: &str, is_ipv4: bool) -> BTreeMap<String, RouteAttr> {
    let mut out = BTreeMap::new();
    for piece in raw.split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let Some((name, value)) = piece.split_once('=') else {
            debug!(piece, "dropping malformed route attribute");
            continue;
        };
        let Some(kind) = ROUTE_ATTRIBUTES.get(name) else {
            debug!(name, "dropping unknown route attribute");
            continue;
        };
        let attr = match kind {
            AttrKind::Uint32 => value.parse::<u32>().ok().map(RouteAttr::Uint32),
            AttrKind::Bool => match value {
                "true" => Some(RouteAttr::Bool(true)),
                "false" => Some(RouteAttr::Bool(false)),
                _ => None,
            },
            AttrKind::Addr => value
                .parse::<IpAddr>()
                .ok()
                .filter(|a| a.is_ipv4() == is_ipv4)
                .map(RouteAttr::Addr),
            AttrKind::AddrV6Only => {
                if is_ipv4 {
                    None
                } else {
                    value
                        .parse::<IpAddr>()
                        .ok()
                        .filter(|a| !a.is_ipv4())
                        .map(RouteAttr::Addr)
                }
            },
            AttrKind::RouteType => ROUTE_TYPES
                .contains(&value)
                .then(|| RouteAttr::Str(value.to_string())),
        };
        match attr {
            Some(attr) => {
                out.insert(name.to_string(), attr);
            },
            None => debug!(name, value, "dropping invalid route attribute"),
        }
    }
    out
}

fn format_route_attr(attr: &RouteAttr) -> String {
    match attr {
        RouteAttr::Str(s) => s.clone(),
        RouteAttr::Uint32(v) => v.to_string(),
        RouteAttr::Bool(v) => if *v { "true" } else { "false" }.to_string(),
        RouteAttr::Addr(a) => a.to_string(),
    }
}

// ── DNS ────────────────────────────────────────────────────────────────

/// DNS servers must be addresses of the setting's own family; invalid
/// entries are dropped with a WARN and the survivors canonicalized.
pub fn dns_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let is_ipv4 = setting.name() == Ip4Setting::NAME;
    let list = match ctx.store.get_string_list(group, spec.name) {
        Ok(v) => v,
        Err(err) => {
            ctx.warn(
                WarnSeverity::Warn,
                Some(spec.name),
                format!("ignoring invalid value: {err}"),
            )?;
            return Ok(());
        },
    };

    let mut servers = Vec::with_capacity(list.len());
    for item in &list {
        match item.trim().parse::<IpAddr>() {
            Ok(addr) if addr.is_ipv4() == is_ipv4 => servers.push(addr.to_string()),
            _ => ctx.warn(
                WarnSeverity::Warn,
                Some(spec.name),
                format!("ignoring invalid DNS server {item:?}"),
            )?,
        }
    }
    if servers.is_empty() {
        return Ok(());
    }
    set_or_warn(ctx, setting, spec, Variant::StrList(servers))
}

// ── addr-gen-mode ──────────────────────────────────────────────────────

pub fn addr_gen_mode_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let raw = match ctx.store.get_string(group, spec.name) {
        Ok(v) => v,
        Err(err) => {
            ctx.warn(
                WarnSeverity::Warn,
                Some(spec.name),
                format!("ignoring invalid value: {err}"),
            )?;
            return Ok(());
        },
    };
    match AddrGenMode::from_keyfile(raw.trim()) {
        Some(mode) => set_or_warn(ctx, setting, spec, Variant::Enum(mode.as_raw())),
        None => ctx.warn(
            WarnSeverity::Warn,
            Some(spec.name),
            format!("ignoring invalid addr-gen-mode {raw:?}"),
        ),
    }
}

pub fn addr_gen_mode_writer(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    if let Some(Variant::Enum(v)) = setting.get(spec.name)
        && let Some(mode) = AddrGenMode::from_raw(v)
    {
        ctx.store.set_string(group, spec.name, mode.as_keyfile());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_suffix_is_strict() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("1"), Some(1));
        assert_eq!(parse_index("42"), Some(42));
        assert_eq!(parse_index("01"), None);
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("1a"), None);
    }

    #[test]
    fn indexed_keys_sort_by_index_kind_key() {
        let keys = vec!["address1", "addresses2", "address"];
        assert_eq!(
            indexed_key_order(keys, "address", "addresses"),
            ["address", "address1", "addresses2"]
        );
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let keys = vec!["address01", "addressfoo", "method", "routes"];
        assert_eq!(indexed_key_order(keys, "address", "addresses"), Vec::<String>::new());
        let keys = vec!["routes"];
        assert_eq!(indexed_key_order(keys, "route", "routes"), ["routes"]);
    }
}
