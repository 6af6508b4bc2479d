// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Multi-key device properties: SR-IOV virtual functions (`vf.<N>`) and
//! traffic control (`qdisc.<parent>` / `tfilter.<parent>`).

use anyhow::Result;

use crate::{
    keyfile::{engine::set_or_warn, reader::ReadContext, warn::WarnSeverity, writer::WriteContext},
    settings::{
        Setting, SettingData,
        sriov::SriovVf,
        tc::{TC_PARENT_UNSPEC, TcQdisc, TcTfilter},
        value::{PropertySpec, Variant},
    },
};

/// Collects `vf.<N>` keys in numerically ascending index order.
fn vf_keys(keys: Vec<&str>) -> Vec<(u32, String)> {
    let mut out: Vec<(u32, String)> = keys
        .into_iter()
        .filter_map(|key| {
            let suffix = key.strip_prefix("vf.")?;
            if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            suffix.parse::<u32>().ok().map(|n| (n, key.to_string()))
        })
        .collect();
    out.sort();
    out.dedup();
    out
}

pub fn vfs_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let keys = vf_keys(ctx.store.keys(group));
    if keys.is_empty() {
        return Ok(());
    }

    let mut vfs = Vec::with_capacity(keys.len());
    for (index, key) in &keys {
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
        // The key carries the index; the value only carries attributes.
        let descriptor = if raw.trim().is_empty() {
            index.to_string()
        } else {
            format!("{index} {raw}")
        };
        match SriovVf::parse(&descriptor) {
            Ok(vf) => vfs.push(vf),
            Err(err) => ctx.warn(
                WarnSeverity::Warn,
                Some(key),
                format!("ignoring invalid virtual function: {err}"),
            )?,
        }
    }

    if vfs.is_empty() {
        return Ok(());
    }
    set_or_warn(ctx, setting, spec, Variant::Vfs(vfs))
}

pub fn vfs_writer(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(Variant::Vfs(vfs)) = setting.get(spec.name) else {
        return Ok(());
    };
    for vf in &vfs {
        let key = format!("vf.{}", vf.index);
        let value = vf
            .attributes
            .iter()
            .map(|(name, v)| format!("{name}={v}"))
            .collect::<Vec<_>>()
            .join(" ");
        ctx.store.set_string(group, &key, &value);
    }
    Ok(())
}

/// Synthesizes the full domain string for one `qdisc.<parent>` /
/// `tfilter.<parent>` key: the `parent ` stanza is prepended unless the
/// parent token is the unspecified-handle sentinel.
fn synthesize_tc_spec(parent: &str, suffix: &str) -> String {
    if parent == TC_PARENT_UNSPEC {
        suffix.to_string()
    } else {
        format!("parent {parent} {suffix}")
    }
}

fn tc_keys<'k>(keys: Vec<&'k str>, prefix: &str) -> Vec<(String, &'k str)> {
    let mut out: Vec<(String, &str)> = Vec::new();
    for key in keys {
        if let Some(parent) = key.strip_prefix(prefix)
            && !parent.is_empty()
            && !out.iter().any(|(_, k)| *k == key)
        {
            out.push((parent.to_string(), key));
        }
    }
    out
}

pub fn qdiscs_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let keys = tc_keys(ctx.store.keys(group), "qdisc.");
    if keys.is_empty() {
        return Ok(());
    }

    let mut qdiscs = Vec::with_capacity(keys.len());
    for (parent, key) in &keys {
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
        match TcQdisc::parse(&synthesize_tc_spec(parent, &raw)) {
            Ok(qdisc) => qdiscs.push(qdisc),
            Err(err) => ctx.warn(
                WarnSeverity::Warn,
                Some(key),
                format!("ignoring invalid qdisc: {err}"),
            )?,
        }
    }

    if qdiscs.is_empty() {
        return Ok(());
    }
    set_or_warn(ctx, setting, spec, Variant::Qdiscs(qdiscs))
}

pub fn qdiscs_writer(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(Variant::Qdiscs(qdiscs)) = setting.get(spec.name) else {
        return Ok(());
    };
    for qdisc in &qdiscs {
        let key = format!("qdisc.{}", qdisc.parent);
        ctx.store.set_string(group, &key, &qdisc.kind);
    }
    Ok(())
}

pub fn tfilters_reader(
    ctx: &mut ReadContext<'_>,
    setting: &mut Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let keys = tc_keys(ctx.store.keys(group), "tfilter.");
    if keys.is_empty() {
        return Ok(());
    }

    let mut tfilters = Vec::with_capacity(keys.len());
    for (parent, key) in &keys {
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
        match TcTfilter::parse(&synthesize_tc_spec(parent, &raw)) {
            Ok(tfilter) => tfilters.push(tfilter),
            Err(err) => ctx.warn(
                WarnSeverity::Warn,
                Some(key),
                format!("ignoring invalid traffic filter: {err}"),
            )?,
        }
    }

    if tfilters.is_empty() {
        return Ok(());
    }
    set_or_warn(ctx, setting, spec, Variant::Tfilters(tfilters))
}

pub fn tfilters_writer(
    ctx: &mut WriteContext<'_>,
    setting: &Setting,
    spec: &PropertySpec,
    group: &str,
) -> Result<()> {
    let Some(Variant::Tfilters(tfilters)) = setting.get(spec.name) else {
        return Ok(());
    };
    for tfilter in &tfilters {
        let key = format!("tfilter.{}", tfilter.parent);
        ctx.store.set_string(group, &key, &tfilter.spec);
    }
    Ok(())
}
