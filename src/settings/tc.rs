// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Traffic-control setting: queueing disciplines and traffic filters.

use anyhow::{Result, bail, ensure};
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropertyKind, PropertySpec, Variant},
};

/// Parent token meaning "no parent handle".
pub const TC_PARENT_UNSPEC: &str = "none";

/// A queueing discipline attached to a parent handle. `kind` carries the
/// qdisc name plus any trailing qdisc options, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TcQdisc {
    pub parent: String,
    pub kind: String,
}

impl TcQdisc {
    /// Parses the full domain string, e.g. `"parent root fq_codel"` or a
    /// bare `"fq_codel"` for an unparented qdisc.
    pub fn parse(spec: &str) -> Result<Self> {
        let (parent, kind) = split_parent(spec)?;
        Ok(Self { parent, kind })
    }

    pub fn to_spec(&self) -> String {
        join_parent(&self.parent, &self.kind)
    }
}

/// A traffic filter attached to a parent handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TcTfilter {
    pub parent: String,
    pub spec: String,
}

impl TcTfilter {
    pub fn parse(spec: &str) -> Result<Self> {
        let (parent, rest) = split_parent(spec)?;
        Ok(Self { parent, spec: rest })
    }

    pub fn to_spec(&self) -> String {
        join_parent(&self.parent, &self.spec)
    }
}

fn split_parent(spec: &str) -> Result<(String, String)> {
    let trimmed = spec.trim();
    let (parent, rest) = match trimmed.strip_prefix("parent ") {
        Some(rest) => {
            let rest = rest.trim_start();
            let (tok, tail) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow::anyhow!("missing body after parent handle"))?;
            (tok.to_string(), tail.trim_start().to_string())
        },
        None => (TC_PARENT_UNSPEC.to_string(), trimmed.to_string()),
    };
    ensure!(!rest.is_empty(), "empty tc specification");
    Ok((parent, rest))
}

fn join_parent(parent: &str, body: &str) -> String {
    if parent == TC_PARENT_UNSPEC {
        body.to_string()
    } else {
        format!("parent {parent} {body}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TcSetting {
    pub qdiscs: Vec<TcQdisc>,
    pub tfilters: Vec<TcTfilter>,
}

impl TcSetting {
    pub const NAME: &'static str = "tc";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("qdiscs", PropertyKind::Qdiscs),
        PropertySpec::new("tfilters", PropertyKind::Tfilters),
    ];
}

impl SettingData for TcSetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "qdiscs" => Some(Variant::Qdiscs(self.qdiscs.clone())),
            "tfilters" => Some(Variant::Tfilters(self.tfilters.clone())),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("qdiscs", Variant::Qdiscs(v)) => self.qdiscs = v,
            ("tfilters", Variant::Tfilters(v)) => self.tfilters = v,
            (prop, value) => bail!("cannot set tc.{prop} from {:?}", value.kind()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qdisc_with_parent() {
        let q = TcQdisc::parse("parent root fq_codel limit 1000").expect("parse");
        assert_eq!(q.parent, "root");
        assert_eq!(q.kind, "fq_codel limit 1000");
        assert_eq!(q.to_spec(), "parent root fq_codel limit 1000");
    }

    #[test]
    fn qdisc_without_parent() {
        let q = TcQdisc::parse("sfq").expect("parse");
        assert_eq!(q.parent, TC_PARENT_UNSPEC);
        assert_eq!(q.to_spec(), "sfq");
    }
}
