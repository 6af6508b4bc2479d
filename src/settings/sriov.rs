// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! SR-IOV setting: virtual-function descriptors.

use std::collections::BTreeMap;

use anyhow::{Result, bail, ensure};
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropDefault, PropertyKind, PropertySpec, Variant},
};

/// One virtual function: an index plus free-form `name=value` attributes
/// (`mac`, `trust`, `spoof-check`, `vlans`, rate limits, ...).
///
/// The string grammar is `"<index> name=value name=value"`; attributes are
/// rendered in name order so the encoding is canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SriovVf {
    pub index: u32,
    pub attributes: BTreeMap<String, String>,
}

impl SriovVf {
    pub fn parse(s: &str) -> Result<Self> {
        let mut tokens = s.split_ascii_whitespace();
        let index = tokens
            .next()
            .ok_or_else(|| anyhow::anyhow!("empty VF descriptor"))?
            .parse::<u32>()?;
        let mut attributes = BTreeMap::new();
        for token in tokens {
            let Some((name, value)) = token.split_once('=') else {
                bail!("VF attribute {token:?} is not name=value");
            };
            ensure!(!name.is_empty(), "VF attribute with empty name");
            attributes.insert(name.to_string(), value.to_string());
        }
        Ok(Self { index, attributes })
    }

    pub fn to_descriptor(&self) -> String {
        let mut out = self.index.to_string();
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push('=');
            out.push_str(value);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SriovSetting {
    pub total_vfs: u32,
    pub vfs: Vec<SriovVf>,
    pub autoprobe_drivers: i32,
}

impl Default for SriovSetting {
    fn default() -> Self {
        Self {
            total_vfs: 0,
            vfs: Vec::new(),
            autoprobe_drivers: -1,
        }
    }
}

impl SriovSetting {
    pub const NAME: &'static str = "sriov";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("autoprobe-drivers", PropertyKind::Enum)
            .with_default(PropDefault::Int(-1)),
        PropertySpec::new("total-vfs", PropertyKind::Uint32),
        PropertySpec::new("vfs", PropertyKind::Vfs),
    ];
}

impl SettingData for SriovSetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "autoprobe-drivers" => Some(Variant::Enum(self.autoprobe_drivers)),
            "total-vfs" => Some(Variant::Uint32(self.total_vfs)),
            "vfs" => Some(Variant::Vfs(self.vfs.clone())),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("autoprobe-drivers", Variant::Enum(v)) => self.autoprobe_drivers = v,
            ("total-vfs", Variant::Uint32(v)) => self.total_vfs = v,
            ("vfs", Variant::Vfs(v)) => self.vfs = v,
            (prop, value) => {
                bail!("cannot set sriov.{prop} from {:?}", value.kind())
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vf_descriptor_round_trip() {
        let vf = SriovVf::parse("3 mac=00:11:22:33:44:55 trust=true").expect("parse");
        assert_eq!(vf.index, 3);
        assert_eq!(vf.attributes["mac"], "00:11:22:33:44:55");
        assert_eq!(vf.to_descriptor(), "3 mac=00:11:22:33:44:55 trust=true");
    }

    #[test]
    fn vf_descriptor_rejects_bare_attribute() {
        assert!(SriovVf::parse("1 spoof-check").is_err());
    }
}
