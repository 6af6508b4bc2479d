// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `bond` setting: a single map of bonding driver options.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BondSetting {
    pub options: BTreeMap<String, String>,
}

impl BondSetting {
    pub const NAME: &'static str = "bond";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("options", PropertyKind::StrMap),
    ];
}

impl SettingData for BondSetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "options" => Some(Variant::StrMap(self.options.clone())),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("options", Variant::StrMap(v)) => self.options = v,
            (prop, value) => bail!("cannot set bond.{prop} from {:?}", value.kind()),
        }
        Ok(())
    }
}
