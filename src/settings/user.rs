// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `user` setting: free-form user data. Keys may contain characters
//! the store cannot represent, so they travel through the store's key
//! encoding.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserSetting {
    pub data: BTreeMap<String, String>,
}

impl UserSetting {
    pub const NAME: &'static str = "user";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("data", PropertyKind::StrMap),
    ];
}

impl SettingData for UserSetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "data" => Some(Variant::StrMap(self.data.clone())),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("data", Variant::StrMap(v)) => self.data = v,
            (prop, value) => bail!("cannot set user.{prop} from {:?}", value.kind()),
        }
        Ok(())
    }
}
