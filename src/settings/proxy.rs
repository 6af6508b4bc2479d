// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `proxy` setting.

use anyhow::{Result, bail};
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProxySetting {
    pub method: i32,
    pub browser_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pac_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pac_script: Option<String>,
}

impl ProxySetting {
    pub const NAME: &'static str = "proxy";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("method", PropertyKind::Enum),
        PropertySpec::new("browser-only", PropertyKind::Bool),
        PropertySpec::new("pac-url", PropertyKind::Str),
        PropertySpec::new("pac-script", PropertyKind::Str),
    ];
}

impl SettingData for ProxySetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "method" => Some(Variant::Enum(self.method)),
            "browser-only" => Some(Variant::Bool(self.browser_only)),
            "pac-url" => self.pac_url.clone().map(Variant::Str),
            "pac-script" => self.pac_script.clone().map(Variant::Str),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("method", Variant::Enum(v)) => self.method = v,
            ("browser-only", Variant::Bool(v)) => self.browser_only = v,
            ("pac-url", Variant::Str(v)) => self.pac_url = Some(v),
            ("pac-script", Variant::Str(v)) => self.pac_script = Some(v),
            (prop, value) => bail!("cannot set proxy.{prop} from {:?}", value.kind()),
        }
        Ok(())
    }
}
