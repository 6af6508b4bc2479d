// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `serial` setting. Parity is persisted as the ASCII code of
//! `E`/`o`/`n`, decoded through [`SerialParity`].

use anyhow::{Result, bail};
use serde::Serialize;

use crate::settings::{
    SettingData,
    value::{PropDefault, PropertyKind, PropertySpec, Variant},
};

/// Parity of the serial line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialParity {
    Even,
    Odd,
    #[default]
    None,
}

impl SerialParity {
    /// Decodes from the ASCII code persisted in keyfiles. Both cases of
    /// each letter are accepted.
    pub fn from_ascii(code: u8) -> Option<Self> {
        match code {
            b'E' | b'e' => Some(Self::Even),
            b'O' | b'o' => Some(Self::Odd),
            b'N' | b'n' => Some(Self::None),
            _ => None,
        }
    }

    /// Canonical ASCII code written to keyfiles.
    pub fn as_ascii(self) -> u8 {
        match self {
            Self::Even => b'E',
            Self::Odd => b'o',
            Self::None => b'n',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerialSetting {
    pub baud: u32,
    pub bits: u32,
    pub parity: SerialParity,
    pub stopbits: u32,
    pub send_delay: u64,
}

impl Default for SerialSetting {
    fn default() -> Self {
        Self {
            baud: 57600,
            bits: 8,
            parity: SerialParity::None,
            stopbits: 1,
            send_delay: 0,
        }
    }
}

impl SerialSetting {
    pub const NAME: &'static str = "serial";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("baud", PropertyKind::Uint32)
            .with_default(PropDefault::Uint(57600)),
        PropertySpec::new("bits", PropertyKind::Uint32)
            .with_default(PropDefault::Uint(8)),
        PropertySpec::new("parity", PropertyKind::Char)
            .with_default(PropDefault::Int(b'n' as i64)),
        PropertySpec::new("stopbits", PropertyKind::Uint32)
            .with_default(PropDefault::Uint(1)),
        PropertySpec::new("send-delay", PropertyKind::Uint64),
    ];
}

impl SettingData for SerialSetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "baud" => Some(Variant::Uint32(self.baud)),
            "bits" => Some(Variant::Uint32(self.bits)),
            "parity" => Some(Variant::Char(self.parity.as_ascii() as i8)),
            "stopbits" => Some(Variant::Uint32(self.stopbits)),
            "send-delay" => Some(Variant::Uint64(self.send_delay)),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("baud", Variant::Uint32(v)) => self.baud = v,
            ("bits", Variant::Uint32(v)) => self.bits = v,
            ("parity", Variant::Char(v)) => {
                self.parity = SerialParity::from_ascii(v as u8)
                    .ok_or_else(|| anyhow::anyhow!("invalid parity code {v}"))?
            },
            ("stopbits", Variant::Uint32(v)) => self.stopbits = v,
            ("send-delay", Variant::Uint64(v)) => self.send_delay = v,
            (prop, value) => bail!("cannot set serial.{prop} from {:?}", value.kind()),
        }
        Ok(())
    }
}
