// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Property metadata and the closed value union the catalog speaks.
//!
//! Every setting exposes its properties as a static [`PropertySpec`] slice;
//! generic `get`/`set` moves [`Variant`] values across the codec boundary.
//! The six "domain" kinds at the tail of [`PropertyKind`] are never encoded
//! by the generic engine; they only exist behind dispatch-table overrides.

use std::collections::BTreeMap;

use bitflags::bitflags;
use bytes::Bytes;

use crate::settings::{
    cert::CertValue,
    ip::{IpAddress, IpRoute},
    sriov::SriovVf,
    tc::{TcQdisc, TcTfilter},
};

bitflags! {
    /// Catalog-level property flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PropertyFlags: u32 {
        const WRITABLE = 0x1;
        const SECRET   = 0x2;
    }
}

bitflags! {
    /// Storage flags of a secret. Empty means system-owned: the value is
    /// persisted to disk. Anything else keeps the secret out of the file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SecretStorageFlags: u32 {
        const AGENT_OWNED  = 0x1;
        const NOT_SAVED    = 0x2;
        const NOT_REQUIRED = 0x4;
    }
}

/// Declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Str,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Bool,
    Char,
    Bytes,
    StrList,
    StrMap,
    UintArray,
    Enum,
    Flags,
    // Domain kinds, dispatch-only.
    Addresses,
    Routes,
    Cert,
    Vfs,
    Qdiscs,
    Tfilters,
}

/// Declared default of a property. `Zero` is the kind's natural empty
/// value; the explicit variants cover the handful of non-zero defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropDefault {
    Zero,
    Str(&'static str),
    Int(i64),
    Uint(u64),
    Bool(bool),
}

/// One catalog entry: property name, declared type, flags, default.
#[derive(Debug, Clone, Copy)]
pub struct PropertySpec {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub flags: PropertyFlags,
    pub default: PropDefault,
}

impl PropertySpec {
    pub const fn new(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            flags: PropertyFlags::WRITABLE,
            default: PropDefault::Zero,
        }
    }

    pub const fn secret(mut self) -> Self {
        self.flags = self.flags.union(PropertyFlags::SECRET);
        self
    }

    pub const fn with_default(mut self, default: PropDefault) -> Self {
        self.default = default;
        self
    }

    pub fn is_secret(&self) -> bool {
        self.flags.contains(PropertyFlags::SECRET)
    }

    pub fn is_writable(&self) -> bool {
        self.flags.contains(PropertyFlags::WRITABLE)
    }

    /// Whether `value` equals this property's declared default.
    pub fn matches_default(&self, value: &Variant) -> bool {
        match self.default {
            PropDefault::Zero => value.is_zero(),
            PropDefault::Str(s) => matches!(value, Variant::Str(v) if v == s),
            PropDefault::Int(i) => match value {
                Variant::Int32(v) => i64::from(*v) == i,
                Variant::Int64(v) => *v == i,
                Variant::Char(v) => i64::from(*v) == i,
                Variant::Enum(v) => i64::from(*v) == i,
                _ => false,
            },
            PropDefault::Uint(u) => match value {
                Variant::Uint32(v) => u64::from(*v) == u,
                Variant::Uint64(v) => *v == u,
                Variant::Flags(v) => u64::from(*v) == u,
                _ => false,
            },
            PropDefault::Bool(b) => matches!(value, Variant::Bool(v) if *v == b),
        }
    }
}

/// A property value in transit between the codec and a setting.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Str(String),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Bool(bool),
    Char(i8),
    Bytes(Bytes),
    StrList(Vec<String>),
    StrMap(BTreeMap<String, String>),
    UintArray(Vec<u32>),
    Enum(i32),
    Flags(u32),
    Addresses(Vec<IpAddress>),
    Routes(Vec<IpRoute>),
    Cert(CertValue),
    Vfs(Vec<SriovVf>),
    Qdiscs(Vec<TcQdisc>),
    Tfilters(Vec<TcTfilter>),
}

impl Variant {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Variant::Str(_) => PropertyKind::Str,
            Variant::Int32(_) => PropertyKind::Int32,
            Variant::Uint32(_) => PropertyKind::Uint32,
            Variant::Int64(_) => PropertyKind::Int64,
            Variant::Uint64(_) => PropertyKind::Uint64,
            Variant::Bool(_) => PropertyKind::Bool,
            Variant::Char(_) => PropertyKind::Char,
            Variant::Bytes(_) => PropertyKind::Bytes,
            Variant::StrList(_) => PropertyKind::StrList,
            Variant::StrMap(_) => PropertyKind::StrMap,
            Variant::UintArray(_) => PropertyKind::UintArray,
            Variant::Enum(_) => PropertyKind::Enum,
            Variant::Flags(_) => PropertyKind::Flags,
            Variant::Addresses(_) => PropertyKind::Addresses,
            Variant::Routes(_) => PropertyKind::Routes,
            Variant::Cert(_) => PropertyKind::Cert,
            Variant::Vfs(_) => PropertyKind::Vfs,
            Variant::Qdiscs(_) => PropertyKind::Qdiscs,
            Variant::Tfilters(_) => PropertyKind::Tfilters,
        }
    }

    /// The kind's natural empty value.
    fn is_zero(&self) -> bool {
        match self {
            Variant::Str(v) => v.is_empty(),
            Variant::Int32(v) => *v == 0,
            Variant::Uint32(v) => *v == 0,
            Variant::Int64(v) => *v == 0,
            Variant::Uint64(v) => *v == 0,
            Variant::Bool(v) => !v,
            Variant::Char(v) => *v == 0,
            Variant::Bytes(v) => v.is_empty(),
            Variant::StrList(v) => v.is_empty(),
            Variant::StrMap(v) => v.is_empty(),
            Variant::UintArray(v) => v.is_empty(),
            Variant::Enum(v) => *v == 0,
            Variant::Flags(v) => *v == 0,
            Variant::Addresses(v) => v.is_empty(),
            Variant::Routes(v) => v.is_empty(),
            Variant::Cert(_) => false,
            Variant::Vfs(v) => v.is_empty(),
            Variant::Qdiscs(v) => v.is_empty(),
            Variant::Tfilters(v) => v.is_empty(),
        }
    }
}
