// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `802-1x` setting: port-based authentication credentials.
//!
//! Certificate-like properties carry [`CertValue`] and are always handled
//! through the dispatch table; the rest is plain scalars.

use anyhow::{Result, bail};
use bytes::Bytes;
use serde::Serialize;

use crate::settings::{
    SettingData,
    cert::CertValue,
    value::{PropertyKind, PropertySpec, Variant},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Security8021xSetting {
    pub eap: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous_identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pac_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<CertValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_match: Option<String>,
    pub altsubject_matches: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_cert: Option<CertValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase1_peapver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase1_peaplabel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase2_auth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase2_autheap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase2_ca_cert: Option<CertValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase2_client_cert: Option<CertValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub password_flags: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_raw: Option<Bytes>,
    pub password_raw_flags: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<CertValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_password: Option<String>,
    pub private_key_password_flags: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase2_private_key: Option<CertValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase2_private_key_password: Option<String>,
    pub phase2_private_key_password_flags: u32,
    pub system_ca_certs: bool,
}

impl Security8021xSetting {
    pub const NAME: &'static str = "802-1x";

    pub const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::new("name", PropertyKind::Str),
        PropertySpec::new("eap", PropertyKind::StrList),
        PropertySpec::new("identity", PropertyKind::Str),
        PropertySpec::new("anonymous-identity", PropertyKind::Str),
        PropertySpec::new("pac-file", PropertyKind::Str),
        PropertySpec::new("ca-cert", PropertyKind::Cert),
        PropertySpec::new("ca-path", PropertyKind::Str),
        PropertySpec::new("subject-match", PropertyKind::Str),
        PropertySpec::new("altsubject-matches", PropertyKind::StrList),
        PropertySpec::new("client-cert", PropertyKind::Cert),
        PropertySpec::new("phase1-peapver", PropertyKind::Str),
        PropertySpec::new("phase1-peaplabel", PropertyKind::Str),
        PropertySpec::new("phase2-auth", PropertyKind::Str),
        PropertySpec::new("phase2-autheap", PropertyKind::Str),
        PropertySpec::new("phase2-ca-cert", PropertyKind::Cert),
        PropertySpec::new("phase2-client-cert", PropertyKind::Cert),
        PropertySpec::new("password", PropertyKind::Str).secret(),
        PropertySpec::new("password-flags", PropertyKind::Flags),
        PropertySpec::new("password-raw", PropertyKind::Bytes).secret(),
        PropertySpec::new("password-raw-flags", PropertyKind::Flags),
        PropertySpec::new("private-key", PropertyKind::Cert),
        PropertySpec::new("private-key-password", PropertyKind::Str).secret(),
        PropertySpec::new("private-key-password-flags", PropertyKind::Flags),
        PropertySpec::new("phase2-private-key", PropertyKind::Cert),
        PropertySpec::new("phase2-private-key-password", PropertyKind::Str).secret(),
        PropertySpec::new("phase2-private-key-password-flags", PropertyKind::Flags),
        PropertySpec::new("system-ca-certs", PropertyKind::Bool),
    ];
}

impl SettingData for Security8021xSetting {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn properties(&self) -> &'static [PropertySpec] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<Variant> {
        match property {
            "name" => Some(Variant::Str(Self::NAME.to_string())),
            "eap" => Some(Variant::StrList(self.eap.clone())),
            "identity" => self.identity.clone().map(Variant::Str),
            "anonymous-identity" => self.anonymous_identity.clone().map(Variant::Str),
            "pac-file" => self.pac_file.clone().map(Variant::Str),
            "ca-cert" => self.ca_cert.clone().map(Variant::Cert),
            "ca-path" => self.ca_path.clone().map(Variant::Str),
            "subject-match" => self.subject_match.clone().map(Variant::Str),
            "altsubject-matches" => {
                Some(Variant::StrList(self.altsubject_matches.clone()))
            },
            "client-cert" => self.client_cert.clone().map(Variant::Cert),
            "phase1-peapver" => self.phase1_peapver.clone().map(Variant::Str),
            "phase1-peaplabel" => self.phase1_peaplabel.clone().map(Variant::Str),
            "phase2-auth" => self.phase2_auth.clone().map(Variant::Str),
            "phase2-autheap" => self.phase2_autheap.clone().map(Variant::Str),
            "phase2-ca-cert" => self.phase2_ca_cert.clone().map(Variant::Cert),
            "phase2-client-cert" => self.phase2_client_cert.clone().map(Variant::Cert),
            "password" => self.password.clone().map(Variant::Str),
            "password-flags" => Some(Variant::Flags(self.password_flags)),
            "password-raw" => self.password_raw.clone().map(Variant::Bytes),
            "password-raw-flags" => Some(Variant::Flags(self.password_raw_flags)),
            "private-key" => self.private_key.clone().map(Variant::Cert),
            "private-key-password" => {
                self.private_key_password.clone().map(Variant::Str)
            },
            "private-key-password-flags" => {
                Some(Variant::Flags(self.private_key_password_flags))
            },
            "phase2-private-key" => self.phase2_private_key.clone().map(Variant::Cert),
            "phase2-private-key-password" => {
                self.phase2_private_key_password.clone().map(Variant::Str)
            },
            "phase2-private-key-password-flags" => {
                Some(Variant::Flags(self.phase2_private_key_password_flags))
            },
            "system-ca-certs" => Some(Variant::Bool(self.system_ca_certs)),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Variant) -> Result<()> {
        match (property, value) {
            ("eap", Variant::StrList(v)) => self.eap = v,
            ("identity", Variant::Str(v)) => self.identity = Some(v),
            ("anonymous-identity", Variant::Str(v)) => self.anonymous_identity = Some(v),
            ("pac-file", Variant::Str(v)) => self.pac_file = Some(v),
            ("ca-cert", Variant::Cert(v)) => self.ca_cert = Some(v),
            ("ca-path", Variant::Str(v)) => self.ca_path = Some(v),
            ("subject-match", Variant::Str(v)) => self.subject_match = Some(v),
            ("altsubject-matches", Variant::StrList(v)) => self.altsubject_matches = v,
            ("client-cert", Variant::Cert(v)) => self.client_cert = Some(v),
            ("phase1-peapver", Variant::Str(v)) => self.phase1_peapver = Some(v),
            ("phase1-peaplabel", Variant::Str(v)) => self.phase1_peaplabel = Some(v),
            ("phase2-auth", Variant::Str(v)) => self.phase2_auth = Some(v),
            ("phase2-autheap", Variant::Str(v)) => self.phase2_autheap = Some(v),
            ("phase2-ca-cert", Variant::Cert(v)) => self.phase2_ca_cert = Some(v),
            ("phase2-client-cert", Variant::Cert(v)) => self.phase2_client_cert = Some(v),
            ("password", Variant::Str(v)) => self.password = Some(v),
            ("password-flags", Variant::Flags(v)) => self.password_flags = v,
            ("password-raw", Variant::Bytes(v)) => self.password_raw = Some(v),
            ("password-raw-flags", Variant::Flags(v)) => self.password_raw_flags = v,
            ("private-key", Variant::Cert(v)) => self.private_key = Some(v),
            ("private-key-password", Variant::Str(v)) => {
                self.private_key_password = Some(v)
            },
            ("private-key-password-flags", Variant::Flags(v)) => {
                self.private_key_password_flags = v
            },
            ("phase2-private-key", Variant::Cert(v)) => self.phase2_private_key = Some(v),
            ("phase2-private-key-password", Variant::Str(v)) => {
                self.phase2_private_key_password = Some(v)
            },
            ("phase2-private-key-password-flags", Variant::Flags(v)) => {
                self.phase2_private_key_password_flags = v
            },
            ("system-ca-certs", Variant::Bool(v)) => self.system_ca_certs = v,
            (prop, value) => {
                bail!("cannot set 802-1x.{prop} from {:?}", value.kind())
            },
        }
        Ok(())
    }
}
