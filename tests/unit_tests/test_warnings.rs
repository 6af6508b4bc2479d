// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use keyfile_codec_rs::{
    keyfile::{
        ReadOptions, read_connection,
        warn::{HandlerVerdict, KeyfileWarning, WarnSeverity},
    },
    settings::Connection,
    store::KeyfileStore,
};

fn read_with_handler<F>(text: &str, handler: &mut F) -> Result<Connection>
where F: FnMut(&KeyfileStore, &Connection, &KeyfileWarning) -> HandlerVerdict {
    let store = KeyfileStore::parse(text)?;
    read_connection(
        &store,
        ReadOptions {
            keyfile_name: None,
            base_dir: None,
            handler: Some(handler),
        },
    )
}

#[test]
fn test_vetoed_warning_aborts_the_read() {
    let mut handler = |_: &KeyfileStore, _: &Connection, w: &KeyfileWarning| {
        if w.severity == WarnSeverity::Warn {
            HandlerVerdict::Abort
        } else {
            HandlerVerdict::Continue
        }
    };
    let result = read_with_handler("[ipv4]\naddress1=bogus\n", &mut handler);
    assert!(result.is_err());
}

#[test]
fn test_vetoed_info_aborts_too() {
    let mut handler = |_: &KeyfileStore, _: &Connection, _: &KeyfileWarning| {
        HandlerVerdict::Abort
    };
    let result = read_with_handler("[ipv4]\naddresses=192.168.1.5/24;\n", &mut handler);
    assert!(result.is_err());
}

#[test]
fn test_dns_veto_aborts() {
    let mut handler = |_: &KeyfileStore, _: &Connection, w: &KeyfileWarning| {
        if w.message.contains("DNS") {
            HandlerVerdict::Abort
        } else {
            HandlerVerdict::Continue
        }
    };
    let result = read_with_handler("[ipv4]\ndns=not-an-ip;\n", &mut handler);
    assert!(result.is_err());
}

#[test]
fn test_warning_attribution() -> Result<()> {
    let mut seen = Vec::new();
    let mut handler = |_: &KeyfileStore, _: &Connection, w: &KeyfileWarning| {
        seen.push(w.clone());
        HandlerVerdict::Continue
    };
    read_with_handler("[ipv4]\naddress1=10.1.2.3\n", &mut handler)?;

    let warning = seen
        .iter()
        .find(|w| w.message.contains("missing prefix length"))
        .expect("prefix warning");
    assert_eq!(warning.group.as_deref(), Some("ipv4"));
    assert_eq!(warning.setting.as_deref(), Some("ipv4"));
    assert_eq!(warning.property.as_deref(), Some("address1"));
    assert_eq!(warning.severity, WarnSeverity::Warn);
    Ok(())
}

#[test]
fn test_negative_value_for_unsigned_property_warns() -> Result<()> {
    let mut seen = Vec::new();
    let mut handler = |_: &KeyfileStore, _: &Connection, w: &KeyfileWarning| {
        seen.push(w.clone());
        HandlerVerdict::Continue
    };
    let conn = read_with_handler("[802-3-ethernet]\nmtu=-1\n", &mut handler)?;

    match conn.get("802-3-ethernet") {
        Some(keyfile_codec_rs::settings::Setting::WiredSetting(s)) => {
            assert_eq!(s.mtu, 0);
        },
        other => panic!("expected wired setting, got {other:?}"),
    }
    assert!(seen.iter().any(|w| w.message.contains("out of range")));
    Ok(())
}

#[test]
fn test_accepted_profile_produces_no_warnings() -> Result<()> {
    let mut seen = Vec::new();
    let mut handler = |_: &KeyfileStore, _: &Connection, w: &KeyfileWarning| {
        seen.push(w.clone());
        HandlerVerdict::Continue
    };
    read_with_handler(
        "[connection]\nid=x\ntype=802-3-ethernet\n[ipv4]\nmethod=auto\n",
        &mut handler,
    )?;
    assert!(seen.is_empty(), "unexpected warnings: {seen:?}");
    Ok(())
}
