// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::collections::BTreeMap;

use anyhow::Result;
use bytes::Bytes;
use keyfile_codec_rs::{
    keyfile::{WriteOptions, write_connection},
    settings::{
        Connection,
        connection::ConnectionSetting,
        ip::IpRoute,
        ip6::Ip6Setting,
        user::UserSetting,
        vpn::VpnSetting,
        wired::WiredSetting,
        wireless::WirelessSetting,
        wireless_security::WirelessSecuritySetting,
    },
};

fn write_simple(conn: &Connection) -> Result<keyfile_codec_rs::store::KeyfileStore> {
    write_connection(conn, WriteOptions::default())
}

#[test]
fn test_ipv6_route_with_metric_gets_unspecified_gateway() -> Result<()> {
    let mut route = IpRoute::new("2001:db8::".parse()?, 32);
    route.metric = 100;

    let mut conn = Connection::new();
    conn.add(
        Ip6Setting {
            method: Some("manual".to_string()),
            routes: vec![route],
            ..Default::default()
        }
        .into(),
    );

    let store = write_simple(&conn)?;
    assert_eq!(store.raw_value("ipv6", "route1"), Some("2001:db8::/32,::,100"));
    Ok(())
}

#[test]
fn test_secret_suppression_by_storage_flags() -> Result<()> {
    let mut conn = Connection::new();
    conn.add(
        WirelessSecuritySetting {
            key_mgmt: Some("wpa-psk".to_string()),
            psk: Some("hunter2secret".to_string()),
            psk_flags: 0x1, // agent-owned
            ..Default::default()
        }
        .into(),
    );
    let store = write_simple(&conn)?;
    assert!(!store.has_key("wifi-security", "psk").unwrap_or(false));
    assert_eq!(store.raw_value("wifi-security", "psk-flags"), Some("1"));

    let mut conn = Connection::new();
    conn.add(
        WirelessSecuritySetting {
            key_mgmt: Some("wpa-psk".to_string()),
            psk: Some("hunter2secret".to_string()),
            psk_flags: 0, // system-owned
            ..Default::default()
        }
        .into(),
    );
    let store = write_simple(&conn)?;
    assert_eq!(store.raw_value("wifi-security", "psk"), Some("hunter2secret"));
    Ok(())
}

#[test]
fn test_wep_keys_share_one_flags_property() -> Result<()> {
    let mut conn = Connection::new();
    conn.add(
        WirelessSecuritySetting {
            wep_key0: Some("abcde".to_string()),
            wep_key1: Some("fghij".to_string()),
            wep_key_flags: 0x2, // not-saved
            ..Default::default()
        }
        .into(),
    );
    let store = write_simple(&conn)?;
    assert!(!store.has_key("wifi-security", "wep-key0").unwrap_or(false));
    assert!(!store.has_key("wifi-security", "wep-key1").unwrap_or(false));
    Ok(())
}

#[test]
fn test_default_values_are_suppressed() -> Result<()> {
    let mut conn = Connection::new();
    conn.add(
        ConnectionSetting {
            id: Some("lan".to_string()),
            conn_type: Some("802-3-ethernet".to_string()),
            ..Default::default()
        }
        .into(),
    );
    conn.add(WiredSetting::default().into());

    let store = write_simple(&conn)?;
    // autoconnect defaults to true, lldp to -1; neither is written.
    assert!(!store.has_key("connection", "autoconnect").unwrap_or(false));
    assert!(!store.has_key("connection", "lldp").unwrap_or(false));
    // wake-on-lan has a non-zero default that is equally suppressed.
    assert!(!store.has_key("ethernet", "wake-on-lan").unwrap_or(false));
    assert_eq!(store.raw_value("connection", "id"), Some("lan"));
    Ok(())
}

#[test]
fn test_persist_default_forces_the_write() -> Result<()> {
    use keyfile_codec_rs::settings::ip4::Ip4Setting;

    // An empty method equals the declared default; persist_default still
    // writes it, while an equally-default plain string stays suppressed.
    let mut conn = Connection::new();
    conn.add(
        Ip4Setting {
            method: Some(String::new()),
            dhcp_hostname: Some(String::new()),
            ..Default::default()
        }
        .into(),
    );
    let store = write_simple(&conn)?;
    assert_eq!(store.raw_value("ipv4", "method"), Some(""));
    assert!(!store.has_key("ipv4", "dhcp-hostname").unwrap_or(false));
    Ok(())
}

#[test]
fn test_vpn_secrets_go_to_reserved_group() -> Result<()> {
    let mut conn = Connection::new();
    conn.add(
        VpnSetting {
            service_type: Some("org.freedesktop.openvpn".to_string()),
            data: BTreeMap::from([("remote".to_string(), "vpn.example.com".to_string())]),
            secrets: BTreeMap::from([("password".to_string(), "s3cr3t".to_string())]),
            ..Default::default()
        }
        .into(),
    );

    let store = write_simple(&conn)?;
    assert_eq!(
        store.raw_value("vpn", "service-type"),
        Some("org.freedesktop.openvpn")
    );
    assert_eq!(store.raw_value("vpn", "remote"), Some("vpn.example.com"));
    assert!(!store.has_key("vpn", "password").unwrap_or(false));
    assert_eq!(store.raw_value("vpn-secrets", "password"), Some("s3cr3t"));
    Ok(())
}

#[test]
fn test_mac_is_written_in_colon_hex() -> Result<()> {
    let mut conn = Connection::new();
    conn.add(
        WiredSetting {
            mac_address: Some(Bytes::from_static(&[0x00, 0x11, 0x22, 0xAA, 0xBB, 0xCC])),
            ..Default::default()
        }
        .into(),
    );
    let store = write_simple(&conn)?;
    assert_eq!(
        store.raw_value("ethernet", "mac-address"),
        Some("00:11:22:AA:BB:CC")
    );
    Ok(())
}

#[test]
fn test_ssid_forms_on_write() -> Result<()> {
    let mut conn = Connection::new();
    conn.add(
        WirelessSetting {
            ssid: Some(Bytes::from_static(b"my;net")),
            ..Default::default()
        }
        .into(),
    );
    let store = write_simple(&conn)?;
    assert_eq!(store.raw_value("wifi", "ssid"), Some("my\\;net"));

    let mut conn = Connection::new();
    conn.add(
        WirelessSetting {
            ssid: Some(Bytes::from_static(&[0xC3, 0xA4, 0x01])),
            ..Default::default()
        }
        .into(),
    );
    let store = write_simple(&conn)?;
    assert_eq!(store.raw_value("wifi", "ssid"), Some("195;164;1;"));
    Ok(())
}

#[test]
fn test_route_attributes_are_rendered_sorted() -> Result<()> {
    use keyfile_codec_rs::settings::ip::RouteAttr;

    let mut route = IpRoute::new("2001:db8::".parse()?, 32);
    route.metric = 50;
    route.attributes = BTreeMap::from([
        ("onlink".to_string(), RouteAttr::Bool(true)),
        ("mtu".to_string(), RouteAttr::Uint32(1400)),
    ]);

    let mut conn = Connection::new();
    conn.add(
        Ip6Setting {
            method: Some("manual".to_string()),
            routes: vec![route],
            ..Default::default()
        }
        .into(),
    );
    let store = write_simple(&conn)?;
    assert_eq!(
        store.raw_value("ipv6", "route1_options"),
        Some("mtu=1400,onlink=true")
    );
    Ok(())
}

#[test]
fn test_user_data_keys_are_encoded() -> Result<()> {
    let mut conn = Connection::new();
    conn.add(
        UserSetting {
            data: BTreeMap::from([("org.example key".to_string(), "v".to_string())]),
        }
        .into(),
    );
    let store = write_simple(&conn)?;
    assert_eq!(
        store.raw_value("user", "org\\x2eexample\\x20key"),
        Some("v")
    );
    Ok(())
}

#[test]
fn test_verify_hook_fails_fast() {
    let conn = Connection::new();
    let verify = |_: &Connection| -> Result<()> { anyhow::bail!("incomplete profile") };
    let result = write_connection(
        &conn,
        WriteOptions {
            verify: Some(&verify),
            handler: None,
        },
    );
    assert!(result.is_err());
}

#[test]
fn test_gateway_is_written_inline_with_first_address() -> Result<()> {
    use keyfile_codec_rs::settings::{ip::IpAddress, ip4::Ip4Setting};

    let mut conn = Connection::new();
    conn.add(
        Ip4Setting {
            method: Some("manual".to_string()),
            addresses: vec![
                IpAddress::new("10.0.0.1".parse()?, 24),
                IpAddress::new("10.0.0.2".parse()?, 24),
            ],
            gateway: Some("10.0.0.254".to_string()),
            ..Default::default()
        }
        .into(),
    );
    let store = write_simple(&conn)?;
    assert_eq!(store.raw_value("ipv4", "address1"), Some("10.0.0.1/24,10.0.0.254"));
    assert_eq!(store.raw_value("ipv4", "address2"), Some("10.0.0.2/24"));
    // No separate gateway key.
    assert!(!store.has_key("ipv4", "gateway").unwrap_or(false));
    Ok(())
}
