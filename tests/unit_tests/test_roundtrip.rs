// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fs;

use anyhow::Result;
use keyfile_codec_rs::{
    keyfile::{ReadOptions, WriteOptions, read_connection, write_connection},
    settings::Connection,
    store::KeyfileStore,
};

/// read → write → read; the codec must converge after one round.
fn round_trip(text: &str) -> Result<(Connection, KeyfileStore, Connection)> {
    let store = KeyfileStore::parse(text)?;
    let first = read_connection(&store, ReadOptions::default())?;
    let written = write_connection(&first, WriteOptions::default())?;
    let second = read_connection(&written, ReadOptions::default())?;
    Ok((first, written, second))
}

#[test]
fn test_canonical_profile_round_trips() -> Result<()> {
    let text = fs::read_to_string("tests/unit_tests/fixtures/ethernet-static.keyfile")?;
    let (first, written, second) = round_trip(&text)?;
    assert_eq!(first, second);

    // A second write of the re-read connection is byte-stable.
    let rewritten = write_connection(&second, WriteOptions::default())?;
    assert_eq!(written.to_text(), rewritten.to_text());
    Ok(())
}

#[test]
fn test_wifi_profile_round_trips() -> Result<()> {
    let text = "[connection]\nid=cafe\nuuid=3cf51560-e620-3bb2-a1b2-c3d4e5f60789\ntype=802-11-wireless\n\
                [wifi]\nssid=cafe;guest\nmode=infrastructure\nhidden=true\n\
                [wifi-security]\nkey-mgmt=wpa-psk\npsk=correcthorse\n\
                [ipv4]\nmethod=auto\n";
    // The raw semicolon in the ssid is legacy sloppiness: it decodes as
    // part of the value and is re-written escaped.
    let (first, written, second) = round_trip(text)?;
    assert_eq!(first, second);
    assert_eq!(written.raw_value("wifi", "ssid"), Some("cafe\\;guest"));
    Ok(())
}

#[test]
fn test_legacy_mac_is_not_reemitted() -> Result<()> {
    let (first, written, second) =
        round_trip("[802-3-ethernet]\nmac-address=0;17;34;170;187;204;\n")?;
    assert_eq!(first, second);
    assert_eq!(
        written.raw_value("ethernet", "mac-address"),
        Some("00:11:22:AA:BB:CC")
    );
    Ok(())
}

#[test]
fn test_bare_cert_path_is_not_reemitted() -> Result<()> {
    let (first, written, second) = round_trip("[802-1x]\nca-cert=/etc/pki/ca.pem\n")?;
    assert_eq!(first, second);
    assert_eq!(
        written.raw_value("802-1x", "ca-cert"),
        Some("file:///etc/pki/ca.pem")
    );
    Ok(())
}

#[test]
fn test_legacy_route_metric_is_not_reemitted() -> Result<()> {
    let (first, written, second) =
        round_trip("[ipv6]\nmethod=manual\nroute1=2001:db8::1/128,100\n")?;
    assert_eq!(first, second);
    assert_eq!(
        written.raw_value("ipv6", "route1"),
        Some("2001:db8::1/128,::,100")
    );
    Ok(())
}

#[test]
fn test_trailing_separator_is_not_reemitted() -> Result<()> {
    let (first, written, second) = round_trip("[ipv4]\naddresses=192.168.1.5/24;\n")?;
    assert_eq!(first, second);
    assert_eq!(written.raw_value("ipv4", "address1"), Some("192.168.1.5/24"));
    assert!(!written.has_key("ipv4", "addresses").unwrap_or(false));
    Ok(())
}

#[test]
fn test_vpn_profile_round_trips() -> Result<()> {
    let text = "[connection]\nid=tunnel\ntype=vpn\n\
                [vpn]\nservice-type=org.freedesktop.openvpn\nremote=vpn.example.com\nport=1194\n\
                [vpn-secrets]\npassword=hunter2\n";
    let (first, written, second) = round_trip(text)?;
    assert_eq!(first, second);
    assert_eq!(written.raw_value("vpn-secrets", "password"), Some("hunter2"));

    let vpn = second.vpn().expect("vpn setting");
    assert_eq!(vpn.data.len(), 2);
    assert_eq!(vpn.secrets.len(), 1);
    Ok(())
}

#[test]
fn test_serial_and_sriov_round_trip() -> Result<()> {
    let text = "[connection]\nid=modem\ntype=serial\n\
                [serial]\nbaud=115200\nparity=69\nstopbits=2\n\
                [sriov]\ntotal-vfs=2\nvf.0=mac=02:00:00:00:00:01 trust=true\n\
                [tc]\nqdisc.root=fq_codel\n";
    let (first, written, second) = round_trip(text)?;
    assert_eq!(first, second);
    // Parity is canonicalized to the uppercase-E code.
    assert_eq!(written.raw_value("serial", "parity"), Some("69"));
    assert_eq!(
        written.raw_value("sriov", "vf.0"),
        Some("mac=02:00:00:00:00:01 trust=true")
    );
    assert_eq!(written.raw_value("tc", "qdisc.root"), Some("fq_codel"));
    Ok(())
}
