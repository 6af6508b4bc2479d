// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::Path;

use anyhow::Result;
use keyfile_codec_rs::{
    keyfile::{
        ReadOptions, read_connection, reader::uuid_for_keyfile,
        warn::{HandlerVerdict, KeyfileWarning, WarnSeverity},
    },
    settings::{Connection, Setting, cert::CertValue},
    store::KeyfileStore,
};

use super::read_text;

fn ip4_of(conn: &Connection) -> &keyfile_codec_rs::settings::ip4::Ip4Setting {
    match conn.get("ipv4") {
        Some(Setting::Ip4Setting(s)) => s,
        other => panic!("expected ipv4 setting, got {other:?}"),
    }
}

fn ip6_of(conn: &Connection) -> &keyfile_codec_rs::settings::ip6::Ip6Setting {
    match conn.get("ipv6") {
        Some(Setting::Ip6Setting(s)) => s,
        other => panic!("expected ipv6 setting, got {other:?}"),
    }
}

fn read_collecting(text: &str) -> Result<(Connection, Vec<KeyfileWarning>)> {
    let store = KeyfileStore::parse(text)?;
    let mut warnings = Vec::new();
    let mut handler =
        |_: &KeyfileStore, _: &Connection, warning: &KeyfileWarning| {
            warnings.push(warning.clone());
            HandlerVerdict::Continue
        };
    let conn = read_connection(
        &store,
        ReadOptions {
            keyfile_name: None,
            base_dir: None,
            handler: Some(&mut handler),
        },
    )?;
    Ok((conn, warnings))
}

#[test]
fn test_ethernet_with_static_address() -> Result<()> {
    let conn = read_text(
        "[connection]\nid=x\ntype=802-3-ethernet\n[ipv4]\nmethod=auto\naddress1=10.0.0.1/24,10.0.0.254\n",
    )?;

    let c = conn.connection().expect("connection setting");
    assert_eq!(c.id.as_deref(), Some("x"));
    assert_eq!(c.conn_type.as_deref(), Some("802-3-ethernet"));

    let ip4 = ip4_of(&conn);
    assert_eq!(ip4.method.as_deref(), Some("auto"));
    assert_eq!(ip4.addresses.len(), 1);
    assert_eq!(ip4.addresses[0].address.to_string(), "10.0.0.1");
    assert_eq!(ip4.addresses[0].prefix, 24);
    assert_eq!(
        ip4.addresses[0].gateway.map(|g| g.to_string()).as_deref(),
        Some("10.0.0.254")
    );
    assert_eq!(ip4.gateway.as_deref(), Some("10.0.0.254"));
    Ok(())
}

#[test]
fn test_trailing_separator_is_accepted_with_info() -> Result<()> {
    let (conn, warnings) = read_collecting("[ipv4]\naddresses=192.168.1.5/24;\n")?;

    let ip4 = ip4_of(&conn);
    assert_eq!(ip4.addresses.len(), 1);
    assert_eq!(ip4.addresses[0].address.to_string(), "192.168.1.5");
    assert_eq!(ip4.addresses[0].prefix, 24);

    let info: Vec<_> = warnings
        .iter()
        .filter(|w| w.severity == WarnSeverity::Info)
        .collect();
    assert_eq!(info.len(), 1);
    assert!(info[0].message.contains("deprecated semicolon"));
    Ok(())
}

#[test]
fn test_bare_cert_path_is_normalized_with_missing_file_info() -> Result<()> {
    let (conn, warnings) = read_collecting("[802-1x]\nca-cert=/etc/pki/ca.pem\n")?;

    match conn.get("802-1x") {
        Some(Setting::Security8021xSetting(s)) => {
            assert_eq!(
                s.ca_cert,
                Some(CertValue::Path("/etc/pki/ca.pem".into()))
            );
        },
        other => panic!("expected 802-1x setting, got {other:?}"),
    }
    assert!(
        warnings
            .iter()
            .any(|w| w.severity == WarnSeverity::InfoMissingFile)
    );
    Ok(())
}

#[test]
fn test_relative_cert_path_resolves_against_base_dir() -> Result<()> {
    let (conn, warnings) =
        read_collecting("[802-1x]\nca-cert=tests/unit_tests/fixtures/ca.pem\n")?;

    match conn.get("802-1x") {
        Some(Setting::Security8021xSetting(s)) => match &s.ca_cert {
            Some(CertValue::Path(p)) => {
                assert!(p.is_absolute());
                assert!(p.ends_with("tests/unit_tests/fixtures/ca.pem"));
            },
            other => panic!("expected path cert, got {other:?}"),
        },
        other => panic!("expected 802-1x setting, got {other:?}"),
    }
    // The fixture exists, so no missing-file notice.
    assert!(
        !warnings
            .iter()
            .any(|w| w.severity == WarnSeverity::InfoMissingFile)
    );
    Ok(())
}

#[test]
fn test_cert_blob_and_pkcs11_schemes() -> Result<()> {
    let conn = read_text(
        "[802-1x]\nca-cert=data:;base64,aGVsbG8=\nclient-cert=pkcs11:token=foo;object=bar\n",
    )?;
    match conn.get("802-1x") {
        Some(Setting::Security8021xSetting(s)) => {
            assert_eq!(s.ca_cert, Some(CertValue::Blob(bytes::Bytes::from_static(b"hello"))));
            assert_eq!(
                s.client_cert,
                Some(CertValue::Pkcs11("pkcs11:token=foo;object=bar".to_string()))
            );
        },
        other => panic!("expected 802-1x setting, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_ssid_semicolon_unescaping() -> Result<()> {
    let conn = read_text("[wifi]\nssid=my\\;net\n")?;
    match conn.get("802-11-wireless") {
        Some(Setting::WirelessSetting(s)) => {
            assert_eq!(s.ssid.as_deref(), Some(b"my;net".as_slice()));
        },
        other => panic!("expected wireless setting, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_vpn_data_and_deferred_secrets() -> Result<()> {
    let conn = read_text(
        "[vpn]\nservice-type=org.foo\nfoo=bar\n[vpn-secrets]\npassword=s\n",
    )?;
    let vpn = conn.vpn().expect("vpn setting");
    assert_eq!(vpn.service_type.as_deref(), Some("org.foo"));
    assert_eq!(vpn.data.get("foo").map(String::as_str), Some("bar"));
    assert!(!vpn.data.contains_key("service-type"));
    assert_eq!(vpn.secrets.get("password").map(String::as_str), Some("s"));
    Ok(())
}

#[test]
fn test_indexed_address_ordering() -> Result<()> {
    let conn = read_text(
        "[ipv4]\nmethod=manual\naddress1=10.0.0.2/24\naddress=10.0.0.1/24\naddresses2=10.0.0.3/24\n",
    )?;
    let ip4 = ip4_of(&conn);
    let got: Vec<String> = ip4.addresses.iter().map(|a| a.address.to_string()).collect();
    assert_eq!(got, ["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    Ok(())
}

#[test]
fn test_ipv6_route_gateway_recovery() -> Result<()> {
    let conn = read_text("[ipv6]\nmethod=manual\nroute1=fe80::1/64,50\n")?;
    let ip6 = ip6_of(&conn);
    assert_eq!(ip6.routes.len(), 1);
    let route = &ip6.routes[0];
    assert_eq!(route.dest.to_string(), "fe80::1");
    assert_eq!(route.prefix, 64);
    assert_eq!(route.next_hop, None);
    assert_eq!(route.metric, 50);
    Ok(())
}

#[test]
fn test_missing_prefix_length_defaults_with_warning() -> Result<()> {
    let (conn, warnings) = read_collecting("[ipv4]\naddress1=10.1.2.3\n")?;
    let ip4 = ip4_of(&conn);
    assert_eq!(ip4.addresses[0].prefix, 24);
    assert!(
        warnings
            .iter()
            .any(|w| w.severity == WarnSeverity::Warn
                && w.message.contains("missing prefix length"))
    );
    Ok(())
}

#[test]
fn test_garbage_after_last_field_discards_line() -> Result<()> {
    let (conn, warnings) =
        read_collecting("[ipv4]\naddress1=10.0.0.1/24,10.0.0.254,99\n")?;
    let ip4 = ip4_of(&conn);
    assert!(ip4.addresses.is_empty());
    assert!(warnings.iter().any(|w| w.severity == WarnSeverity::Warn));
    Ok(())
}

#[test]
fn test_legacy_mac_integer_list() -> Result<()> {
    let conn = read_text("[802-3-ethernet]\nmac-address=0;17;34;170;187;204;\n")?;
    match conn.get("802-3-ethernet") {
        Some(Setting::WiredSetting(s)) => {
            assert_eq!(
                s.mac_address.as_deref(),
                Some([0x00, 0x11, 0x22, 0xAA, 0xBB, 0xCC].as_slice())
            );
        },
        other => panic!("expected wired setting, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_cloned_mac_special_token() -> Result<()> {
    let conn = read_text("[802-3-ethernet]\ncloned-mac-address=random\n")?;
    match conn.get("802-3-ethernet") {
        Some(Setting::WiredSetting(s)) => {
            assert_eq!(s.cloned_mac_address.as_deref(), Some("random"));
        },
        other => panic!("expected wired setting, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_id_and_uuid_synthesized_from_keyfile_name() -> Result<()> {
    let store = KeyfileStore::parse("[connection]\ntype=802-3-ethernet\n")?;
    let path = Path::new("/etc/profiles/office.nmconnection");
    let conn = read_connection(
        &store,
        ReadOptions {
            keyfile_name: Some(path),
            base_dir: None,
            handler: None,
        },
    )?;
    let c = conn.connection().expect("connection setting");
    assert_eq!(c.id.as_deref(), Some("office.nmconnection"));
    assert_eq!(
        c.uuid.as_deref(),
        Some(uuid_for_keyfile("/etc/profiles/office.nmconnection").as_str())
    );
    Ok(())
}

#[test]
fn test_connection_setting_is_created_when_absent() -> Result<()> {
    let conn = read_text("[ipv4]\nmethod=auto\n")?;
    assert!(conn.connection().is_some());
    Ok(())
}

#[test]
fn test_deprecated_interface_name_location() -> Result<()> {
    let conn = read_text(
        "[connection]\nid=bond0\ntype=bond\n[bond]\nmode=active-backup\ninterface-name=bond0\n",
    )?;
    let c = conn.connection().expect("connection setting");
    assert_eq!(c.interface_name.as_deref(), Some("bond0"));

    match conn.get("bond") {
        Some(Setting::BondSetting(s)) => {
            assert_eq!(s.options.get("mode").map(String::as_str), Some("active-backup"));
            assert!(!s.options.contains_key("interface-name"));
        },
        other => panic!("expected bond setting, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_connection_type_alias_is_canonicalized() -> Result<()> {
    let conn = read_text("[connection]\nid=x\ntype=ethernet\n")?;
    let c = conn.connection().expect("connection setting");
    assert_eq!(c.conn_type.as_deref(), Some("802-3-ethernet"));
    Ok(())
}

#[test]
fn test_unknown_group_warns_and_is_skipped() -> Result<()> {
    let (conn, warnings) = read_collecting("[frobnicator]\nx=1\n")?;
    assert!(conn.get("frobnicator").is_none());
    assert!(
        warnings
            .iter()
            .any(|w| w.severity == WarnSeverity::Warn
                && w.message.contains("invalid setting name"))
    );
    Ok(())
}

#[test]
fn test_user_data_keys_are_decoded() -> Result<()> {
    let conn = read_text("[user]\norg\\x2eexample\\x2ekey=v\n")?;
    match conn.get("user") {
        Some(Setting::UserSetting(s)) => {
            assert_eq!(s.data.get("org.example.key").map(String::as_str), Some("v"));
        },
        other => panic!("expected user setting, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_serial_parity_forms() -> Result<()> {
    use keyfile_codec_rs::settings::serial::SerialParity;
    let conn = read_text("[serial]\nparity=69\n")?;
    match conn.get("serial") {
        Some(Setting::SerialSetting(s)) => assert_eq!(s.parity, SerialParity::Even),
        other => panic!("expected serial setting, got {other:?}"),
    }
    let conn = read_text("[serial]\nparity=o\n")?;
    match conn.get("serial") {
        Some(Setting::SerialSetting(s)) => assert_eq!(s.parity, SerialParity::Odd),
        other => panic!("expected serial setting, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_sriov_and_tc_compound_keys() -> Result<()> {
    let conn = read_text(
        "[sriov]\ntotal-vfs=4\nvf.2=mac=00:11:22:33:44:55 trust=true\nvf.0=spoof-check=false\n\
         [tc]\nqdisc.root=fq_codel\ntfilter.1234:=matchall action simple\n",
    )?;
    match conn.get("sriov") {
        Some(Setting::SriovSetting(s)) => {
            assert_eq!(s.total_vfs, 4);
            let indexes: Vec<u32> = s.vfs.iter().map(|vf| vf.index).collect();
            assert_eq!(indexes, [0, 2]);
            assert_eq!(
                s.vfs[1].attributes.get("mac").map(String::as_str),
                Some("00:11:22:33:44:55")
            );
        },
        other => panic!("expected sriov setting, got {other:?}"),
    }
    match conn.get("tc") {
        Some(Setting::TcSetting(s)) => {
            assert_eq!(s.qdiscs.len(), 1);
            assert_eq!(s.qdiscs[0].parent, "root");
            assert_eq!(s.qdiscs[0].kind, "fq_codel");
            assert_eq!(s.tfilters.len(), 1);
            assert_eq!(s.tfilters[0].parent, "1234:");
            assert_eq!(s.tfilters[0].spec, "matchall action simple");
        },
        other => panic!("expected tc setting, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_dns_family_validation() -> Result<()> {
    let (conn, warnings) =
        read_collecting("[ipv4]\ndns=8.8.8.8;2001:db8::1;not-an-ip;\n")?;
    let ip4 = ip4_of(&conn);
    assert_eq!(ip4.dns, ["8.8.8.8"]);
    assert_eq!(
        warnings
            .iter()
            .filter(|w| w.message.contains("invalid DNS server"))
            .count(),
        2
    );
    Ok(())
}

#[test]
fn test_addr_gen_mode_read() -> Result<()> {
    use keyfile_codec_rs::settings::ip::AddrGenMode;
    let conn = read_text("[ipv6]\nmethod=auto\naddr-gen-mode=stable-privacy\n")?;
    assert_eq!(ip6_of(&conn).addr_gen_mode, AddrGenMode::StablePrivacy);

    // Absent key leaves the default.
    let conn = read_text("[ipv6]\nmethod=auto\n")?;
    assert_eq!(ip6_of(&conn).addr_gen_mode, AddrGenMode::Eui64);

    // Invalid value warns and keeps the default.
    let (conn, warnings) = read_collecting("[ipv6]\nmethod=auto\naddr-gen-mode=bogus\n")?;
    assert_eq!(ip6_of(&conn).addr_gen_mode, AddrGenMode::Eui64);
    assert!(warnings.iter().any(|w| w.message.contains("addr-gen-mode")));
    Ok(())
}
