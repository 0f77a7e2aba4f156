//! Session setup tests
//!
//! Covers:
//! - Building the parameter table from a handshake
//! - Skipping mismatched entries and stopping at framing errors
//! - Time zone and charset derivation, including their caching
//! - Loading parameters through `ServerConfig`

use plcsql_protocol::{DecodeError, Packer, ValueTag, WireValue};
use plcsql_server::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn string_param(id: SysParamId, value: &str) -> SysParam {
    SysParam::new(id.id(), WireValue::String(value.into()))
}

fn handshake(params: &[SysParam]) -> Vec<u8> {
    let mut packer = Packer::new();
    for param in params {
        packer.pack(param);
    }
    packer.into_bytes()
}

fn environment(params: &[SysParam]) -> ServerEnvironment {
    ServerEnvironment::new(SysParamTable::unpack(&handshake(params)))
}

#[test]
fn test_mismatched_entry_is_skipped() {
    let mut packer = Packer::new();
    packer.pack(&SysParam::new(95, WireValue::Int(1)));
    packer.pack(&string_param(SysParamId::IntlNumberLang, "ko_KR"));
    // declared STRING, carries INTEGER
    packer
        .pack_int(ValueTag::String.code())
        .pack_int(SysParamId::Timezone.id())
        .pack_value(&WireValue::Int(9));
    packer.pack(&string_param(SysParamId::IntlCollation, "utf8_bin"));
    packer.pack(&SysParam::new(334, WireValue::Int(0)));

    let table = SysParamTable::unpack(packer.as_bytes());

    let ids: Vec<i32> = table.iter().map(SysParam::id).collect();
    assert_eq!(ids, vec![95, 193, 206, 334]);
    assert!(table.get(SysParamId::Timezone.id()).is_none());

    let rejected = table.rejected();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].index, 2);
    assert_eq!(rejected[0].param_id, Some(249));
    assert!(matches!(
        rejected[0].error,
        DecodeError::TypeMismatch { expected: 4, found: 1, .. }
    ));
}

#[test]
fn test_unknown_value_tag_is_skipped() {
    let mut packer = Packer::new();
    packer.pack_int(77).pack_int(500).pack_raw_value(77, b"opaque");
    packer.pack(&string_param(SysParamId::IntlDateLang, "en_US"));

    let table = SysParamTable::unpack(packer.as_bytes());
    assert_eq!(table.len(), 1);
    assert_eq!(table.date_lang(), Some("en_US"));
    assert_eq!(table.rejected()[0].param_id, Some(500));
}

#[test]
fn test_framing_error_keeps_decoded_prefix() {
    let mut bytes = handshake(&[
        string_param(SysParamId::Timezone, "Asia/Seoul"),
        string_param(SysParamId::IntlNumberLang, "de_DE"),
    ]);
    let mut tail = Packer::new();
    tail.pack_int(ValueTag::String.code())
        .pack_int(SysParamId::IntlCollation.id())
        .pack_int(ValueTag::String.code())
        .pack_int(64);
    bytes.extend(tail.into_bytes());
    bytes.extend_from_slice(b"utf8");

    let table = SysParamTable::unpack(&bytes);
    assert_eq!(table.len(), 2);
    assert_eq!(table.number_lang(), Some("de_DE"));
    assert_eq!(table.rejected().len(), 1);
    assert!(!table.rejected()[0].error.is_recoverable());
}

#[test]
fn test_negative_length_stops_decoding() {
    let mut packer = Packer::new();
    packer.pack(&SysParam::new(95, WireValue::Int(1)));
    packer.pack_int(4).pack_int(249).pack_int(4).pack_int(-1);
    packer.pack(&SysParam::new(100, WireValue::Int(1)));

    let table = SysParamTable::unpack(packer.as_bytes());
    assert!(table.oracle_style_empty_string());
    // entries after a framing error are never reached
    assert!(!table.compat_numeric_division_scale());
    assert!(matches!(
        table.rejected()[0].error,
        DecodeError::InvalidLength { length: -1, .. }
    ));
}

#[test]
fn test_repeated_id_keeps_later_value() {
    let table = SysParamTable::unpack(&handshake(&[
        string_param(SysParamId::Timezone, "UTC"),
        string_param(SysParamId::IntlCollation, "utf8_bin"),
        string_param(SysParamId::Timezone, "Europe/Paris"),
    ]));
    assert_eq!(table.len(), 2);
    assert_eq!(table.value_str(SysParamId::Timezone), Some("Europe/Paris"));
}

#[test]
fn test_empty_handshake() {
    let table = SysParamTable::unpack(&[]);
    assert!(table.is_empty());
    assert!(table.rejected().is_empty());
}

#[test]
fn test_time_zone_defaults_to_utc_and_is_cached() {
    let mut env = ServerEnvironment::new(SysParamTable::new());
    let first = *env.time_zone();
    assert_eq!(first, ServerTimeZone::UTC);

    env.parameters_mut()
        .insert(string_param(SysParamId::Timezone, "Asia/Seoul"));
    assert_eq!(*env.time_zone(), first);
    assert!(std::ptr::eq(env.time_zone(), env.time_zone()));
}

#[rstest]
#[case("Asia/Seoul", "Asia/Seoul")]
#[case("America/New_York", "America/New_York")]
#[case("+09:00", "+09:00")]
#[case("not a zone", "UTC")]
#[case("", "UTC")]
fn test_time_zone(#[case] param: &str, #[case] expected: &str) {
    let env = environment(&[string_param(SysParamId::Timezone, param)]);
    assert_eq!(env.time_zone().to_string(), expected);
}

#[test]
fn test_non_string_time_zone_falls_back_to_utc() {
    let env = environment(&[SysParam::new(249, WireValue::Int(9))]);
    assert_eq!(*env.time_zone(), ServerTimeZone::UTC);
}

#[rstest]
#[case("xyz_unknowncs", "utf-8", encoding_rs::UTF_8)]
#[case("utf8_bin", "utf8", encoding_rs::UTF_8)]
#[case("euckr_bin", "euckr", encoding_rs::EUC_KR)]
#[case("iso88591_en_cs", "iso88591", encoding_rs::WINDOWS_1252)]
fn test_charset_string(
    #[case] collation: &str,
    #[case] expected: &str,
    #[case] encoding: &'static encoding_rs::Encoding,
) {
    let env = environment(&[string_param(SysParamId::IntlCollation, collation)]);
    assert_eq!(env.charset_string(), expected);
    assert_eq!(env.encoding(), encoding);
}

#[test]
fn test_charset_without_collation() {
    let env = ServerEnvironment::default();
    assert_eq!(env.charset_string(), DEFAULT_CHARSET);
    assert_eq!(env.encoding(), encoding_rs::UTF_8);
}

#[test]
fn test_charset_is_cached() {
    let mut env = environment(&[string_param(SysParamId::IntlCollation, "euckr_bin")]);
    assert_eq!(env.charset_string(), "euckr");
    env.parameters_mut().remove(SysParamId::IntlCollation.id());
    assert_eq!(env.charset_string(), "euckr");
}

#[test]
fn test_config_loads_fresh_environment() {
    let mut config = ServerConfig::new("demodb", "11.4", "/opt/cubrid", "/data/demodb", "5500");
    assert_eq!(config.time_zone(), &ServerTimeZone::UTC);

    config.load_system_parameters(&handshake(&[
        string_param(SysParamId::Timezone, "Asia/Tokyo"),
        string_param(SysParamId::IntlCollation, "utf8_ko_cs"),
        SysParam::new(95, WireValue::Int(1)),
    ]));

    assert_eq!(config.time_zone().to_string(), "Asia/Tokyo");
    assert_eq!(config.charset_string(), "utf8");
    assert!(config.system_parameters().oracle_style_empty_string());
    assert_eq!(config.socket_type(), SocketType::Tcp);
}
