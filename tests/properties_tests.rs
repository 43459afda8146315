// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for loading, querying and modifying properties.

use hexvalues::adapters::StaticSymbolTable;
use hexvalues::domain::{SecretVault, TypeHandle, TypedValue, ValuesError};
use hexvalues::service::{
    ModifiableProperties, ParsedProperty, Properties, PropertyValue, TypeParser,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const INI: &str = r#"
; application settings
[scalar]
stringValue = This is a string
intValue = 303
floatValue = 3.13
boolValue = yes
nullValue = null

[array]
list = [foo|bar|baz]
hash = [foo:bar|baz:qux]
range = 1..5

[empty]

[db]
host = "localhost"
password = 'hunter2'
"#;

fn vault() -> SecretVault {
    SecretVault::new_named("base64").unwrap()
}

fn load() -> Properties {
    Properties::builder()
        .with_vault(vault())
        .parse_string(INI)
        .unwrap()
}

fn temp_ini(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_sections_and_keys() {
    let properties = load();

    assert_eq!(properties.len(), 4);
    assert_eq!(
        properties.section_names(),
        vec!["scalar", "array", "empty", "db"]
    );
    assert!(properties.contain_section("empty"));
    assert!(!properties.contain_section("missing"));
    assert!(properties.section("empty").unwrap().is_empty());
    assert_eq!(
        properties.keys_for_section("scalar"),
        vec!["stringValue", "intValue", "floatValue", "boolValue", "nullValue"]
    );
    assert!(properties.keys_for_section("missing").is_empty());
}

#[test]
fn test_raw_values() {
    let properties = load();

    assert!(properties.contain_value("scalar", "intValue"));
    assert!(!properties.contain_value("scalar", "missing"));
    assert!(!properties.contain_value("missing", "intValue"));
    assert_eq!(
        properties.value("scalar", "stringValue").unwrap(),
        &"This is a string"
    );
    assert_eq!(properties.value("db", "host").unwrap(), &"localhost");
    assert_eq!(properties.value("scalar", "missing"), None);
}

#[test]
fn test_parse_value_recognizes_types() {
    let properties = load();
    let parsed = |section, key| {
        properties
            .parse_value(section, key)
            .unwrap()
            .and_then(ParsedProperty::into_value)
    };

    assert_eq!(parsed("scalar", "intValue"), Some(TypedValue::Int(303)));
    assert_eq!(parsed("scalar", "floatValue"), Some(TypedValue::Float(3.13)));
    assert_eq!(parsed("scalar", "boolValue"), Some(TypedValue::Bool(true)));
    assert_eq!(parsed("scalar", "nullValue"), Some(TypedValue::Null));
    assert_eq!(
        parsed("array", "list"),
        Some(TypedValue::from(vec!["foo", "bar", "baz"]))
    );
    assert_eq!(
        parsed("array", "range"),
        Some(TypedValue::from(vec![1, 2, 3, 4, 5]))
    );
    assert_eq!(parsed("array", "missing"), None);
}

#[test]
fn test_parse_accessors() {
    let properties = load();

    assert_eq!(properties.parse("scalar", "intValue").unwrap().as_int().unwrap(), Some(303));
    assert_eq!(
        properties.parse("scalar", "boolValue").unwrap().as_bool().unwrap(),
        Some(true)
    );
    assert_eq!(
        properties
            .parse("array", "hash")
            .unwrap()
            .as_map()
            .unwrap()
            .map(|m| m.len()),
        Some(2)
    );
    assert_eq!(
        properties
            .parse("scalar", "missing")
            .unwrap()
            .defaulting_to(8080)
            .as_int()
            .unwrap(),
        Some(8080)
    );
}

#[test]
fn test_password_becomes_secret() {
    let properties = load();

    let value = properties.value("db", "password").unwrap();
    assert!(value.is_secret());
    assert_eq!(value.to_string(), "[REDACTED]");
    assert_eq!(
        value.as_secret().unwrap().unveil().unwrap().as_deref(),
        Some("hunter2")
    );
    assert!(!format!("{:?}", properties).contains("hunter2"));
}

#[test]
fn test_parse_of_password_is_refused() {
    let properties = load();

    let err = properties.parse("db", "password").unwrap_err();
    assert!(matches!(err, ValuesError::Logic { .. }));
    assert_eq!(err.to_string(), "Logic error: Can not parse fields with passwords");

    match properties.parse_value("db", "password").unwrap() {
        Some(ParsedProperty::Secret(secret)) => {
            assert_eq!(secret.unveil().unwrap().as_deref(), Some("hunter2"))
        }
        other => panic!("expected a secret, got {:?}", other),
    }
}

#[test]
fn test_keys_ending_in_password_are_secret() {
    let properties = Properties::builder()
        .with_vault(vault())
        .parse_string("[mail]\nsmtp.password = s3cret\npassword_hint = none")
        .unwrap();

    assert!(properties.value("mail", "smtp.password").unwrap().is_secret());
    assert!(!properties.value("mail", "password_hint").unwrap().is_secret());
}

#[test]
fn test_empty_password_is_rejected() {
    let result = Properties::builder()
        .with_vault(vault())
        .parse_string("[db]\npassword =");

    assert!(matches!(result, Err(ValuesError::InvalidArgument { .. })));
}

#[test]
fn test_invalid_string_is_rejected() {
    let err = Properties::builder()
        .with_vault(vault())
        .parse_string("[broken\nkey = value")
        .unwrap_err();

    assert!(matches!(err, ValuesError::InvalidArgument { .. }));
    assert!(err
        .to_string()
        .starts_with("Invalid argument: Property string contains errors and can not be parsed: "));
}

#[test]
fn test_from_file() {
    let file = temp_ini(INI);
    let properties = Properties::builder()
        .with_vault(vault())
        .read_file(file.path())
        .unwrap();

    assert_eq!(properties.len(), 4);
    assert_eq!(properties.value("scalar", "intValue").unwrap(), &"303");
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.ini");

    let err = Properties::from_file(&path).unwrap_err();
    assert!(matches!(err, ValuesError::InvalidArgument { .. }));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_from_file_with_errors() {
    let file = temp_ini("[ok]\nno equals sign here\n");

    let err = Properties::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ValuesError::FileFormat { .. }));
}

#[test]
fn test_from_file_with_invalid_utf8() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[app]\nname = caf\xe9\n").unwrap();

    let err = Properties::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ValuesError::FileFormat { .. }));
}

#[test]
fn test_huge_range_value_parses_to_empty_list() {
    let properties = Properties::builder()
        .with_vault(vault())
        .parse_string("[app]\nversion = version 1..1e999\nids = 1..9223372036854775807")
        .unwrap();

    for key in ["version", "ids"] {
        assert_eq!(
            properties
                .parse_value("app", key)
                .unwrap()
                .and_then(ParsedProperty::into_value),
            Some(TypedValue::List(vec![]))
        );
    }
}

#[test]
fn test_merge_replaces_whole_sections() {
    let vault = vault();
    let base = Properties::builder()
        .with_vault(vault.clone())
        .parse_string("[a]\nx = 1\ny = 2\n[b]\nz = 3")
        .unwrap();
    let other = Properties::builder()
        .with_vault(vault)
        .parse_string("[a]\nx = 10\n[c]\nw = 4")
        .unwrap();

    let merged = base.merge(&other).unwrap();

    assert_eq!(merged.section_names(), vec!["a", "b", "c"]);
    assert_eq!(merged.keys_for_section("a"), vec!["x"]);
    assert_eq!(merged.value("a", "x").unwrap(), &"10");
    assert_eq!(base.value("a", "y").unwrap(), &"2");
}

#[test]
fn test_merge_keeps_secrets() {
    let vault = vault();
    let base = Properties::builder()
        .with_vault(vault.clone())
        .parse_string("[db]\npassword = first")
        .unwrap();
    let other = Properties::builder()
        .with_vault(vault.clone())
        .parse_string("[cache]\npassword = second")
        .unwrap();

    let merged = base.merge(&other).unwrap();
    let original = base.value("db", "password").unwrap().as_secret().unwrap();
    let carried = merged.value("db", "password").unwrap().as_secret().unwrap();

    assert!(original.ptr_eq(carried));
    assert_eq!(vault.stored(), 2);
}

#[test]
fn test_iteration_in_order() {
    let properties = load();

    let names: Vec<&str> = properties.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["scalar", "array", "empty", "db"]);

    let mut count = 0;
    for (_, section) in &properties {
        count += section.len();
    }
    assert_eq!(count, 10);
}

#[test]
fn test_explicit_parser_resolves_symbols() {
    let parser = TypeParser::builder()
        .with_symbols(StaticSymbolTable::new().with_class("app\\Mailer"))
        .build();
    let properties = Properties::builder()
        .with_parser(Arc::new(parser))
        .with_vault(vault())
        .parse_string("[mail]\nmailer = app\\Mailer.class")
        .unwrap();

    assert_eq!(
        properties.parse("mail", "mailer").unwrap().as_class().unwrap(),
        Some(TypeHandle::class("app\\Mailer"))
    );
}

#[test]
fn test_symbols_installed_after_loading_are_used() {
    let parser = Arc::new(TypeParser::new());
    let properties = Properties::builder()
        .with_parser(Arc::clone(&parser))
        .with_vault(vault())
        .parse_string("[app]\ntimeout = APP_TIMEOUT")
        .unwrap();
    let timeout = |properties: &Properties| {
        properties
            .parse_value("app", "timeout")
            .unwrap()
            .and_then(ParsedProperty::into_value)
    };
    assert_eq!(timeout(&properties), Some(TypedValue::from("APP_TIMEOUT")));

    parser.set_symbols(Arc::new(
        StaticSymbolTable::new().with_constant("APP_TIMEOUT", 30),
    ));

    assert_eq!(timeout(&properties), Some(TypedValue::Int(30)));
}

#[test]
fn test_modifiable_scenario() {
    let mut properties = ModifiableProperties::from_raw(Default::default()).unwrap();
    properties
        .set_value("net", "host", "example.com")
        .set_boolean_value("net", "secure", true)
        .set_array_value("net", "mirrors", ["a.example.com", "b.example.com"])
        .set_range_value("net", "ports", &[8080, 8081]);

    assert_eq!(properties.value("net", "host").unwrap(), &"example.com");
    assert_eq!(
        properties.parse("net", "secure").unwrap().as_bool().unwrap(),
        Some(true)
    );
    assert_eq!(
        properties
            .parse_value("net", "ports")
            .unwrap()
            .and_then(ParsedProperty::into_value),
        Some(TypedValue::from(vec![8080, 8081]))
    );
    assert_eq!(
        properties.parse("net", "mirrors").unwrap().as_list().unwrap(),
        Some(vec!["a.example.com".to_string(), "b.example.com".to_string()])
    );
}

#[test]
fn test_modifiable_from_string_and_freeze() {
    let mut properties = ModifiableProperties::from_string("[app]\nname = demo").unwrap();
    properties.set_section(
        "db",
        [
            ("user", PropertyValue::from("admin")),
            ("password", PropertyValue::from("hunter2")),
        ],
    );

    assert!(!properties.value("db", "password").unwrap().is_secret());

    let frozen = properties.unmodifiable().unwrap();
    assert_eq!(frozen.value("app", "name").unwrap(), &"demo");
    assert!(frozen.value("db", "password").unwrap().is_secret());
}
