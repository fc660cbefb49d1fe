// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SecureChat configuration system.

use std::io::Write;
use std::time::Duration;

use securechat_config::diagnostic::ConfigError;
use securechat_config::model::SecureChatConfig;
use securechat_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[logging]
level = "debug"

[availability]
messaging_media = "text"

[sync]
unread_count_timeout_ms = 1500
mark_read_delay_ms = 2000

[transfer]
max_uploads = 2
max_file_size_bytes = 1024
max_concurrent_downloads = 1
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.availability.messaging_media, "text");
    assert_eq!(config.sync.unread_count_timeout(), Duration::from_millis(1500));
    assert_eq!(config.sync.mark_read_delay(), Duration::from_secs(2));
    assert_eq!(config.transfer.max_uploads, 2);
    assert_eq!(config.transfer.max_file_size_bytes, 1024);
    assert_eq!(config.transfer.max_concurrent_downloads, 1);
}

/// Omitted sections fall back to compiled defaults.
#[test]
fn partial_config_keeps_defaults() {
    let config = load_config_from_str("[transfer]\nmax_uploads = 5\n").expect("should parse");
    let defaults = SecureChatConfig::default();

    assert_eq!(config.transfer.max_uploads, 5);
    assert_eq!(config.sync, defaults.sync);
    assert_eq!(
        config.transfer.max_file_size_bytes,
        defaults.transfer.max_file_size_bytes
    );
    assert_eq!(config.sync.unread_count_timeout(), Duration::from_secs(3));
}

/// Unknown keys become diagnostics with a suggestion.
#[test]
fn unknown_key_produces_suggestion() {
    let toml = "[sync]\nunread_count_timout_ms = 10\n";

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "unread_count_timout_ms");
            assert_eq!(suggestion.as_deref(), Some("unread_count_timeout_ms"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level sections are rejected too.
#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telemetry]\nenabled = true\n")
        .expect_err("unknown section should be rejected");
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

/// Wrong value types surface as InvalidType.
#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[transfer]\nmax_uploads = \"lots\"\n")
        .expect_err("string for integer should be rejected");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "expected InvalidType, got: {errors:?}"
    );
}

/// Semantically invalid values pass deserialization but fail validation.
#[test]
fn zero_upload_limit_fails_validation() {
    let errors = load_and_validate_str("[transfer]\nmax_uploads = 0\n")
        .expect_err("zero uploads should be rejected");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("transfer.max_uploads"));
}

/// Loading from an explicit path reads the file.
#[test]
fn load_from_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[availability]\nmessaging_media = \"messaging\"").unwrap();
    writeln!(file, "[transfer]\nmax_concurrent_downloads = 2").unwrap();

    let config = load_and_validate_path(file.path()).expect("file config should load");
    assert_eq!(config.transfer.max_concurrent_downloads, 2);
}

/// Typos in an explicit file still get a suggestion.
#[test]
fn load_from_path_suggests_fix() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[logging]\nlevl = \"info\"").unwrap();

    let errors = load_and_validate_path(file.path()).expect_err("typo should be rejected");
    assert!(
        errors.iter().any(|e| matches!(e, ConfigError::UnknownKey { key, suggestion, .. } if {
            key == "levl" && suggestion.as_deref() == Some("level")
        })),
        "should suggest `level`, got: {errors:?}"
    );
}
