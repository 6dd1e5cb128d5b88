//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_probtutor_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, probtutor_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[assistant]
model = "gpt-4o-mini"
assistant_id = "asst_123"

[console]
max_input_chars = 500
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.assistant.model, "gpt-4o-mini");
    assert_eq!(config.assistant.assistant_id.as_deref(), Some("asst_123"));
    assert_eq!(config.console.max_input_chars, 500);
    // Defaults preserved
    assert_eq!(config.assistant.name, "ProbTutor");
    assert_eq!(config.console.min_input_chars, 3);
    assert_eq!(config.polling.max_wait_secs, 60);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, probtutor_common::ConfigError::ParseError(_)));
}

#[test]
fn load_config_with_invalid_values_keeps_parsed_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[history]\nmax_entries = 7\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.history.max_entries, 7);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("probtutor").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.assistant.name, "ProbTutor");
    assert_eq!(config.polling.interval_ms, 2000);
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_template_is_fully_commented() {
    let parsed: crate::schema::ProbTutorConfig =
        toml::from_str(template::default_config_toml()).unwrap();
    assert_eq!(parsed.history.max_entries, 50);
}

#[test]
fn default_config_path_ends_with_probtutor() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("probtutor/config.toml"));
    }
}
