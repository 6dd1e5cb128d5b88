//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    let config = ProbTutorConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_odd_history_bound() {
    let mut config = ProbTutorConfig::default();
    config.history.max_entries = 51;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("history.max_entries = 51 must be even"));
}

#[test]
fn catches_history_bound_too_small() {
    let mut config = ProbTutorConfig::default();
    config.history.max_entries = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("history.max_entries"));
}

#[test]
fn catches_zero_poll_interval() {
    let mut config = ProbTutorConfig::default();
    config.polling.interval_ms = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("polling.interval_ms"));
}

#[test]
fn catches_shrinking_backoff() {
    let mut config = ProbTutorConfig::default();
    config.polling.backoff_factor = 0.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("polling.backoff_factor"));
}

#[test]
fn catches_max_interval_below_interval() {
    let mut config = ProbTutorConfig::default();
    config.polling.max_interval_ms = 500;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("polling.max_interval_ms"));
}

#[test]
fn catches_inverted_input_bounds() {
    let mut config = ProbTutorConfig::default();
    config.console.min_input_chars = 10;
    config.console.max_input_chars = 5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("console.max_input_chars"));
}

#[test]
fn catches_overlap_not_smaller_than_chunk() {
    let mut config = ProbTutorConfig::default();
    config.docqa.chunk_overlap = 1000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("docqa.chunk_overlap"));
}

#[test]
fn catches_blank_model() {
    let mut config = ProbTutorConfig::default();
    config.assistant.model = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("assistant.model must not be empty"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = ProbTutorConfig::default();
    config.history.max_entries = 3;
    config.docqa.top_k = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("history.max_entries"));
    assert!(err.contains("docqa.top_k"));
    assert!(err.contains("; "));
}
