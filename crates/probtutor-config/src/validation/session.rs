//! Validation for the tutoring session sections: assistant, polling,
//! history and console.

use crate::schema::ProbTutorConfig;

use super::helpers::{validate_not_blank, validate_range, validate_range_f64};

pub(crate) fn validate_assistant(errors: &mut Vec<String>, config: &ProbTutorConfig) {
    let assistant = &config.assistant;
    validate_not_blank(errors, "assistant.name", &assistant.name);
    validate_not_blank(errors, "assistant.model", &assistant.model);
    validate_not_blank(errors, "assistant.api_base", &assistant.api_base);
    validate_range(
        errors,
        "assistant.request_timeout_secs",
        u64::from(assistant.request_timeout_secs),
        5,
        600,
    );
    if let Some(id) = &assistant.assistant_id {
        validate_not_blank(errors, "assistant.assistant_id", id);
    }
}

pub(crate) fn validate_polling(errors: &mut Vec<String>, config: &ProbTutorConfig) {
    let polling = &config.polling;
    validate_range(errors, "polling.interval_ms", polling.interval_ms, 1, 60_000);
    validate_range(errors, "polling.max_wait_secs", polling.max_wait_secs, 1, 3600);
    validate_range_f64(errors, "polling.backoff_factor", polling.backoff_factor, 1.0, 4.0);
    if polling.max_interval_ms < polling.interval_ms {
        errors.push(format!(
            "polling.max_interval_ms = {} is below polling.interval_ms = {}",
            polling.max_interval_ms, polling.interval_ms
        ));
    }
}

pub(crate) fn validate_history(errors: &mut Vec<String>, config: &ProbTutorConfig) {
    let max = config.history.max_entries;
    validate_range(errors, "history.max_entries", max as u64, 2, 10_000);
    if max % 2 != 0 {
        errors.push(format!("history.max_entries = {max} must be even"));
    }
}

pub(crate) fn validate_console(errors: &mut Vec<String>, config: &ProbTutorConfig) {
    let console = &config.console;
    validate_range(
        errors,
        "console.min_input_chars",
        console.min_input_chars as u64,
        1,
        100,
    );
    if console.max_input_chars < console.min_input_chars {
        errors.push(format!(
            "console.max_input_chars = {} is below console.min_input_chars = {}",
            console.max_input_chars, console.min_input_chars
        ));
    }
}
