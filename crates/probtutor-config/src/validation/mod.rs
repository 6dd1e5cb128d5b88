//! Full configuration validation.
//!
//! Each domain has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod docqa;
mod helpers;
mod session;

#[cfg(test)]
mod tests;

use crate::schema::ProbTutorConfig;
use probtutor_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ProbTutorConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    session::validate_assistant(&mut errors, config);
    session::validate_polling(&mut errors, config);
    session::validate_history(&mut errors, config);
    session::validate_console(&mut errors, config);
    docqa::validate_docqa(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
