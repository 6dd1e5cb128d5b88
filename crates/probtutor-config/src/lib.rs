//! ProbTutor configuration system.
//!
//! Provides TOML-based configuration with full validation. All config
//! sections use sensible defaults so partial configs work out of the box.
//! Secrets never live in the file: the API key comes from the environment.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use probtutor_config::{load_config, config_to_toml};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_toml(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ProbTutorConfig, CONFIG_SCHEMA_VERSION};
pub use toml_loader::{default_config_path, load_default, load_from_path};

use std::path::Path;

use probtutor_common::ConfigError;

/// Load config from `path` when given, otherwise from the platform default
/// path (creating a commented default file there if none exists).
pub fn load_config(path: Option<&Path>) -> Result<ProbTutorConfig, ConfigError> {
    match path {
        Some(path) => load_from_path(path),
        None => load_default(),
    }
}

/// Serialize a config to a pretty-printed TOML string.
pub fn config_to_toml(config: &ProbTutorConfig) -> String {
    toml::to_string_pretty(config)
        .unwrap_or_else(|e| format!("# failed to serialize config: {e}\n"))
}
