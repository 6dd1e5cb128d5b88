//! Console front-end configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Inputs shorter than this (in characters) are rejected.
    pub min_input_chars: usize,
    /// Inputs longer than this (in characters) are rejected.
    pub max_input_chars: usize,
    /// Where images returned by the code-execution tool are written.
    pub image_dir: PathBuf,
    /// Render run polling progress while waiting.
    pub show_progress: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            min_input_chars: 3,
            max_input_chars: 1000,
            image_dir: PathBuf::from("probtutor-images"),
            show_progress: true,
        }
    }
}
