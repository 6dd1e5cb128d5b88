//! Hosted assistant configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_INSTRUCTIONS: &str = "\
You are ProbTutor, a friendly tutor who explains first-year university probability.

Core duties:
1. Explain probability concepts: definitions, formulas, components and concrete examples.
2. Solve problems: use the code interpreter for exact numeric calculation.
3. Visualise: draw graphs, charts and distributions with matplotlib.
4. Teach interactively: keep a kind tone matched to the learner's level.

Rules:
- Explain probability concepts clearly and simply.
- Write Python code to perform exact calculations.
- Use matplotlib to produce visualisations.
- Stay kind and educational.
- Adjust the depth of explanation to the learner.";

/// Settings for creating (or reusing) the hosted assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub name: String,
    pub model: String,
    pub instructions: String,
    /// Enable the hosted code-execution tool.
    pub code_interpreter: bool,
    /// Reuse an existing hosted assistant instead of creating one per process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    pub api_base: String,
    /// Per-request HTTP timeout in seconds (valid range: 5-600).
    pub request_timeout_secs: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "ProbTutor".into(),
            model: "gpt-4o".into(),
            instructions: DEFAULT_INSTRUCTIONS.into(),
            code_interpreter: true,
            assistant_id: None,
            api_base: "https://api.openai.com/v1".into(),
            request_timeout_secs: 120,
        }
    }
}
