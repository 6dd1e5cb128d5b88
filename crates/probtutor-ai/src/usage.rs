//! Token usage reported by completed runs.
//!
//! Totals span every thread the manager has used, so `/new` does not
//! reset them.

use crate::types::RunUsage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageTracker {
    total: RunUsage,
    runs: u64,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, usage: &RunUsage) {
        self.total.prompt_tokens = self.total.prompt_tokens.saturating_add(usage.prompt_tokens);
        self.total.completion_tokens = self
            .total
            .completion_tokens
            .saturating_add(usage.completion_tokens);
        self.runs += 1;
    }

    pub fn total(&self) -> RunUsage {
        self.total
    }

    /// Runs that reported usage.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// e.g. `2 run(s), 240 prompt + 60 completion = 300 tokens`
    pub fn summary(&self) -> String {
        format!(
            "{} run(s), {} prompt + {} completion = {} tokens",
            self.runs,
            self.total.prompt_tokens,
            self.total.completion_tokens,
            self.total.total_tokens()
        )
    }
}
