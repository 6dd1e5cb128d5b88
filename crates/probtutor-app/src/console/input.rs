//! Classification of raw console lines.

/// Words that end the conversation, compared case-insensitively.
pub const TERMINATION_TOKENS: [&str; 5] = ["quit", "exit", "q", "종료", "끝"];

pub fn is_termination(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    TERMINATION_TOKENS.iter().any(|token| *token == input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    History,
    New,
    Usage,
    Help,
}

impl ConsoleCommand {
    fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "/history" => Some(Self::History),
            "/new" => Some(Self::New),
            "/usage" => Some(Self::Usage),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputDecision<'a> {
    Empty,
    Quit,
    Command(ConsoleCommand),
    TooShort { len: usize, min: usize },
    TooLong { len: usize, max: usize },
    /// A question to send, trimmed.
    Accept(&'a str),
}

/// Length bounds for questions, counted in characters after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputGate {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for InputGate {
    fn default() -> Self {
        Self {
            min_chars: 3,
            max_chars: 1000,
        }
    }
}

impl InputGate {
    pub fn new(min_chars: usize, max_chars: usize) -> Self {
        Self {
            min_chars,
            max_chars,
        }
    }

    pub fn classify<'a>(&self, raw: &'a str) -> InputDecision<'a> {
        let input = raw.trim();
        if input.is_empty() {
            return InputDecision::Empty;
        }
        if is_termination(input) {
            return InputDecision::Quit;
        }
        if let Some(command) = ConsoleCommand::parse(input) {
            return InputDecision::Command(command);
        }

        let len = input.chars().count();
        if len < self.min_chars {
            InputDecision::TooShort {
                len,
                min: self.min_chars,
            }
        } else if len > self.max_chars {
            InputDecision::TooLong {
                len,
                max: self.max_chars,
            }
        } else {
            InputDecision::Accept(input)
        }
    }
}
