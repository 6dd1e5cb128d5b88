use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// ProbTutor: a probability and statistics tutor for the terminal.
#[derive(Parser, Debug)]
#[command(name = "probtutor", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. debug, probtutor_ai=trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Chat with the tutor (default).
    Chat,
    /// Ask questions about the lecture document.
    Ask {
        /// Document to index instead of `[docqa].document`.
        #[arg(long)]
        document: Option<PathBuf>,
        /// Print the retrieved context after each answer.
        #[arg(long)]
        show_context: bool,
        /// Answer this one question and exit; omit for an interactive loop.
        question: Option<String>,
    },
    /// Run one canned question against a fresh session.
    Probe {
        #[arg(value_enum)]
        kind: ProbeKind,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// A binomial probability calculation.
    Calc,
    /// A standard normal distribution plot.
    Chart,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_chat() {
        let args = Args::try_parse_from(["probtutor"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    fn ask_with_question_and_flags() {
        let args = Args::try_parse_from([
            "probtutor",
            "ask",
            "--document",
            "notes.txt",
            "--show-context",
            "What is a p-value?",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Some(Command::Ask {
                document: Some(PathBuf::from("notes.txt")),
                show_context: true,
                question: Some("What is a p-value?".into()),
            })
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "probtutor",
            "probe",
            "chart",
            "--log-level",
            "debug",
            "--config",
            "/tmp/p.toml",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Some(Command::Probe {
                kind: ProbeKind::Chart
            })
        );
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/p.toml")));
    }

    #[test]
    fn unknown_probe_kind_is_rejected() {
        assert!(Args::try_parse_from(["probtutor", "probe", "essay"]).is_err());
    }
}
