mod boot;
mod cli;
mod commands;
mod console;

use std::process::ExitCode;

use cli::Command;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file before anything reads the environment
    boot::load_env();

    let args = cli::parse();

    let (config, config_err) = boot::load_config(args.config.as_deref());
    boot::init_logging(&boot::log_directive(args.log_level.as_deref(), &config));

    tracing::info!("ProbTutor v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Some(e) = config_err {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let result = match args.command.unwrap_or(Command::Chat) {
        Command::Chat => commands::chat::run(&config).await,
        Command::Ask {
            document,
            show_context,
            question,
        } => commands::ask::run(&config, document, show_context, question).await,
        Command::Probe { kind } => commands::probe::run(&config, kind).await,
        Command::Config => {
            commands::show_config::run(&config);
            Ok(())
        }
    };

    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
