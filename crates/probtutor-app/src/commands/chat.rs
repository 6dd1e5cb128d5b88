//! `probtutor chat`: the interactive tutor.

use std::sync::Arc;

use probtutor_common::{EventBus, TutorError};
use probtutor_config::schema::ProbTutorConfig;
use tokio::io::BufReader;
use tracing::info;

use crate::boot;
use crate::console::input::InputGate;
use crate::console::{render, ChatConsole};

pub async fn run(config: &ProbTutorConfig) -> Result<(), TutorError> {
    let events = Arc::new(EventBus::default());
    let manager = boot::connect(config, events.clone())
        .map_err(|e| TutorError::Assistant(e.to_string()))?;

    let assistant_id = manager
        .provision_assistant()
        .await
        .map_err(|e| TutorError::Assistant(format!("could not set up the tutor: {e}")))?;
    info!(assistant_id = %assistant_id, "tutor ready");

    let gate = InputGate::new(
        config.console.min_input_chars,
        config.console.max_input_chars,
    );
    println!("{}", render::banner(&gate));

    let mut console = ChatConsole::new(
        &manager,
        gate,
        config.console.image_dir.clone(),
        std::io::stdout(),
    );
    if config.console.show_progress {
        console = console.with_progress(&events);
    }
    console
        .run(BufReader::new(tokio::io::stdin()), super::ctrl_c())
        .await?;
    Ok(())
}
