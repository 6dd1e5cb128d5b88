//! `probtutor probe`: a canned end-to-end check against the live service.

use std::sync::Arc;

use probtutor_ai::{SessionManager, TurnOutcome};
use probtutor_common::{EventBus, TutorError};
use probtutor_config::schema::ProbTutorConfig;

use crate::boot;
use crate::cli::ProbeKind;

pub fn question(kind: ProbeKind) -> &'static str {
    match kind {
        ProbeKind::Calc => {
            "Flip a fair coin 3 times. What is the probability of exactly 2 heads? \
             Please solve it with the binomial distribution."
        }
        ProbeKind::Chart => {
            "Please plot the standard normal distribution (mean 0, standard deviation 1)."
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub kind: ProbeKind,
    pub text_chars: usize,
    pub images: usize,
}

/// Judge a probe turn. A chart probe needs at least one image.
pub fn evaluate(kind: ProbeKind, outcome: &TurnOutcome) -> Result<ProbeReport, String> {
    let reply = match outcome {
        TurnOutcome::Answered(reply) => reply,
        TurnOutcome::Failed(err) => return Err(err.to_string()),
    };
    if kind == ProbeKind::Chart && reply.images.is_empty() {
        return Err("the answer contained no image".into());
    }
    Ok(ProbeReport {
        kind,
        text_chars: reply.text.chars().count(),
        images: reply.images.len(),
    })
}

/// Ask the probe question on a fresh thread of an already provisioned manager.
pub async fn probe(manager: &SessionManager, kind: ProbeKind) -> Result<ProbeReport, String> {
    manager.start_session().await.map_err(|e| e.to_string())?;
    let outcome = manager
        .send_message(question(kind))
        .await
        .map_err(|e| e.to_string())?;
    evaluate(kind, &outcome)
}

pub async fn run(config: &ProbTutorConfig, kind: ProbeKind) -> Result<(), TutorError> {
    let manager = boot::connect(config, Arc::new(EventBus::default()))
        .map_err(|e| TutorError::Assistant(e.to_string()))?;
    manager
        .provision_assistant()
        .await
        .map_err(|e| TutorError::Assistant(e.to_string()))?;

    println!("probe {kind:?}: {}", question(kind));
    match probe(&manager, kind).await {
        Ok(report) => {
            println!(
                "probe {:?}: ok ({} characters of text, {} image(s))",
                report.kind, report.text_chars, report.images
            );
            Ok(())
        }
        Err(reason) => Err(TutorError::Assistant(format!(
            "probe {kind:?} failed: {reason}"
        ))),
    }
}
