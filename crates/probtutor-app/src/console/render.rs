//! Text rendering for the chat console.

use std::path::{Path, PathBuf};

use probtutor_ai::{FileId, HistoryEntry, ResolvedImage, Role};
use probtutor_common::Event;
use tracing::warn;

use super::input::InputGate;

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";
const HISTORY_PREVIEW_CHARS: usize = 200;

pub fn banner(gate: &InputGate) -> String {
    format!(
        "{RULE}\n\
         ProbTutor: probability concepts, calculations and charts\n\
         Ask anything about probability and statistics.\n\
         Type quit, exit, q, 종료 or 끝 to leave.\n\
         {RULE}\n\
         \n\
         Suggested topics:\n\
         \x20 - What is Bayes' theorem?\n\
         \x20 - Explain conditional probability\n\
         \x20 - What are the properties of the normal distribution?\n\
         \x20 - Flip a coin 3 times: probability of exactly 2 heads?\n\
         \x20 - Plot a binomial distribution\n\
         \n\
         {}",
        help(gate)
    )
}

pub fn help(gate: &InputGate) -> String {
    format!(
        "Commands: /history, /new, /usage, /help. \
         Questions must be {}-{} characters.",
        gate.min_chars, gate.max_chars
    )
}

/// A one-line progress note for an event, if it deserves one.
pub fn progress_line(event: &Event) -> Option<String> {
    match event {
        Event::SessionStarted { thread_id } => Some(format!("new conversation ({thread_id})")),
        Event::RunStarted { run_id, .. } => Some(format!("thinking... (run {run_id})")),
        Event::RunPolled {
            status, waited_ms, ..
        } => Some(format!(
            "run status: {status} (waited {}s)",
            waited_ms / 1000
        )),
        Event::RunTimedOut { waited_ms, .. } => {
            Some(format!("stopped waiting after {}s", waited_ms / 1000))
        }
        Event::ImageResolved { bytes, .. } => Some(format!("chart received ({bytes} bytes)")),
        Event::ImageSkipped { file_id, reason } => {
            Some(format!("could not fetch image {file_id}: {reason}"))
        }
        _ => None,
    }
}

pub fn history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No conversation yet.".to_string();
    }
    let mut out = format!("Conversation history\n{RULE}\n");
    for entry in entries {
        let label = match entry.role {
            Role::User => "You",
            Role::Assistant => "ProbTutor",
        };
        out.push_str(&format!(
            "{label} ({}):\n{}\n{THIN_RULE}\n",
            entry.recorded_at.format("%H:%M:%S"),
            entry.preview(HISTORY_PREVIEW_CHARS)
        ));
    }
    out
}

/// `<file_id>.png`, or None when the id could escape the image directory.
fn image_file_name(file_id: &FileId) -> Option<String> {
    let id = file_id.as_str();
    if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
        return None;
    }
    Some(format!("{id}.png"))
}

/// Write each image to `dir/<file_id>.png`. Ids that are not a plain file
/// name are skipped. Failures are logged and
/// skipped; the paths written are returned in order.
pub async fn save_images(dir: &Path, images: &[ResolvedImage]) -> Vec<PathBuf> {
    if images.is_empty() {
        return Vec::new();
    }
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        warn!(dir = %dir.display(), error = %e, "cannot create image directory");
        return Vec::new();
    }

    let mut saved = Vec::new();
    for image in images {
        let Some(name) = image_file_name(&image.file_id) else {
            warn!(file_id = %image.file_id, "refusing to save image with unsafe file id");
            continue;
        };
        let path = dir.join(name);
        match tokio::fs::write(&path, &image.bytes).await {
            Ok(()) => saved.push(path),
            Err(e) => warn!(path = %path.display(), error = %e, "cannot save image"),
        }
    }
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use probtutor_ai::HistoryStore;

    #[test]
    fn banner_lists_exit_words_and_bounds() {
        let text = banner(&InputGate::default());
        assert!(text.contains("quit, exit, q, 종료 or 끝"));
        assert!(text.contains("3-1000 characters"));
        assert!(text.contains("  - Plot a binomial distribution"));
    }

    #[test]
    fn poll_progress_shows_status_and_seconds() {
        let line = progress_line(&Event::RunPolled {
            run_id: "run_1".into(),
            status: "in_progress".into(),
            waited_ms: 4000,
        });
        assert_eq!(line.as_deref(), Some("run status: in_progress (waited 4s)"));
        assert!(progress_line(&Event::TurnRecorded { history_len: 2 }).is_none());
    }

    #[test]
    fn history_previews_long_entries() {
        let mut store = HistoryStore::default();
        store.record_turn("short question", "x".repeat(250));
        let text = history(&store.to_vec());

        assert!(text.contains("You ("));
        assert!(text.contains("short question"));
        assert!(text.contains(&format!("{}...", "x".repeat(200))));
        assert!(!text.contains(&"x".repeat(201)));
    }

    #[test]
    fn empty_history_message() {
        assert_eq!(history(&[]), "No conversation yet.");
    }

    #[tokio::test]
    async fn images_are_written_by_file_id() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("charts");
        let images = vec![ResolvedImage {
            file_id: FileId::from("file_abc"),
            bytes: vec![1, 2, 3],
        }];

        let saved = save_images(&target, &images).await;
        assert_eq!(saved, vec![target.join("file_abc.png")]);
        assert_eq!(std::fs::read(&saved[0]).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn image_ids_with_path_parts_are_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("charts");
        let image = |id: &str| ResolvedImage {
            file_id: FileId::from(id),
            bytes: vec![9],
        };
        let images = vec![
            image("../evil"),
            image("nested/file"),
            image("back\\slash"),
            image(""),
            image("file_ok"),
        ];

        let saved = save_images(&target, &images).await;
        assert_eq!(saved, vec![target.join("file_ok.png")]);
        assert!(!dir.path().join("evil.png").exists());
        assert!(!target.join("nested").exists());
    }
}
