use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DocQaError {
    #[error("document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("document has no text: {}", .0.display())]
    EmptyDocument(PathBuf),
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("embedding failed: {0}")]
    Embedding(String),
    #[error("chat model failed: {0}")]
    Chat(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
