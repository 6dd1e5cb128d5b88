//! Document question-answering pipeline configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocQaConfig {
    /// Text export of the lecture document (pages separated by form feeds).
    pub document: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Number of chunks handed to the answer composer.
    pub top_k: usize,
    pub ollama_url: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub normalize_embeddings: bool,
}

impl Default for DocQaConfig {
    fn default() -> Self {
        Self {
            document: PathBuf::from("lecture.txt"),
            chunk_size: 1000,
            chunk_overlap: 100,
            top_k: 4,
            ollama_url: "http://localhost:11434".into(),
            embedding_model: "all-minilm".into(),
            chat_model: "gemma3:4b".into(),
            normalize_embeddings: true,
        }
    }
}
