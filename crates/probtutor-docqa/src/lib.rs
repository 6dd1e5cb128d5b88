//! Question answering over a single lecture document.
//!
//! A one-shot pipeline builds an in-memory index once per document path:
//! load pages, split them into overlapping chunks, embed every chunk. Each
//! question is then embedded, the closest chunks are retrieved, and a chat
//! model answers from those chunks only.
//!
//! Every stage sits behind a trait so the defaults (plain-text loader,
//! sliding-window splitter, Ollama embedder and chat model) can be swapped.

pub mod cache;
pub mod chain;
pub mod error;
pub mod index;
pub mod loader;
pub mod ollama;
pub mod splitter;

use async_trait::async_trait;

pub use cache::PipelineCache;
pub use chain::{render_prompt, PipelineSettings, QaAnswer, RetrievalChain};
pub use error::DocQaError;
pub use index::{cosine_similarity, l2_normalize, RetrievedChunk, VectorIndex};
pub use loader::TextDocumentLoader;
pub use ollama::{OllamaChat, OllamaEmbedder};
pub use splitter::SlidingWindowSplitter;

/// One page of a loaded document, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub text: String,
}

/// A piece of a page small enough to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub page: usize,
    /// Position of the chunk within the whole document.
    pub index: usize,
    pub text: String,
}

pub trait DocumentLoader: Send + Sync {
    fn load(&self, path: &std::path::Path) -> Result<Vec<Page>, DocQaError>;
}

pub trait TextSplitter: Send + Sync {
    /// Split pages into chunks of at most `chunk_size` characters, each
    /// repeating up to `overlap` characters of its predecessor.
    fn split(&self, pages: &[Page], chunk_size: usize, overlap: usize) -> Vec<Chunk>;
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input text, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DocQaError>;
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, DocQaError>;
}
