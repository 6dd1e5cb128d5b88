//! Retrieval chain: build the index once, answer questions from it.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::index::{RetrievedChunk, VectorIndex};
use crate::{ChatModel, DocQaError, DocumentLoader, Embedder, TextSplitter};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
            top_k: 4,
        }
    }
}

/// An answer and the chunks it was composed from, best match first.
#[derive(Debug, Clone, PartialEq)]
pub struct QaAnswer {
    pub answer: String,
    pub context: Vec<RetrievedChunk>,
}

/// Fill the answer-only-from-context prompt.
pub fn render_prompt(context: &[RetrievedChunk], question: &str) -> String {
    let context = context
        .iter()
        .map(|hit| hit.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "Answer the following question based only on the provided context.\n\
         <context>\n{context}\n</context>\n\
         Question: {question}"
    )
}

pub struct RetrievalChain {
    index: VectorIndex,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
    top_k: usize,
}

impl RetrievalChain {
    /// Load, split and embed `path` into a ready chain.
    pub async fn build(
        path: &Path,
        settings: &PipelineSettings,
        loader: &dyn DocumentLoader,
        splitter: &dyn TextSplitter,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
    ) -> Result<Self, DocQaError> {
        let pages = loader.load(path)?;
        let chunks = splitter.split(&pages, settings.chunk_size, settings.chunk_overlap);
        if chunks.is_empty() {
            return Err(DocQaError::EmptyDocument(path.to_path_buf()));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed(&texts).await?;

        let mut index = VectorIndex::new();
        index.add(chunks, embeddings)?;
        info!(
            path = %path.display(),
            pages = pages.len(),
            chunks = index.len(),
            "document indexed"
        );

        Ok(Self {
            index,
            embedder,
            chat,
            top_k: settings.top_k.max(1),
        })
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub async fn invoke(&self, question: &str) -> Result<QaAnswer, DocQaError> {
        let query = self
            .embedder
            .embed(&[question.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DocQaError::Embedding("no embedding for the question".into()))?;

        let context = self.index.retrieve(&query, self.top_k);
        let prompt = render_prompt(&context, question);
        let answer = self.chat.complete(&prompt).await?;
        Ok(QaAnswer { answer, context })
    }
}
