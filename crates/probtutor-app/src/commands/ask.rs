//! `probtutor ask`: question answering over the lecture document.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use probtutor_common::TutorError;
use probtutor_config::schema::{DocQaConfig, ProbTutorConfig};
use probtutor_docqa::{
    OllamaChat, OllamaEmbedder, PipelineCache, PipelineSettings, QaAnswer, RetrievalChain,
    SlidingWindowSplitter, TextDocumentLoader,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::console::input::is_termination;

pub fn pipeline_settings(docqa: &DocQaConfig) -> PipelineSettings {
    PipelineSettings {
        chunk_size: docqa.chunk_size,
        chunk_overlap: docqa.chunk_overlap,
        top_k: docqa.top_k,
    }
}

pub fn render_answer(answer: &QaAnswer, show_context: bool) -> String {
    let mut out = format!("Answer: {}\n", answer.answer.trim());
    if show_context {
        for (i, hit) in answer.context.iter().enumerate() {
            out.push_str(&format!(
                "\nContext #{} (page {}, score {:.3})\n{}\n",
                i + 1,
                hit.chunk.page,
                hit.score,
                hit.chunk.text
            ));
        }
    }
    out
}

/// Answer questions line by line until a termination word or end of input.
pub async fn answer_loop<R, W>(
    chain: &RetrievalChain,
    input: R,
    out: &mut W,
    show_context: bool,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(out, "\nQuestion: ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_termination(question) {
            break;
        }
        match chain.invoke(question).await {
            Ok(answer) => write!(out, "{}", render_answer(&answer, show_context))?,
            Err(e) => writeln!(out, "Could not answer: {e}")?,
        }
    }
    Ok(())
}

pub async fn run(
    config: &ProbTutorConfig,
    document: Option<PathBuf>,
    show_context: bool,
    question: Option<String>,
) -> Result<(), TutorError> {
    let docqa = &config.docqa;
    let path = document.unwrap_or_else(|| docqa.document.clone());
    let settings = pipeline_settings(docqa);
    let embedder = Arc::new(
        OllamaEmbedder::new(docqa.embedding_model.clone())
            .with_base_url(docqa.ollama_url.clone())
            .with_normalize(docqa.normalize_embeddings),
    );
    let chat = Arc::new(OllamaChat::new(docqa.chat_model.clone()).with_base_url(docqa.ollama_url.clone()));

    println!("Indexing {} ...", path.display());
    let cache = PipelineCache::new();
    let chain = cache
        .get_or_build(&path, |canonical| async move {
            RetrievalChain::build(
                &canonical,
                &settings,
                &TextDocumentLoader::new(),
                &SlidingWindowSplitter::new(),
                embedder,
                chat,
            )
            .await
        })
        .await
        .map_err(|e| TutorError::DocumentQa(e.to_string()))?;

    let mut stdout = std::io::stdout();
    match question {
        Some(question) => {
            let answer = chain
                .invoke(&question)
                .await
                .map_err(|e| TutorError::DocumentQa(e.to_string()))?;
            write!(stdout, "{}", render_answer(&answer, show_context))?;
        }
        None => {
            answer_loop(&chain, BufReader::new(tokio::io::stdin()), &mut stdout, show_context)
                .await?;
        }
    }
    Ok(())
}
