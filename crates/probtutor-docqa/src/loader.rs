//! Plain-text document loading.
//!
//! Reads a UTF-8 text export of the lecture (for example `pdftotext`
//! output) and treats each form feed as a page break.

use std::path::Path;

use tracing::debug;

use crate::{DocQaError, DocumentLoader, Page};

const PAGE_BREAK: char = '\x0c';

#[derive(Debug, Clone, Copy, Default)]
pub struct TextDocumentLoader;

impl TextDocumentLoader {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for TextDocumentLoader {
    fn load(&self, path: &Path) -> Result<Vec<Page>, DocQaError> {
        if !path.is_file() {
            return Err(DocQaError::DocumentNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| DocQaError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let pages: Vec<Page> = text
            .split(PAGE_BREAK)
            .enumerate()
            .filter(|(_, page)| !page.trim().is_empty())
            .map(|(i, page)| Page {
                number: i + 1,
                text: page.to_string(),
            })
            .collect();

        if pages.is_empty() {
            return Err(DocQaError::EmptyDocument(path.to_path_buf()));
        }
        debug!(path = %path.display(), pages = pages.len(), "document loaded");
        Ok(pages)
    }
}
