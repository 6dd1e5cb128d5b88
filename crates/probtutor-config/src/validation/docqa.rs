//! Validation for the document QA pipeline.

use crate::schema::ProbTutorConfig;

use super::helpers::{validate_not_blank, validate_range};

pub(crate) fn validate_docqa(errors: &mut Vec<String>, config: &ProbTutorConfig) {
    let docqa = &config.docqa;
    validate_range(errors, "docqa.chunk_size", docqa.chunk_size as u64, 100, 20_000);
    if docqa.chunk_overlap >= docqa.chunk_size {
        errors.push(format!(
            "docqa.chunk_overlap = {} must be smaller than docqa.chunk_size = {}",
            docqa.chunk_overlap, docqa.chunk_size
        ));
    }
    validate_range(errors, "docqa.top_k", docqa.top_k as u64, 1, 50);
    validate_not_blank(errors, "docqa.ollama_url", &docqa.ollama_url);
    validate_not_blank(errors, "docqa.embedding_model", &docqa.embedding_model);
    validate_not_blank(errors, "docqa.chat_model", &docqa.chat_model);
}
