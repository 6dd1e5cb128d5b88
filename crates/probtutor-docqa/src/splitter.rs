//! Sliding-window text splitting.
//!
//! Sizes are counted in characters, not bytes, so Korean lecture notes get
//! the same chunk lengths as English ones and slicing never lands inside a
//! multi-byte character.

use crate::{Chunk, Page, TextSplitter};

#[derive(Debug, Clone, Copy, Default)]
pub struct SlidingWindowSplitter;

impl SlidingWindowSplitter {
    pub fn new() -> Self {
        Self
    }
}

impl TextSplitter for SlidingWindowSplitter {
    fn split(&self, pages: &[Page], chunk_size: usize, overlap: usize) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for page in pages {
            for text in sliding_window(&page.text, chunk_size, overlap) {
                chunks.push(Chunk {
                    page: page.number,
                    index: chunks.len(),
                    text,
                });
            }
        }
        chunks
    }
}

/// Split text into overlapping windows of at most `max_chars` characters,
/// cutting at the best boundary found in each window.
pub fn sliding_window(text: &str, max_chars: usize, overlap: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() || max_chars == 0 {
        return Vec::new();
    }

    // Byte offset of every char position, plus the end of the text.
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = offsets.len() - 1;

    if total <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total {
        let end = (start + max_chars).min(total);
        let chunk_end = if end < total {
            let window = &text[offsets[start]..offsets[end]];
            match find_break_point(window) {
                Some(byte) => start + window[..byte].chars().count(),
                None => end,
            }
        } else {
            end
        };

        let chunk = text[offsets[start]..offsets[chunk_end]].trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if chunk_end >= total {
            break;
        }
        let step = chunk_end - start;
        start = if step <= overlap {
            chunk_end
        } else {
            chunk_end - overlap
        };
    }

    chunks
}

/// Byte offset just past the best cut in `window`: a paragraph break, then
/// a sentence end, then a line break, then a space.
fn find_break_point(window: &str) -> Option<usize> {
    let min = window.len() / 3;

    if let Some(pos) = window.rfind("\n\n") {
        if pos > min {
            return Some(pos + 2);
        }
    }

    for pattern in [". ", "! ", "? ", ".\n", "!\n", "?\n"] {
        if let Some(pos) = window.rfind(pattern) {
            if pos > min {
                return Some(pos + pattern.len());
            }
        }
    }

    if let Some(pos) = window.rfind('\n') {
        if pos > min {
            return Some(pos + 1);
        }
    }

    match window.rfind(' ') {
        Some(pos) if pos > 0 => Some(pos + 1),
        _ => None,
    }
}
