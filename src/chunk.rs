//! Overlapping character-window text splitter.
//!
//! Splits page text into chunks of at most `chunk_size` characters where
//! consecutive chunks within a page share exactly `overlap` characters of
//! context: the tail of chunk *i* is the head of chunk *i+1*. Cut points
//! prefer structural boundaries (paragraph break, then line break, then
//! space) inside the legal window, falling back to a hard cut.
//!
//! Lengths are counted in characters, not bytes, so multi-byte UTF-8 input
//! never splits inside a scalar value.

use uuid::Uuid;

use crate::models::{DocumentChunk, PageText};

/// Split extracted pages into chunks carrying their source metadata.
/// Chunk indices are contiguous within each page, starting at 0.
pub fn split_pages(pages: &[PageText], chunk_size: usize, overlap: usize) -> Vec<DocumentChunk> {
    let mut chunks = Vec::new();
    for page in pages {
        for (index, text) in split_text(&page.text, chunk_size, overlap)
            .into_iter()
            .enumerate()
        {
            chunks.push(make_chunk(page, index, text));
        }
    }
    chunks
}

fn make_chunk(page: &PageText, index: usize, text: String) -> DocumentChunk {
    DocumentChunk {
        id: Uuid::new_v4().to_string(),
        file: page.file.clone(),
        page: page.page,
        chunk_index: index,
        text,
    }
}

/// Split text into overlapping chunks. Empty or whitespace-only input
/// yields no chunks. Chunk text is never trimmed: trimming would break the
/// exact tail-equals-head overlap equality.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    debug_assert!(overlap < chunk_size);

    if text.trim().is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0usize;

    loop {
        let hard_end = (start + chunk_size).min(chars.len());
        let end = if hard_end == chars.len() {
            hard_end
        } else {
            // The cut must land past start + overlap, otherwise the next
            // chunk would not move forward.
            cut_point(&chars, start + overlap + 1, hard_end)
        };

        chunks.push(chars[start..end].iter().collect());

        if end == chars.len() {
            break;
        }
        start = end - overlap;
    }

    chunks
}

/// Best cut position in `[min_end, hard_end]`: just after the last
/// paragraph break, else the last line break, else the last space, else
/// `hard_end`.
fn cut_point(chars: &[char], min_end: usize, hard_end: usize) -> usize {
    for end in (min_end..=hard_end).rev() {
        if end >= 2 && chars[end - 1] == '\n' && chars[end - 2] == '\n' {
            return end;
        }
    }
    for end in (min_end..=hard_end).rev() {
        if chars[end - 1] == '\n' {
            return end;
        }
    }
    for end in (min_end..=hard_end).rev() {
        if chars[end - 1] == ' ' {
            return end;
        }
    }
    hard_end
}
