//! Core data models used throughout docbot.
//!
//! These types represent the pages, chunks, and messages that flow through
//! the ingestion and answering pipeline.

/// One page of text extracted from an uploaded PDF.
#[derive(Debug, Clone)]
pub struct PageText {
    /// Name of the originating file, as given on the command line.
    pub file: String,
    /// 1-based page number within the file.
    pub page: usize,
    pub text: String,
}

/// A bounded span of page text; the unit of embedding and retrieval.
///
/// Carries a non-owning back-reference (file, page, index) to the page it
/// was cut from. Adjacent chunks of the same page share a fixed-length
/// overlap region produced by the splitter.
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    pub id: String,
    pub file: String,
    pub page: usize,
    /// Position of this chunk within its page, starting at 0.
    pub chunk_index: usize,
    pub text: String,
}

/// Who said a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in the session's conversation log.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// A chunk returned from a knowledge space query, with its similarity.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
}
