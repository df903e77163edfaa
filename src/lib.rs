//! # docbot
//!
//! A conversational question-answering CLI for your PDF documents.
//!
//! docbot extracts per-page text from PDFs, splits it into overlapping
//! chunks, embeds the chunks via the OpenAI API, and stores them in
//! per-space SQLite indexes. Questions are answered by retrieving the most
//! similar chunks and grounding a chat model in them, carrying the running
//! conversation along for follow-ups.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌─────────────┐
//! │   PDFs   │──▶│ Chunk+Embed │──▶│   SQLite    │
//! │ (ingest) │   │             │   │ (per space) │
//! └──────────┘   └─────────────┘   └──────┬──────┘
//!                                         │ top-K cosine
//!                                         ▼
//!              question + history ──▶ ┌─────────┐
//!                                     │ Chat LLM │──▶ answer
//!                                     └─────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! docbot ingest handbook.pdf        # extract, chunk, embed, store
//! docbot ask "What is the leave policy?"
//! docbot chat                       # interactive session
//! docbot spaces                     # list knowledge spaces
//! docbot reset                      # delete the active space
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and API key handling |
//! | [`models`] | Core data types |
//! | [`ingest`] | PDF text extraction and the ingest command |
//! | [`chunk`] | Overlapping text chunking |
//! | [`embedding`] | Embeddings client and vector helpers |
//! | [`store`] | Per-space SQLite vector store |
//! | [`llm`] | Chat completions client |
//! | [`session`] | Conversation log |
//! | [`answer`] | Retrieval-augmented answering (ask/chat) |
//! | [`spaces`] | Knowledge space listing |
//! | [`error`] | Error taxonomy |

pub mod answer;
pub mod chunk;
pub mod config;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod session;
pub mod spaces;
pub mod store;
