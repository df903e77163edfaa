//! # docbot CLI
//!
//! The `docbot` binary answers questions about your PDF documents. PDFs are
//! ingested into named knowledge spaces; questions are answered grounded in
//! the chunks most similar to them.
//!
//! ## Usage
//!
//! ```bash
//! docbot --config ./config/docbot.toml --space default <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docbot ingest <files...>` | Extract, chunk, embed and store PDFs |
//! | `docbot ask "<question>"` | Answer a one-shot question from the space |
//! | `docbot chat` | Interactive question loop with conversation memory |
//! | `docbot spaces` | List knowledge spaces with chunk and file counts |
//! | `docbot reset` | Delete the active knowledge space |
//!
//! ## Examples
//!
//! ```bash
//! # Ingest two PDFs into the default space
//! docbot ingest report.pdf appendix.pdf
//!
//! # Keep contracts in their own space
//! docbot --space contracts ingest nda.pdf
//! docbot --space contracts ask "When does the NDA expire?"
//!
//! # Interactive chat with a specific model
//! docbot chat --model gpt-4o
//! ```

mod answer;
mod chunk;
mod config;
mod embedding;
mod error;
mod ingest;
mod llm;
mod models;
mod session;
mod spaces;
mod store;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docbot — conversational question answering over your PDF documents.
///
/// All commands accept `--config` pointing to a TOML configuration file
/// and `--space` naming the knowledge space to work in.
#[derive(Parser)]
#[command(
    name = "docbot",
    about = "docbot — conversational question answering over your PDF documents",
    version,
    long_about = "docbot ingests PDF documents into named knowledge spaces (chunked, embedded, \
    stored in SQLite) and answers questions by retrieving the most relevant chunks and grounding \
    an OpenAI chat model in them."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/docbot.toml`. A missing file falls back to
    /// built-in defaults; storage, chunking, retrieval, embedding and chat
    /// settings are read from it.
    #[arg(long, global = true, default_value = "./config/docbot.toml")]
    config: PathBuf,

    /// Knowledge space to operate on.
    #[arg(long, global = true, default_value = "default")]
    space: String,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Ingest PDF files into the knowledge space.
    ///
    /// Extracts per-page text from each PDF, splits it into overlapping
    /// chunks, embeds the chunks, and appends them to the space. A file
    /// that cannot be read is skipped and reported; the rest of the batch
    /// still goes in.
    Ingest {
        /// PDF files to ingest.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Ask a single question against the knowledge space.
    ///
    /// Embeds the question, retrieves the most similar chunks, and prints
    /// an answer grounded in them.
    Ask {
        /// The question to answer.
        question: String,

        /// Chat model to use (must be in the configured allow-list).
        #[arg(long)]
        model: Option<String>,
    },

    /// Start an interactive chat over the knowledge space.
    ///
    /// Reads questions line by line from stdin and keeps the conversation
    /// as context for follow-ups. `exit` quits, `clear` starts a fresh
    /// session.
    Chat {
        /// Chat model to use (must be in the configured allow-list).
        #[arg(long)]
        model: Option<String>,
    },

    /// List knowledge spaces under the storage root.
    ///
    /// Shows chunk and file counts plus the date of the most recent add
    /// for every space.
    Spaces,

    /// Delete the active knowledge space.
    ///
    /// Removes the space directory and its index. Deleting a missing
    /// space is not an error.
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    let cli = Cli::parse();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Ingest { files } => {
            ingest::run_ingest(&cfg, &cli.space, &files).await?;
        }
        Commands::Ask { question, model } => {
            answer::run_ask(&cfg, &cli.space, &question, model.as_deref()).await?;
        }
        Commands::Chat { model } => {
            answer::run_chat(&cfg, &cli.space, model.as_deref()).await?;
        }
        Commands::Spaces => {
            spaces::run_spaces(&cfg).await?;
        }
        Commands::Reset => {
            store::run_reset(&cfg, &cli.space)?;
        }
    }

    Ok(())
}
