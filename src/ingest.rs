//! PDF ingestion: per-page text extraction and the `ingest` command.
//!
//! Extraction happens entirely in memory, so a failed parse leaves nothing
//! behind on disk. Files that cannot be read or parsed are reported inline
//! and skipped; the rest of the batch continues. Embedding and storage
//! failures after extraction abort the command.

use std::path::{Path, PathBuf};

use crate::chunk::split_pages;
use crate::config::{self, Config};
use crate::embedding::EmbeddingClient;
use crate::error::{DocbotError, DocbotResult};
use crate::models::{DocumentChunk, PageText};
use crate::store::SpaceStore;

/// Extract one [`PageText`] per page from an in-memory PDF.
/// Corrupt or non-PDF bytes fail with a Format error.
pub fn extract_pages(file_name: &str, bytes: &[u8]) -> DocbotResult<Vec<PageText>> {
    let pages =
        pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| DocbotError::Format {
            name: file_name.to_string(),
            reason: e.to_string(),
        })?;

    Ok(pages
        .into_iter()
        .enumerate()
        .map(|(i, text)| PageText {
            file: file_name.to_string(),
            page: i + 1,
            text,
        })
        .collect())
}

/// Read, extract, and split a single file. Only `.pdf` files are accepted;
/// the extension check runs before any I/O.
fn ingest_file(path: &Path, config: &Config) -> DocbotResult<(usize, Vec<DocumentChunk>)> {
    let name = file_name(path);

    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !is_pdf {
        return Err(DocbotError::Format {
            name,
            reason: "not a .pdf file".to_string(),
        });
    }

    let bytes = std::fs::read(path)?;
    let pages = extract_pages(&name, &bytes)?;
    let chunks = split_pages(&pages, config.chunking.chunk_size, config.chunking.overlap);
    Ok((pages.len(), chunks))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run the `ingest` command: extract and split each file, then embed and
/// commit the whole batch to the space in one add.
pub async fn run_ingest(config: &Config, space: &str, files: &[PathBuf]) -> anyhow::Result<()> {
    let api_key = config::api_key()?;

    println!("ingest into space '{}'", space);

    let mut chunks: Vec<DocumentChunk> = Vec::new();
    let mut skipped = 0usize;

    for path in files {
        match ingest_file(path, config) {
            Ok((pages, file_chunks)) => {
                println!(
                    "  {}: {} pages, {} chunks",
                    file_name(path),
                    pages,
                    file_chunks.len()
                );
                chunks.extend(file_chunks);
            }
            Err(e) => {
                skipped += 1;
                println!("  {}: skipped ({})", file_name(path), e);
            }
        }
    }

    if chunks.is_empty() {
        if skipped > 0 {
            println!("  files skipped: {}", skipped);
        }
        println!("  no text to add");
        println!("ok");
        return Ok(());
    }

    let embedder = EmbeddingClient::new(config, api_key)?;
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embedder.embed_all(&texts).await?;

    let existing = SpaceStore::load(config, space).await?;
    let store = SpaceStore::add(config, space, existing, &chunks, &vectors).await?;
    let total = store.count_chunks().await?;
    store.close().await;

    println!("  added {} chunks", chunks.len());
    if skipped > 0 {
        println!("  files skipped: {}", skipped);
    }
    println!("  total chunks in space: {}", total);
    println!("ok");

    Ok(())
}
