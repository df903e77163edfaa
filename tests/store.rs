//! Store lifecycle tests against real on-disk SQLite spaces.
//!
//! Vectors here are small synthetic embeddings; nothing touches the
//! network. The interesting part is the state contract: when a space
//! reads as "no knowledge yet", what add commits, and how queries rank.

use std::path::Path;
use tempfile::TempDir;

use docbot::config::Config;
use docbot::models::DocumentChunk;
use docbot::store::{self, SpaceStore};

fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.storage.root = root.to_path_buf();
    config
}

fn chunk(id: &str, file: &str, text: &str) -> DocumentChunk {
    DocumentChunk {
        id: id.to_string(),
        file: file.to_string(),
        page: 1,
        chunk_index: 0,
        text: text.to_string(),
    }
}

#[tokio::test]
async fn test_load_missing_space_is_none() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let store = SpaceStore::load(&config, "fresh").await.unwrap();
    assert!(store.is_none());
    // The empty directory is created as a not-yet-populated space.
    assert!(tmp.path().join("fresh").is_dir());
}

#[tokio::test]
async fn test_add_then_load_some() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let chunks = vec![
        chunk("c1", "a.pdf", "alpha text"),
        chunk("c2", "a.pdf", "beta text"),
    ];
    let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];

    let store = SpaceStore::add(&config, "notes", None, &chunks, &vectors)
        .await
        .unwrap();
    assert_eq!(store.count_chunks().await.unwrap(), 2);
    store.close().await;

    let reloaded = SpaceStore::load(&config, "notes").await.unwrap();
    let reloaded = reloaded.expect("space with committed chunks should load");
    assert_eq!(reloaded.count_chunks().await.unwrap(), 2);
    reloaded.close().await;
}

#[tokio::test]
async fn test_empty_add_commits_no_knowledge() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    // A database with schema but zero chunks still reads as "no knowledge".
    let store = SpaceStore::add(&config, "empty", None, &[], &[])
        .await
        .unwrap();
    store.close().await;

    let loaded = SpaceStore::load(&config, "empty").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_readding_same_text_duplicates() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let first = vec![chunk("c1", "a.pdf", "the same text")];
    let second = vec![chunk("c2", "a.pdf", "the same text")];
    let vectors = vec![vec![1.0, 0.0]];

    let store = SpaceStore::add(&config, "dup", None, &first, &vectors)
        .await
        .unwrap();
    let store = SpaceStore::add(&config, "dup", Some(store), &second, &vectors)
        .await
        .unwrap();

    assert_eq!(store.count_chunks().await.unwrap(), 2);

    // Both copies are retrievable.
    let hits = store.query(&[1.0, 0.0], 10).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk.text, "the same text");
    assert_eq!(hits[1].chunk.text, "the same text");
    store.close().await;
}

#[tokio::test]
async fn test_query_ranks_by_similarity() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let chunks = vec![
        chunk("c1", "a.pdf", "exact match"),
        chunk("c2", "a.pdf", "orthogonal"),
        chunk("c3", "a.pdf", "close match"),
    ];
    let vectors = vec![
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![0.9, 0.1],
    ];

    let store = SpaceStore::add(&config, "rank", None, &chunks, &vectors)
        .await
        .unwrap();

    let hits = store.query(&[1.0, 0.0], 2).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk.text, "exact match");
    assert_eq!(hits[1].chunk.text, "close match");
    assert!(hits[0].score >= hits[1].score);
    store.close().await;
}

#[tokio::test]
async fn test_query_truncates_to_k() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let chunks = vec![
        chunk("c1", "a.pdf", "one"),
        chunk("c2", "a.pdf", "two"),
        chunk("c3", "a.pdf", "three"),
    ];
    let vectors = vec![vec![1.0, 0.0], vec![0.8, 0.2], vec![0.5, 0.5]];

    let store = SpaceStore::add(&config, "topk", None, &chunks, &vectors)
        .await
        .unwrap();

    let hits = store.query(&[1.0, 0.0], 1).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].chunk.text, "one");
    store.close().await;
}

#[tokio::test]
async fn test_query_ties_break_by_id() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let chunks = vec![
        chunk("b-second", "a.pdf", "tie b"),
        chunk("a-first", "a.pdf", "tie a"),
    ];
    let vectors = vec![vec![1.0, 0.0], vec![1.0, 0.0]];

    let store = SpaceStore::add(&config, "ties", None, &chunks, &vectors)
        .await
        .unwrap();

    let hits = store.query(&[1.0, 0.0], 2).await.unwrap();
    assert_eq!(hits[0].chunk.id, "a-first");
    assert_eq!(hits[1].chunk.id, "b-second");
    store.close().await;
}

#[tokio::test]
async fn test_add_rejects_mismatched_vectors() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let chunks = vec![chunk("c1", "a.pdf", "text")];
    let result = SpaceStore::add(&config, "bad", None, &chunks, &[]).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_reset_then_load_none() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let chunks = vec![chunk("c1", "a.pdf", "text")];
    let vectors = vec![vec![1.0, 0.0]];
    let store = SpaceStore::add(&config, "gone", None, &chunks, &vectors)
        .await
        .unwrap();
    store.close().await;

    store::reset(&config, "gone").unwrap();
    assert!(!tmp.path().join("gone").exists());

    let loaded = SpaceStore::load(&config, "gone").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_reset_missing_space_is_ok() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    store::reset(&config, "never-existed").unwrap();
    store::reset(&config, "never-existed").unwrap();
}

#[tokio::test]
async fn test_space_stats_counts() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let chunks = vec![
        chunk("c1", "a.pdf", "one"),
        chunk("c2", "a.pdf", "two"),
        chunk("c3", "b.pdf", "three"),
    ];
    let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]];
    let store = SpaceStore::add(&config, "stats", None, &chunks, &vectors)
        .await
        .unwrap();
    store.close().await;

    let stats = store::space_stats(&tmp.path().join("stats"))
        .await
        .unwrap()
        .expect("stats for a populated space");
    assert_eq!(stats.chunks, 3);
    assert_eq!(stats.files, 2);
    assert!(stats.updated_at.is_some());
}

#[tokio::test]
async fn test_space_stats_missing_db() {
    let tmp = TempDir::new().unwrap();
    let stats = store::space_stats(&tmp.path().join("nothing")).await.unwrap();
    assert!(stats.is_none());
}
