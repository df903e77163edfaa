//! Per-space SQLite vector store.
//!
//! Every knowledge space is one directory `<storage.root>/<name>` holding a
//! single `index.sqlite` with chunk rows and their embedding BLOBs. The
//! SQLite layout is private to this module; callers see only load / add /
//! query / reset plus the stats used by the `spaces` listing.
//!
//! A space exists in three observable states: no directory (or directory
//! without a database) and a database with zero chunks both read as "no
//! knowledge yet" (`load` returns `None`); a database with at least one
//! committed chunk reads as `Some`.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::Config;
use crate::embedding::{blob_to_vec, cosine_similarity, vec_to_blob};
use crate::error::{DocbotError, DocbotResult};
use crate::models::{DocumentChunk, ScoredChunk};

const INDEX_FILE: &str = "index.sqlite";

/// Resolve a space name to its directory under the storage root.
///
/// Names must be plain path segments: empty names, path separators and
/// `..` are rejected so that distinct names never collide on disk.
pub fn space_dir(root: &Path, space: &str) -> DocbotResult<PathBuf> {
    let name = space.trim();
    if name.is_empty() {
        return Err(DocbotError::Config("space name is empty".to_string()));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(DocbotError::Config(format!(
            "invalid space name '{}': must be a plain directory name",
            space
        )));
    }
    Ok(root.join(name))
}

/// Summary counters for one space, as shown by `docbot spaces`.
#[derive(Debug, Clone, Copy)]
pub struct SpaceStats {
    pub chunks: i64,
    pub files: i64,
    /// Epoch seconds of the most recent add, if any chunk exists.
    pub updated_at: Option<i64>,
}

/// Open handle to one knowledge space's database.
pub struct SpaceStore {
    pool: SqlitePool,
}

impl SpaceStore {
    /// Open the space if it already holds committed chunks.
    ///
    /// Creates the space directory when missing (an empty directory is a
    /// not-yet-populated space). Returns `None` when the database does not
    /// exist or contains zero chunks.
    pub async fn load(config: &Config, space: &str) -> DocbotResult<Option<Self>> {
        let dir = space_dir(&config.storage.root, space)?;
        std::fs::create_dir_all(&dir)?;

        let db_path = dir.join(INDEX_FILE);
        if !db_path.exists() {
            return Ok(None);
        }

        let store = Self::open(&db_path).await?;
        if store.count_chunks().await? == 0 {
            store.close().await;
            return Ok(None);
        }
        Ok(Some(store))
    }

    /// Append embedded chunks, creating the database on first use.
    ///
    /// `chunks` and `vectors` are parallel; rows and their vectors are
    /// written in one transaction, so a failed add leaves no partial batch.
    /// Nothing is deduplicated: re-adding the same document stores it
    /// again.
    pub async fn add(
        config: &Config,
        space: &str,
        existing: Option<Self>,
        chunks: &[DocumentChunk],
        vectors: &[Vec<f32>],
    ) -> DocbotResult<Self> {
        if chunks.len() != vectors.len() {
            return Err(DocbotError::Embedding(format!(
                "got {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let store = match existing {
            Some(store) => store,
            None => {
                let dir = space_dir(&config.storage.root, space)?;
                std::fs::create_dir_all(&dir)?;
                Self::open(&dir.join(INDEX_FILE)).await?
            }
        };

        let created_at = chrono::Utc::now().timestamp();
        let mut tx = store.pool.begin().await?;
        for (chunk, vector) in chunks.iter().zip(vectors.iter()) {
            sqlx::query(
                "INSERT INTO chunks (id, file, page, chunk_index, text, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&chunk.id)
            .bind(&chunk.file)
            .bind(chunk.page as i64)
            .bind(chunk.chunk_index as i64)
            .bind(&chunk.text)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO chunk_vectors (chunk_id, embedding) VALUES (?, ?)")
                .bind(&chunk.id)
                .bind(vec_to_blob(vector))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(store)
    }

    /// Rank all stored chunks against the query vector and return the top
    /// `k`, highest similarity first (ties broken by chunk id).
    pub async fn query(&self, vector: &[f32], k: usize) -> DocbotResult<Vec<ScoredChunk>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.file, c.page, c.chunk_index, c.text, v.embedding
            FROM chunk_vectors v
            JOIN chunks c ON c.id = v.chunk_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut scored: Vec<ScoredChunk> = rows
            .iter()
            .map(|row| {
                let blob: Vec<u8> = row.get("embedding");
                let stored = blob_to_vec(&blob);
                let score = cosine_similarity(vector, &stored);
                ScoredChunk {
                    chunk: DocumentChunk {
                        id: row.get("id"),
                        file: row.get("file"),
                        page: row.get::<i64, _>("page") as usize,
                        chunk_index: row.get::<i64, _>("chunk_index") as usize,
                        text: row.get("text"),
                    },
                    score,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });
        scored.truncate(k);

        Ok(scored)
    }

    pub async fn count_chunks(&self) -> DocbotResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }

    async fn open(db_path: &Path) -> DocbotResult<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(sqlx::Error::from)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> DocbotResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chunks (
                id TEXT PRIMARY KEY,
                file TEXT NOT NULL,
                page INTEGER NOT NULL,
                chunk_index INTEGER NOT NULL,
                text TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chunk_vectors (
                chunk_id TEXT PRIMARY KEY,
                embedding BLOB NOT NULL,
                FOREIGN KEY (chunk_id) REFERENCES chunks(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_file ON chunks(file)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Counters for the `spaces` listing; `None` when the directory holds no
/// database yet.
pub async fn space_stats(dir: &Path) -> DocbotResult<Option<SpaceStats>> {
    let db_path = dir.join(INDEX_FILE);
    if !db_path.exists() {
        return Ok(None);
    }

    let store = SpaceStore::open(&db_path).await?;
    let chunks = store.count_chunks().await?;
    let files: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT file) FROM chunks")
        .fetch_one(&store.pool)
        .await?;
    let updated_at: Option<i64> = sqlx::query_scalar("SELECT MAX(created_at) FROM chunks")
        .fetch_one(&store.pool)
        .await?;
    store.close().await;

    Ok(Some(SpaceStats {
        chunks,
        files,
        updated_at,
    }))
}

/// Delete the space directory and everything in it. A missing space is
/// already reset.
pub fn reset(config: &Config, space: &str) -> DocbotResult<()> {
    let dir = space_dir(&config.storage.root, space)?;
    match std::fs::remove_dir_all(&dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DocbotError::Io(e)),
    }
}

/// Entry point for `docbot reset`.
pub fn run_reset(config: &Config, space: &str) -> anyhow::Result<()> {
    reset(config, space)?;
    println!("reset space '{}'", space);
    println!("ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_dir_joins_root() {
        let dir = space_dir(Path::new("./db"), "notes").unwrap();
        assert_eq!(dir, PathBuf::from("./db/notes"));
    }

    #[test]
    fn test_space_dir_rejects_empty() {
        assert!(space_dir(Path::new("./db"), "").is_err());
        assert!(space_dir(Path::new("./db"), "   ").is_err());
    }

    #[test]
    fn test_space_dir_rejects_separators_and_dots() {
        assert!(space_dir(Path::new("./db"), "a/b").is_err());
        assert!(space_dir(Path::new("./db"), "a\\b").is_err());
        assert!(space_dir(Path::new("./db"), "..").is_err());
        assert!(space_dir(Path::new("./db"), ".").is_err());
    }

    #[test]
    fn test_space_dir_same_name_same_path() {
        let a = space_dir(Path::new("/data"), "work").unwrap();
        let b = space_dir(Path::new("/data"), "work").unwrap();
        assert_eq!(a, b);
    }
}
