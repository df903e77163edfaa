//! Knowledge space listing.
//!
//! Scans the storage root and prints one row per space with chunk and file
//! counts plus the date of the most recent add. Used by `docbot spaces` to
//! see at a glance what has been ingested where.

use anyhow::Result;

use crate::config::Config;
use crate::store;

struct SpaceRow {
    name: String,
    chunks: i64,
    files: i64,
    updated: String,
}

/// Run the spaces command: list every space under the storage root.
pub async fn run_spaces(config: &Config) -> Result<()> {
    let root = &config.storage.root;

    let mut names: Vec<String> = Vec::new();
    if root.exists() {
        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
    }
    names.sort();

    if names.is_empty() {
        println!("No knowledge spaces.");
        return Ok(());
    }

    let mut rows: Vec<SpaceRow> = Vec::new();
    for name in &names {
        let dir = root.join(name);
        let (chunks, files, updated) = match store::space_stats(&dir).await? {
            Some(stats) => (
                stats.chunks,
                stats.files,
                stats
                    .updated_at
                    .map(format_date)
                    .unwrap_or_else(|| "-".to_string()),
            ),
            None => (0, 0, "-".to_string()),
        };
        rows.push(SpaceRow {
            name: name.clone(),
            chunks,
            files,
            updated,
        });
    }

    println!(
        "{:<20} {:>8} {:>6}   {}",
        "SPACE", "CHUNKS", "FILES", "UPDATED"
    );
    println!("{}", "-".repeat(48));
    for row in &rows {
        println!(
            "{:<20} {:>8} {:>6}   {}",
            row.name, row.chunks, row.files, row.updated
        );
    }

    Ok(())
}

fn format_date(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ts.to_string())
}
