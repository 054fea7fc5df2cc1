//! Row store collaborator: append/read-all semantics over flattened rows.
//! The core never touches storage directly; the CLI wires a store around it.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::FlatRow;
use crate::error::Result;

/// Opaque columnar-store boundary: append a season's rows, read everything
/// back for aggregation. Physical layout is the implementation's concern.
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn append_rows(&self, season: i32, rows: &[FlatRow]) -> Result<()>;
    async fn read_all(&self) -> Result<Vec<FlatRow>>;
}

/// In-memory store for development and testing.
pub struct InMemoryRowStore {
    rows: Arc<Mutex<HashMap<i32, Vec<FlatRow>>>>,
}

impl Default for InMemoryRowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRowStore {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl RowStore for InMemoryRowStore {
    async fn append_rows(&self, season: i32, rows: &[FlatRow]) -> Result<()> {
        let mut all = self.rows.lock().unwrap();
        all.entry(season).or_default().extend_from_slice(rows);
        debug!("Appended {} rows for season {}", rows.len(), season);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<FlatRow>> {
        let all = self.rows.lock().unwrap();
        Ok(all.values().flatten().cloned().collect())
    }
}

/// File-backed store writing one JSON-lines file per season under
/// `<dir>/games_<season>.jsonl`.
pub struct JsonlRowStore {
    dir: PathBuf,
}

impl JsonlRowStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn season_path(&self, season: i32) -> PathBuf {
        self.dir.join(format!("games_{}.jsonl", season))
    }

    fn read_file(path: &Path, out: &mut Vec<FlatRow>) -> Result<()> {
        let content = fs::read_to_string(path)?;
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            out.push(serde_json::from_str(line)?);
        }
        Ok(())
    }
}

#[async_trait]
impl RowStore for JsonlRowStore {
    async fn append_rows(&self, season: i32, rows: &[FlatRow]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.season_path(season))?;
        for row in rows {
            serde_json::to_writer(&mut file, row)?;
            file.write_all(b"\n")?;
        }
        debug!(
            "Appended {} rows for season {} to {:?}",
            rows.len(),
            season,
            self.season_path(season)
        );
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<FlatRow>> {
        let mut rows = Vec::new();
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(rows),
            Err(e) => return Err(e.into()),
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "jsonl"))
            .collect();
        paths.sort();
        for path in paths {
            Self::read_file(&path, &mut rows)?;
        }
        Ok(rows)
    }
}
