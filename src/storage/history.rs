//! Analysis history persisted as JSON Lines

use crate::error::{CareerLensError, Result};
use crate::processing::AnalysisRecord;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One stored analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    #[serde(flatten)]
    pub record: AnalysisRecord,
}

/// Durable storage for completed analyses
pub trait AnalysisStore {
    fn save(&self, record: &AnalysisRecord, resume: Option<&str>) -> Result<HistoryEntry>;

    /// Most recent entries first
    fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>>;
}

/// Append-only store, one JSON object per line
pub struct JsonlHistoryStore {
    path: PathBuf,
}

impl JsonlHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entries = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    "Skipping unreadable history line {} in {}: {}",
                    line_no + 1,
                    self.path.display(),
                    e
                ),
            }
        }
        Ok(entries)
    }
}

impl AnalysisStore for JsonlHistoryStore {
    fn save(&self, record: &AnalysisRecord, resume: Option<&str>) -> Result<HistoryEntry> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let next_id = self.read_all()?.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let entry = HistoryEntry {
            id: next_id,
            created_at: Utc::now(),
            resume: resume.map(str::to_string),
            record: record.clone(),
        };

        let line = serde_json::to_string(&entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                CareerLensError::Persistence(format!("cannot open {}: {}", self.path.display(), e))
            })?;
        writeln!(file, "{}", line)?;

        debug!("Saved analysis #{} to {}", entry.id, self.path.display());
        Ok(entry)
    }

    fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.read_all()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }
}
