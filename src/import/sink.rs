use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::types::aggregate::{AgencySnapshot, CorrectionTally};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Slug cannot be used as a file name: {0}")]
    InvalidSlug(String),
}

/// The persistence collaborator. Every write replaces what was stored under
/// the same key (agency slug, correction year) by a previous run.
pub trait SnapshotSink {
    fn write_agency(&mut self, snapshot: &AgencySnapshot) -> Result<(), SinkError>;
    fn write_corrections(&mut self, tally: &CorrectionTally) -> Result<(), SinkError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    agencies: BTreeMap<String, AgencySnapshot>,
    corrections: BTreeMap<i32, u64>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agency(&self, slug: &str) -> Option<&AgencySnapshot> {
        self.agencies.get(slug)
    }

    pub fn agencies(&self) -> impl Iterator<Item = &AgencySnapshot> {
        self.agencies.values()
    }

    pub fn corrections(&self) -> &BTreeMap<i32, u64> {
        &self.corrections
    }
}

impl SnapshotSink for MemorySink {
    fn write_agency(&mut self, snapshot: &AgencySnapshot) -> Result<(), SinkError> {
        self.agencies.insert(snapshot.slug.clone(), snapshot.clone());
        Ok(())
    }

    fn write_corrections(&mut self, tally: &CorrectionTally) -> Result<(), SinkError> {
        self.corrections.extend(tally.iter());
        Ok(())
    }
}

/// Snapshots as pretty JSON files:
///
/// ```text
/// <root>/agencies/<slug>.json
/// <root>/corrections.json
/// ```
///
/// Each file is written to a temporary sibling and renamed into place, so a
/// reader never sees a half-written snapshot.
#[derive(Debug, Clone)]
pub struct JsonDirectorySink {
    root: PathBuf,
}

impl JsonDirectorySink {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let root = root.into();
        fs::create_dir_all(root.join("agencies"))?;
        Ok(Self { root })
    }

    pub fn agency_path(&self, slug: &str) -> Result<PathBuf, SinkError> {
        let usable = !slug.is_empty()
            && !slug.starts_with('.')
            && slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
        if !usable {
            return Err(SinkError::InvalidSlug(slug.to_string()));
        }
        Ok(self.root.join("agencies").join(format!("{slug}.json")))
    }

    pub fn corrections_path(&self) -> PathBuf {
        self.root.join("corrections.json")
    }

    pub fn read_corrections(&self) -> Result<BTreeMap<i32, u64>, SinkError> {
        let path = self.corrections_path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let f = fs::File::open(path)?;
        Ok(serde_json::from_reader(io::BufReader::new(f))?)
    }
}

impl SnapshotSink for JsonDirectorySink {
    fn write_agency(&mut self, snapshot: &AgencySnapshot) -> Result<(), SinkError> {
        let path = self.agency_path(&snapshot.slug)?;
        write_atomic(&path, snapshot)
    }

    fn write_corrections(&mut self, tally: &CorrectionTally) -> Result<(), SinkError> {
        let mut stored = self.read_corrections()?;
        stored.extend(tally.iter());
        write_atomic(&self.corrections_path(), &stored)
    }
}

fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), SinkError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| SinkError::Io(e.error))?;
    Ok(())
}
