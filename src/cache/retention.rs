use std::fs;
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::types::identifiers::DocumentKey;

/// How long a parsed document stays in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetentionPolicy {
    /// Keep every document until the cache itself is dropped.
    #[default]
    RetainForRun,
    /// Drop a document (and its spool file) once no lease on its key is
    /// outstanding and every checkout reserved for it has happened.
    RetainPerKey,
}

impl RetentionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetentionPolicy::RetainForRun => "retain-for-run",
            RetentionPolicy::RetainPerKey => "retain-per-key",
        }
    }
}

impl FromStr for RetentionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "retain-for-run" => Ok(RetentionPolicy::RetainForRun),
            "retain-per-key" => Ok(RetentionPolicy::RetainPerKey),
            other => Err(format!("unknown retention policy `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    pub retention: RetentionPolicy,
    /// When set, raw bodies are streamed to a temporary file here and parsed
    /// from disk. The file is a backing copy that lives exactly as long as
    /// the cache entry; the parsed tree stays in memory either way, so this
    /// bounds the lifetime of on-disk bodies, not peak memory.
    pub spool_dir: Option<PathBuf>,
}

impl CacheConfig {
    pub fn retain_for_run() -> Self {
        Self::default()
    }

    pub fn retain_per_key() -> Self {
        Self {
            retention: RetentionPolicy::RetainPerKey,
            spool_dir: None,
        }
    }

    pub fn with_spool_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spool_dir = Some(dir.into());
        self
    }
}

/// Copy a body into a fresh temporary file under `dir`, rewound and ready
/// to be parsed. Deleted when the returned handle drops.
pub(crate) fn spool_body(dir: &Path, key: &DocumentKey, mut body: impl Read) -> io::Result<NamedTempFile> {
    fs::create_dir_all(dir)?;
    let prefix = format!("title-{}-{}-", key.title, key.issue_date);
    let mut file = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".xml")
        .tempfile_in(dir)?;

    io::copy(&mut body, &mut file)?;
    file.flush()?;
    file.rewind()?;
    Ok(file)
}
