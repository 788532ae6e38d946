// One cache per run. Keys are registered under a short lock; the fetch and
// parse happen inside the key's slot, never while the map is locked.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::cache::retention::{self, CacheConfig, RetentionPolicy};
use crate::document::{DocumentError, TitleDocument};
use crate::source::{DocumentFetcher, FetchError};
use crate::types::identifiers::{ContentDigest, DocumentKey};

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Fetch failed for {key}: {source}")]
    Fetch { key: DocumentKey, source: FetchError },
    #[error("Malformed document {key}: {source}")]
    Malformed { key: DocumentKey, source: DocumentError },
    #[error("Could not spool {key} to disk: {reason}")]
    Spool { key: DocumentKey, reason: String },
}

impl CacheError {
    pub fn key(&self) -> &DocumentKey {
        match self {
            CacheError::Fetch { key, .. }
            | CacheError::Malformed { key, .. }
            | CacheError::Spool { key, .. } => key,
        }
    }
}

struct Loaded {
    document: Arc<TitleDocument>,
    // Backing copy of the raw body. The parsed tree is what gets served;
    // the file is kept only so it is deleted together with the entry.
    _spool: Option<NamedTempFile>,
}

type Slot = OnceLock<Result<Loaded, CacheError>>;

struct Entry {
    slot: Arc<Slot>,
    leases: usize,
    // Checkouts announced through `reserve` that have not happened yet.
    pending: usize,
}

impl Entry {
    fn new() -> Self {
        Entry {
            slot: Arc::new(OnceLock::new()),
            leases: 0,
            pending: 0,
        }
    }

    fn releasable(&self) -> bool {
        self.leases == 0 && self.pending == 0
    }
}

type Entries = Mutex<HashMap<DocumentKey, Entry>>;

fn lock(entries: &Entries) -> MutexGuard<'_, HashMap<DocumentKey, Entry>> {
    // Slots are write-once, so a panic elsewhere cannot leave the map torn.
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run-scoped document cache with single-flight loading.
///
/// However many callers ask for a key at once, the document is fetched and
/// parsed once; everyone else blocks on that key's slot and shares the
/// result, including a failure.
pub struct DocumentCache<F> {
    fetcher: F,
    config: CacheConfig,
    entries: Entries,
    fetches: AtomicUsize,
    fetched: Mutex<Vec<(DocumentKey, ContentDigest)>>,
}

impl<F: DocumentFetcher> DocumentCache<F> {
    pub fn new(fetcher: F, config: CacheConfig) -> Self {
        Self {
            fetcher,
            config,
            entries: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Announce `uses` upcoming checkouts of `key`.
    ///
    /// Under `RetainPerKey` the entry then survives until every announced
    /// checkout has happened and its lease has dropped, so callers that know
    /// their workload up front get one load per key no matter how the
    /// checkouts interleave. Unannounced checkouts still work as before.
    pub fn reserve(&self, key: &DocumentKey, uses: usize) {
        if uses == 0 {
            return;
        }
        let mut entries = lock(&self.entries);
        entries.entry(key.clone()).or_insert_with(Entry::new).pending += uses;
    }

    /// Borrow the document for `key`, loading it if needed.
    ///
    /// The entry stays resident at least until the returned lease drops.
    pub fn checkout(&self, key: &DocumentKey) -> Result<DocumentLease<'_>, CacheError> {
        let slot = {
            let mut entries = lock(&self.entries);
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            entry.leases += 1;
            entry.pending = entry.pending.saturating_sub(1);
            Arc::clone(&entry.slot)
        };
        let release = Release {
            entries: &self.entries,
            retention: self.config.retention,
            key: key.clone(),
        };

        match slot.get_or_init(|| self.load(key)) {
            Ok(loaded) => Ok(DocumentLease {
                document: Arc::clone(&loaded.document),
                release,
            }),
            Err(err) => Err(err.clone()),
        }
    }

    /// Fetch-or-reuse without holding a lease. Under `RetainPerKey` the
    /// entry is released right away unless someone else holds it.
    pub fn get_or_fetch(&self, key: &DocumentKey) -> Result<Arc<TitleDocument>, CacheError> {
        self.checkout(key).map(|lease| lease.shared())
    }

    /// Number of fetch+parse attempts made so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Keys currently held by the cache (reserved, loading, loaded or failed).
    pub fn resident_keys(&self) -> Vec<DocumentKey> {
        let mut keys: Vec<DocumentKey> = lock(&self.entries).keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Every successfully parsed document with its content digest, sorted by
    /// key. A key appears once per load, so `RetainPerKey` can repeat keys.
    pub fn fetched_documents(&self) -> Vec<(DocumentKey, ContentDigest)> {
        let mut fetched = self
            .fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        fetched.sort_by(|a, b| a.0.cmp(&b.0));
        fetched
    }

    fn load(&self, key: &DocumentKey) -> Result<Loaded, CacheError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        debug!(title = %key.title, issue_date = %key.issue_date, "fetching document");

        let body = self
            .fetcher
            .fetch_document(key)
            .map_err(|source| CacheError::Fetch {
                key: key.clone(),
                source,
            })?;
        let malformed = |source: DocumentError| CacheError::Malformed {
            key: key.clone(),
            source,
        };

        let (document, spool) = match &self.config.spool_dir {
            Some(dir) => {
                let spool_err = |e: std::io::Error| CacheError::Spool {
                    key: key.clone(),
                    reason: e.to_string(),
                };
                let file = retention::spool_body(dir, key, body).map_err(spool_err)?;
                let reader = file.reopen().map_err(spool_err)?;
                let document = TitleDocument::parse(reader).map_err(malformed)?;
                (document, Some(file))
            }
            None => (TitleDocument::parse(body).map_err(malformed)?, None),
        };

        debug!(
            title = %key.title,
            issue_date = %key.issue_date,
            nodes = document.len(),
            digest = document.digest().as_str(),
            "parsed document"
        );
        self.fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key.clone(), document.digest().clone()));

        Ok(Loaded {
            document: Arc::new(document),
            _spool: spool,
        })
    }
}

/// Decrements the key's lease count on drop and evicts it under
/// `RetainPerKey` once nobody holds it and no reserved checkout is left.
struct Release<'c> {
    entries: &'c Entries,
    retention: RetentionPolicy,
    key: DocumentKey,
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        let mut entries = lock(self.entries);
        let Some(entry) = entries.get_mut(&self.key) else {
            return;
        };
        entry.leases = entry.leases.saturating_sub(1);
        if entry.releasable() && self.retention == RetentionPolicy::RetainPerKey {
            entries.remove(&self.key);
            debug!(title = %self.key.title, issue_date = %self.key.issue_date, "released document");
        }
    }
}

/// Read access to a cached document.
pub struct DocumentLease<'c> {
    document: Arc<TitleDocument>,
    release: Release<'c>,
}

impl DocumentLease<'_> {
    pub fn key(&self) -> &DocumentKey {
        &self.release.key
    }

    /// Keep the parsed tree beyond the lease (the cache entry may still be
    /// released).
    pub fn shared(&self) -> Arc<TitleDocument> {
        Arc::clone(&self.document)
    }
}

impl Deref for DocumentLease<'_> {
    type Target = TitleDocument;

    fn deref(&self) -> &TitleDocument {
        &self.document
    }
}
