pub mod sink;

use chrono::Utc;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::aggregate::{tally_corrections, AggregateError, Aggregator};
use crate::cache::{DocumentCache, TitleVersions};
use crate::config::EngineConfig;
use crate::extraction::{Extractor, WhitespaceWordCounter};
use crate::source::{CatalogSource, DocumentFetcher, FetchError};
use crate::types::agency::Agency;
use crate::types::aggregate::{AgencySnapshot, AggregateResult, CorrectionTally};
use crate::types::identifiers::{ContentDigest, DocumentKey};
pub use sink::{JsonDirectorySink, MemorySink, SinkError, SnapshotSink};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Catalog fetch failed: {0}")]
    Catalog(#[from] FetchError),
    #[error("Snapshot write failed: {0}")]
    Sink(#[from] SinkError),
    #[error("Could not start worker pool: {0}")]
    Pool(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAgency {
    pub slug: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RunReport {
    pub agencies_written: usize,
    pub agencies_failed: Vec<FailedAgency>,
    pub documents_fetched: usize,
    pub documents: Vec<(DocumentKey, ContentDigest)>,
}

/// One import pass over the upstream catalog.
///
/// Each call builds its own document cache and drops it on return, so
/// nothing fetched in one run is visible to the next.
pub struct ImportRun<S> {
    source: S,
    config: EngineConfig,
}

impl<S> ImportRun<S>
where
    S: CatalogSource + DocumentFetcher,
{
    pub fn new(source: S, config: EngineConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Aggregate every agency and write one snapshot per success.
    ///
    /// A failed agency is reported and skipped; nothing is written for it.
    /// Failing to fetch the titles table or the agency list aborts the run.
    pub fn run_agencies(&self, sink: &mut dyn SnapshotSink) -> Result<RunReport, ImportError> {
        let titles = self.source.fetch_titles()?;
        let versions = TitleVersions::from_titles(&titles);
        let agencies = self.source.fetch_agencies()?;
        info!(titles = versions.len(), agencies = agencies.len(), "starting agency import");

        let cache = DocumentCache::new(&self.source, self.config.cache_config());
        let aggregator = Aggregator::new(&versions, &cache, Extractor::new(WhitespaceWordCounter));
        // Reserved up front so retain-per-key keeps a document until its
        // last group across all agencies is done.
        for (key, uses) in aggregator.planned_checkouts(&agencies) {
            cache.reserve(&key, uses);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
            .map_err(|e| ImportError::Pool(e.to_string()))?;
        let outcomes: Vec<(&Agency, Result<AggregateResult, AggregateError>)> = pool.install(|| {
            agencies
                .par_iter()
                .map(|agency| (agency, aggregator.aggregate(agency)))
                .collect()
        });

        let snapshot_date = Utc::now();
        let mut report = RunReport::default();
        for (agency, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    sink.write_agency(&AgencySnapshot::new(&agency.name, result, snapshot_date))?;
                    report.agencies_written += 1;
                }
                Err(err) => {
                    warn!(slug = %agency.slug, error = %err, "agency aggregation failed, not written");
                    report.agencies_failed.push(FailedAgency {
                        slug: agency.slug.clone(),
                        reason: err.source.to_string(),
                    });
                }
            }
        }

        report.documents_fetched = cache.fetch_count();
        report.documents = cache.fetched_documents();
        info!(
            written = report.agencies_written,
            failed = report.agencies_failed.len(),
            documents = report.documents_fetched,
            "agency import finished"
        );
        Ok(report)
    }

    /// Tally corrections by year and hand the tally to the sink.
    pub fn run_corrections(&self, sink: &mut dyn SnapshotSink) -> Result<CorrectionTally, ImportError> {
        let records = self.source.fetch_corrections()?;
        let tally = tally_corrections(&records);
        sink.write_corrections(&tally)?;
        info!(records = records.len(), years = tally.len(), "corrections import finished");
        Ok(tally)
    }
}
