pub mod corrections;

use std::collections::BTreeMap;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{CacheError, DocumentCache, TitleVersions};
use crate::extraction::{Extractor, WhitespaceWordCounter, WordCounter};
use crate::source::DocumentFetcher;
use crate::types::agency::Agency;
use crate::types::aggregate::{AggregateResult, ChildTotals, Counts};
use crate::types::identifiers::{DocumentKey, TitleNumber};
use crate::types::reference::CfrReference;
pub use corrections::tally_corrections;

#[derive(Debug, Clone, Error)]
#[error("Aggregation failed for agency `{slug}`: {source}")]
pub struct AggregateError {
    pub slug: String,
    pub source: CacheError,
}

/// Sums extracted counts for agencies and their direct children.
///
/// Title groups are processed in parallel on the current rayon pool. Any
/// document failure aborts the whole agency; unknown titles are skipped.
pub struct Aggregator<'r, F, W = WhitespaceWordCounter> {
    versions: &'r TitleVersions,
    cache: &'r DocumentCache<F>,
    extractor: Extractor<W>,
}

impl<'r, F, W> Aggregator<'r, F, W>
where
    F: DocumentFetcher,
    W: WordCounter + Sync,
{
    pub fn new(versions: &'r TitleVersions, cache: &'r DocumentCache<F>, extractor: Extractor<W>) -> Self {
        Self {
            versions,
            cache,
            extractor,
        }
    }

    /// Totals are own references plus every child's; grandchildren are not
    /// visited. Children sharing a name are merged into one entry.
    pub fn aggregate(&self, agency: &Agency) -> Result<AggregateResult, AggregateError> {
        let fail = |source| AggregateError {
            slug: agency.slug.clone(),
            source,
        };

        let (own, children) = rayon::join(
            || self.count_references(&agency.references),
            || {
                agency
                    .children
                    .par_iter()
                    .map(|child| {
                        self.count_references(&child.references)
                            .map(|counts| (child, counts))
                    })
                    .collect::<Result<Vec<_>, CacheError>>()
            },
        );
        let own = own.map_err(fail)?;
        let children = children.map_err(fail)?;

        let mut by_name: BTreeMap<String, ChildTotals> = BTreeMap::new();
        for (child, counts) in children {
            let entry = by_name.entry(child.name.clone()).or_insert_with(|| ChildTotals {
                slug: child.slug.clone(),
                words: 0,
                sections: 0,
            });
            entry.words += counts.words;
            entry.sections += counts.sections;
        }

        let children_total: Counts = by_name.values().map(ChildTotals::counts).sum();
        let total = own + children_total;
        info!(
            slug = %agency.slug,
            words = total.words,
            sections = total.sections,
            children = by_name.len(),
            "aggregated agency"
        );

        Ok(AggregateResult {
            slug: agency.slug.clone(),
            total_words: total.words,
            total_sections: total.sections,
            children: by_name,
        })
    }

    /// How many times `aggregate` will check out each document for these
    /// agencies: one per title group of each agency and of each child.
    pub fn planned_checkouts(&self, agencies: &[Agency]) -> BTreeMap<DocumentKey, usize> {
        let mut planned = BTreeMap::new();
        let reference_lists = agencies.iter().flat_map(|agency| {
            std::iter::once(&agency.references).chain(agency.children.iter().map(|child| &child.references))
        });
        for references in reference_lists {
            for title in group_by_title(references).into_keys() {
                if let Some(key) = self.versions.key_for(title) {
                    *planned.entry(key).or_insert(0) += 1;
                }
            }
        }
        planned
    }

    /// Group by title, resolve each title's version, and sum every
    /// reference against the shared document.
    pub fn count_references(&self, references: &[CfrReference]) -> Result<Counts, CacheError> {
        let groups: Vec<(TitleNumber, Vec<&CfrReference>)> = group_by_title(references).into_iter().collect();
        groups
            .par_iter()
            .map(|(title, refs)| self.count_group(*title, refs))
            .try_reduce(|| Counts::ZERO, |a, b| Ok(a + b))
    }

    fn count_group(&self, title: TitleNumber, references: &[&CfrReference]) -> Result<Counts, CacheError> {
        let Some(issue_date) = self.versions.resolve(title) else {
            warn!(title = %title, references = references.len(), "no current version, skipping title");
            return Ok(Counts::ZERO);
        };

        let key = DocumentKey::new(title, issue_date.clone());
        let document = self.cache.checkout(&key)?;
        Ok(references
            .iter()
            .map(|reference| self.extractor.count(&document, reference))
            .sum())
    }
}

fn group_by_title(references: &[CfrReference]) -> BTreeMap<TitleNumber, Vec<&CfrReference>> {
    let mut groups: BTreeMap<TitleNumber, Vec<&CfrReference>> = BTreeMap::new();
    for reference in references {
        groups.entry(reference.title).or_default().push(reference);
    }
    groups
}
