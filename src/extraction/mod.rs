pub mod counting;
pub mod path;

use crate::document::TitleDocument;
use crate::types::aggregate::Counts;
use crate::types::reference::CfrReference;
pub use counting::{visits, Visit, WhitespaceWordCounter, WordCounter};
pub use path::{PathQuery, PathStep};

/// Text and section count gathered for one reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub sections: u64,
}

/// Resolve `reference` against `doc`.
///
/// Every matched subtree is walked in full: text fragments are joined with
/// single spaces in document order, and every section-level node below the
/// match counts, however deep. A reference without levels yields nothing.
pub fn extract(doc: &TitleDocument, reference: &CfrReference) -> Extraction {
    let Some(query) = PathQuery::for_reference(reference) else {
        return Extraction::default();
    };

    let (fragments, sections) = query
        .evaluate(doc)
        .into_iter()
        .flat_map(|id| visits(doc, id))
        .fold((Vec::new(), 0u64), |(mut fragments, sections), visit| {
            fragments.extend(visit.fragments());
            (fragments, sections + u64::from(visit.is_section))
        });

    Extraction {
        text: fragments.join(" "),
        sections,
    }
}

/// Turns extractions into counts with a pluggable word counter.
#[derive(Debug, Clone, Default)]
pub struct Extractor<W = WhitespaceWordCounter> {
    counter: W,
}

impl<W: WordCounter> Extractor<W> {
    pub fn new(counter: W) -> Self {
        Self { counter }
    }

    pub fn extract(&self, doc: &TitleDocument, reference: &CfrReference) -> Extraction {
        extract(doc, reference)
    }

    pub fn count(&self, doc: &TitleDocument, reference: &CfrReference) -> Counts {
        let extraction = extract(doc, reference);
        Counts::new(self.counter.count_words(&extraction.text), extraction.sections)
    }
}
