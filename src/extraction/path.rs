use std::fmt;

use crate::document::{NodeId, TitleDocument};
use crate::types::reference::{CfrReference, HierarchyLevel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub level: HierarchyLevel,
    pub label: String,
}

/// A descendant-chained structural query: each step matches nodes with the
/// step's `TYPE` and `N` anywhere below a match of the previous step.
///
/// Omitted levels impose no constraint, so a query without `chapter` matches
/// under every chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    steps: Vec<PathStep>,
}

impl PathQuery {
    /// `None` when the reference names no level at all; such a query would
    /// otherwise select the whole title.
    pub fn for_reference(reference: &CfrReference) -> Option<Self> {
        let steps: Vec<PathStep> = reference
            .trail()
            .map(|(level, label)| PathStep {
                level,
                label: label.to_string(),
            })
            .collect();

        if steps.is_empty() {
            None
        } else {
            Some(PathQuery { steps })
        }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Matching nodes, de-duplicated, in document order.
    pub fn evaluate(&self, doc: &TitleDocument) -> Vec<NodeId> {
        let mut frontier = vec![doc.root()];

        for step in &self.steps {
            let node_type = step.level.node_type();
            let mut next = Vec::new();
            // Frontier is sorted and its subtrees are nested or disjoint, so
            // skipping already-scanned ranges keeps `next` sorted and unique.
            let mut scanned_to = 0;
            for &id in &frontier {
                let range = doc.descendants(id);
                let start = range.start.max(scanned_to);
                next.extend((start..range.end).filter(|&d| doc.node(d).matches(node_type, &step.label)));
                scanned_to = scanned_to.max(range.end);
            }
            if next.is_empty() {
                return next;
            }
            frontier = next;
        }

        frontier
    }
}

impl fmt::Display for PathQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(".")?;
        for step in &self.steps {
            write!(f, "//*[@TYPE='{}'][@N='{}']", step.level.node_type(), step.label)?;
        }
        Ok(())
    }
}
