use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Word and section totals for some set of references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub words: u64,
    pub sections: u64,
}

impl Counts {
    pub const ZERO: Counts = Counts {
        words: 0,
        sections: 0,
    };

    pub fn new(words: u64, sections: u64) -> Self {
        Self { words, sections }
    }
}

impl Add for Counts {
    type Output = Counts;

    fn add(self, rhs: Counts) -> Counts {
        Counts {
            words: self.words + rhs.words,
            sections: self.sections + rhs.sections,
        }
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, rhs: Counts) {
        *self = *self + rhs;
    }
}

impl Sum for Counts {
    fn sum<I: Iterator<Item = Counts>>(iter: I) -> Counts {
        iter.fold(Counts::ZERO, Add::add)
    }
}

/// Per-child entry of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildTotals {
    pub slug: String,
    pub words: u64,
    pub sections: u64,
}

impl ChildTotals {
    pub fn counts(&self) -> Counts {
        Counts::new(self.words, self.sections)
    }
}

/// The result of aggregating one agency and its direct children.
///
/// Totals include the children; `children` is keyed by child name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub slug: String,
    pub total_words: u64,
    pub total_sections: u64,
    pub children: BTreeMap<String, ChildTotals>,
}

impl AggregateResult {
    pub fn totals(&self) -> Counts {
        Counts::new(self.total_words, self.total_sections)
    }

    pub fn children_totals(&self) -> Counts {
        self.children.values().map(ChildTotals::counts).sum()
    }
}

/// What gets handed to the persistence side: one row per agency per run,
/// replacing whatever the previous run wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgencySnapshot {
    pub name: String,
    pub slug: String,
    pub total_words: u64,
    pub total_sections: u64,
    pub children: BTreeMap<String, ChildTotals>,
    pub snapshot_date: DateTime<Utc>, // informational only
}

impl AgencySnapshot {
    pub fn new(name: impl Into<String>, result: AggregateResult, snapshot_date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            slug: result.slug,
            total_words: result.total_words,
            total_sections: result.total_sections,
            children: result.children,
            snapshot_date,
        }
    }
}

/// Correction counts per year, ascending by year.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrectionTally {
    inner: BTreeMap<i32, u64>,
}

impl CorrectionTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, year: i32) {
        *self.inner.entry(year).or_insert(0) += 1;
    }

    pub fn get(&self, year: i32) -> Option<u64> {
        self.inner.get(&year).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        self.inner.iter().map(|(year, count)| (*year, *count))
    }
}
