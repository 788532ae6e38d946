use crate::document::{Node, NodeId, TitleDocument};

/// What a traversal sees at one node: its trimmed text and tail (if
/// non-empty) and whether the node is a section-level division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit<'a> {
    pub text: Option<&'a str>,
    pub tail: Option<&'a str>,
    pub is_section: bool,
}

impl<'a> Visit<'a> {
    fn of(node: &'a Node) -> Self {
        Visit {
            text: trimmed(node.text.as_deref()),
            tail: trimmed(node.tail.as_deref()),
            is_section: node.is_section(),
        }
    }

    pub fn fragments(&self) -> impl Iterator<Item = &'a str> {
        self.text.into_iter().chain(self.tail)
    }
}

fn trimmed(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Lazily walk `id` and its whole subtree in document order.
pub fn visits(doc: &TitleDocument, id: NodeId) -> impl Iterator<Item = Visit<'_>> {
    doc.subtree(id).iter().map(Visit::of)
}

pub trait WordCounter {
    fn count_words(&self, text: &str) -> u64;
}

/// Whitespace-delimited tokens. No punctuation handling, no de-duplication.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceWordCounter;

impl WordCounter for WhitespaceWordCounter {
    fn count_words(&self, text: &str) -> u64 {
        text.split_whitespace().count() as u64
    }
}
