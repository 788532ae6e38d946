use std::io::Read;
use std::ops::Range;

use thiserror::Error;

use super::node::{Node, NodeId};
use super::parser;
use crate::types::identifiers::ContentDigest;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Malformed document: {0}")]
    Malformed(String),
    #[error("Document has no root element")]
    Empty,
}

/// A parsed title, read-only once built.
///
/// Nodes live in one arena in document order. Each node records where its
/// subtree ends, so a subtree is always a contiguous slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleDocument {
    nodes: Vec<Node>,
    digest: ContentDigest,
}

impl TitleDocument {
    /// Parse a markup body. The body is consumed as a stream and hashed on
    /// the way through.
    pub fn parse<R: Read>(body: R) -> Result<Self, DocumentError> {
        let (nodes, digest) = parser::parse_stream(body)?;
        Ok(TitleDocument { nodes, digest })
    }

    pub fn from_bytes(body: &[u8]) -> Result<Self, DocumentError> {
        Self::parse(body)
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn digest(&self) -> &ContentDigest {
        &self.digest
    }

    /// `id` and everything nested below it, in document order.
    pub fn subtree(&self, id: NodeId) -> &[Node] {
        &self.nodes[id..self.nodes[id].end]
    }

    /// Ids of all strict descendants of `id`.
    pub fn descendants(&self, id: NodeId) -> Range<NodeId> {
        (id + 1)..self.nodes[id].end
    }
}
