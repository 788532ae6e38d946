pub mod document;
pub mod node;
pub mod parser;

pub use crate::types::identifiers::{ContentDigest, DocumentKey};
pub use document::{DocumentError, TitleDocument};
pub use node::{Node, NodeId};
