use serde::{Deserialize, Serialize};

use super::reference::CfrReference;

/// An issuing agency as listed upstream.
///
/// Only one level of `children` is aggregated; grandchildren are carried but
/// never traversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    pub name: String,
    pub slug: String,
    #[serde(rename = "cfr_references", default)]
    pub references: Vec<CfrReference>,
    #[serde(default)]
    pub children: Vec<Agency>,
}

impl Agency {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            references: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_reference(mut self, reference: CfrReference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn with_child(mut self, child: Agency) -> Self {
        self.children.push(child);
        self
    }
}
