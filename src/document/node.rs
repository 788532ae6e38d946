/// Index of a node inside a [`TitleDocument`](super::TitleDocument).
///
/// Nodes are stored in document (pre-)order, so index order is document order.
pub type NodeId = usize;

/// One element of a parsed title.
///
/// `text` is the character data before the first child element, `tail` the
/// character data between this element's end and the next sibling (or the
/// parent's end). Both are kept untrimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    /// The structural type (`TYPE` attribute), e.g. `PART`.
    pub kind: Option<String>,
    /// The identifying label (`N` attribute), e.g. `100`.
    pub label: Option<String>,
    pub text: Option<String>,
    pub tail: Option<String>,
    pub(crate) end: NodeId,
}

impl Node {
    pub(crate) fn element(tag: String, kind: Option<String>, label: Option<String>) -> Self {
        Self {
            tag,
            kind,
            label,
            text: None,
            tail: None,
            end: NodeId::MAX,
        }
    }

    /// True when `TYPE` and `N` both equal the given values.
    pub fn matches(&self, kind: &str, label: &str) -> bool {
        self.kind.as_deref() == Some(kind) && self.label.as_deref() == Some(label)
    }

    /// Section-level divisions are `DIV*` elements typed `SECTION`.
    pub fn is_section(&self) -> bool {
        self.tag.starts_with("DIV") && self.kind.as_deref() == Some("SECTION")
    }
}
