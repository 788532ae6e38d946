pub mod agency;
pub mod aggregate;
pub mod identifiers;
pub mod reference;

pub use agency::Agency;
pub use aggregate::{AgencySnapshot, AggregateResult, ChildTotals, CorrectionTally, Counts};
pub use identifiers::{ContentDigest, DocumentKey, IssueDate, RawTitleNumber, TitleNumber};
pub use reference::{CfrReference, HierarchyLevel};
