//! Word and section counts of federal regulatory text, per issuing agency.
//!
//! `cfr-tally` resolves each agency's structural references (title, chapter,
//! part, section, ...) against the latest version of each title, fetching
//! every title document at most once per run, and rolls the counts up over
//! the agency's direct children. Given the same documents and references,
//! the totals are identical on every run.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod document;
pub mod extraction;
pub mod import;
pub mod logging;
pub mod source;
pub mod types;
