pub mod catalog;
pub mod http;

use std::io::Read;

use thiserror::Error;

use crate::types::agency::Agency;
use crate::types::identifiers::DocumentKey;
pub use catalog::{CorrectionRecord, RawTitleNumber, TitleInfo};
pub use http::HttpSource;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("GET {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("Could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Where raw title bodies come from.
pub trait DocumentFetcher: Send + Sync {
    /// The body is returned as a stream; the caller parses it as it reads.
    fn fetch_document(&self, key: &DocumentKey) -> Result<Box<dyn Read + Send>, FetchError>;
}

impl<T: DocumentFetcher + ?Sized> DocumentFetcher for &T {
    fn fetch_document(&self, key: &DocumentKey) -> Result<Box<dyn Read + Send>, FetchError> {
        (**self).fetch_document(key)
    }
}

/// The small JSON listings: titles, agencies, corrections.
pub trait CatalogSource: Send + Sync {
    fn fetch_titles(&self) -> Result<Vec<TitleInfo>, FetchError>;
    fn fetch_agencies(&self) -> Result<Vec<Agency>, FetchError>;
    fn fetch_corrections(&self) -> Result<Vec<CorrectionRecord>, FetchError>;
}
