pub mod cache;
pub mod retention;
pub mod versioning;

pub use cache::{CacheError, DocumentCache, DocumentLease};
pub use retention::{CacheConfig, RetentionPolicy};
pub use versioning::TitleVersions;
