//! Content-addressed on-disk ion cache.
//!
//! Entries live at `<root>/<compound expression>/<key>.result` (compressed
//! ion records) or `<root>/<compound expression>/<key>.invalid` (empty
//! sentinel for configurations the chemistry engine rejected). Entries are
//! written once and never deleted by this crate.

#![warn(missing_docs)]

pub mod artifact;
pub mod audit;
pub mod error;
pub mod store;

pub use artifact::ArtifactHeader;
pub use audit::AuditLog;
pub use error::StoreError;
pub use store::{CacheStore, EntryStatus, INVALID_EXT, RESULT_EXT};
