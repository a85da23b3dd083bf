//! # contentgraph-loader
//!
//! The entry loader contract used by the contentgraph query schema.
//!
//! The synthesized schema never touches storage itself: every resolver
//! normalizes its arguments into an [`EntryQuery`] and delegates to an
//! [`EntryLoader`]. This crate defines that trait, the argument and error
//! types, and an [`InMemoryLoader`] for tests and small static data sets.
//!
//! ## Example
//!
//! ```ignore
//! use contentgraph_loader::{EntryLoader, EntryQuery, InMemoryLoader};
//!
//! let loader = InMemoryLoader::with_entries(entries)?;
//! let posts = loader
//!     .query("post", &EntryQuery::new().with_q("rust").with_limit(10))
//!     .await?;
//! ```
//!
//! ## Loader Backends
//!
//! To plug in a backend, implement [`EntryLoader`]:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use contentgraph_loader::{Entry, EntryLoader, EntryQuery, LoaderError};
//!
//! struct CdnLoader {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl EntryLoader for CdnLoader {
//!     async fn get(&self, ct: &str, q: &EntryQuery) -> Result<Option<Entry>, LoaderError> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

pub mod entry;
mod error;
mod memory;
mod traits;
mod types;

pub use error::{ErrorCategory, LoaderError};
pub use memory::{DEFAULT_INCLUDE, DEFAULT_LIMIT, InMemoryLoader, MAX_INCLUDE};
pub use traits::EntryLoader;
pub use types::{Entry, EntryQuery, SortParam};

/// Type alias for a loader result.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Type alias for a shared loader trait object.
pub type DynEntryLoader = std::sync::Arc<dyn EntryLoader>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use contentgraph_loader::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, LoaderError};
    pub use crate::memory::InMemoryLoader;
    pub use crate::traits::EntryLoader;
    pub use crate::types::{Entry, EntryQuery, SortParam};
    pub use crate::{DynEntryLoader, LoaderResult};
}
