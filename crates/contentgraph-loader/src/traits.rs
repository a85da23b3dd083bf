//! The loader contract.

use async_trait::async_trait;

use crate::error::LoaderError;
use crate::types::{Entry, EntryQuery};

/// Fetches, filters, paginates, counts and reverse-looks-up entries.
///
/// Every resolver of the synthesized schema delegates to this trait.
/// Implementations must be thread-safe (`Send + Sync`); errors are passed
/// through to the query engine as-is.
///
/// # Example
///
/// ```ignore
/// use contentgraph_loader::{Entry, EntryLoader, EntryQuery, LoaderError};
///
/// async fn first_post(loader: &dyn EntryLoader) -> Result<Option<Entry>, LoaderError> {
///     let query = EntryQuery::new().with_limit(1).with_order("-sys.createdAt");
///     Ok(loader.query("post", &query).await?.into_iter().next())
/// }
/// ```
#[async_trait]
pub trait EntryLoader: Send + Sync {
    /// Loads one entry, by `query.id` or by the first match of `query.filters`.
    ///
    /// Returns `None` when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues or invalid arguments,
    /// not for missing entries.
    async fn get(
        &self,
        content_type_id: &str,
        query: &EntryQuery,
    ) -> Result<Option<Entry>, LoaderError>;

    /// Loads the entries of a content type matching the query.
    ///
    /// Returns an empty list when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid arguments or infrastructure issues.
    async fn query(
        &self,
        content_type_id: &str,
        query: &EntryQuery,
    ) -> Result<Vec<Entry>, LoaderError>;

    /// Counts the entries of a content type matching the query, ignoring paging.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid arguments or infrastructure issues.
    async fn count(&self, content_type_id: &str, query: &EntryQuery) -> Result<u64, LoaderError>;

    /// Loads entries of `referencing_content_type_id` whose `field_id` links
    /// to `target_entry_id`.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn reverse_lookup(
        &self,
        target_entry_id: &str,
        referencing_content_type_id: &str,
        field_id: &str,
    ) -> Result<Vec<Entry>, LoaderError>;

    /// Returns the name of this loader backend.
    fn backend_name(&self) -> &'static str {
        "unknown"
    }
}
