//! Query execution context.
//!
//! The context carries what resolvers need at query time. It is constructed
//! per request and attached with `Request::data`.
//!
//! # Example
//!
//! ```ignore
//! use contentgraph_graphql::QueryContextBuilder;
//!
//! let context = QueryContextBuilder::new()
//!     .with_loader(loader.clone())
//!     .with_default_locale("en-US")
//!     .with_request_id("req-123")
//!     .build()?;
//!
//! let response = schema
//!     .execute(async_graphql::Request::new(query).data(context))
//!     .await;
//! ```

use contentgraph_loader::DynEntryLoader;

/// Query execution context.
///
/// `Clone` and `Send + Sync`; the loader is shared through an `Arc`.
#[derive(Clone)]
pub struct QueryContext {
    /// Entry loader every resolver delegates to.
    pub loader: DynEntryLoader,

    /// Request ID for tracing and correlation.
    pub request_id: String,

    /// Locale used when a query does not pass one.
    pub default_locale: Option<String>,
}

impl QueryContext {
    /// Creates a new builder for QueryContext.
    #[must_use]
    pub fn builder() -> QueryContextBuilder {
        QueryContextBuilder::default()
    }

    /// Name of the loader backend, for diagnostics.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.loader.backend_name()
    }
}

impl std::fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryContext")
            .field("loader", &self.loader.backend_name())
            .field("request_id", &self.request_id)
            .field("default_locale", &self.default_locale)
            .finish()
    }
}

/// Builder for constructing QueryContext.
///
/// Validates that the required fields are provided.
#[derive(Default)]
pub struct QueryContextBuilder {
    loader: Option<DynEntryLoader>,
    request_id: Option<String>,
    default_locale: Option<String>,
}

impl QueryContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entry loader.
    #[must_use]
    pub fn with_loader(mut self, loader: DynEntryLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Sets the default locale.
    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    /// Builds the QueryContext.
    ///
    /// # Errors
    ///
    /// Returns an error if the loader or request id is missing.
    pub fn build(self) -> Result<QueryContext, ContextBuilderError> {
        let loader = self
            .loader
            .ok_or(ContextBuilderError::MissingField("loader"))?;

        let request_id = self
            .request_id
            .ok_or(ContextBuilderError::MissingField("request_id"))?;

        Ok(QueryContext {
            loader,
            request_id,
            default_locale: self.default_locale,
        })
    }
}

/// Errors that can occur when building a QueryContext.
#[derive(Debug, thiserror::Error)]
pub enum ContextBuilderError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
