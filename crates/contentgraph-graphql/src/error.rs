//! Error types for the GraphQL layer.
//!
//! [`SchemaError`] covers synthesis: it is raised while a content model is
//! turned into a schema and is always fatal. [`GraphQLError`] covers the
//! runtime side (the lazy schema holder and resolvers) and knows how to
//! present itself to a client.

use std::fmt;

use async_graphql::ErrorExtensions;
use contentgraph_loader::LoaderError;
use contentgraph_model::ModelError;

/// Errors raised while synthesizing a schema from a content model.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The content model itself is invalid (including unsupported field kinds).
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Two root query fields share a name.
    #[error("Duplicate root field name: {0}")]
    DuplicateFieldName(String),

    /// Two types of the schema share a name.
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    /// A link field targets a content type that is not part of the model.
    #[error("Field {content_type}.{field} links to unknown content type {target}")]
    UnresolvedLinkTarget {
        /// The content type declaring the link.
        content_type: String,
        /// The link field id.
        field: String,
        /// The missing target id.
        target: String,
    },

    /// A content type id was requested that the model does not contain.
    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    /// The query engine rejected the materialized schema.
    #[error("Schema rejected by the query engine: {0}")]
    Engine(String),
}

impl SchemaError {
    /// Returns true if the model declared a field kind the schema cannot represent.
    #[must_use]
    pub fn is_unsupported_field_kind(&self) -> bool {
        matches!(self, Self::Model(ModelError::UnsupportedFieldKind { .. }))
    }
}

/// Errors surfaced while serving queries.
#[derive(Debug)]
pub enum GraphQLError {
    /// Schema is still being built; the client should retry.
    SchemaInitializing,

    /// Schema build failed.
    SchemaBuildFailed(String),

    /// A query argument could not be normalized.
    InvalidArgument(String),

    /// The entry loader failed.
    Loader(LoaderError),

    /// Internal error.
    Internal(String),
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaInitializing => {
                write!(f, "GraphQL schema is initializing, please retry")
            }
            Self::SchemaBuildFailed(msg) => {
                write!(f, "Failed to build GraphQL schema: {msg}")
            }
            Self::InvalidArgument(msg) => {
                write!(f, "Invalid argument: {msg}")
            }
            Self::Loader(err) => write!(f, "{err}"),
            Self::Internal(msg) => {
                write!(f, "Internal error: {msg}")
            }
        }
    }
}

impl std::error::Error for GraphQLError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Loader(err) => Some(err),
            _ => None,
        }
    }
}

impl GraphQLError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SchemaInitializing => 503,
            Self::SchemaBuildFailed(_) => 500,
            Self::InvalidArgument(_) => 400,
            Self::Loader(err) => match err {
                LoaderError::NotFound { .. } => 404,
                LoaderError::InvalidArguments { .. } | LoaderError::InvalidEntry { .. } => 400,
                LoaderError::Unavailable { .. } => 503,
                LoaderError::Internal { .. } => 500,
            },
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SchemaInitializing => "SCHEMA_INITIALIZING",
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Loader(err) => err.code(),
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the Retry-After header value in seconds, if applicable.
    #[must_use]
    pub fn retry_after(&self) -> Option<u32> {
        match self {
            Self::SchemaInitializing => Some(5),
            Self::Loader(LoaderError::Unavailable { .. }) => Some(1),
            _ => None,
        }
    }
}

impl ErrorExtensions for GraphQLError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.error_code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| ext.set("code", code))
    }
}

impl From<LoaderError> for GraphQLError {
    fn from(err: LoaderError) -> Self {
        Self::Loader(err)
    }
}

impl From<SchemaError> for GraphQLError {
    fn from(err: SchemaError) -> Self {
        Self::SchemaBuildFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GraphQLError::SchemaInitializing.status_code(), 503);
        assert_eq!(GraphQLError::InvalidArgument("skip".into()).status_code(), 400);
        assert_eq!(
            GraphQLError::from(LoaderError::not_found("post", "p1")).status_code(),
            404
        );
        assert_eq!(
            GraphQLError::from(LoaderError::unavailable("down")).status_code(),
            503
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GraphQLError::SchemaInitializing.error_code(),
            "SCHEMA_INITIALIZING"
        );
        assert_eq!(
            GraphQLError::from(LoaderError::invalid_arguments("bad")).error_code(),
            "INVALID_ARGUMENTS"
        );
    }

    #[test]
    fn test_loader_message_is_unchanged() {
        let err = LoaderError::unavailable("connection refused");
        let message = err.to_string();
        assert_eq!(GraphQLError::from(err).to_string(), message);
    }

    #[test]
    fn test_retry_after() {
        assert_eq!(GraphQLError::SchemaInitializing.retry_after(), Some(5));
        assert_eq!(GraphQLError::Internal("x".into()).retry_after(), None);
    }

    #[test]
    fn test_extend_sets_code() {
        let err = GraphQLError::InvalidArgument("skip must not be negative".into()).extend();
        assert_eq!(err.message, "Invalid argument: skip must not be negative");
        let code = err
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(code, Some(async_graphql::Value::from("INVALID_ARGUMENT")));
    }

    #[test]
    fn test_schema_error_messages() {
        let err = SchemaError::UnresolvedLinkTarget {
            content_type: "post".into(),
            field: "author".into(),
            target: "person".into(),
        };
        assert_eq!(
            err.to_string(),
            "Field post.author links to unknown content type person"
        );

        let err = SchemaError::from(ModelError::unsupported_field_kind("post", "loc", "Location"));
        assert!(err.is_unsupported_field_kind());
        assert!(!SchemaError::DuplicateTypeName("Post".into()).is_unsupported_field_kind());
    }
}
