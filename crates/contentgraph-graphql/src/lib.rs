//! # contentgraph-graphql
//!
//! GraphQL query schema synthesis for contentgraph content models.
//!
//! Given a [`ContentModel`](contentgraph_model::ContentModel), this crate
//! builds an `async_graphql` dynamic schema exposing, for every content type:
//!
//! - a singular lookup field (`post(id: ..., slug: ...)`)
//! - a filterable collection field (`posts(q: ..., skip: ..., limit: ...)`)
//! - a collection count field (`_postsMeta(q: ...) { count }`)
//!
//! Entry types carry a `sys` identity block, one field per content field,
//! and `_backrefs` when other content types link to them. Resolvers delegate
//! all data access to an [`EntryLoader`](contentgraph_loader::EntryLoader)
//! found in the [`QueryContext`].
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use contentgraph_graphql::{ContentSchemaBuilder, GraphQLConfig, QueryContext};
//!
//! let config = GraphQLConfig::from_toml_str(&config_source)?;
//! let schema = ContentSchemaBuilder::new(config.to_schema_builder_config())
//!     .build_from_json(&model_source)?;
//!
//! let context = QueryContext::builder()
//!     .with_loader(Arc::new(loader))
//!     .with_request_id("req-1")
//!     .build()?;
//! let response = schema
//!     .execute(async_graphql::Request::new("{ posts { title } }").data(context))
//!     .await;
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! [graphql]
//! query_type_name = "Query"
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! argument_naming = "bare"
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`schema`] - Schema synthesis and lazy loading
//! - [`resolvers`] - Field resolvers
//! - [`context`] - Query execution context
//! - [`error`] - Error types

pub mod config;
pub mod context;
pub mod error;
pub mod resolvers;
pub mod schema;

// Re-export main types
pub use config::GraphQLConfig;
pub use context::{ContextBuilderError, QueryContext, QueryContextBuilder};
pub use error::{GraphQLError, SchemaError};
pub use schema::{
    ArgumentComposer, ArgumentOptions, ContentSchemaBuilder, LazySchema, NamingPolicy,
    SchemaBuilderConfig, SchemaState, SynthesizedSchema, TypeRegistry,
};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;
