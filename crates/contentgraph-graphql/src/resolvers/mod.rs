//! Resolvers of the synthesized schema.
//!
//! Root resolvers normalize their arguments and call the entry loader:
//! - `entry`: singular lookup (e.g. `post(slug: "hello")`)
//! - `collection`: filtered list (e.g. `posts(q: "rust", limit: 10)`)
//! - `meta`: collection count (e.g. `_postsMeta { count }`)
//!
//! Entry type fields read the parent entry (`field`) or perform reverse
//! lookups (`backref`). Entries travel through the engine as
//! `serde_json::Value`s wrapped in `FieldValue::owned_any`.

mod backref;
mod collection;
mod entry;
mod field;
mod meta;

pub use backref::BackrefResolver;
pub use collection::CollectionResolver;
pub use entry::EntryResolver;
pub use field::FieldResolver;
pub use meta::MetaResolver;

use async_graphql::dynamic::ResolverContext;
use async_graphql::{Error, ErrorExtensions, Value};
use contentgraph_loader::{EntryQuery, LoaderError};
use tracing::warn;

use crate::context::QueryContext;
use crate::error::GraphQLError;
use crate::schema::ArgSet;

/// Helper to extract the query context from resolver context.
pub(crate) fn get_query_context<'a>(ctx: &'a ResolverContext<'_>) -> Result<&'a QueryContext, Error> {
    ctx.data::<QueryContext>()
        .map_err(|_| GraphQLError::Internal("query context not available".into()).extend())
}

/// The entry a field is resolved on, if the parent is one.
pub(crate) fn parent_entry<'a>(ctx: &'a ResolverContext<'_>) -> Option<&'a serde_json::Value> {
    ctx.parent_value.downcast_ref::<serde_json::Value>()
}

/// Normalizes the field's arguments into loader arguments.
///
/// The context's default locale fills in when no locale was given.
pub(crate) fn normalized_query(
    ctx: &ResolverContext<'_>,
    args: &ArgSet,
    query_ctx: &QueryContext,
) -> Result<EntryQuery, Error> {
    let mut values = Vec::new();
    for (name, value) in ctx.args.iter() {
        let json = value
            .as_value()
            .clone()
            .into_json()
            .map_err(|e| GraphQLError::InvalidArgument(format!("{name}: {e}")).extend())?;
        values.push((name.to_string(), json));
    }

    let mut query = args.normalize(values).map_err(|e| e.extend())?;
    if query.locale.is_none() {
        query.locale.clone_from(&query_ctx.default_locale);
    }
    Ok(query)
}

/// Converts a loader failure into an engine error, keeping its message.
pub(crate) fn loader_error(content_type: &str, err: LoaderError) -> Error {
    warn!(
        content_type = %content_type,
        error = %err,
        category = %err.category(),
        "Loader call failed"
    );
    GraphQLError::Loader(err).extend()
}

/// Convert a serde_json::Value to async_graphql::Value.
pub(crate) fn json_to_graphql_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(async_graphql::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            Value::List(arr.into_iter().map(json_to_graphql_value).collect())
        }
        serde_json::Value::Object(obj) => Value::Object(
            obj.into_iter()
                .map(|(k, v)| (async_graphql::Name::new(k), json_to_graphql_value(v)))
                .collect(),
        ),
    }
}
