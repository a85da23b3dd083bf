//! Singular entry lookup resolver.

use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use tracing::debug;

use super::{get_query_context, loader_error, normalized_query};
use crate::schema::ArgSet;

/// Resolver for singular lookups such as `post(id: "p1")` or `post(slug: "hello")`.
pub struct EntryResolver;

impl EntryResolver {
    /// Creates a resolver function for a content type's singular field.
    ///
    /// A lookup without a match resolves to null.
    pub fn resolve(
        content_type_id: String,
        args: Arc<ArgSet>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let content_type_id = content_type_id.clone();
            let args = Arc::clone(&args);
            FieldFuture::new(async move {
                let query_ctx = get_query_context(&ctx)?;
                let query = normalized_query(&ctx, &args, query_ctx)?;

                debug!(
                    content_type = %content_type_id,
                    query = ?query,
                    request_id = %query_ctx.request_id,
                    "Resolving entry lookup"
                );

                let entry = query_ctx
                    .loader
                    .get(&content_type_id, &query)
                    .await
                    .map_err(|e| loader_error(&content_type_id, e))?;

                debug!(
                    content_type = %content_type_id,
                    found = entry.is_some(),
                    "Entry lookup completed"
                );
                Ok(entry.map(FieldValue::owned_any))
            })
        }
    }
}
