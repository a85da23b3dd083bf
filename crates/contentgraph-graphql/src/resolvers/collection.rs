//! Collection resolver.

use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use tracing::debug;

use super::{get_query_context, loader_error, normalized_query};
use crate::schema::ArgSet;

/// Resolver for collection queries such as `posts(q: "rust", limit: 10)`.
pub struct CollectionResolver;

impl CollectionResolver {
    /// Creates a resolver function for a content type's collection field.
    ///
    /// No matches resolve to an empty list.
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
                    "Resolving collection query"
                );

                let entries = query_ctx
                    .loader
                    .query(&content_type_id, &query)
                    .await
                    .map_err(|e| loader_error(&content_type_id, e))?;

                debug!(
                    content_type = %content_type_id,
                    count = entries.len(),
                    "Collection query completed"
                );
                Ok(Some(FieldValue::list(
                    entries.into_iter().map(FieldValue::owned_any),
                )))
            })
        }
    }
}
