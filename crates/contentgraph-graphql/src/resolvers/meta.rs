//! Collection meta resolver.

use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use serde_json::json;
use tracing::debug;

use super::{get_query_context, loader_error, normalized_query};
use crate::schema::ArgSet;

/// Resolver for collection meta fields such as `_postsMeta(q: "rust") { count }`.
pub struct MetaResolver;

impl MetaResolver {
    /// Creates a resolver function returning `{ count }` for a content type.
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

                let count = query_ctx
                    .loader
                    .count(&content_type_id, &query)
                    .await
                    .map_err(|e| loader_error(&content_type_id, e))?;

                debug!(content_type = %content_type_id, count, "Collection count completed");
                Ok(Some(FieldValue::owned_any(json!({ "count": count }))))
            })
        }
    }
}
