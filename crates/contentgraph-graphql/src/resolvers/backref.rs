//! Reverse-lookup resolvers.
//!
//! `_backrefs` resolves to the id of the entry it is queried on. Each field
//! of the backrefs type then asks the loader for entries of one referencing
//! content type that link to that id:
//!
//! ```graphql
//! person(id: "a1") {
//!   _backrefs {
//!     post(via: "author") { title }
//!   }
//! }
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use async_graphql::ErrorExtensions;
use async_graphql::dynamic::{FieldFuture, FieldValue, InputValue, ResolverContext, TypeRef};
use contentgraph_loader::entry::entry_id;
use tracing::debug;

use super::{get_query_context, loader_error, parent_entry};
use crate::error::GraphQLError;
use crate::schema::{BackrefField, VIA_ARGUMENT};

/// Resolvers of the reverse-lookup fields.
pub struct BackrefResolver;

impl BackrefResolver {
    /// Resolver of `_backrefs`: the current entry's id.
    pub fn root() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let id = parent_entry(&ctx).and_then(entry_id).map(str::to_string);
                Ok(id.map(FieldValue::owned_any))
            })
        }
    }

    /// The optional `via` argument of backref fields.
    #[must_use]
    pub fn via_argument() -> InputValue {
        InputValue::new(VIA_ARGUMENT, TypeRef::named(TypeRef::STRING))
    }

    /// Resolver of one backrefs field.
    ///
    /// Calls the loader's reverse lookup once per linking field (or only for
    /// `via`), merges the results in field order and drops repeated entries.
    pub fn resolve(
        field: BackrefField,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        let field = Arc::new(field);
        move |ctx| {
            let field = Arc::clone(&field);
            FieldFuture::new(async move {
                let Some(target_id) = ctx.parent_value.downcast_ref::<String>().cloned() else {
                    return Err(GraphQLError::Internal(format!(
                        "{} resolved without the id of the linked entry",
                        field.name
                    ))
                    .extend());
                };
                let query_ctx = get_query_context(&ctx)?;
                let referencing = &field.referencing;

                let via = match ctx.args.get(VIA_ARGUMENT) {
                    Some(value) if !value.is_null() => Some(value.string()?.to_string()),
                    _ => None,
                };
                let field_ids: Vec<&str> = match via.as_deref() {
                    Some(via) if field.field_ids.iter().any(|f| f == via) => vec![via],
                    Some(via) => {
                        return Err(GraphQLError::InvalidArgument(format!(
                            "{via} is not a field of {} linking here; expected one of: {}",
                            referencing.content_type_id(),
                            field.field_ids.join(", ")
                        ))
                        .extend());
                    }
                    None => field.field_ids.iter().map(String::as_str).collect(),
                };

                debug!(
                    entry = %target_id,
                    content_type = %referencing.content_type_id(),
                    fields = ?field_ids,
                    request_id = %query_ctx.request_id,
                    "Resolving backrefs"
                );

                let mut seen = HashSet::new();
                let mut entries = Vec::new();
                for field_id in field_ids {
                    let found = query_ctx
                        .loader
                        .reverse_lookup(&target_id, referencing.content_type_id(), field_id)
                        .await
                        .map_err(|e| loader_error(referencing.content_type_id(), e))?;

                    for entry in found {
                        if !referencing.is_type_of(&entry) {
                            continue;
                        }
                        if let Some(id) = entry_id(&entry)
                            && !seen.insert(id.to_string())
                        {
                            continue;
                        }
                        entries.push(FieldValue::owned_any(entry));
                    }
                }

                debug!(count = entries.len(), "Backrefs resolved");
                Ok(Some(FieldValue::list(entries)))
            })
        }
    }
}
