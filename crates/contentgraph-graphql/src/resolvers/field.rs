//! Entry type field resolvers.

use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, ResolverContext};

use super::backref::BackrefResolver;
use super::{json_to_graphql_value, parent_entry};
use crate::schema::{FieldType, SchemaField, SchemaType};

/// Resolvers reading values off the parent entry.
pub struct FieldResolver;

impl FieldResolver {
    /// Builds the engine field for a synthesized entry type field.
    #[must_use]
    pub fn field(schema_field: &SchemaField) -> Field {
        let name = schema_field.name.clone();
        let type_ref = schema_field.ty.type_ref();

        match &schema_field.ty {
            FieldType::Scalar(_) | FieldType::ScalarList(_) => {
                Field::new(name.clone(), type_ref, Self::property(name))
            }
            FieldType::Entry(target) => {
                Field::new(name.clone(), type_ref, Self::link(name, Arc::clone(target)))
            }
            FieldType::EntryList(target) => {
                Field::new(name.clone(), type_ref, Self::link_list(name, Arc::clone(target)))
            }
            FieldType::Sys => Field::new(name.clone(), type_ref, Self::object(name)),
            FieldType::Backrefs(_) => Field::new(name, type_ref, BackrefResolver::root()),
        }
    }

    /// Reads `parent[name]` as a plain value; missing and null yield null.
    pub fn property(
        name: String,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let name = name.clone();
            FieldFuture::new(async move {
                let value = parent_entry(&ctx)
                    .and_then(|entry| entry.get(&name))
                    .filter(|value| !value.is_null())
                    .cloned();
                Ok(value.map(|v| FieldValue::value(json_to_graphql_value(v))))
            })
        }
    }

    /// Reads the value at a JSON pointer below the parent.
    pub fn pointer(
        pointer: &'static str,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            FieldFuture::new(async move {
                let value = parent_entry(&ctx)
                    .and_then(|entry| entry.pointer(pointer))
                    .filter(|value| !value.is_null())
                    .cloned();
                Ok(value.map(|v| FieldValue::value(json_to_graphql_value(v))))
            })
        }
    }

    /// Passes `parent[name]` on as the parent of an object type.
    pub fn object(
        name: String,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let name = name.clone();
            FieldFuture::new(async move {
                let value = parent_entry(&ctx)
                    .and_then(|entry| entry.get(&name))
                    .filter(|value| value.is_object())
                    .cloned();
                Ok(value.map(FieldValue::owned_any))
            })
        }
    }

    /// Yields the embedded linked entry if it is an entry of `target`.
    ///
    /// Unresolved link stubs have no content type and resolve to null.
    pub fn link(
        name: String,
        target: Arc<SchemaType>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let name = name.clone();
            let target = Arc::clone(&target);
            FieldFuture::new(async move {
                let linked = parent_entry(&ctx)
                    .and_then(|entry| entry.get(&name))
                    .filter(|value| target.is_type_of(value))
                    .cloned();
                Ok(linked.map(FieldValue::owned_any))
            })
        }
    }

    /// Yields the embedded linked entries that are entries of `target`.
    pub fn link_list(
        name: String,
        target: Arc<SchemaType>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let name = name.clone();
            let target = Arc::clone(&target);
            FieldFuture::new(async move {
                let Some(items) = parent_entry(&ctx)
                    .and_then(|entry| entry.get(&name))
                    .and_then(|value| value.as_array())
                else {
                    return Ok(None);
                };

                let linked: Vec<FieldValue<'_>> = items
                    .iter()
                    .filter(|item| target.is_type_of(item))
                    .cloned()
                    .map(FieldValue::owned_any)
                    .collect();
                Ok(Some(FieldValue::list(linked)))
            })
        }
    }
}
