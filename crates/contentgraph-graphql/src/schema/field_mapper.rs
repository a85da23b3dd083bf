//! Mapping of content fields to schema fields.

use std::sync::Arc;

use async_graphql::dynamic::TypeRef;
use contentgraph_model::{ContentType, Field, FieldKind, ScalarKind};

use super::backrefs::BackrefType;
use super::base_types::SYS_TYPE;
use super::registry::{SchemaType, TypeRegistry};
use crate::error::SchemaError;

/// Output type of an entry type field.
///
/// The resolver bound to the field follows from the variant: scalars read
/// `entry[name]`, entry variants read the embedded linked entries and keep
/// those of the target type.
#[derive(Debug, Clone)]
pub enum FieldType {
    Scalar(ScalarKind),
    ScalarList(ScalarKind),
    Entry(Arc<SchemaType>),
    EntryList(Arc<SchemaType>),
    /// The `sys` identity block.
    Sys,
    /// The `_backrefs` reverse-lookup field.
    Backrefs(Arc<BackrefType>),
}

impl FieldType {
    /// GraphQL type reference of the field.
    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        match self {
            Self::Scalar(kind) => TypeRef::named(scalar_type_name(*kind)),
            Self::ScalarList(kind) => TypeRef::named_list(scalar_type_name(*kind)),
            Self::Entry(target) => TypeRef::named(target.name()),
            Self::EntryList(target) => TypeRef::named_nn_list(target.name()),
            Self::Sys => TypeRef::named_nn(SYS_TYPE),
            Self::Backrefs(backrefs) => TypeRef::named(backrefs.name.as_str()),
        }
    }
}

/// GraphQL scalar for a primitive kind.
#[must_use]
pub fn scalar_type_name(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String => TypeRef::STRING,
        ScalarKind::Int => TypeRef::INT,
        ScalarKind::Float => TypeRef::FLOAT,
        ScalarKind::Bool => TypeRef::BOOLEAN,
    }
}

/// A field of a synthesized entry type.
#[derive(Debug, Clone)]
pub struct SchemaField {
    /// Field name; equals the content field id for content fields.
    pub name: String,
    /// Output type.
    pub ty: FieldType,
}

impl SchemaField {
    /// Creates a new schema field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Maps one content field to its schema field.
pub struct FieldMapper;

impl FieldMapper {
    /// Maps a field of `content_type`.
    ///
    /// Link targets are looked up in the registry; the returned type may not
    /// have had its own fields evaluated yet.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnresolvedLinkTarget` if a link target is not registered.
    pub fn map(
        content_type: &ContentType,
        field: &Field,
        registry: &TypeRegistry,
    ) -> Result<SchemaField, SchemaError> {
        let target = |target_id: &str| {
            registry
                .get(target_id)
                .cloned()
                .ok_or_else(|| SchemaError::UnresolvedLinkTarget {
                    content_type: content_type.id.clone(),
                    field: field.id.clone(),
                    target: target_id.to_string(),
                })
        };

        let ty = match &field.kind {
            FieldKind::Scalar(kind) => FieldType::Scalar(*kind),
            FieldKind::ScalarList(kind) => FieldType::ScalarList(*kind),
            FieldKind::Link(target_id) => FieldType::Entry(target(target_id)?),
            FieldKind::LinkList(target_id) => FieldType::EntryList(target(target_id)?),
        };

        Ok(SchemaField::new(field.id.clone(), ty))
    }
}
