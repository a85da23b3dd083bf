//! Reverse relations.
//!
//! [`BackrefIndex`] scans the whole model once for link fields and records,
//! per target content type, which content types link to it and through
//! which fields. From that index a [`BackrefType`] is derived for every
//! content type with at least one incoming link.

use std::sync::Arc;

use contentgraph_model::{ContentModel, ContentType};
use indexmap::IndexMap;

use super::registry::{SchemaType, TypeRegistry};
use crate::error::SchemaError;

/// Name of the argument restricting a backref field to one linking field.
pub const VIA_ARGUMENT: &str = "via";

/// One field of a [`BackrefType`]: the entries of one referencing content type.
#[derive(Debug, Clone)]
pub struct BackrefField {
    /// Field name: the referencing content type's singular field name.
    pub name: String,
    /// Type of the referencing entries.
    pub referencing: Arc<SchemaType>,
    /// Link fields of the referencing content type pointing at the target.
    pub field_ids: Vec<String>,
}

/// Reverse-lookup type of a content type.
#[derive(Debug, Clone)]
pub struct BackrefType {
    /// GraphQL type name (e.g. `PersonBackrefs`).
    pub name: String,
    /// Content type the links point to.
    pub target_id: String,
    /// One field per referencing content type, in model order.
    pub fields: Vec<BackrefField>,
}

/// Incoming links of every content type of a model.
#[derive(Debug, Clone, Default)]
pub struct BackrefIndex {
    /// target id -> referencing content type id -> linking field ids
    incoming: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl BackrefIndex {
    /// Records every link and link-list field of the model.
    #[must_use]
    pub fn scan(model: &ContentModel) -> Self {
        let mut incoming: IndexMap<String, IndexMap<String, Vec<String>>> = IndexMap::new();

        for content_type in model.iter() {
            for field in content_type.link_fields() {
                if let Some(target) = field.kind.link_target() {
                    incoming
                        .entry(target.to_string())
                        .or_default()
                        .entry(content_type.id.clone())
                        .or_default()
                        .push(field.id.clone());
                }
            }
        }

        Self { incoming }
    }

    /// Returns true if any field links to the content type.
    #[must_use]
    pub fn has_incoming(&self, target_id: &str) -> bool {
        self.incoming.contains_key(target_id)
    }

    /// Builds the reverse-lookup type of `target`, or `None` without incoming links.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownContentType` if a referencing content type
    /// is missing from the registry.
    pub fn backref_type(
        &self,
        target: &ContentType,
        registry: &TypeRegistry,
    ) -> Result<Option<BackrefType>, SchemaError> {
        let Some(by_type) = self.incoming.get(&target.id) else {
            return Ok(None);
        };

        let fields = by_type
            .iter()
            .map(|(ct_id, field_ids)| {
                let referencing = registry.lookup(ct_id)?;
                Ok(BackrefField {
                    name: referencing.content_type().names.field.clone(),
                    referencing,
                    field_ids: field_ids.clone(),
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        Ok(Some(BackrefType {
            name: target.names.backrefs_type(),
            target_id: target.id.clone(),
            fields,
        }))
    }
}
