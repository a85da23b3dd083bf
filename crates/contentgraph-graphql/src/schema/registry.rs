//! Registry of synthesized entry types.
//!
//! The registry maps content type ids to [`SchemaType`]s. It is filled in a
//! single pass: [`TypeRegistry::get_or_create`] stores the type for an id
//! before walking that content type's link targets, so cyclic models
//! terminate. Field maps are not computed during this pass; they are produced
//! on demand by [`SchemaType::fields`] once the registry is complete.

use std::sync::Arc;

use contentgraph_loader::entry::content_type_id;
use contentgraph_model::{ContentModel, ContentType};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

use super::backrefs::{BackrefIndex, BackrefType};
use super::base_types::{BACKREFS_FIELD, SYS_FIELD};
use super::field_mapper::{FieldMapper, FieldType, SchemaField};
use crate::error::SchemaError;

/// The query-schema type of one content type.
#[derive(Debug)]
pub struct SchemaType {
    content_type: Arc<ContentType>,
}

impl SchemaType {
    fn new(content_type: Arc<ContentType>) -> Self {
        Self { content_type }
    }

    /// The GraphQL type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.content_type.names.type_name
    }

    /// Id of the underlying content type.
    #[must_use]
    pub fn content_type_id(&self) -> &str {
        &self.content_type.id
    }

    /// The underlying content type.
    #[must_use]
    pub fn content_type(&self) -> &Arc<ContentType> {
        &self.content_type
    }

    /// Returns true if the entry belongs to this type's content type.
    #[must_use]
    pub fn is_type_of(&self, entry: &Value) -> bool {
        content_type_id(entry) == Some(self.content_type.id.as_str())
    }

    /// Computes the field map: `sys`, one field per content field, and
    /// `_backrefs` when other content types link here.
    ///
    /// Pure; may be called any number of times once the registry is populated.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnresolvedLinkTarget` if a link target is not
    /// registered.
    pub fn fields(&self, registry: &TypeRegistry) -> Result<Vec<SchemaField>, SchemaError> {
        let mut fields = Vec::with_capacity(self.content_type.fields.len() + 2);
        fields.push(SchemaField::new(SYS_FIELD, FieldType::Sys));

        for field in &self.content_type.fields {
            fields.push(FieldMapper::map(&self.content_type, field, registry)?);
        }

        if let Some(backrefs) = self.backrefs(registry)? {
            fields.push(SchemaField::new(
                BACKREFS_FIELD,
                FieldType::Backrefs(Arc::new(backrefs)),
            ));
        }

        Ok(fields)
    }

    /// The reverse-relation type of this content type, if anything links here.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownContentType` if a referencing content type
    /// is not registered.
    pub fn backrefs(&self, registry: &TypeRegistry) -> Result<Option<BackrefType>, SchemaError> {
        registry.backref_index().backref_type(&self.content_type, registry)
    }
}

/// Content type id to [`SchemaType`] arena.
#[derive(Debug)]
pub struct TypeRegistry {
    model: Arc<ContentModel>,
    backrefs: BackrefIndex,
    types: IndexMap<String, Arc<SchemaType>>,
}

impl TypeRegistry {
    /// Creates an empty registry over a model.
    #[must_use]
    pub fn new(model: Arc<ContentModel>) -> Self {
        let backrefs = BackrefIndex::scan(&model);
        Self {
            model,
            backrefs,
            types: IndexMap::new(),
        }
    }

    /// Creates a registry with every content type of the model registered.
    ///
    /// # Errors
    ///
    /// Same as [`TypeRegistry::get_or_create`].
    pub fn populate(model: Arc<ContentModel>) -> Result<Self, SchemaError> {
        let mut registry = Self::new(Arc::clone(&model));
        for content_type in model.iter() {
            registry.get_or_create(&content_type.id)?;
        }
        Ok(registry)
    }

    /// Returns the type for a content type id, registering it (and everything
    /// it links to) on first request.
    ///
    /// Repeated calls return the same `Arc`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownContentType` for ids outside the model and
    /// `SchemaError::UnresolvedLinkTarget` when a reachable link field points
    /// outside the model.
    pub fn get_or_create(&mut self, id: &str) -> Result<Arc<SchemaType>, SchemaError> {
        if let Some(existing) = self.types.get(id) {
            return Ok(Arc::clone(existing));
        }

        let content_type = self
            .model
            .get(id)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownContentType(id.to_string()))?;

        let schema_type = Arc::new(SchemaType::new(Arc::clone(&content_type)));
        self.types
            .insert(content_type.id.clone(), Arc::clone(&schema_type));
        trace!(content_type = %id, type_name = %schema_type.name(), "Registered entry type");

        for field in content_type.link_fields() {
            let Some(target) = field.kind.link_target() else {
                continue;
            };
            if !self.model.contains(target) {
                return Err(SchemaError::UnresolvedLinkTarget {
                    content_type: content_type.id.clone(),
                    field: field.id.clone(),
                    target: target.to_string(),
                });
            }
            self.get_or_create(target)?;
        }

        Ok(schema_type)
    }

    /// Returns the registered type for an id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<SchemaType>> {
        self.types.get(id)
    }

    /// Returns the registered type for an id or `UnknownContentType`.
    ///
    /// # Errors
    ///
    /// Returns an error if the id has not been registered.
    pub fn lookup(&self, id: &str) -> Result<Arc<SchemaType>, SchemaError> {
        self.types
            .get(id)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownContentType(id.to_string()))
    }

    /// Iterates over registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<SchemaType>> {
        self.types.values()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The model this registry is built from.
    #[must_use]
    pub fn model(&self) -> &Arc<ContentModel> {
        &self.model
    }

    /// Incoming link index of the model.
    #[must_use]
    pub fn backref_index(&self) -> &BackrefIndex {
        &self.backrefs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentgraph_model::{ContentTypeNames, Field, ScalarKind};
    use serde_json::json;

    fn ct(id: &str, type_name: &str, fields: Vec<Field>) -> ContentType {
        let field = contentgraph_model::names::lowercase_first(type_name);
        let collection = format!("{field}s");
        ContentType::new(id, ContentTypeNames::new(type_name, field, collection), fields)
    }

    fn cyclic_model() -> Arc<ContentModel> {
        Arc::new(
            ContentModel::new(vec![
                ct(
                    "a",
                    "Alpha",
                    vec![Field::scalar("title", ScalarKind::String), Field::link("b", "b")],
                ),
                ct("b", "Beta", vec![Field::link_list("as", "a")]),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut registry = TypeRegistry::new(cyclic_model());
        let first = registry.get_or_create("a").unwrap();
        let second = registry.get_or_create("a").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cycle_terminates_and_registers_targets() {
        let mut registry = TypeRegistry::new(cyclic_model());
        registry.get_or_create("a").unwrap();
        assert_eq!(registry.len(), 2);

        let alpha = registry.lookup("a").unwrap();
        let beta = registry.lookup("b").unwrap();

        let alpha_fields = alpha.fields(&registry).unwrap();
        let link = alpha_fields.iter().find(|f| f.name == "b").unwrap();
        match &link.ty {
            FieldType::Entry(target) => assert!(Arc::ptr_eq(target, &beta)),
            other => panic!("unexpected field type {other:?}"),
        }

        let beta_fields = beta.fields(&registry).unwrap();
        let back = beta_fields.iter().find(|f| f.name == "as").unwrap();
        match &back.ty {
            FieldType::EntryList(target) => assert!(Arc::ptr_eq(target, &alpha)),
            other => panic!("unexpected field type {other:?}"),
        }
    }

    #[test]
    fn test_fields_can_be_evaluated_repeatedly() {
        let registry = TypeRegistry::populate(cyclic_model()).unwrap();
        let alpha = registry.lookup("a").unwrap();
        let first: Vec<String> = alpha.fields(&registry).unwrap().into_iter().map(|f| f.name).collect();
        let second: Vec<String> = alpha.fields(&registry).unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["sys", "title", "b", "_backrefs"]);
    }

    #[test]
    fn test_unresolved_link_target() {
        let model = Arc::new(
            ContentModel::new(vec![ct("post", "Post", vec![Field::link("author", "person")])])
                .unwrap(),
        );
        let mut registry = TypeRegistry::new(model);
        let err = registry.get_or_create("post").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnresolvedLinkTarget { ref target, .. } if target == "person"
        ));
    }

    #[test]
    fn test_unknown_content_type() {
        let mut registry = TypeRegistry::new(cyclic_model());
        assert!(matches!(
            registry.get_or_create("missing"),
            Err(SchemaError::UnknownContentType(_))
        ));
    }

    #[test]
    fn test_is_type_of() {
        let registry = TypeRegistry::populate(cyclic_model()).unwrap();
        let alpha = registry.lookup("a").unwrap();
        let entry = json!({"sys": {"id": "1", "contentType": {"sys": {"id": "a"}}}});
        let other = json!({"sys": {"id": "2", "contentType": {"sys": {"id": "b"}}}});
        assert!(alpha.is_type_of(&entry));
        assert!(!alpha.is_type_of(&other));
        assert!(!alpha.is_type_of(&json!({"sys": {"type": "Link", "id": "1"}})));
    }
}
