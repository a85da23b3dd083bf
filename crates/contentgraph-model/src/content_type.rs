//! Content type definitions.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::field::Field;
use crate::names::{is_valid_graphql_name, pluralize, to_camel_case, to_pascal_case};

/// Field ids every synthesized entry type already exposes.
pub const RESERVED_FIELD_IDS: &[&str] = &["sys", "_backrefs"];

/// Schema names configured for a content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeNames {
    /// Name of the object type (e.g. `Post`).
    #[serde(rename = "type")]
    pub type_name: String,
    /// Name of the singular root field (e.g. `post`).
    pub field: String,
    /// Name of the collection root field (e.g. `posts`).
    pub collection_field: String,
}

impl ContentTypeNames {
    /// Creates explicit names.
    #[must_use]
    pub fn new(
        type_name: impl Into<String>,
        field: impl Into<String>,
        collection_field: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            field: field.into(),
            collection_field: collection_field.into(),
        }
    }

    /// Derives names from a human readable content type name.
    ///
    /// `"Blog Post"` becomes `BlogPost` / `blogPost` / `blogPosts`.
    #[must_use]
    pub fn derive(display_name: &str) -> Self {
        let field = to_camel_case(display_name);
        Self {
            type_name: to_pascal_case(display_name),
            collection_field: pluralize(&field),
            field,
        }
    }

    /// Name of the collection meta root field (e.g. `_postsMeta`).
    #[must_use]
    pub fn meta_field(&self) -> String {
        format!("_{}Meta", self.collection_field)
    }

    /// Name of the reverse-relation type (e.g. `PostBackrefs`).
    #[must_use]
    pub fn backrefs_type(&self) -> String {
        format!("{}Backrefs", self.type_name)
    }
}

/// A content type: an entry kind with names and fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Unique id across the content model.
    pub id: String,
    /// Configured schema names.
    pub names: ContentTypeNames,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(id: impl Into<String>, names: ContentTypeNames, fields: Vec<Field>) -> Self {
        Self {
            id: id.into(),
            names,
            fields,
        }
    }

    /// Finds a field by id.
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Returns true if the content type declares a field with this id.
    #[must_use]
    pub fn has_field(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    /// Iterates over fields that link to other entries.
    pub fn link_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.kind.link_target().is_some())
    }

    /// Checks names and field ids.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid GraphQL names, reserved or repeated field ids.
    pub fn validate(&self) -> Result<(), ModelError> {
        let names = [
            ("type", &self.names.type_name),
            ("field", &self.names.field),
            ("collection field", &self.names.collection_field),
        ];
        for (kind, name) in names {
            if !is_valid_graphql_name(name) {
                return Err(ModelError::invalid_name(&self.id, kind, name.as_str()));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for field in &self.fields {
            if !is_valid_graphql_name(&field.id) {
                return Err(ModelError::invalid_name(&self.id, "field id", field.id.as_str()));
            }
            if RESERVED_FIELD_IDS.contains(&field.id.as_str()) {
                return Err(ModelError::ReservedFieldId {
                    content_type: self.id.clone(),
                    field: field.id.clone(),
                });
            }
            if !seen.insert(field.id.as_str()) {
                return Err(ModelError::DuplicateField {
                    content_type: self.id.clone(),
                    field: field.id.clone(),
                });
            }
        }

        Ok(())
    }
}
