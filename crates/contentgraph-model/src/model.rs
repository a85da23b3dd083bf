//! The content-model graph and its untyped source format.
//!
//! The model source is a JSON array of content types:
//!
//! ```json
//! [
//!   {
//!     "id": "post",
//!     "name": "Post",
//!     "fields": [
//!       { "id": "title", "type": "String" },
//!       { "id": "tags", "type": "Array<String>" },
//!       { "id": "author", "type": "Link", "linkedCt": "person" }
//!     ]
//!   }
//! ]
//! ```
//!
//! `names` may be given explicitly (`{"type", "field", "collectionField"}`);
//! otherwise they are derived from `name`.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content_type::{ContentType, ContentTypeNames};
use crate::error::ModelError;
use crate::field::{Field, FieldKind, FieldKindError};

/// A content type as found in the model source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContentType {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<ContentTypeNames>,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// A field as found in the model source. The kind is still an untyped tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_ct: Option<String>,
}

impl RawContentType {
    /// Converts the raw record into a typed content type.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnsupportedFieldKind` for unknown kind tags and
    /// `ModelError::MissingLinkTarget` for link fields without `linkedCt`.
    pub fn into_content_type(self) -> Result<ContentType, ModelError> {
        let names = match (self.names, &self.name) {
            (Some(names), _) => names,
            (None, Some(name)) => ContentTypeNames::derive(name),
            (None, None) => return Err(ModelError::MissingNames(self.id)),
        };

        let mut fields = Vec::with_capacity(self.fields.len());
        for raw in self.fields {
            let kind = match FieldKind::from_tag(&raw.kind, raw.linked_ct.as_deref()) {
                Ok(kind) => kind,
                Err(FieldKindError::Unsupported) => {
                    return Err(ModelError::unsupported_field_kind(&self.id, raw.id, raw.kind));
                }
                Err(FieldKindError::MissingTarget) => {
                    return Err(ModelError::MissingLinkTarget {
                        content_type: self.id,
                        field: raw.id,
                    });
                }
            };
            fields.push(Field::new(raw.id, kind));
        }

        Ok(ContentType::new(self.id, names, fields))
    }
}

/// The full, ordered set of content types.
///
/// Iteration order is input order. Content type ids are unique.
#[derive(Debug, Clone, Default)]
pub struct ContentModel {
    content_types: IndexMap<String, Arc<ContentType>>,
}

impl ContentModel {
    /// Builds a model from typed content types.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate ids, invalid names, or reserved field ids.
    pub fn new(content_types: impl IntoIterator<Item = ContentType>) -> Result<Self, ModelError> {
        let mut map = IndexMap::new();
        for ct in content_types {
            ct.validate()?;
            if map.contains_key(&ct.id) {
                return Err(ModelError::DuplicateContentType(ct.id));
            }
            map.insert(ct.id.clone(), Arc::new(ct));
        }

        debug!(count = map.len(), "Content model assembled");
        Ok(Self { content_types: map })
    }

    /// Parses a model from its JSON source text.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Json` for malformed input and any error of
    /// [`ContentModel::from_raw`].
    pub fn from_json_str(source: &str) -> Result<Self, ModelError> {
        let raw: Vec<RawContentType> = serde_json::from_str(source)?;
        Self::from_raw(raw)
    }

    /// Parses a model from an already decoded JSON value.
    ///
    /// # Errors
    ///
    /// Same as [`ContentModel::from_json_str`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, ModelError> {
        let raw: Vec<RawContentType> = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    /// Converts raw records into a model.
    ///
    /// # Errors
    ///
    /// Returns the first conversion or validation error encountered.
    pub fn from_raw(raw: Vec<RawContentType>) -> Result<Self, ModelError> {
        let content_types = raw
            .into_iter()
            .map(RawContentType::into_content_type)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(content_types)
    }

    /// Looks up a content type by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<ContentType>> {
        self.content_types.get(id)
    }

    /// Returns true if a content type with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.content_types.contains_key(id)
    }

    /// Iterates over content types in input order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ContentType>> {
        self.content_types.values()
    }

    /// Number of content types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content_types.len()
    }

    /// Returns true if the model has no content types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ScalarKind;
    use serde_json::json;

    fn blog() -> serde_json::Value {
        json!([
            {
                "id": "post",
                "name": "Post",
                "fields": [
                    { "id": "title", "type": "String" },
                    { "id": "views", "type": "Int" },
                    { "id": "tags", "type": "Array<String>" },
                    { "id": "author", "type": "Link", "linkedCt": "person" }
                ]
            },
            {
                "id": "person",
                "names": { "type": "Author", "field": "author", "collectionField": "authors" },
                "fields": [
                    { "id": "name", "type": "String" }
                ]
            }
        ])
    }

    #[test]
    fn test_from_value_preserves_order() {
        let model = ContentModel::from_value(blog()).unwrap();
        let ids: Vec<_> = model.iter().map(|ct| ct.id.as_str()).collect();
        assert_eq!(ids, vec!["post", "person"]);
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_from_value_derives_and_keeps_names() {
        let model = ContentModel::from_value(blog()).unwrap();
        let post = model.get("post").unwrap();
        assert_eq!(post.names.type_name, "Post");
        assert_eq!(post.names.collection_field, "posts");

        let person = model.get("person").unwrap();
        assert_eq!(person.names.type_name, "Author");
        assert_eq!(person.names.collection_field, "authors");
    }

    #[test]
    fn test_from_value_parses_kinds() {
        let model = ContentModel::from_value(blog()).unwrap();
        let post = model.get("post").unwrap();
        assert_eq!(
            post.field("views").unwrap().kind,
            FieldKind::Scalar(ScalarKind::Int)
        );
        assert_eq!(
            post.field("tags").unwrap().kind,
            FieldKind::ScalarList(ScalarKind::String)
        );
        assert_eq!(
            post.field("author").unwrap().kind,
            FieldKind::Link("person".into())
        );
    }

    #[test]
    fn test_unsupported_kind() {
        let source = r#"[{"id": "venue", "name": "Venue", "fields": [{"id": "where", "type": "Location"}]}]"#;
        let err = ContentModel::from_json_str(source).unwrap_err();
        assert!(matches!(
            err,
            ModelError::UnsupportedFieldKind { ref content_type, ref field, ref kind }
                if content_type == "venue" && field == "where" && kind == "Location"
        ));
    }

    #[test]
    fn test_missing_link_target() {
        let source = r#"[{"id": "post", "name": "Post", "fields": [{"id": "author", "type": "Link"}]}]"#;
        assert!(matches!(
            ContentModel::from_json_str(source),
            Err(ModelError::MissingLinkTarget { .. })
        ));
    }

    #[test]
    fn test_missing_names() {
        let source = r#"[{"id": "post", "fields": []}]"#;
        assert!(matches!(
            ContentModel::from_json_str(source),
            Err(ModelError::MissingNames(id)) if id == "post"
        ));
    }

    #[test]
    fn test_duplicate_content_type() {
        let source = r#"[{"id": "post", "name": "Post"}, {"id": "post", "name": "Article"}]"#;
        assert!(matches!(
            ContentModel::from_json_str(source),
            Err(ModelError::DuplicateContentType(id)) if id == "post"
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ContentModel::from_json_str("{not json"),
            Err(ModelError::Json(_))
        ));
    }
}
