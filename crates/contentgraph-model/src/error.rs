//! Error types for content-model construction.
//!
//! Every variant describes an invalid content model. These errors are raised
//! while the model is parsed or assembled, long before any query runs.

/// Errors that can occur while building a [`ContentModel`](crate::ContentModel).
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A field declares a kind tag the schema cannot represent.
    #[error("Unsupported field kind '{kind}' on {content_type}.{field}")]
    UnsupportedFieldKind {
        /// The content type declaring the field.
        content_type: String,
        /// The offending field id.
        field: String,
        /// The kind tag as found in the model source.
        kind: String,
    },

    /// A link field does not name the content type it links to.
    #[error("Link field {content_type}.{field} has no target content type")]
    MissingLinkTarget {
        /// The content type declaring the field.
        content_type: String,
        /// The offending field id.
        field: String,
    },

    /// Two content types share the same id.
    #[error("Duplicate content type id: {0}")]
    DuplicateContentType(String),

    /// Two fields of one content type share the same id.
    #[error("Duplicate field id {field} on content type {content_type}")]
    DuplicateField {
        /// The content type declaring the fields.
        content_type: String,
        /// The repeated field id.
        field: String,
    },

    /// A type or field name is not a valid GraphQL name.
    #[error("Invalid {kind} name '{name}' on content type {content_type}")]
    InvalidName {
        /// The content type the name belongs to.
        content_type: String,
        /// What the name is used for (`type`, `field`, `collection field`, `field id`).
        kind: &'static str,
        /// The rejected name.
        name: String,
    },

    /// A field id collides with a field every entry type carries.
    #[error("Field id '{field}' on content type {content_type} is reserved")]
    ReservedFieldId {
        /// The content type declaring the field.
        content_type: String,
        /// The reserved id.
        field: String,
    },

    /// Content type carries neither explicit names nor a display name to derive them from.
    #[error("Content type {0} has neither names nor a display name")]
    MissingNames(String),

    /// The model source is not valid JSON or does not have the expected shape.
    #[error("Invalid content model source: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Creates a new `UnsupportedFieldKind` error.
    #[must_use]
    pub fn unsupported_field_kind(
        content_type: impl Into<String>,
        field: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self::UnsupportedFieldKind {
            content_type: content_type.into(),
            field: field.into(),
            kind: kind.into(),
        }
    }

    /// Creates a new `InvalidName` error.
    #[must_use]
    pub fn invalid_name(
        content_type: impl Into<String>,
        kind: &'static str,
        name: impl Into<String>,
    ) -> Self {
        Self::InvalidName {
            content_type: content_type.into(),
            kind,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_field_kind_message() {
        let err = ModelError::unsupported_field_kind("post", "location", "Location");
        assert_eq!(
            err.to_string(),
            "Unsupported field kind 'Location' on post.location"
        );
    }

    #[test]
    fn test_invalid_name_message() {
        let err = ModelError::invalid_name("post", "type", "Blog-Post");
        assert_eq!(
            err.to_string(),
            "Invalid type name 'Blog-Post' on content type post"
        );
    }
}
