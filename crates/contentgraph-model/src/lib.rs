//! # contentgraph-model
//!
//! Content-model graph types for contentgraph.
//!
//! A content model is an ordered set of [`ContentType`]s. Each content type
//! has schema names and a list of typed [`Field`]s; link fields point at
//! other content types (possibly forming cycles).
//!
//! Models are either assembled from typed values with [`ContentModel::new`]
//! or parsed from their JSON source with [`ContentModel::from_json_str`].
//! Unknown field kinds are rejected at this boundary, so everything
//! downstream works with the exhaustive [`FieldKind`] enum.

mod content_type;
mod error;
mod field;
mod model;
pub mod names;

pub use content_type::{ContentType, ContentTypeNames, RESERVED_FIELD_IDS};
pub use error::ModelError;
pub use field::{Field, FieldKind, FieldKindError, ScalarKind};
pub use model::{ContentModel, RawContentType, RawField};

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
