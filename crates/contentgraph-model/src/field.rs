//! Field descriptors of a content type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Primitive value kinds a field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Bool,
}

impl ScalarKind {
    /// Returns the tag used for this kind in the model source.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Bool => "Bool",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "String" | "Symbol" | "Text" => Ok(Self::String),
            "Int" | "Integer" => Ok(Self::Int),
            "Float" | "Number" => Ok(Self::Float),
            "Bool" | "Boolean" => Ok(Self::Bool),
            other => Err(other.to_string()),
        }
    }
}

/// Why a kind tag could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKindError {
    /// The tag is not a known kind.
    Unsupported,
    /// A link tag without a target content type.
    MissingTarget,
}

/// The kind of value a field holds.
///
/// Link variants carry the id of the content type they point to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A single primitive value.
    Scalar(ScalarKind),
    /// A list of primitive values.
    ScalarList(ScalarKind),
    /// A reference to one entry of the target content type.
    Link(String),
    /// A list of references to entries of the target content type.
    LinkList(String),
}

impl FieldKind {
    /// Parses a kind tag from the model source.
    ///
    /// `linked_ct` is only consulted for link tags.
    pub fn from_tag(tag: &str, linked_ct: Option<&str>) -> Result<Self, FieldKindError> {
        let target = || match linked_ct {
            Some(target) if !target.is_empty() => Ok(target.to_string()),
            _ => Err(FieldKindError::MissingTarget),
        };

        match tag {
            "Link" => Ok(Self::Link(target()?)),
            "Array<Link>" => Ok(Self::LinkList(target()?)),
            _ => {
                if let Some(inner) = tag
                    .strip_prefix("Array<")
                    .and_then(|rest| rest.strip_suffix('>'))
                {
                    inner
                        .parse()
                        .map(Self::ScalarList)
                        .map_err(|_| FieldKindError::Unsupported)
                } else {
                    tag.parse()
                        .map(Self::Scalar)
                        .map_err(|_| FieldKindError::Unsupported)
                }
            }
        }
    }

    /// Returns true for non-relational kinds: scalars and lists of scalars.
    #[must_use]
    pub fn is_plain_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::ScalarList(_))
    }

    /// Returns the primitive kind of a scalar or scalar-list field.
    #[must_use]
    pub fn scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(s) | Self::ScalarList(s) => Some(*s),
            Self::Link(_) | Self::LinkList(_) => None,
        }
    }

    /// Returns the target content type id of a link field.
    #[must_use]
    pub fn link_target(&self) -> Option<&str> {
        match self {
            Self::Link(target) | Self::LinkList(target) => Some(target),
            Self::Scalar(_) | Self::ScalarList(_) => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{s}"),
            Self::ScalarList(s) => write!(f, "Array<{s}>"),
            Self::Link(target) => write!(f, "Link({target})"),
            Self::LinkList(target) => write!(f, "Array<Link({target})>"),
        }
    }
}

/// A single field of a content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field id; also the key the value is stored under on an entry.
    pub id: String,
    /// What the field holds.
    pub kind: FieldKind,
}

impl Field {
    /// Creates a new field.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Creates a scalar field.
    #[must_use]
    pub fn scalar(id: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(id, FieldKind::Scalar(kind))
    }

    /// Creates a scalar list field.
    #[must_use]
    pub fn scalar_list(id: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(id, FieldKind::ScalarList(kind))
    }

    /// Creates a link field.
    #[must_use]
    pub fn link(id: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(id, FieldKind::Link(target.into()))
    }

    /// Creates a link list field.
    #[must_use]
    pub fn link_list(id: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(id, FieldKind::LinkList(target.into()))
    }
}
