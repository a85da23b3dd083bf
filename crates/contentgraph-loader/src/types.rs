//! Loader argument types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An entry as handed out by a loader.
///
/// Entries are JSON objects with a `sys` block (`id`, `createdAt`,
/// `updatedAt`, `contentType.sys.id`) and one key per content field.
/// Linked entries are embedded in place of their link stubs.
pub type Entry = Value;

/// Canonical arguments of a loader call.
///
/// Whatever argument names the schema exposes, they are normalized to this
/// shape before the loader sees them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryQuery {
    /// Identity lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Requested locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Free-text query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Number of results to skip for pagination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    /// Maximum number of results to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Depth up to which links are embedded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<u32>,
    /// Comma separated field ids to keep on returned entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
    /// Comma separated sort keys, `-` prefix for descending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Field equality filters, keyed by field id.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub filters: IndexMap<String, Value>,
}

impl EntryQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identity lookup.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the free-text query.
    #[must_use]
    pub fn with_q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    /// Sets the skip parameter.
    #[must_use]
    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Sets the limit parameter.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the include depth.
    #[must_use]
    pub fn with_include(mut self, include: u32) -> Self {
        self.include = Some(include);
        self
    }

    /// Sets the field selection.
    #[must_use]
    pub fn with_select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Adds a field equality filter.
    #[must_use]
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Parsed sort keys of `order`.
    #[must_use]
    pub fn sort_params(&self) -> Vec<SortParam> {
        self.order
            .as_deref()
            .map(|order| {
                order
                    .split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(|key| match key.strip_prefix('-') {
                        Some(field) => SortParam::new(field, true),
                        None => SortParam::new(key, false),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parsed field ids of `select`, `None` when every field is wanted.
    #[must_use]
    pub fn selected_fields(&self) -> Option<Vec<&str>> {
        self.select.as_deref().map(|select| {
            select
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .collect()
        })
    }

    /// Returns true if the query carries no selector at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortParam {
    /// Field id, or a `sys.` path such as `sys.createdAt`.
    pub field: String,
    /// Whether to sort in descending order.
    pub descending: bool,
}

impl SortParam {
    /// Creates a new sort key.
    #[must_use]
    pub fn new(field: impl Into<String>, descending: bool) -> Self {
        Self {
            field: field.into(),
            descending,
        }
    }
}
