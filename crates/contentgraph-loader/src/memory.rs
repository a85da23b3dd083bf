//! In-memory entry loader.
//!
//! Keeps entries in insertion order behind a tokio `RwLock`. Intended for
//! tests, demos and small static content sets.

use std::cmp::Ordering;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

use crate::entry::{content_type_id, entry_id, link_target, references, referenced_id};
use crate::error::LoaderError;
use crate::traits::EntryLoader;
use crate::types::{Entry, EntryQuery, SortParam};

/// Page size used when a query has no `limit`.
pub const DEFAULT_LIMIT: u32 = 100;

/// Link depth used when a query has no `include`.
pub const DEFAULT_INCLUDE: u32 = 1;

/// Deepest link embedding honored.
pub const MAX_INCLUDE: u32 = 10;

/// In-memory [`EntryLoader`].
///
/// Supports:
/// - identity and field-equality `get`
/// - free-text `q` over string fields
/// - equality filters; list fields match when they contain the value, link
///   fields match on the referenced entry id
/// - `order`, `select`, `skip`/`limit`
/// - link embedding up to `include` levels
/// - reverse lookups over link fields
///
/// Locale is accepted and ignored.
#[derive(Debug, Default)]
pub struct InMemoryLoader {
    entries: RwLock<IndexMap<String, Entry>>,
}

impl InMemoryLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader holding the given entries.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::InvalidEntry` if an entry lacks `sys.id` or
    /// `sys.contentType.sys.id`.
    pub fn with_entries(entries: impl IntoIterator<Item = Entry>) -> Result<Self, LoaderError> {
        let mut map = IndexMap::new();
        for entry in entries {
            let id = validate_entry(&entry)?;
            map.insert(id, entry);
        }
        Ok(Self {
            entries: RwLock::new(map),
        })
    }

    /// Inserts or replaces an entry.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::InvalidEntry` for entries without identity.
    pub async fn insert(&self, entry: Entry) -> Result<(), LoaderError> {
        let id = validate_entry(&entry)?;
        self.entries.write().await.insert(id, entry);
        Ok(())
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if no entries are stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn validate_entry(entry: &Entry) -> Result<String, LoaderError> {
    let id = entry_id(entry)
        .ok_or_else(|| LoaderError::invalid_entry("entry is missing sys.id"))?;
    if content_type_id(entry).is_none() {
        return Err(LoaderError::invalid_entry(format!(
            "entry {id} is missing sys.contentType.sys.id"
        )));
    }
    Ok(id.to_string())
}

#[async_trait]
impl EntryLoader for InMemoryLoader {
    #[instrument(skip(self, query), fields(content_type = %content_type_id))]
    async fn get(
        &self,
        content_type_id: &str,
        query: &EntryQuery,
    ) -> Result<Option<Entry>, LoaderError> {
        let entries = self.entries.read().await;

        let found = if let Some(id) = &query.id {
            entries
                .get(id)
                .filter(|e| is_of_type(e, content_type_id))
                .filter(|e| matches_filters(e, &query.filters))
        } else if !query.filters.is_empty() {
            entries
                .values()
                .find(|e| is_of_type(e, content_type_id) && matches_filters(e, &query.filters))
        } else {
            return Err(LoaderError::invalid_arguments(
                "an id or at least one field selector is required",
            ));
        };

        trace!(found = found.is_some(), "Entry lookup complete");
        Ok(found.map(|e| present(&entries, e, query)))
    }

    #[instrument(skip(self, query), fields(content_type = %content_type_id))]
    async fn query(
        &self,
        content_type_id: &str,
        query: &EntryQuery,
    ) -> Result<Vec<Entry>, LoaderError> {
        let entries = self.entries.read().await;

        let mut matched = matching(&entries, content_type_id, query);
        let sort = query.sort_params();
        if !sort.is_empty() {
            matched.sort_by(|a, b| compare_entries(a, b, &sort));
        }

        let skip = query.skip.unwrap_or(0) as usize;
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT) as usize;
        let total = matched.len();

        let page: Vec<Entry> = matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|e| present(&entries, e, query))
            .collect();

        debug!(total, returned = page.len(), "Query completed");
        Ok(page)
    }

    #[instrument(skip(self, query), fields(content_type = %content_type_id))]
    async fn count(&self, content_type_id: &str, query: &EntryQuery) -> Result<u64, LoaderError> {
        let entries = self.entries.read().await;
        Ok(matching(&entries, content_type_id, query).len() as u64)
    }

    #[instrument(skip(self))]
    async fn reverse_lookup(
        &self,
        target_entry_id: &str,
        referencing_content_type_id: &str,
        field_id: &str,
    ) -> Result<Vec<Entry>, LoaderError> {
        let entries = self.entries.read().await;
        let query = EntryQuery::new();

        let found: Vec<Entry> = entries
            .values()
            .filter(|e| is_of_type(e, referencing_content_type_id))
            .filter(|e| {
                e.get(field_id)
                    .is_some_and(|value| references(value, target_entry_id))
            })
            .map(|e| present(&entries, e, &query))
            .collect();

        debug!(count = found.len(), "Reverse lookup completed");
        Ok(found)
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}

fn is_of_type(entry: &Entry, content_type: &str) -> bool {
    content_type_id(entry) == Some(content_type)
}

fn matching<'a>(
    entries: &'a IndexMap<String, Entry>,
    content_type: &str,
    query: &EntryQuery,
) -> Vec<&'a Entry> {
    entries
        .values()
        .filter(|e| is_of_type(e, content_type))
        .filter(|e| matches_filters(e, &query.filters))
        .filter(|e| query.q.as_deref().is_none_or(|q| matches_text(e, q)))
        .collect()
}

fn matches_filters(entry: &Entry, filters: &IndexMap<String, Value>) -> bool {
    filters.iter().all(|(field, expected)| {
        entry
            .get(field)
            .is_some_and(|actual| value_matches(actual, expected))
    })
}

fn value_matches(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::Array(items) => items.iter().any(|item| value_matches(item, expected)),
        Value::Object(_) => match (referenced_id(actual), expected.as_str()) {
            (Some(id), Some(wanted)) => id == wanted,
            _ => actual == expected,
        },
        Value::Number(a) => match (a.as_f64(), expected.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        other => other == expected,
    }
}

fn matches_text(entry: &Entry, q: &str) -> bool {
    let needle = q.to_lowercase();
    let Some(obj) = entry.as_object() else {
        return false;
    };

    obj.iter()
        .filter(|(key, _)| key.as_str() != "sys")
        .any(|(_, value)| contains_text(value, &needle))
}

fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|item| match item {
            Value::String(s) => s.to_lowercase().contains(needle),
            _ => false,
        }),
        _ => false,
    }
}

fn sort_key<'a>(entry: &'a Entry, field: &str) -> Option<&'a Value> {
    match field.strip_prefix("sys.") {
        Some(sys_field) => entry.get("sys").and_then(|sys| sys.get(sys_field)),
        None => entry.get(field),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            _ => Ordering::Equal,
        },
    }
}

fn compare_entries(a: &Entry, b: &Entry, sort: &[SortParam]) -> Ordering {
    for param in sort {
        let ordering = compare_values(sort_key(a, &param.field), sort_key(b, &param.field));
        let ordering = if param.descending {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Applies `select` and embeds links for an entry about to leave the loader.
fn present(entries: &IndexMap<String, Entry>, entry: &Entry, query: &EntryQuery) -> Entry {
    let depth = query.include.unwrap_or(DEFAULT_INCLUDE).min(MAX_INCLUDE);
    let mut out = embed_links(entries, entry, depth);

    if let (Some(selected), Some(obj)) = (query.selected_fields(), out.as_object_mut()) {
        obj.retain(|key, _| key == "sys" || selected.contains(&key.as_str()));
    }
    out
}

fn embed_links(entries: &IndexMap<String, Entry>, entry: &Entry, depth: u32) -> Entry {
    let mut out = entry.clone();
    if depth == 0 {
        return out;
    }

    if let Some(obj) = out.as_object_mut() {
        for (key, value) in obj.iter_mut() {
            if key == "sys" {
                continue;
            }
            *value = resolve_value(entries, value, depth);
        }
    }
    out
}

fn resolve_value(entries: &IndexMap<String, Entry>, value: &Value, depth: u32) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| resolve_value(entries, item, depth))
                .collect(),
        ),
        other => match link_target(other).and_then(|id| entries.get(id)) {
            Some(linked) => embed_links(entries, linked, depth - 1),
            None => other.clone(),
        },
    }
}
