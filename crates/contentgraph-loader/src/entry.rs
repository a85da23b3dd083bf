//! Helpers for reading the conventional locations of an entry.
//!
//! ```json
//! {
//!   "sys": { "id": "p1", "contentType": { "sys": { "id": "post" } } },
//!   "title": "Hello",
//!   "author": { "sys": { "type": "Link", "linkType": "Entry", "id": "a1" } }
//! }
//! ```

use serde_json::{Value, json};

/// Returns the entry id (`sys.id`).
#[must_use]
pub fn entry_id(entry: &Value) -> Option<&str> {
    entry.pointer("/sys/id").and_then(Value::as_str)
}

/// Returns the id of the content type the entry belongs to
/// (`sys.contentType.sys.id`).
#[must_use]
pub fn content_type_id(entry: &Value) -> Option<&str> {
    entry
        .pointer("/sys/contentType/sys/id")
        .and_then(Value::as_str)
}

/// Returns the target id if the value is an unresolved link stub.
#[must_use]
pub fn link_target(value: &Value) -> Option<&str> {
    let sys = value.get("sys")?;
    if sys.get("type").and_then(Value::as_str) == Some("Link") {
        sys.get("id").and_then(Value::as_str)
    } else {
        None
    }
}

/// Returns the id a link field value points to, resolved or not.
#[must_use]
pub fn referenced_id(value: &Value) -> Option<&str> {
    link_target(value).or_else(|| entry_id(value))
}

/// Builds a link stub pointing at an entry id.
#[must_use]
pub fn link_to(id: &str) -> Value {
    json!({ "sys": { "type": "Link", "linkType": "Entry", "id": id } })
}

/// Returns true if a link field value (single or list) references `id`.
#[must_use]
pub fn references(value: &Value, id: &str) -> bool {
    match value {
        Value::Array(items) => items.iter().any(|item| referenced_id(item) == Some(id)),
        other => referenced_id(other) == Some(id),
    }
}
