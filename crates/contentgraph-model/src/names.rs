//! Naming helpers for schema identifiers.

/// Checks if a name is valid for GraphQL.
///
/// GraphQL names must match the pattern `[_a-zA-Z][_a-zA-Z0-9]*`. Names
/// starting with `__` are reserved for introspection.
#[must_use]
pub fn is_valid_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }

    if name.starts_with("__") {
        return false;
    }

    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Capitalizes the first character of a string.
#[must_use]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Lowercases the first character of a string.
#[must_use]
pub fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Converts a display name such as `"blog post"` into `BlogPost`.
///
/// Every run of non-alphanumeric characters starts a new word. A leading
/// digit gets an underscore prefix so the result stays a valid name.
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    let pascal: String = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(capitalize_first)
        .collect();

    match pascal.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{pascal}"),
        _ => pascal,
    }
}

/// Converts a display name such as `"Blog Post"` into `blogPost`.
#[must_use]
pub fn to_camel_case(name: &str) -> String {
    let pascal = to_pascal_case(name);
    if pascal.starts_with('_') {
        pascal
    } else {
        lowercase_first(&pascal)
    }
}

/// English plural of an identifier, good enough for collection field names.
#[must_use]
pub fn pluralize(word: &str) -> String {
    const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_ascii_lowercase();
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{word}es");
    }

    if let Some(stem) = word.strip_suffix(|c: char| c == 'y' || c == 'Y')
        && let Some(before) = stem.chars().last()
        && !VOWELS.contains(&before.to_ascii_lowercase())
    {
        return format!("{stem}ies");
    }

    format!("{word}s")
}
