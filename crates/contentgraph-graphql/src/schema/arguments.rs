//! Argument sets of the root query fields.
//!
//! Every root field carries an [`ArgSet`]. Each argument remembers the
//! canonical loader parameter it stands for, so whatever the naming policy
//! calls an argument, [`ArgSet::normalize`] turns incoming values into the
//! same [`EntryQuery`].

use async_graphql::dynamic::TypeRef;
use contentgraph_loader::EntryQuery;
use contentgraph_model::{ContentType, ScalarKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{trace, warn};

use crate::error::GraphQLError;

/// Default entry argument candidates.
pub const DEFAULT_ENTRY_ARG_CANDIDATES: &[&str] = &["slug", "code", "name", "key"];

/// How built-in control arguments are named in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingPolicy {
    /// `id`, `skip`, `limit`, ...
    #[default]
    Bare,
    /// `_id`, `_skip`, `_limit`, ...
    Underscore,
    /// `idArg`, `skipArg`, `limitArg`, ...
    Suffixed,
}

impl NamingPolicy {
    /// Schema name of a control argument.
    #[must_use]
    pub fn apply(&self, canonical: &str) -> String {
        match self {
            Self::Bare => canonical.to_string(),
            Self::Underscore => format!("_{canonical}"),
            Self::Suffixed => format!("{canonical}Arg"),
        }
    }
}

/// The loader parameter an argument maps to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Param {
    Id,
    Locale,
    Query,
    Skip,
    Limit,
    Include,
    Select,
    Order,
    /// Equality filter on a content field.
    Field(String),
}

impl Param {
    /// Canonical (bare) name of the parameter.
    #[must_use]
    pub fn canonical_name(&self) -> &str {
        match self {
            Self::Id => "id",
            Self::Locale => "locale",
            Self::Query => "q",
            Self::Skip => "skip",
            Self::Limit => "limit",
            Self::Include => "include",
            Self::Select => "select",
            Self::Order => "order",
            Self::Field(id) => id,
        }
    }

    /// Returns true for built-in control parameters.
    #[must_use]
    pub fn is_control(&self) -> bool {
        !matches!(self, Self::Field(_))
    }
}

/// Scalar type of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    Id,
    String,
    Int,
    Float,
    Boolean,
}

impl ArgType {
    /// Argument type matching a field's (element) scalar kind.
    #[must_use]
    pub fn from_scalar(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::String => Self::String,
            ScalarKind::Int => Self::Int,
            ScalarKind::Float => Self::Float,
            ScalarKind::Bool => Self::Boolean,
        }
    }

    /// GraphQL type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Id => TypeRef::ID,
            Self::String => TypeRef::STRING,
            Self::Int => TypeRef::INT,
            Self::Float => TypeRef::FLOAT,
            Self::Boolean => TypeRef::BOOLEAN,
        }
    }
}

/// One argument of a root field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    /// Name as exposed in the schema.
    pub name: String,
    /// Parameter the argument is normalized to.
    pub param: Param,
    /// Argument type.
    pub ty: ArgType,
    /// Scalar kind of the filtered field; string values are parsed into it.
    pub scalar: Option<ScalarKind>,
}

/// Ordered, immutable set of arguments keyed by schema name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgSet {
    args: IndexMap<String, ArgSpec>,
}

impl ArgSet {
    /// Looks up an argument by schema name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgSpec> {
        self.args.get(name)
    }

    /// Returns true if an argument with this schema name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    /// Iterates over arguments in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ArgSpec> {
        self.args.values()
    }

    /// Schema names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.args.keys().map(String::as_str)
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    fn push(&mut self, spec: ArgSpec) {
        if let Some(existing) = self.args.get(&spec.name) {
            warn!(
                argument = %spec.name,
                kept = ?existing.param,
                skipped = ?spec.param,
                "Argument name already taken, skipping"
            );
            return;
        }
        self.args.insert(spec.name.clone(), spec);
    }

    /// Converts schema-named argument values into canonical loader arguments.
    ///
    /// Null values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::InvalidArgument` for unknown names, negative
    /// paging values, or values of the wrong shape.
    pub fn normalize<I, K>(&self, values: I) -> Result<EntryQuery, GraphQLError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut query = EntryQuery::new();

        for (name, value) in values {
            let name = name.as_ref();
            if value.is_null() {
                continue;
            }
            let spec = self
                .get(name)
                .ok_or_else(|| GraphQLError::InvalidArgument(format!("unknown argument {name}")))?;

            match &spec.param {
                Param::Id => query.id = Some(string_value(name, value)?),
                Param::Locale => query.locale = Some(string_value(name, value)?),
                Param::Query => query.q = Some(string_value(name, value)?),
                Param::Select => query.select = Some(string_value(name, value)?),
                Param::Order => query.order = Some(string_value(name, value)?),
                Param::Skip => query.skip = Some(count_value(name, &value)?),
                Param::Limit => query.limit = Some(count_value(name, &value)?),
                Param::Include => query.include = Some(count_value(name, &value)?),
                Param::Field(field_id) => {
                    let value = match spec.scalar {
                        Some(kind) => field_value(name, kind, value)?,
                        None => value,
                    };
                    query.filters.insert(field_id.clone(), value);
                }
            }
        }

        Ok(query)
    }
}

fn string_value(name: &str, value: Value) -> Result<String, GraphQLError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(GraphQLError::InvalidArgument(format!(
            "{name} must be a string, got {other}"
        ))),
    }
}

/// Parses string values of non-string fields into the field's scalar kind.
fn field_value(name: &str, kind: ScalarKind, value: Value) -> Result<Value, GraphQLError> {
    let Value::String(raw) = value else {
        return Ok(value);
    };
    let text = raw.trim();

    let parsed = match kind {
        ScalarKind::String => return Ok(Value::String(raw)),
        ScalarKind::Int => text.parse::<i64>().ok().map(Value::from),
        ScalarKind::Float => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        ScalarKind::Bool => text.parse::<bool>().ok().map(Value::Bool),
    };

    parsed.ok_or_else(|| {
        GraphQLError::InvalidArgument(format!(
            "{name} must be of type {}, got \"{raw}\"",
            kind.as_str()
        ))
    })
}

fn count_value(name: &str, value: &Value) -> Result<u32, GraphQLError> {
    let n = value
        .as_i64()
        .ok_or_else(|| GraphQLError::InvalidArgument(format!("{name} must be an integer")))?;
    if n < 0 {
        return Err(GraphQLError::InvalidArgument(format!(
            "{name} must not be negative"
        )));
    }
    u32::try_from(n).map_err(|_| GraphQLError::InvalidArgument(format!("{name} is too large")))
}

/// Options of the [`ArgumentComposer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentOptions {
    /// Naming policy for control arguments.
    pub naming: NamingPolicy,
    /// Field ids that become entry lookup arguments when a content type has them.
    pub entry_arg_candidates: Vec<String>,
    /// Adds `select` and `order` to collection arguments.
    pub ordering_and_selection: bool,
}

impl Default for ArgumentOptions {
    fn default() -> Self {
        Self {
            naming: NamingPolicy::default(),
            entry_arg_candidates: DEFAULT_ENTRY_ARG_CANDIDATES
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            ordering_and_selection: false,
        }
    }
}

/// Composes the argument sets of a content type's root fields.
#[derive(Debug, Clone, Default)]
pub struct ArgumentComposer {
    options: ArgumentOptions,
}

impl ArgumentComposer {
    /// Creates a composer with the given options.
    #[must_use]
    pub fn new(options: ArgumentOptions) -> Self {
        Self { options }
    }

    /// The active naming policy.
    #[must_use]
    pub fn naming(&self) -> NamingPolicy {
        self.options.naming
    }

    fn control(&self, param: Param, ty: ArgType) -> ArgSpec {
        ArgSpec {
            name: self.options.naming.apply(param.canonical_name()),
            param,
            ty,
            scalar: None,
        }
    }

    /// Arguments of the singular lookup field.
    ///
    /// `id` and `locale`, then every candidate the content type declares a
    /// field for, in candidate order.
    #[must_use]
    pub fn entry_args(&self, content_type: &ContentType) -> ArgSet {
        let mut set = ArgSet::default();
        set.push(self.control(Param::Id, ArgType::Id));
        set.push(self.control(Param::Locale, ArgType::String));

        for candidate in &self.options.entry_arg_candidates {
            if let Some(field) = content_type.field(candidate) {
                set.push(ArgSpec {
                    name: candidate.clone(),
                    param: Param::Field(candidate.clone()),
                    ty: ArgType::String,
                    scalar: field.kind.scalar(),
                });
            }
        }

        trace!(content_type = %content_type.id, count = set.len(), "Composed entry arguments");
        set
    }

    /// Arguments of the collection field.
    ///
    /// Paging and query controls, then one filter per plain scalar field.
    #[must_use]
    pub fn collection_args(&self, content_type: &ContentType) -> ArgSet {
        let mut set = ArgSet::default();
        set.push(self.control(Param::Query, ArgType::String));
        set.push(self.control(Param::Skip, ArgType::Int));
        set.push(self.control(Param::Limit, ArgType::Int));
        set.push(self.control(Param::Include, ArgType::Int));
        set.push(self.control(Param::Locale, ArgType::String));
        if self.options.ordering_and_selection {
            set.push(self.control(Param::Select, ArgType::String));
            set.push(self.control(Param::Order, ArgType::String));
        }

        for field in content_type
            .fields
            .iter()
            .filter(|field| field.kind.is_plain_scalar())
        {
            let Some(scalar) = field.kind.scalar() else {
                continue;
            };
            set.push(ArgSpec {
                name: field.id.clone(),
                param: Param::Field(field.id.clone()),
                ty: ArgType::from_scalar(scalar),
                scalar: Some(scalar),
            });
        }

        trace!(content_type = %content_type.id, count = set.len(), "Composed collection arguments");
        set
    }

    /// Arguments of the collection meta field.
    #[must_use]
    pub fn meta_args(&self) -> ArgSet {
        let mut set = ArgSet::default();
        set.push(self.control(Param::Query, ArgType::String));
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentgraph_model::{ContentTypeNames, Field};
    use serde_json::json;

    fn post() -> ContentType {
        ContentType::new(
            "post",
            ContentTypeNames::new("Post", "post", "posts"),
            vec![
                Field::scalar("slug", ScalarKind::String),
                Field::scalar("views", ScalarKind::Int),
                Field::scalar_list("ratings", ScalarKind::Float),
                Field::link("cover", "asset"),
            ],
        )
    }

    fn composer(naming: NamingPolicy) -> ArgumentComposer {
        ArgumentComposer::new(ArgumentOptions {
            naming,
            ..ArgumentOptions::default()
        })
    }

    #[test]
    fn test_entry_args_pick_candidates_present() {
        let args = composer(NamingPolicy::Bare).entry_args(&post());
        let names: Vec<&str> = args.names().collect();
        assert_eq!(names, vec!["id", "locale", "slug"]);
        assert_eq!(args.get("id").map(|a| a.ty), Some(ArgType::Id));
        assert_eq!(args.get("slug").map(|a| a.ty), Some(ArgType::String));
    }

    #[test]
    fn test_entry_candidates_follow_candidate_order() {
        let ct = ContentType::new(
            "thing",
            ContentTypeNames::new("Thing", "thing", "things"),
            vec![
                Field::scalar("key", ScalarKind::String),
                Field::scalar("code", ScalarKind::String),
            ],
        );
        let args = composer(NamingPolicy::Bare).entry_args(&ct);
        let names: Vec<&str> = args.names().collect();
        assert_eq!(names, vec!["id", "locale", "code", "key"]);
    }

    #[test]
    fn test_collection_args_filter_scalars_only() {
        let args = composer(NamingPolicy::Bare).collection_args(&post());
        assert!(args.contains("slug"));
        assert!(args.contains("views"));
        assert!(args.contains("ratings"));
        assert!(!args.contains("cover"));
        assert!(!args.contains("select"));
        assert_eq!(args.get("views").map(|a| a.ty), Some(ArgType::Int));
        assert_eq!(args.get("ratings").map(|a| a.ty), Some(ArgType::Float));
    }

    #[test]
    fn test_ordering_and_selection() {
        let composer = ArgumentComposer::new(ArgumentOptions {
            ordering_and_selection: true,
            ..ArgumentOptions::default()
        });
        let args = composer.collection_args(&post());
        assert!(args.contains("select"));
        assert!(args.contains("order"));
    }

    #[test]
    fn test_naming_policies() {
        assert_eq!(NamingPolicy::Bare.apply("id"), "id");
        assert_eq!(NamingPolicy::Underscore.apply("id"), "_id");
        assert_eq!(NamingPolicy::Suffixed.apply("id"), "idArg");

        let args = composer(NamingPolicy::Underscore).collection_args(&post());
        assert!(args.contains("_skip"));
        assert!(args.contains("views"));
        assert!(!args.contains("skip"));
    }

    #[test]
    fn test_bare_collision_keeps_control_argument() {
        let ct = ContentType::new(
            "page",
            ContentTypeNames::new("Page", "page", "pages"),
            vec![Field::scalar("limit", ScalarKind::String)],
        );
        let bare = composer(NamingPolicy::Bare).collection_args(&ct);
        assert_eq!(bare.get("limit").map(|a| &a.param), Some(&Param::Limit));

        let underscore = composer(NamingPolicy::Underscore).collection_args(&ct);
        assert_eq!(
            underscore.get("limit").map(|a| &a.param),
            Some(&Param::Field("limit".into()))
        );
        assert_eq!(underscore.get("_limit").map(|a| &a.param), Some(&Param::Limit));
    }

    #[test]
    fn test_normalize_across_policies() {
        let ct = post();
        let expected = EntryQuery::new().with_id("p1").with_filter("slug", "hello");

        for (policy, id_name) in [
            (NamingPolicy::Bare, "id"),
            (NamingPolicy::Underscore, "_id"),
            (NamingPolicy::Suffixed, "idArg"),
        ] {
            let args = composer(policy).entry_args(&ct);
            let query = args
                .normalize([(id_name, json!("p1")), ("slug", json!("hello"))])
                .unwrap();
            assert_eq!(query, expected, "policy {policy:?}");
        }
    }

    #[test]
    fn test_normalize_paging() {
        let args = composer(NamingPolicy::Bare).collection_args(&post());
        let query = args
            .normalize([
                ("skip", json!(5)),
                ("limit", json!(10)),
                ("q", json!("rust")),
                ("locale", Value::Null),
            ])
            .unwrap();
        assert_eq!(query.skip, Some(5));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.q.as_deref(), Some("rust"));
        assert_eq!(query.locale, None);
    }

    #[test]
    fn test_normalize_rejects_negative_skip() {
        let args = composer(NamingPolicy::Bare).collection_args(&post());
        let result = args.normalize([("skip", json!(-1))]);
        assert!(matches!(result, Err(GraphQLError::InvalidArgument(_))));
    }

    #[test]
    fn test_entry_candidates_are_parsed_into_field_kind() {
        let ct = ContentType::new(
            "product",
            ContentTypeNames::new("Product", "product", "products"),
            vec![
                Field::scalar("code", ScalarKind::Int),
                Field::scalar("key", ScalarKind::Bool),
                Field::scalar("name", ScalarKind::String),
            ],
        );
        let args = composer(NamingPolicy::Bare).entry_args(&ct);
        assert_eq!(args.get("code").map(|a| a.ty), Some(ArgType::String));

        let query = args
            .normalize([
                ("code", json!("42")),
                ("key", json!("true")),
                ("name", json!("007")),
            ])
            .unwrap();
        assert_eq!(query.filters.get("code"), Some(&json!(42)));
        assert_eq!(query.filters.get("key"), Some(&json!(true)));
        assert_eq!(query.filters.get("name"), Some(&json!("007")));

        let err = args.normalize([("code", json!("forty-two"))]).unwrap_err();
        assert!(matches!(err, GraphQLError::InvalidArgument(ref msg) if msg.contains("code")));
    }

    #[test]
    fn test_normalize_rejects_unknown() {
        let args = composer(NamingPolicy::Bare).meta_args();
        assert!(args.normalize([("skip", json!(1))]).is_err());
    }
}
