//! Content schema builder.
//!
//! Turns a [`ContentModel`] into an executable `async_graphql` dynamic schema
//! in two steps:
//!
//! 1. [`ContentSchemaBuilder::synthesize`] populates the [`TypeRegistry`] and
//!    assembles the [`QueryRootType`]. Pure, synchronous, no I/O.
//! 2. [`SynthesizedSchema::materialize`] evaluates every type's field map and
//!    registers the result with the engine.

use std::collections::HashSet;
use std::sync::Arc;

use async_graphql::dynamic::{Field, InputValue, Object, Schema, TypeRef};
use contentgraph_model::ContentModel;
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::arguments::{ArgSet, ArgumentComposer, ArgumentOptions};
use super::backrefs::BackrefType;
use super::base_types::{
    COLLECTION_META_TYPE, ENTRY_INTERFACE, RESERVED_TYPE_NAMES, collection_meta_object,
    entry_interface, sys_object,
};
use super::field_mapper::FieldType;
use super::registry::{SchemaType, TypeRegistry};
use crate::error::SchemaError;
use crate::resolvers::{
    BackrefResolver, CollectionResolver, EntryResolver, FieldResolver, MetaResolver,
};

/// Default name of the root query type.
pub const DEFAULT_QUERY_TYPE_NAME: &str = "Query";

/// Scalar names built into the engine.
const BUILTIN_SCALARS: &[&str] = &["String", "Int", "Float", "Boolean", "ID"];

/// Configuration for the schema builder.
#[derive(Debug, Clone)]
pub struct SchemaBuilderConfig {
    /// Name of the root query type.
    pub query_type_name: String,

    /// Maximum query depth allowed.
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    pub max_complexity: usize,

    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,

    /// Argument composition options.
    pub arguments: ArgumentOptions,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            query_type_name: DEFAULT_QUERY_TYPE_NAME.to_string(),
            max_depth: 15,
            max_complexity: 500,
            introspection_enabled: true,
            arguments: ArgumentOptions::default(),
        }
    }
}

/// Which of the three per-content-type root fields a field is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootFieldKind {
    /// Singular lookup, nullable.
    Entry,
    /// Filtered list.
    Collection,
    /// `{ count }` of a filtered list.
    Meta,
}

/// A field of the root query type.
#[derive(Debug, Clone)]
pub struct RootField {
    /// Field name.
    pub name: String,
    /// Field kind.
    pub kind: RootFieldKind,
    /// The entry type the field returns (or counts).
    pub schema_type: Arc<SchemaType>,
    /// Accepted arguments.
    pub args: Arc<ArgSet>,
}

impl RootField {
    /// GraphQL type reference of the field.
    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        match self.kind {
            RootFieldKind::Entry => TypeRef::named(self.schema_type.name()),
            RootFieldKind::Collection => TypeRef::named_nn_list_nn(self.schema_type.name()),
            RootFieldKind::Meta => TypeRef::named_nn(COLLECTION_META_TYPE),
        }
    }

    fn into_field(self) -> Field {
        let content_type_id = self.schema_type.content_type_id().to_string();
        let type_ref = self.type_ref();
        let args = Arc::clone(&self.args);

        let mut field = match self.kind {
            RootFieldKind::Entry => Field::new(
                self.name,
                type_ref,
                EntryResolver::resolve(content_type_id, Arc::clone(&args)),
            ),
            RootFieldKind::Collection => Field::new(
                self.name,
                type_ref,
                CollectionResolver::resolve(content_type_id, Arc::clone(&args)),
            ),
            RootFieldKind::Meta => Field::new(
                self.name,
                type_ref,
                MetaResolver::resolve(content_type_id, Arc::clone(&args)),
            ),
        };

        for arg in args.iter() {
            field = field.argument(InputValue::new(
                arg.name.as_str(),
                TypeRef::named(arg.ty.type_name()),
            ));
        }
        field
    }
}

/// The root query type: three fields per content type.
#[derive(Debug, Clone)]
pub struct QueryRootType {
    /// Type name.
    pub name: String,
    fields: IndexMap<String, RootField>,
}

impl QueryRootType {
    /// Looks up a root field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RootField> {
        self.fields.get(name)
    }

    /// Iterates over root fields in model order.
    pub fn iter(&self) -> impl Iterator<Item = &RootField> {
        self.fields.values()
    }

    /// Root field names in model order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of root fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no root fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn to_object(&self) -> Object {
        self.fields
            .values()
            .cloned()
            .fold(Object::new(self.name.as_str()), |object, field| {
                object.field(field.into_field())
            })
    }
}

/// Assembles the root query type.
pub struct QueryRootBuilder<'a> {
    name: &'a str,
    composer: &'a ArgumentComposer,
}

impl<'a> QueryRootBuilder<'a> {
    /// Creates a root builder.
    #[must_use]
    pub fn new(name: &'a str, composer: &'a ArgumentComposer) -> Self {
        Self { name, composer }
    }

    /// Adds the entry, collection and meta fields of every content type, in
    /// model order, registering the types on the way.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateFieldName` when two root fields collide,
    /// and any registry error.
    pub fn build(&self, registry: &mut TypeRegistry) -> Result<QueryRootType, SchemaError> {
        let model = Arc::clone(registry.model());
        let mut fields = IndexMap::new();

        for content_type in model.iter() {
            let schema_type = registry.get_or_create(&content_type.id)?;
            let names = &content_type.names;

            let root_fields = [
                (
                    names.field.clone(),
                    RootFieldKind::Entry,
                    self.composer.entry_args(content_type),
                ),
                (
                    names.collection_field.clone(),
                    RootFieldKind::Collection,
                    self.composer.collection_args(content_type),
                ),
                (
                    names.meta_field(),
                    RootFieldKind::Meta,
                    self.composer.meta_args(),
                ),
            ];

            for (name, kind, args) in root_fields {
                if fields.contains_key(&name) {
                    return Err(SchemaError::DuplicateFieldName(name));
                }
                trace!(field = %name, kind = ?kind, args = args.len(), "Added root field");
                fields.insert(
                    name.clone(),
                    RootField {
                        name,
                        kind,
                        schema_type: Arc::clone(&schema_type),
                        args: Arc::new(args),
                    },
                );
            }
        }

        Ok(QueryRootType {
            name: self.name.to_string(),
            fields,
        })
    }
}

/// Output of a synthesis pass, ready to be materialized.
#[derive(Debug)]
pub struct SynthesizedSchema {
    registry: TypeRegistry,
    query: QueryRootType,
}

impl SynthesizedSchema {
    /// The populated type registry.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The root query type.
    #[must_use]
    pub fn query(&self) -> &QueryRootType {
        &self.query
    }

    /// Registers everything with the engine and builds the schema.
    ///
    /// # Errors
    ///
    /// Returns field map errors and `SchemaError::Engine` if the engine
    /// rejects the schema.
    pub fn materialize(&self, config: &SchemaBuilderConfig) -> Result<Schema, SchemaError> {
        let mut builder = Schema::build(self.query.name.as_str(), None, None)
            .register(sys_object())
            .register(entry_interface())
            .register(collection_meta_object());

        for schema_type in self.registry.iter() {
            let fields = schema_type.fields(&self.registry)?;
            let mut object = Object::new(schema_type.name()).implement(ENTRY_INTERFACE);

            for field in &fields {
                if let FieldType::Backrefs(backrefs) = &field.ty {
                    builder = builder.register(backrefs_object(backrefs));
                }
                object = object.field(FieldResolver::field(field));
            }

            trace!(type_name = %schema_type.name(), fields = fields.len(), "Materialized entry type");
            builder = builder.register(object);
        }

        builder = builder.register(self.query.to_object());

        let mut builder = builder
            .limit_depth(config.max_depth)
            .limit_complexity(config.max_complexity);

        if !config.introspection_enabled {
            builder = builder.disable_introspection();
        }

        builder
            .finish()
            .map_err(|e| SchemaError::Engine(e.to_string()))
    }
}

fn backrefs_object(backrefs: &BackrefType) -> Object {
    backrefs.fields.iter().fold(
        Object::new(backrefs.name.as_str())
            .description(format!("Entries linking to {}", backrefs.target_id)),
        |object, field| {
            object.field(
                Field::new(
                    field.name.as_str(),
                    TypeRef::named_nn_list_nn(field.referencing.name()),
                    BackrefResolver::resolve(field.clone()),
                )
                .argument(BackrefResolver::via_argument()),
            )
        },
    )
}

fn check_type_names(registry: &TypeRegistry, query_type_name: &str) -> Result<(), SchemaError> {
    let mut seen: HashSet<String> = RESERVED_TYPE_NAMES
        .iter()
        .chain(BUILTIN_SCALARS)
        .map(|name| (*name).to_string())
        .collect();

    if !seen.insert(query_type_name.to_string()) {
        return Err(SchemaError::DuplicateTypeName(query_type_name.to_string()));
    }

    for schema_type in registry.iter() {
        if !seen.insert(schema_type.name().to_string()) {
            return Err(SchemaError::DuplicateTypeName(schema_type.name().to_string()));
        }
    }

    for schema_type in registry.iter() {
        if registry
            .backref_index()
            .has_incoming(schema_type.content_type_id())
        {
            let name = schema_type.content_type().names.backrefs_type();
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateTypeName(name));
            }
        }
    }

    Ok(())
}

/// Builds query schemas from content models.
///
/// # Example
///
/// ```ignore
/// let builder = ContentSchemaBuilder::new(SchemaBuilderConfig::default());
/// let schema = builder.build(ContentModel::from_json_str(source)?)?;
/// ```
#[derive(Debug, Clone)]
pub struct ContentSchemaBuilder {
    config: SchemaBuilderConfig,
    composer: ArgumentComposer,
}

impl Default for ContentSchemaBuilder {
    fn default() -> Self {
        Self::new(SchemaBuilderConfig::default())
    }
}

impl ContentSchemaBuilder {
    /// Creates a new schema builder.
    #[must_use]
    pub fn new(config: SchemaBuilderConfig) -> Self {
        let composer = ArgumentComposer::new(config.arguments.clone());
        Self { config, composer }
    }

    /// The builder configuration.
    #[must_use]
    pub fn config(&self) -> &SchemaBuilderConfig {
        &self.config
    }

    /// Runs a synthesis pass without touching the engine.
    ///
    /// # Errors
    ///
    /// Returns registry errors, `DuplicateFieldName` and `DuplicateTypeName`.
    pub fn synthesize(
        &self,
        model: impl Into<Arc<ContentModel>>,
    ) -> Result<SynthesizedSchema, SchemaError> {
        let model = model.into();
        debug!(content_types = model.len(), "Starting schema synthesis");

        let mut registry = TypeRegistry::new(model);
        let query = QueryRootBuilder::new(&self.config.query_type_name, &self.composer)
            .build(&mut registry)?;
        check_type_names(&registry, &query.name)?;

        debug!(
            types = registry.len(),
            root_fields = query.len(),
            "Schema synthesis complete"
        );
        Ok(SynthesizedSchema { registry, query })
    }

    /// Synthesizes and materializes a schema.
    ///
    /// # Errors
    ///
    /// Returns any synthesis or materialization error.
    pub fn build(&self, model: impl Into<Arc<ContentModel>>) -> Result<Schema, SchemaError> {
        let schema = self.synthesize(model)?.materialize(&self.config)?;
        debug!("GraphQL schema build complete");
        Ok(schema)
    }

    /// Parses a JSON content model and builds its schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Model` for invalid model sources and any build error.
    pub fn build_from_json(&self, source: &str) -> Result<Schema, SchemaError> {
        self.build(ContentModel::from_json_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentgraph_model::{ContentType, ContentTypeNames, Field, ScalarKind};

    fn person() -> ContentType {
        ContentType::new(
            "person",
            ContentTypeNames::new("Person", "person", "people"),
            vec![Field::scalar("name", ScalarKind::String)],
        )
    }

    fn post() -> ContentType {
        ContentType::new(
            "post",
            ContentTypeNames::new("Post", "post", "posts"),
            vec![
                Field::scalar("slug", ScalarKind::String),
                Field::scalar("views", ScalarKind::Int),
                Field::link("author", "person"),
            ],
        )
    }

    fn model(types: Vec<ContentType>) -> ContentModel {
        ContentModel::new(types).unwrap()
    }

    #[test]
    fn test_root_fields_in_model_order() {
        let synthesized = ContentSchemaBuilder::default()
            .synthesize(model(vec![person(), post()]))
            .unwrap();

        let names: Vec<&str> = synthesized.query().field_names().collect();
        assert_eq!(
            names,
            vec!["person", "people", "_peopleMeta", "post", "posts", "_postsMeta"]
        );
        assert_eq!(synthesized.query().name, "Query");
        assert_eq!(
            synthesized.query().get("posts").map(|f| f.type_ref().to_string()),
            Some("[Post!]!".to_string())
        );
        assert_eq!(
            synthesized.query().get("_postsMeta").map(|f| f.kind),
            Some(RootFieldKind::Meta)
        );
    }

    #[test]
    fn test_duplicate_root_field() {
        let clash = ContentType::new(
            "author",
            ContentTypeNames::new("Author", "people", "authors"),
            vec![],
        );
        let err = ContentSchemaBuilder::default()
            .synthesize(model(vec![person(), clash]))
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFieldName(ref name) if name == "people"));
    }

    #[test]
    fn test_duplicate_type_name() {
        let clash = ContentType::new(
            "human",
            ContentTypeNames::new("Person", "human", "humans"),
            vec![],
        );
        let err = ContentSchemaBuilder::default()
            .synthesize(model(vec![person(), clash]))
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTypeName(ref name) if name == "Person"));
    }

    #[test]
    fn test_type_name_clashing_with_base_type() {
        let clash = ContentType::new(
            "meta",
            ContentTypeNames::new("CollectionMeta", "meta", "metas"),
            vec![],
        );
        let err = ContentSchemaBuilder::default()
            .synthesize(model(vec![clash]))
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTypeName(_)));
    }

    #[test]
    fn test_custom_query_type_name() {
        let config = SchemaBuilderConfig {
            query_type_name: "ContentQuery".to_string(),
            ..SchemaBuilderConfig::default()
        };
        let schema = ContentSchemaBuilder::new(config)
            .build(model(vec![person(), post()]))
            .unwrap();
        let sdl = schema.sdl();
        assert!(sdl.contains("type ContentQuery"), "{sdl}");
    }

    #[test]
    fn test_sdl_shape() {
        let schema = ContentSchemaBuilder::default()
            .build(model(vec![person(), post()]))
            .unwrap();
        let sdl = schema.sdl();

        assert!(sdl.contains("interface Entry"));
        assert!(sdl.contains("type Post implements Entry"));
        assert!(sdl.contains("type PersonBackrefs"));
        assert!(!sdl.contains("type PostBackrefs"));
        assert!(sdl.contains("type CollectionMeta"));
    }

    #[test]
    fn test_unresolved_link_fails_synthesis() {
        let err = ContentSchemaBuilder::default()
            .synthesize(model(vec![post()]))
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedLinkTarget { .. }));
    }

    #[test]
    fn test_build_from_json_rejects_unknown_kind() {
        let source = r#"[
            {"id": "place", "name": "Place", "fields": [
                {"id": "location", "type": "Location"}
            ]}
        ]"#;
        let err = ContentSchemaBuilder::default()
            .build_from_json(source)
            .unwrap_err();
        assert!(err.is_unsupported_field_kind());
    }
}
