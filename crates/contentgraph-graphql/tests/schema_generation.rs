//! Schema synthesis from JSON content models.

use contentgraph_graphql::schema::{ArgType, Param, RootFieldKind};
use contentgraph_graphql::{ContentSchemaBuilder, SchemaBuilderConfig, SchemaError};
use contentgraph_model::{ContentModel, ModelError};
use serde_json::json;

const BLOG: &str = r#"[
    {
        "id": "post",
        "name": "Post",
        "fields": [
            { "id": "title", "type": "String" },
            { "id": "slug", "type": "String" },
            { "id": "views", "type": "Int" },
            { "id": "ratings", "type": "Array<Float>" },
            { "id": "cover", "type": "Link", "linkedCt": "asset" },
            { "id": "author", "type": "Link", "linkedCt": "person" },
            { "id": "related", "type": "Array<Link>", "linkedCt": "post" }
        ]
    },
    {
        "id": "person",
        "names": { "type": "Person", "field": "person", "collectionField": "people" },
        "fields": [
            { "id": "name", "type": "String" },
            { "id": "favourite", "type": "Link", "linkedCt": "post" }
        ]
    },
    {
        "id": "asset",
        "name": "Asset",
        "fields": [
            { "id": "url", "type": "String" }
        ]
    }
]"#;

fn blog() -> ContentModel {
    ContentModel::from_json_str(BLOG).expect("model should parse")
}

#[test]
fn test_cyclic_model_synthesizes() {
    let synthesized = ContentSchemaBuilder::default()
        .synthesize(blog())
        .expect("cyclic models are fine");
    let registry = synthesized.registry();

    assert_eq!(registry.len(), 3);
    let post = registry.get("post").expect("post registered");
    let fields = post.fields(registry).unwrap();
    let shape: Vec<(String, String)> = fields
        .iter()
        .map(|f| (f.name.clone(), f.ty.type_ref().to_string()))
        .collect();

    assert_eq!(
        shape,
        vec![
            ("sys".to_string(), "Sys!".to_string()),
            ("title".to_string(), "String".to_string()),
            ("slug".to_string(), "String".to_string()),
            ("views".to_string(), "Int".to_string()),
            ("ratings".to_string(), "[Float]".to_string()),
            ("cover".to_string(), "Asset".to_string()),
            ("author".to_string(), "Person".to_string()),
            ("related".to_string(), "[Post!]".to_string()),
            ("_backrefs".to_string(), "PostBackrefs".to_string()),
        ]
    );
}

#[test]
fn test_backrefs_follow_incoming_links() {
    let synthesized = ContentSchemaBuilder::default().synthesize(blog()).unwrap();
    let registry = synthesized.registry();

    let post_backrefs = registry
        .get("post")
        .unwrap()
        .backrefs(registry)
        .unwrap()
        .expect("post has incoming links");
    let fields: Vec<(&str, Vec<&str>)> = post_backrefs
        .fields
        .iter()
        .map(|f| {
            (
                f.name.as_str(),
                f.field_ids.iter().map(String::as_str).collect(),
            )
        })
        .collect();
    assert_eq!(fields, vec![("post", vec!["related"]), ("person", vec!["favourite"])]);

    let asset_backrefs = registry.get("asset").unwrap().backrefs(registry).unwrap();
    assert!(asset_backrefs.is_some());

    let sdl = ContentSchemaBuilder::default().build(blog()).unwrap().sdl();
    assert!(sdl.contains("type AssetBackrefs"));
    assert!(sdl.contains("type PersonBackrefs"));
}

#[test]
fn test_backrefs_use_configured_field_name() {
    let source = r#"[
        { "id": "book", "name": "Book", "fields": [
            { "id": "title", "type": "String" }
        ]},
        { "id": "writer", "names": { "type": "Writer", "field": "author", "collectionField": "authors" }, "fields": [
            { "id": "books", "type": "Array<Link>", "linkedCt": "book" }
        ]}
    ]"#;

    let model = ContentModel::from_json_str(source).unwrap();
    let synthesized = ContentSchemaBuilder::default().synthesize(model).unwrap();
    let registry = synthesized.registry();
    let backrefs = registry
        .get("book")
        .unwrap()
        .backrefs(registry)
        .unwrap()
        .expect("book has incoming links");

    let names: Vec<&str> = backrefs.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["author"]);
}

#[test]
fn test_root_arguments() {
    let synthesized = ContentSchemaBuilder::default().synthesize(blog()).unwrap();
    let query = synthesized.query();

    let entry = query.get("post").unwrap();
    assert_eq!(entry.kind, RootFieldKind::Entry);
    let names: Vec<&str> = entry.args.names().collect();
    assert_eq!(names, vec!["id", "locale", "slug"]);

    let collection = query.get("posts").unwrap();
    assert!(collection.args.contains("slug"));
    assert!(collection.args.contains("views"));
    assert!(collection.args.contains("ratings"));
    assert!(!collection.args.contains("cover"));
    assert!(!collection.args.contains("related"));
    assert_eq!(
        collection.args.get("views").map(|a| (&a.param, a.ty)),
        Some((&Param::Field("views".to_string()), ArgType::Int))
    );

    let person = query.get("person").unwrap();
    assert!(person.args.contains("name"));

    let meta = query.get("_assetsMeta").unwrap();
    let names: Vec<&str> = meta.args.names().collect();
    assert_eq!(names, vec!["q"]);
}

#[test]
fn test_unknown_field_kind_is_rejected() {
    let source = r#"[
        { "id": "place", "name": "Place", "fields": [
            { "id": "title", "type": "String" },
            { "id": "location", "type": "Location" }
        ]}
    ]"#;

    let err = ContentSchemaBuilder::default()
        .build_from_json(source)
        .unwrap_err();
    assert!(err.is_unsupported_field_kind());
    assert!(err.to_string().contains("location"));
}

#[test]
fn test_link_without_target_is_rejected() {
    let source = json!([
        { "id": "post", "name": "Post", "fields": [
            { "id": "author", "type": "Link" }
        ]}
    ]);

    let err = ContentModel::from_value(source).unwrap_err();
    assert!(matches!(err, ModelError::MissingLinkTarget { ref field, .. } if field == "author"));
}

#[test]
fn test_link_to_unknown_content_type() {
    let source = r#"[
        { "id": "post", "name": "Post", "fields": [
            { "id": "author", "type": "Link", "linkedCt": "person" }
        ]}
    ]"#;

    let err = ContentSchemaBuilder::default()
        .build_from_json(source)
        .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::UnresolvedLinkTarget { ref target, .. } if target == "person"
    ));
}

#[test]
fn test_duplicate_root_field() {
    let source = r#"[
        { "id": "post", "name": "Post", "fields": [] },
        { "id": "article", "names": { "type": "Article", "field": "article", "collectionField": "posts" }, "fields": [] }
    ]"#;

    let err = ContentSchemaBuilder::default()
        .build_from_json(source)
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateFieldName(ref name) if name == "posts"));
}

#[test]
fn test_duplicate_type_name() {
    let source = r#"[
        { "id": "post", "name": "Post", "fields": [] },
        { "id": "article", "names": { "type": "Post", "field": "article", "collectionField": "articles" }, "fields": [] }
    ]"#;

    let err = ContentSchemaBuilder::default()
        .build_from_json(source)
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateTypeName(ref name) if name == "Post"));
}

#[test]
fn test_query_type_name_clash() {
    let config = SchemaBuilderConfig {
        query_type_name: "Post".to_string(),
        ..SchemaBuilderConfig::default()
    };
    let err = ContentSchemaBuilder::new(config)
        .build_from_json(r#"[{ "id": "post", "name": "Post", "fields": [] }]"#)
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateTypeName(_)));
}

#[test]
fn test_rebuilds_are_independent() {
    let builder = ContentSchemaBuilder::default();
    let first = builder.build(blog()).unwrap().sdl();
    let second = builder.build(blog()).unwrap().sdl();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_introspection_can_be_disabled() {
    let config = SchemaBuilderConfig {
        introspection_enabled: false,
        ..SchemaBuilderConfig::default()
    };
    let schema = ContentSchemaBuilder::new(config).build(blog()).unwrap();

    let response = schema.execute("{ __schema { queryType { name } } }").await;
    assert!(!response.errors.is_empty());
}

#[tokio::test]
async fn test_introspection_lists_root_fields() {
    let schema = ContentSchemaBuilder::default().build(blog()).unwrap();

    let response = schema
        .execute(r#"{ __type(name: "Query") { fields { name } } }"#)
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let names: Vec<&str> = data["__type"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["name"].as_str())
        .collect();
    for expected in ["post", "posts", "_postsMeta", "person", "people", "_peopleMeta"] {
        assert!(names.contains(&expected), "missing {expected}");
    }
}
