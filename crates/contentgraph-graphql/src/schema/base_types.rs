//! Types shared by every synthesized schema.
//!
//! ```graphql
//! type Sys { id: ID!, createdAt: String, updatedAt: String, contentTypeId: String }
//! interface Entry { sys: Sys! }
//! type CollectionMeta { count: Int! }
//! ```

use async_graphql::dynamic::{Field, Interface, InterfaceField, Object, TypeRef};

use crate::resolvers::FieldResolver;

/// Name of the identity block type.
pub const SYS_TYPE: &str = "Sys";

/// Name of the interface all entry types implement.
pub const ENTRY_INTERFACE: &str = "Entry";

/// Name of the collection count type.
pub const COLLECTION_META_TYPE: &str = "CollectionMeta";

/// Identity field of every entry type.
pub const SYS_FIELD: &str = "sys";

/// Reverse-lookup field of entry types with incoming links.
pub const BACKREFS_FIELD: &str = "_backrefs";

/// Type names no content type may use.
pub const RESERVED_TYPE_NAMES: &[&str] = &[SYS_TYPE, ENTRY_INTERFACE, COLLECTION_META_TYPE];

/// The `Sys` object type.
#[must_use]
pub fn sys_object() -> Object {
    Object::new(SYS_TYPE)
        .description("System metadata of an entry")
        .field(Field::new(
            "id",
            TypeRef::named_nn(TypeRef::ID),
            FieldResolver::property("id".to_string()),
        ))
        .field(Field::new(
            "createdAt",
            TypeRef::named(TypeRef::STRING),
            FieldResolver::property("createdAt".to_string()),
        ))
        .field(Field::new(
            "updatedAt",
            TypeRef::named(TypeRef::STRING),
            FieldResolver::property("updatedAt".to_string()),
        ))
        .field(Field::new(
            "contentTypeId",
            TypeRef::named(TypeRef::STRING),
            FieldResolver::pointer("/contentType/sys/id"),
        ))
}

/// The `Entry` interface.
#[must_use]
pub fn entry_interface() -> Interface {
    Interface::new(ENTRY_INTERFACE)
        .description("An entry of any content type")
        .field(InterfaceField::new(SYS_FIELD, TypeRef::named_nn(SYS_TYPE)))
}

/// The `CollectionMeta` object type.
#[must_use]
pub fn collection_meta_object() -> Object {
    Object::new(COLLECTION_META_TYPE)
        .description("Aggregate information about a collection")
        .field(Field::new(
            "count",
            TypeRef::named_nn(TypeRef::INT),
            FieldResolver::property("count".to_string()),
        ))
}
