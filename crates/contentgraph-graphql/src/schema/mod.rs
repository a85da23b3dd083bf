//! Schema synthesis and lazy loading.
//!
//! ## Components
//!
//! - [`FieldMapper`] - content field to schema field
//! - [`ArgumentComposer`] - argument sets of the root fields
//! - [`BackrefIndex`] - incoming links and reverse-lookup types
//! - [`TypeRegistry`] - content type id to [`SchemaType`], lazy field maps
//! - [`QueryRootBuilder`] - the root query type
//! - [`ContentSchemaBuilder`] - drives synthesis and materialization
//! - [`LazySchema`] - thread-safe lazy schema holder with hot-reload support
//!
//! ## Architecture
//!
//! Synthesis runs leaf-first: for each content type in model order the root
//! builder asks the registry for its type, which registers the type and every
//! type it links to. Field maps are only evaluated at materialization, once
//! every type exists, so cyclic models need no special casing.

mod arguments;
mod backrefs;
mod base_types;
mod builder;
mod field_mapper;
mod lazy;
mod registry;

pub use arguments::{
    ArgSet, ArgSpec, ArgType, ArgumentComposer, ArgumentOptions, DEFAULT_ENTRY_ARG_CANDIDATES,
    NamingPolicy, Param,
};
pub use backrefs::{BackrefField, BackrefIndex, BackrefType, VIA_ARGUMENT};
pub use base_types::{
    BACKREFS_FIELD, COLLECTION_META_TYPE, ENTRY_INTERFACE, RESERVED_TYPE_NAMES, SYS_FIELD,
    SYS_TYPE,
};
pub use builder::{
    ContentSchemaBuilder, DEFAULT_QUERY_TYPE_NAME, QueryRootBuilder, QueryRootType, RootField,
    RootFieldKind, SchemaBuilderConfig, SynthesizedSchema,
};
pub use field_mapper::{FieldMapper, FieldType, SchemaField, scalar_type_name};
pub use lazy::{LazySchema, SchemaState};
pub use registry::{SchemaType, TypeRegistry};
