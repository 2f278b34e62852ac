//! # Schema Module
//!
//! Content-type metadata: what the host platform knows about a content type
//! before any code is generated.
//!
//! The registry file is the stand-in for the host's metadata API. It is loaded
//! once (YAML or JSON, picked by extension), validated, and exposed behind the
//! [`SchemaSource`] trait so the generator and the admin service never depend
//! on where the metadata came from. Collection is a single ordered pass:
//!
//! ```text
//! registry file → SchemaRegistry → collect_schema(post_type) → ContentSchema
//! ```
//!
//! An empty schema (no fields, no taxonomies) is a normal outcome and yields a
//! model with only the built-in and standard record properties.

mod registry;
mod types;

pub use registry::{collect_schema, load_registry, SchemaError, SchemaRegistry, SchemaSource};
pub use types::{ContentSchema, ContentTypeDef, FieldDescriptor, TaxonomyDescriptor};
