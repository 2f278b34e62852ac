//! # Generator Module
//!
//! Turns a collected [`ContentSchema`](crate::schema::ContentSchema) into the
//! source text of a ready-to-use data-access model.
//!
//! ## Pipeline
//!
//! ```text
//! ContentSchema → build_properties → render stages → String
//! ```
//!
//! 1. **Naming** — raw field/taxonomy identifiers become unique snake_case
//!    members; collisions get deterministic `_N` suffixes, first-seen wins.
//! 2. **Type mapping** — declared field kinds become target type tags;
//!    unknown kinds are untyped.
//! 3. **Properties** — the ordered [`PropertySpec`] list that every later
//!    stage iterates: built-ins, custom fields, standard record fields,
//!    taxonomies.
//! 4. **Rendering** — fixed-order stages (header, error type, properties,
//!    constructor, accessors, loader, finders, save, delete, serialize,
//!    validate, optional tests) append to one [`SourceBuilder`] owned by the
//!    run and handed from stage to stage.
//!
//! Rendering is deterministic: the same schema and options always produce
//! byte-identical output. The emitted file is self-contained apart from the
//! [`host`](crate::host) runtime surface it drives.

mod naming;
mod output;
mod property;
mod render;
mod typemap;

pub use naming::{escape_keyword, to_member_name, to_type_name, unique_member_name};
pub use output::{model_file_name, write_model_file};
pub use property::{build_properties, PropertySource, PropertySpec, RecordField};
pub use render::{render_model, GenerationOptions, SourceBuilder};
pub use typemap::{is_relationship_kind, map_kind, TargetType};
