//! # Postforge
//!
//! **Postforge** generates ready-to-use Rust data-access models from a content
//! platform's registered schema: given a content type, its custom fields and
//! its taxonomy associations, it renders a typed model struct — properties,
//! constructor, lazy accessors, static finders, persistence, serialization,
//! optional tests — as downloadable source text.
//!
//! ## Architecture
//!
//! The library is organized into a small number of modules:
//!
//! - **[`schema`]** — registry loading (YAML/JSON) and the [`SchemaSource`]
//!   trait standing in for the host platform's metadata API
//! - **[`generator`]** — naming, type mapping, property construction, and the
//!   staged renderer that produces the model source
//! - **[`host`]** — the record-side collaborator surface emitted models run
//!   against, with an in-memory reference implementation
//! - **[`security`]** — the admin capability check and single-use
//!   anti-forgery tokens
//! - **[`server`]** — the `may_minihttp` admin service: form page plus the
//!   generation endpoint streaming the result as a download
//! - **[`cli`]** — `generate` and `serve` subcommands
//!
//! ## Generation Flow
//!
//! ```text
//! registry file → collect_schema → build_properties → render stages → download
//! ```
//!
//! Each generation run is single-pass: metadata is collected once, rendered
//! once through a fixed stage order into one [`SourceBuilder`], and emitted
//! once. The same schema and options always produce byte-identical output.
//!
//! ## Quick Start
//!
//! ```no_run
//! use postforge::generator::{render_model, GenerationOptions};
//! use postforge::schema::{collect_schema, load_registry};
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = load_registry(std::path::Path::new("config/registry.yaml"))?;
//! let schema = collect_schema(&registry, "event")?;
//! let source = render_model(&schema, &GenerationOptions::default());
//! println!("{source}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Serving the admin form
//!
//! ```bash
//! postforge serve --registry config/registry.yaml --admin-key s3cret
//! ```
//!
//! The form at `/admin` submits to `POST /generate`; the response is the
//! generated model as an `application/octet-stream` attachment named
//! `{post_type}_class.rs`. Requests without the admin capability or a valid
//! single-use form token are rejected with 403, unknown content types with
//! 400.
//!
//! ## Runtime Considerations
//!
//! The admin service runs on the `may` coroutine runtime, not tokio. Emitted
//! models are plain synchronous Rust over the [`host::HostClient`] trait and
//! have no runtime requirements of their own.

pub mod cli;
pub mod generator;
pub mod host;
pub mod schema;
pub mod security;
pub mod server;

pub use generator::{render_model, GenerationOptions, SourceBuilder};
pub use schema::{collect_schema, load_registry, SchemaRegistry, SchemaSource};
pub use security::{AdminAuth, ApiKeyAdminAuth, SecurityRequest, TokenStore};
pub use server::{AdminService, HttpServer, ServerHandle};
