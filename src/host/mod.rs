//! # Host Module
//!
//! The record-side surface of the host platform, as consumed by generated
//! models: record CRUD, custom-field access, taxonomy terms, and typed record
//! queries.
//!
//! The real host is an external system. Generated code and tests talk to the
//! [`HostClient`] trait; [`MemoryHost`] is the in-memory reference
//! implementation used by the test suites and by the smoke test the generator
//! can emit alongside a model.
//!
//! ## Query semantics
//!
//! [`RecordQuery`] carries the post type, an optional status constraint,
//! pagination, ordering, meta filters with comparison operators and taxonomy
//! term filters. `query` returns matching record ids in order; `count` returns
//! the total number of matches ignoring pagination.

mod memory;
mod query;
mod types;

pub use memory::MemoryHost;
pub use query::{Compare, MetaFilter, RecordQuery, SortOrder, TermFilter};
pub use types::{HostError, Record, RecordData, Term};

use serde_json::Value;

/// Record CRUD and metadata access on the host platform.
///
/// Object-safe so generated models can hold an `Arc<dyn HostClient>`.
pub trait HostClient: Send + Sync {
    /// Fetch a record by id; `None` when it does not exist.
    fn record(&self, id: u64) -> Option<Record>;

    /// Insert a new record, returning its id.
    fn insert_record(&self, data: RecordData) -> Result<u64, HostError>;

    /// Apply the `Some` fields of `data` to an existing record.
    fn update_record(&self, id: u64, data: RecordData) -> Result<(), HostError>;

    /// Permanently remove a record. Returns whether anything was removed.
    fn delete_record(&self, id: u64, force: bool) -> bool;

    /// Read one custom-field value.
    fn field(&self, key: &str, record: u64) -> Option<Value>;

    /// Write one custom-field value.
    fn set_field(&self, key: &str, record: u64, value: Value) -> Result<(), HostError>;

    /// Terms attached to `record` under `taxonomy`, in attachment order.
    fn terms(&self, record: u64, taxonomy: &str) -> Vec<Term>;

    /// Replace the term list attached to `record` under `taxonomy`.
    fn set_terms(&self, record: u64, taxonomy: &str, terms: &[i64]) -> Result<(), HostError>;

    /// Thumbnail URL for `record`, when one is attached.
    fn thumbnail_url(&self, record: u64) -> Option<String>;

    /// Attach a thumbnail URL to `record`.
    fn set_thumbnail(&self, record: u64, url: &str) -> Result<(), HostError>;

    /// Ids of records matching `query`, ordered and paginated.
    fn query(&self, query: &RecordQuery) -> Vec<u64>;

    /// Total number of records matching `query`, ignoring pagination.
    fn count(&self, query: &RecordQuery) -> u64;

    /// Number of published records of `post_type`.
    fn count_published(&self, post_type: &str) -> u64;
}
