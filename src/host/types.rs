use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A stored content record, as fetched from the host platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: u64,
    pub post_type: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    /// Publication status ("publish", "draft", …).
    pub status: String,
    pub author: u64,
    pub created: NaiveDateTime,
    pub modified: NaiveDateTime,
    /// Thumbnail URL, when one is attached.
    pub thumbnail: Option<String>,
}

/// Partial insert/update payload for a record.
///
/// `None` fields are left untouched on update and defaulted on insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordData {
    pub post_type: String,
    pub status: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub author: Option<u64>,
}

impl RecordData {
    pub fn for_type(post_type: impl Into<String>) -> Self {
        Self {
            post_type: post_type.into(),
            ..Self::default()
        }
    }
}

/// One taxonomy term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl Term {
    pub fn new(id: i64, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// Error raised by host write operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Insert rejected (empty or unusable payload).
    InsertFailed(String),
    /// No record with that id to update.
    UpdateFailed(u64),
    /// Field write rejected.
    FieldWriteFailed { record: u64, key: String },
    /// Term write referenced an undefined term or unknown record.
    TermWriteFailed { record: u64, taxonomy: String },
    /// Thumbnail write rejected.
    ThumbnailFailed(u64),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::InsertFailed(reason) => write!(f, "failed to insert record: {reason}"),
            HostError::UpdateFailed(id) => write!(f, "failed to update record {id}: not found"),
            HostError::FieldWriteFailed { record, key } => {
                write!(f, "failed to write field '{key}' on record {record}")
            }
            HostError::TermWriteFailed { record, taxonomy } => {
                write!(f, "failed to write '{taxonomy}' terms on record {record}")
            }
            HostError::ThumbnailFailed(id) => write!(f, "failed to set thumbnail on record {id}"),
        }
    }
}

impl std::error::Error for HostError {}
