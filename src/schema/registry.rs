use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::types::{ContentSchema, ContentTypeDef, FieldDescriptor, TaxonomyDescriptor};

/// Error raised when collecting the schema for a content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The content-type identifier is not registered.
    UnknownContentType(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::UnknownContentType(name) => {
                write!(f, "unknown content type '{name}'")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Read-only view of the host platform's content-type metadata.
///
/// The real host is an external service; everything downstream of it talks to
/// this trait so tests can substitute a canned source.
pub trait SchemaSource: Send + Sync {
    /// All registered, publicly visible content types, in registration order.
    fn content_types(&self) -> Vec<ContentTypeDef>;

    /// Look up one content type by identifier.
    fn get(&self, name: &str) -> Option<ContentTypeDef>;

    fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Ordered field descriptors for `name`; empty when none are registered.
    fn fields(&self, name: &str) -> Vec<FieldDescriptor> {
        self.get(name).map(|ct| ct.fields).unwrap_or_default()
    }

    /// Ordered taxonomy descriptors for `name`; empty when none are associated.
    fn taxonomies(&self, name: &str) -> Vec<TaxonomyDescriptor> {
        self.get(name).map(|ct| ct.taxonomies).unwrap_or_default()
    }
}

/// File-backed schema registry.
///
/// The registry document is YAML or JSON, selected by file extension the same
/// way spec documents usually are:
///
/// ```yaml
/// content_types:
///   - name: event
///     label: Events
///     fields:
///       - { name: location, label: Location, kind: text }
///     taxonomies:
///       - { name: event_category, label: Event Categories }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaRegistry {
    #[serde(default)]
    pub content_types: Vec<ContentTypeDef>,
}

impl SchemaRegistry {
    pub fn new(content_types: Vec<ContentTypeDef>) -> Self {
        Self { content_types }
    }

    /// Validate registry invariants: names present and pairwise distinct.
    fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for ct in &self.content_types {
            if ct.name.trim().is_empty() {
                anyhow::bail!("registry contains a content type with an empty name");
            }
            if !seen.insert(ct.name.as_str()) {
                anyhow::bail!("duplicate content type '{}' in registry", ct.name);
            }
        }
        Ok(())
    }
}

impl SchemaSource for SchemaRegistry {
    fn content_types(&self) -> Vec<ContentTypeDef> {
        self.content_types.clone()
    }

    fn get(&self, name: &str) -> Option<ContentTypeDef> {
        self.content_types.iter().find(|ct| ct.name == name).cloned()
    }
}

/// Load a schema registry from a YAML or JSON file.
pub fn load_registry(path: &Path) -> anyhow::Result<SchemaRegistry> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read registry file {path:?}"))?;
    let is_yaml = matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    );
    let registry: SchemaRegistry = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML registry {path:?}"))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON registry {path:?}"))?
    };
    registry.validate()?;
    Ok(registry)
}

/// Collect the ordered schema for one content type.
///
/// Empty field/taxonomy lists are valid; the only failure is an unregistered
/// content-type identifier.
pub fn collect_schema(source: &dyn SchemaSource, post_type: &str) -> Result<ContentSchema, SchemaError> {
    let ct = source
        .get(post_type)
        .ok_or_else(|| SchemaError::UnknownContentType(post_type.to_string()))?;
    Ok(ContentSchema {
        post_type: ct.name,
        label: ct.label,
        fields: ct.fields,
        taxonomies: ct.taxonomies,
    })
}
