use serde::{Deserialize, Serialize};

/// Custom-field metadata declared for a content type.
///
/// `kind` is an open set owned by the host platform ("text", "number",
/// "true_false", …); the type mapper decides what to do with it and maps
/// anything it does not recognize to the untyped tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Raw field key as registered with the host (snake or kebab case, or a label).
    pub name: String,
    /// Human-readable label shown in the emitted doc comment.
    #[serde(default)]
    pub label: String,
    /// Declared field kind.
    pub kind: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: kind.into(),
        }
    }
}

/// A classification axis associated with a content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyDescriptor {
    /// Raw taxonomy key.
    pub name: String,
    #[serde(default)]
    pub label: String,
}

impl TaxonomyDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// One registered content type with its ordered field and taxonomy lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeDef {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub taxonomies: Vec<TaxonomyDescriptor>,
}

/// The collected schema for a single content type, as handed to the generator.
///
/// Field and taxonomy order is the registry order; both lists may be empty,
/// which is a perfectly valid schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSchema {
    pub post_type: String,
    pub label: String,
    pub fields: Vec<FieldDescriptor>,
    pub taxonomies: Vec<TaxonomyDescriptor>,
}
