/// Target type tag for an emitted property.
///
/// The fixed vocabulary every downstream stage understands. Unknown field
/// kinds always map to [`TargetType::Untyped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    Text,
    Integer,
    Boolean,
    DateTime,
    List,
    Untyped,
}

impl TargetType {
    /// Tag used by the emitted `check_type` helper.
    pub fn tag(self) -> &'static str {
        match self {
            TargetType::Text => "string",
            TargetType::Integer => "integer",
            TargetType::Boolean => "boolean",
            TargetType::DateTime => "datetime",
            TargetType::List => "list",
            TargetType::Untyped => "untyped",
        }
    }

    /// Rust spelling of the inner property type (fields are `Option<…>`).
    pub fn rust_type(self) -> &'static str {
        match self {
            TargetType::Text => "String",
            TargetType::Integer => "i64",
            TargetType::Boolean => "bool",
            TargetType::DateTime => "NaiveDateTime",
            TargetType::List => "Vec<Value>",
            TargetType::Untyped => "Value",
        }
    }
}

/// Map a declared field kind to its target type.
pub fn map_kind(kind: &str) -> TargetType {
    match kind {
        "text" | "textarea" | "wysiwyg" | "email" | "url" | "password" => TargetType::Text,
        // Files and images resolve to a URL or path
        "file" | "image" => TargetType::Text,
        "number" => TargetType::Integer,
        "true_false" => TargetType::Boolean,
        "date_picker" | "date_time_picker" | "time_picker" => TargetType::DateTime,
        "select" | "checkbox" | "gallery" | "relationship" | "repeater" => TargetType::List,
        // A post-object field resolves to the referenced record id
        "post_object" => TargetType::Integer,
        _ => TargetType::Untyped,
    }
}

/// Whether a field kind references other records.
///
/// Only affects the loader comment the renderer emits; nothing enforces
/// cardinality or referential integrity.
pub fn is_relationship_kind(kind: &str) -> bool {
    matches!(kind, "post_object" | "relationship" | "page_link")
}
