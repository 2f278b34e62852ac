use std::collections::HashSet;

use super::naming::{escape_keyword, to_member_name, unique_member_name};
use super::typemap::{is_relationship_kind, map_kind, TargetType};
use crate::schema::ContentSchema;

/// Standard record attribute backing a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Title,
    Content,
    Excerpt,
    Thumbnail,
    Created,
    Modified,
    Author,
}

/// Where a property's value comes from at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySource {
    /// Record identifier, assigned in the constructor.
    Id,
    /// Content-type tag, assigned in the constructor.
    PostType,
    /// A standard record attribute.
    Record(RecordField),
    /// A custom field, read and written through the field API.
    Meta { key: String },
    /// A taxonomy's term list.
    Taxonomy { key: String },
}

/// One emitted property, fully resolved.
///
/// The ordered list of these drives every render stage; member names are
/// pairwise distinct by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    pub member: String,
    pub source: PropertySource,
    pub target: TargetType,
    pub relationship: bool,
    /// Doc-comment text for the field declaration.
    pub doc: String,
}

impl PropertySpec {
    /// Rust spelling of the stored value (before the `Option` wrapper).
    pub fn rust_type(&self) -> &'static str {
        match self.source {
            PropertySource::Taxonomy { .. } => "Vec<Term>",
            _ => self.target.rust_type(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, PropertySource::Id | PropertySource::PostType)
    }
}

/// Names a member can never claim: struct internals plus the model's own
/// method surface. A field called `save` still gets a property, just a
/// suffixed one.
const RESERVED: &[&str] = &[
    "host",
    "loaded",
    "new",
    "get",
    "set",
    "load_property",
    "create",
    "find_by_id",
    "get_latest",
    "filter",
    "get_count",
    "get_count_by_meta",
    "save",
    "delete",
    "to_map",
    "to_json",
    "check_type",
];

const STANDARD_FIELDS: &[(&str, RecordField, TargetType)] = &[
    ("title", RecordField::Title, TargetType::Text),
    ("content", RecordField::Content, TargetType::Text),
    ("excerpt", RecordField::Excerpt, TargetType::Text),
    ("img", RecordField::Thumbnail, TargetType::Text),
    ("date_create", RecordField::Created, TargetType::DateTime),
    ("date_update", RecordField::Modified, TargetType::DateTime),
    ("author", RecordField::Author, TargetType::Integer),
];

/// Build the ordered property list for a schema.
///
/// Order matches the original layout: identifier and tag built-ins, custom
/// fields in schema order, standard record fields, then taxonomies. `tab`
/// separators and unnamed fields carry no data and are skipped. Collisions
/// against anything assigned earlier, including the reserved struct/method
/// names, are resolved with `_1`, `_2`, … suffixes, first-seen wins.
pub fn build_properties(schema: &ContentSchema) -> Vec<PropertySpec> {
    let mut seen: HashSet<String> = RESERVED.iter().map(|s| (*s).to_string()).collect();
    let mut specs = Vec::new();

    specs.push(PropertySpec {
        member: unique_member_name(&mut seen, "id"),
        source: PropertySource::Id,
        target: TargetType::Integer,
        relationship: false,
        doc: "Record identifier.".to_string(),
    });
    specs.push(PropertySpec {
        member: unique_member_name(&mut seen, "post_type"),
        source: PropertySource::PostType,
        target: TargetType::Text,
        relationship: false,
        doc: "Content-type tag.".to_string(),
    });

    for field in &schema.fields {
        if field.name.is_empty() || field.kind == "tab" {
            continue;
        }
        let candidate = escape_keyword(&to_member_name(&field.name));
        let label = if field.label.is_empty() {
            field.name.as_str()
        } else {
            field.label.as_str()
        };
        specs.push(PropertySpec {
            member: unique_member_name(&mut seen, &candidate),
            source: PropertySource::Meta {
                key: field.name.clone(),
            },
            target: map_kind(&field.kind),
            relationship: is_relationship_kind(&field.kind),
            doc: format!("{} ({}).", label, field.kind),
        });
    }

    for (name, record_field, target) in STANDARD_FIELDS {
        let mut doc = name.replace('_', " ");
        if let Some(first) = doc.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        specs.push(PropertySpec {
            member: unique_member_name(&mut seen, name),
            source: PropertySource::Record(*record_field),
            target: *target,
            relationship: false,
            doc: format!("{doc}."),
        });
    }

    for taxonomy in &schema.taxonomies {
        let candidate = escape_keyword(&to_member_name(&taxonomy.name));
        let label = if taxonomy.label.is_empty() {
            taxonomy.name.as_str()
        } else {
            taxonomy.label.as_str()
        };
        specs.push(PropertySpec {
            member: unique_member_name(&mut seen, &candidate),
            source: PropertySource::Taxonomy {
                key: taxonomy.name.clone(),
            },
            target: TargetType::List,
            relationship: false,
            doc: format!("Terms for taxonomy '{label}'."),
        });
    }

    specs
}
