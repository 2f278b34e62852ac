//! End-to-end generation: registry file in, model source out.

use postforge::generator::{render_model, GenerationOptions};
use postforge::schema::{collect_schema, load_registry, SchemaError};

mod common;
use common::temp_files;

#[test]
fn test_registry_to_model_roundtrip() {
    let path = temp_files::create_temp_registry(common::EVENT_REGISTRY, "yaml");
    let registry = load_registry(&path).unwrap();
    let schema = collect_schema(&registry, "event").unwrap();
    let source = render_model(&schema, &GenerationOptions::default());

    assert!(source.contains("pub struct Event {"));
    assert!(source.contains("    location: Option<String>,"));
    assert!(source.contains("    capacity: Option<i64>,"));
    assert!(source.contains("    event_category: Option<Vec<Term>>,"));
    assert!(source.contains("    id: u64,"));
    assert!(source.contains("    post_type: String,"));
    assert!(source.contains("    loaded: HashSet<String>,"));

    temp_files::cleanup(&[path]);
}

#[test]
fn test_json_registry_is_equivalent() {
    let yaml_path = temp_files::create_temp_registry(common::EVENT_REGISTRY, "yaml");
    let json = serde_json::to_string(&load_registry(&yaml_path).unwrap()).unwrap();
    let json_path = temp_files::create_temp_registry(&json, "json");

    let from_yaml = load_registry(&yaml_path).unwrap();
    let from_json = load_registry(&json_path).unwrap();
    let opts = GenerationOptions::default();
    assert_eq!(
        render_model(&collect_schema(&from_yaml, "event").unwrap(), &opts),
        render_model(&collect_schema(&from_json, "event").unwrap(), &opts)
    );

    temp_files::cleanup(&[yaml_path, json_path]);
}

#[test]
fn test_schema_less_content_type_generates() {
    let path = temp_files::create_temp_registry(common::EVENT_REGISTRY, "yaml");
    let registry = load_registry(&path).unwrap();
    let schema = collect_schema(&registry, "page").unwrap();
    assert!(schema.fields.is_empty());
    assert!(schema.taxonomies.is_empty());

    let source = render_model(&schema, &GenerationOptions::default());
    assert!(source.contains("pub struct Page {"));
    assert!(source.contains("    title: Option<String>,"));

    temp_files::cleanup(&[path]);
}

#[test]
fn test_unknown_content_type_is_rejected() {
    let path = temp_files::create_temp_registry(common::EVENT_REGISTRY, "yaml");
    let registry = load_registry(&path).unwrap();
    assert_eq!(
        collect_schema(&registry, "widget").unwrap_err(),
        SchemaError::UnknownContentType("widget".to_string())
    );
    temp_files::cleanup(&[path]);
}

#[test]
fn test_duplicate_content_types_fail_to_load() {
    let doc = r#"
content_types:
  - name: event
  - name: event
"#;
    let path = temp_files::create_temp_registry(doc, "yaml");
    assert!(load_registry(&path).is_err());
    temp_files::cleanup(&[path]);
}

#[test]
fn test_repeated_generation_is_byte_identical() {
    let path = temp_files::create_temp_registry(common::EVENT_REGISTRY, "yaml");
    let registry = load_registry(&path).unwrap();
    let schema = collect_schema(&registry, "event").unwrap();
    for opts in [
        GenerationOptions::default(),
        GenerationOptions {
            magic_accessors: false,
            emit_tests: true,
        },
    ] {
        assert_eq!(render_model(&schema, &opts), render_model(&schema, &opts));
    }
    temp_files::cleanup(&[path]);
}

#[test]
fn test_colliding_identifiers_stay_distinct() {
    let doc = r#"
content_types:
  - name: event
    fields:
      - { name: title, label: Custom title, kind: text }
      - { name: event-category, label: Kebab, kind: text }
    taxonomies:
      - { name: event_category, label: Event Categories }
"#;
    let path = temp_files::create_temp_registry(doc, "yaml");
    let registry = load_registry(&path).unwrap();
    let schema = collect_schema(&registry, "event").unwrap();
    let source = render_model(&schema, &GenerationOptions::default());

    // The custom field claimed `title` first; the standard record field moves
    // over. The kebab-case field and the taxonomy normalize to the same
    // member, so the later one is suffixed.
    assert!(source.contains("    title: Option<String>,"));
    assert!(source.contains("    title_1: Option<String>,"));
    assert!(source.contains("    event_category: Option<String>,"));
    assert!(source.contains("    event_category_1: Option<Vec<Term>>,"));

    temp_files::cleanup(&[path]);
}
