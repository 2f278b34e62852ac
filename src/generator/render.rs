use super::property::{build_properties, PropertySource, PropertySpec, RecordField};
use super::typemap::TargetType;
use crate::schema::ContentSchema;

/// Options controlling what the renderer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Emit the generic name-keyed `get`/`set` pair instead of per-property
    /// accessors. The dispatch itself is still expanded per property at
    /// generation time.
    pub magic_accessors: bool,
    /// Append a smoke-test module to the output.
    pub emit_tests: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            magic_accessors: true,
            emit_tests: false,
        }
    }
}

/// Append-only output buffer threaded through every render stage.
///
/// Deliberately not a shared global: each generation run owns exactly one and
/// hands it from stage to stage.
#[derive(Debug, Default)]
pub struct SourceBuilder {
    buf: String,
}

impl SourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line (a trailing newline is added).
    pub fn line(&mut self, line: impl AsRef<str>) {
        self.buf.push_str(line.as_ref());
        self.buf.push('\n');
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

struct Ctx<'a> {
    type_name: String,
    post_type: &'a str,
    props: &'a [PropertySpec],
    opts: &'a GenerationOptions,
}

impl Ctx<'_> {
    fn has_taxonomies(&self) -> bool {
        self.props
            .iter()
            .any(|p| matches!(p.source, PropertySource::Taxonomy { .. }))
    }
}

/// Render the complete model source for `schema`.
///
/// Pure function of its inputs: the same schema and options always produce
/// byte-identical output.
pub fn render_model(schema: &ContentSchema, opts: &GenerationOptions) -> String {
    let props = build_properties(schema);
    let ctx = Ctx {
        type_name: super::naming::to_type_name(&schema.post_type),
        post_type: &schema.post_type,
        props: &props,
        opts,
    };
    let mut out = SourceBuilder::new();
    render_header(&mut out, &ctx);
    render_error_type(&mut out, &ctx);
    render_properties(&mut out, &ctx);
    render_constructor(&mut out, &ctx);
    if ctx.opts.magic_accessors {
        render_magic_accessors(&mut out, &ctx);
    } else {
        render_explicit_accessors(&mut out, &ctx);
    }
    render_loader(&mut out, &ctx);
    render_static_finders(&mut out, &ctx);
    render_save(&mut out, &ctx);
    render_delete(&mut out, &ctx);
    render_serialize(&mut out, &ctx);
    render_validate(&mut out, &ctx);
    render_close(&mut out);
    if ctx.opts.emit_tests {
        render_tests(&mut out, &ctx);
    }
    out.finish()
}

/// Emit a Rust string literal for `s`.
fn quote(s: &str) -> String {
    format!("{s:?}")
}

/// Addressable name of a member (raw-identifier prefix stripped).
fn key(member: &str) -> &str {
    member.strip_prefix("r#").unwrap_or(member)
}

/// Expression converting `self.<member>` into a `serde_json::Value`.
fn json_expr(prop: &PropertySpec) -> String {
    let m = &prop.member;
    match prop.source {
        PropertySource::Id => "json!(self.id)".to_string(),
        PropertySource::PostType => "json!(self.post_type)".to_string(),
        _ => match prop.target {
            TargetType::Text | TargetType::List => {
                format!("self.{m}.as_ref().map_or(Value::Null, |v| json!(v))")
            }
            TargetType::Integer | TargetType::Boolean => {
                format!("self.{m}.map_or(Value::Null, |v| json!(v))")
            }
            TargetType::DateTime => format!(
                "self.{m}.map_or(Value::Null, |v| json!(v.format(DATETIME_FORMAT).to_string()))"
            ),
            TargetType::Untyped => format!("self.{m}.clone().unwrap_or(Value::Null)"),
        },
    }
}

fn render_header(out: &mut SourceBuilder, ctx: &Ctx) {
    out.line(format!(
        "//! Data-access model for the `{}` content type.",
        ctx.post_type
    ));
    out.line("//!");
    out.line("//! Generated by postforge from the registered schema. Regenerating");
    out.line("//! replaces this file; keep hand-written logic elsewhere.");
    out.blank();
    out.line("use std::collections::HashSet;");
    out.line("use std::fmt;");
    out.line("use std::sync::Arc;");
    out.blank();
    out.line("use chrono::NaiveDateTime;");
    out.line("use serde_json::{json, Map, Value};");
    out.blank();
    if ctx.has_taxonomies() {
        out.line("use postforge::host::{");
        out.line("    HostClient, HostError, MetaFilter, RecordData, RecordQuery, SortOrder, Term, TermFilter,");
        out.line("};");
    } else {
        out.line("use postforge::host::{");
        out.line("    HostClient, HostError, MetaFilter, RecordData, RecordQuery, SortOrder, TermFilter,");
        out.line("};");
    }
    out.blank();
    out.line("const DATETIME_FORMAT: &str = \"%Y-%m-%d %H:%M:%S\";");
    out.blank();
}

fn render_error_type(out: &mut SourceBuilder, ctx: &Ctx) {
    let ty = &ctx.type_name;
    out.line(format!(
        "/// Error raised by `{ty}` constructors, accessors and finders."
    ));
    out.line("#[derive(Debug)]");
    out.line("pub enum ModelError {");
    out.line("    /// No record with this id, or the record belongs to another content type.");
    out.line("    InvalidId(u64),");
    out.line("    /// Property name not declared on this model.");
    out.line("    UnknownProperty(String),");
    out.line("    /// Value type does not match the declared property type.");
    out.line("    TypeMismatch { property: String, expected: &'static str },");
    out.line("    /// Underlying host call failed.");
    out.line("    Host(HostError),");
    out.line("}");
    out.blank();
    out.line("impl fmt::Display for ModelError {");
    out.line("    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {");
    out.line("        match self {");
    out.line("            ModelError::InvalidId(id) => write!(f, \"invalid record id or content type: {id}\"),");
    out.line("            ModelError::UnknownProperty(name) => write!(f, \"property '{name}' does not exist\"),");
    out.line("            ModelError::TypeMismatch { property, expected } => {");
    out.line("                write!(f, \"property '{property}' expects a {expected} value\")");
    out.line("            }");
    out.line("            ModelError::Host(err) => write!(f, \"host error: {err}\"),");
    out.line("        }");
    out.line("    }");
    out.line("}");
    out.blank();
    out.line("impl std::error::Error for ModelError {}");
    out.blank();
    out.line("impl From<HostError> for ModelError {");
    out.line("    fn from(err: HostError) -> Self {");
    out.line("        ModelError::Host(err)");
    out.line("    }");
    out.line("}");
    out.blank();
}

fn render_properties(out: &mut SourceBuilder, ctx: &Ctx) {
    out.line(format!("/// The `{}` content type.", ctx.post_type));
    out.line(format!("pub struct {} {{", ctx.type_name));
    out.line("    host: Arc<dyn HostClient>,");
    for prop in ctx.props {
        out.line(format!("    /// {}", prop.doc));
        match prop.source {
            PropertySource::Id => out.line("    id: u64,"),
            PropertySource::PostType => out.line("    post_type: String,"),
            _ => out.line(format!("    {}: Option<{}>,", prop.member, prop.rust_type())),
        }
        if matches!(prop.source, PropertySource::PostType) {
            out.line("    /// Properties fetched or assigned since construction.");
            out.line("    loaded: HashSet<String>,");
        }
    }
    out.line("}");
    out.blank();
}

fn render_constructor(out: &mut SourceBuilder, ctx: &Ctx) {
    let ty = &ctx.type_name;
    out.line(format!("impl {ty} {{"));
    out.line(format!(
        "    /// Wrap the existing `{}` record `id`.",
        ctx.post_type
    ));
    out.line("    ///");
    out.line("    /// Fails when the record is missing or belongs to another content type.");
    out.line("    pub fn new(host: Arc<dyn HostClient>, id: u64) -> Result<Self, ModelError> {");
    out.line("        match host.record(id) {");
    out.line(format!(
        "            Some(record) if record.post_type == {} => {{}}",
        quote(ctx.post_type)
    ));
    out.line("            _ => return Err(ModelError::InvalidId(id)),");
    out.line("        }");
    out.line("        Ok(Self {");
    out.line("            host,");
    out.line("            id,");
    out.line(format!(
        "            post_type: {}.to_string(),",
        quote(ctx.post_type)
    ));
    out.line("            loaded: HashSet::new(),");
    for prop in ctx.props.iter().filter(|p| !p.is_builtin()) {
        out.line(format!("            {}: None,", prop.member));
    }
    out.line("        })");
    out.line("    }");
    out.blank();
}

fn render_magic_accessors(out: &mut SourceBuilder, ctx: &Ctx) {
    out.line("    /// Read the property named `name`, loading it from the host on first access.");
    out.line("    ///");
    out.line("    /// Fails with [`ModelError::UnknownProperty`] for names this model does not declare.");
    out.line("    pub fn get(&mut self, name: &str) -> Result<Value, ModelError> {");
    out.line("        if !self.loaded.contains(name) {");
    out.line("            self.load_property(name)?;");
    out.line("        }");
    out.line("        match name {");
    for prop in ctx.props {
        out.line(format!(
            "            {} => Ok({}),",
            quote(key(&prop.member)),
            json_expr(prop)
        ));
    }
    out.line("            _ => Err(ModelError::UnknownProperty(name.to_string())),");
    out.line("        }");
    out.line("    }");
    out.blank();
    out.line("    /// Assign the property named `name`, validating the value type first.");
    out.line("    pub fn set(&mut self, name: &str, value: Value) -> Result<(), ModelError> {");
    out.line("        match name {");
    for prop in ctx.props {
        let name = quote(key(&prop.member));
        out.line(format!("            {name} => {{"));
        out.line(format!(
            "                Self::check_type(name, &value, {})?;",
            quote(prop.target.tag())
        ));
        for stmt in store_stmts(prop) {
            out.line(format!("                {stmt}"));
        }
        out.line("            }");
    }
    out.line("            _ => return Err(ModelError::UnknownProperty(name.to_string())),");
    out.line("        }");
    out.line("        self.loaded.insert(name.to_string());");
    out.line("        Ok(())");
    out.line("    }");
    out.blank();
}

/// Statements storing a checked `value` into `self.<member>`.
fn store_stmts(prop: &PropertySpec) -> Vec<String> {
    let m = &prop.member;
    match &prop.source {
        PropertySource::Id => vec!["self.id = value.as_u64().unwrap_or_default();".to_string()],
        PropertySource::PostType => {
            vec!["self.post_type = value.as_str().unwrap_or_default().to_string();".to_string()]
        }
        PropertySource::Taxonomy { .. } => vec![
            "let terms: Vec<Term> = serde_json::from_value(value).map_err(|_| {".to_string(),
            "    ModelError::TypeMismatch {".to_string(),
            format!("        property: {}.to_string(),", quote(key(m))),
            "        expected: \"list\",".to_string(),
            "    }".to_string(),
            "})?;".to_string(),
            format!("self.{m} = Some(terms);"),
        ],
        _ => match prop.target {
            TargetType::Text => vec![format!("self.{m} = value.as_str().map(ToOwned::to_owned);")],
            TargetType::Integer => vec![format!("self.{m} = value.as_i64();")],
            TargetType::Boolean => vec![format!("self.{m} = value.as_bool();")],
            TargetType::DateTime => vec![format!(
                "self.{m} = value.as_str().and_then(|s| NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).ok());"
            )],
            TargetType::List => vec![format!("self.{m} = value.as_array().cloned();")],
            TargetType::Untyped => vec![format!("self.{m} = Some(value);")],
        },
    }
}

fn render_explicit_accessors(out: &mut SourceBuilder, ctx: &Ctx) {
    for prop in ctx.props {
        match prop.source {
            PropertySource::Id => {
                out.line(format!("    /// {}", prop.doc));
                out.line("    pub fn id(&self) -> u64 {");
                out.line("        self.id");
                out.line("    }");
                out.blank();
            }
            PropertySource::PostType => {
                out.line(format!("    /// {}", prop.doc));
                out.line("    pub fn post_type(&self) -> &str {");
                out.line("        &self.post_type");
                out.line("    }");
                out.blank();
            }
            _ => {
                let m = &prop.member;
                let k = key(m);
                let (ret, expr) = reader_signature(prop);
                out.line(format!("    /// {}", prop.doc));
                out.line("    ///");
                out.line("    /// Loaded from the host on first access.");
                out.line(format!(
                    "    pub fn {m}(&mut self) -> Result<{ret}, ModelError> {{"
                ));
                out.line(format!(
                    "        if self.{m}.is_none() && !self.loaded.contains({}) {{",
                    quote(k)
                ));
                out.line(format!("            self.load_property({})?;", quote(k)));
                out.line("        }");
                out.line(format!("        Ok({expr})"));
                out.line("    }");
                out.blank();
                out.line(format!(
                    "    /// Set `{k}`, validating the value type first."
                ));
                out.line(format!(
                    "    pub fn set_{k}(&mut self, value: Value) -> Result<(), ModelError> {{"
                ));
                out.line(format!(
                    "        Self::check_type({}, &value, {})?;",
                    quote(k),
                    quote(prop.target.tag())
                ));
                for stmt in store_stmts(prop) {
                    out.line(format!("        {stmt}"));
                }
                out.line(format!("        self.loaded.insert({}.to_string());", quote(k)));
                out.line("        Ok(())");
                out.line("    }");
                out.blank();
            }
        }
    }
}

/// Return type and body expression of an explicit reader.
fn reader_signature(prop: &PropertySpec) -> (String, String) {
    let m = &prop.member;
    match &prop.source {
        PropertySource::Taxonomy { .. } => {
            ("Option<&[Term]>".to_string(), format!("self.{m}.as_deref()"))
        }
        _ => match prop.target {
            TargetType::Text => ("Option<&str>".to_string(), format!("self.{m}.as_deref()")),
            TargetType::Integer => ("Option<i64>".to_string(), format!("self.{m}")),
            TargetType::Boolean => ("Option<bool>".to_string(), format!("self.{m}")),
            TargetType::DateTime => ("Option<NaiveDateTime>".to_string(), format!("self.{m}")),
            TargetType::List => (
                "Option<&[Value]>".to_string(),
                format!("self.{m}.as_deref()"),
            ),
            TargetType::Untyped => ("Option<&Value>".to_string(), format!("self.{m}.as_ref()")),
        },
    }
}

fn render_loader(out: &mut SourceBuilder, ctx: &Ctx) {
    out.line("    /// Populate one property from the host.");
    out.line("    fn load_property(&mut self, name: &str) -> Result<(), ModelError> {");
    out.line("        match name {");
    out.line("            // Assigned in the constructor");
    out.line("            \"id\" | \"post_type\" => {}");

    // Standard attributes load from one record fetch
    let record_props: Vec<&PropertySpec> = ctx
        .props
        .iter()
        .filter(|p| {
            matches!(
                p.source,
                PropertySource::Record(
                    RecordField::Title
                        | RecordField::Content
                        | RecordField::Excerpt
                        | RecordField::Author
                        | RecordField::Created
                        | RecordField::Modified
                )
            )
        })
        .collect();
    if !record_props.is_empty() {
        let arm = record_props
            .iter()
            .map(|p| quote(key(&p.member)))
            .collect::<Vec<_>>()
            .join(" | ");
        out.line(format!("            {arm} => {{"));
        out.line("                let record = self.host.record(self.id).ok_or(ModelError::InvalidId(self.id))?;");
        out.line("                match name {");
        for prop in &record_props {
            let m = &prop.member;
            let expr = match prop.source {
                PropertySource::Record(RecordField::Title) => "Some(record.title)",
                PropertySource::Record(RecordField::Content) => "Some(record.content)",
                PropertySource::Record(RecordField::Excerpt) => "Some(record.excerpt)",
                PropertySource::Record(RecordField::Author) => "Some(record.author as i64)",
                PropertySource::Record(RecordField::Created) => "Some(record.created)",
                PropertySource::Record(RecordField::Modified) => "Some(record.modified)",
                _ => unreachable!("filtered above"),
            };
            out.line(format!(
                "                    {} => self.{m} = {expr},",
                quote(key(m))
            ));
        }
        out.line("                    _ => {}");
        out.line("                }");
        out.line("            }");
    }

    for prop in ctx.props {
        match &prop.source {
            PropertySource::Record(RecordField::Thumbnail) => {
                out.line(format!(
                    "            {} => self.{} = Some(self.host.thumbnail_url(self.id).unwrap_or_default()),",
                    quote(key(&prop.member)),
                    prop.member
                ));
            }
            PropertySource::Meta { key: field_key } => {
                let m = &prop.member;
                if prop.relationship {
                    out.line(format!("            // `{m}` references other records"));
                }
                match prop.target {
                    TargetType::DateTime => {
                        out.line(format!("            {} => {{", quote(key(m))));
                        out.line(format!(
                            "                self.{m} = self.host.field({}, self.id).and_then(|v| {{",
                            quote(field_key)
                        ));
                        out.line("                    v.as_str().and_then(|s| NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).ok())");
                        out.line("                });");
                        out.line("            }");
                    }
                    TargetType::Untyped => {
                        out.line(format!(
                            "            {} => self.{m} = self.host.field({}, self.id),",
                            quote(key(m)),
                            quote(field_key)
                        ));
                    }
                    _ => {
                        let conv = match prop.target {
                            TargetType::Text => ".and_then(|v| v.as_str().map(ToOwned::to_owned))",
                            TargetType::Integer => ".and_then(|v| v.as_i64())",
                            TargetType::Boolean => ".and_then(|v| v.as_bool())",
                            TargetType::List => ".and_then(|v| v.as_array().cloned())",
                            _ => unreachable!("handled above"),
                        };
                        out.line(format!(
                            "            {} => self.{m} = self.host.field({}, self.id){conv},",
                            quote(key(m)),
                            quote(field_key)
                        ));
                    }
                }
            }
            PropertySource::Taxonomy { key: tax_key } => {
                out.line(format!(
                    "            {} => self.{} = Some(self.host.terms(self.id, {})),",
                    quote(key(&prop.member)),
                    prop.member,
                    quote(tax_key)
                ));
            }
            _ => {}
        }
    }
    out.line("            _ => return Err(ModelError::UnknownProperty(name.to_string())),");
    out.line("        }");
    out.line("        self.loaded.insert(name.to_string());");
    out.line("        Ok(())");
    out.line("    }");
    out.blank();
}

fn render_static_finders(out: &mut SourceBuilder, ctx: &Ctx) {
    let pt = quote(ctx.post_type);
    out.line(format!(
        "    /// Insert a new `{}` record and wrap it.",
        ctx.post_type
    ));
    out.line("    pub fn create(host: Arc<dyn HostClient>, data: RecordData) -> Result<Self, ModelError> {");
    out.line("        let mut data = data;");
    out.line(format!("        data.post_type = {pt}.to_string();"));
    out.line("        if data.status.is_none() {");
    out.line("            data.status = Some(\"publish\".to_string());");
    out.line("        }");
    out.line("        let id = host.insert_record(data)?;");
    out.line("        Self::new(host, id)");
    out.line("    }");
    out.blank();
    out.line("    /// Wrap the existing record `id`.");
    out.line("    pub fn find_by_id(host: Arc<dyn HostClient>, id: u64) -> Result<Self, ModelError> {");
    out.line("        Self::new(host, id)");
    out.line("    }");
    out.blank();
    out.line(format!(
        "    /// Page through `{}` records with flat equality filters.",
        ctx.post_type
    ));
    out.line("    ///");
    out.line("    /// Records that fail wrapping are skipped rather than failing the call.");
    out.line("    pub fn get_latest(");
    out.line("        host: Arc<dyn HostClient>,");
    out.line("        per_page: u32,");
    out.line("        page: u32,");
    out.line("        order_by: &str,");
    out.line("        order: SortOrder,");
    out.line("        filters: &[(&str, Value)],");
    out.line("    ) -> Vec<Self> {");
    out.line(format!("        let mut query = RecordQuery::new({pt})"));
    out.line("            .per_page(per_page)");
    out.line("            .page(page)");
    out.line("            .order_by(order_by, order);");
    out.line("        for (key, value) in filters {");
    out.line("            query = query.meta(MetaFilter::equals(*key, value.clone()));");
    out.line("        }");
    out.line("        host.query(&query)");
    out.line("            .into_iter()");
    out.line("            .filter_map(|id| Self::new(Arc::clone(&host), id).ok())");
    out.line("            .collect()");
    out.line("    }");
    out.blank();
    out.line(format!(
        "    /// Page through `{}` records matching meta and taxonomy filters.",
        ctx.post_type
    ));
    out.line("    ///");
    out.line("    /// Records that fail wrapping are skipped rather than failing the call.");
    out.line("    pub fn filter(");
    out.line("        host: Arc<dyn HostClient>,");
    out.line("        filters: &[MetaFilter],");
    out.line("        term_filters: &[TermFilter],");
    out.line("        per_page: u32,");
    out.line("        page: u32,");
    out.line("        order_by: &str,");
    out.line("        order: SortOrder,");
    out.line("    ) -> Vec<Self> {");
    out.line(format!("        let mut query = RecordQuery::new({pt})"));
    out.line("            .per_page(per_page)");
    out.line("            .page(page)");
    out.line("            .order_by(order_by, order);");
    out.line("        for meta in filters {");
    out.line("            query = query.meta(meta.clone());");
    out.line("        }");
    out.line("        for term in term_filters {");
    out.line("            query = query.term(term.clone());");
    out.line("        }");
    out.line("        host.query(&query)");
    out.line("            .into_iter()");
    out.line("            .filter_map(|id| Self::new(Arc::clone(&host), id).ok())");
    out.line("            .collect()");
    out.line("    }");
    out.blank();
    out.line(format!(
        "    /// Number of published `{}` records.",
        ctx.post_type
    ));
    out.line("    pub fn get_count(host: &dyn HostClient) -> u64 {");
    out.line(format!("        host.count_published({pt})"));
    out.line("    }");
    out.blank();
    out.line(format!(
        "    /// Number of `{}` records whose `key` field equals `value`.",
        ctx.post_type
    ));
    out.line("    pub fn get_count_by_meta(host: &dyn HostClient, key: &str, value: Value) -> u64 {");
    out.line(format!(
        "        host.count(&RecordQuery::new({pt}).unpaged().meta(MetaFilter::equals(key, value)))"
    ));
    out.line("    }");
    out.blank();
}

fn render_save(out: &mut SourceBuilder, ctx: &Ctx) {
    out.line("    /// Write tracked properties back to the host and clear the tracker.");
    out.line("    ///");
    out.line("    /// Properties never read or assigned keep their stored values.");
    out.line("    pub fn save(&mut self) -> Result<(), ModelError> {");
    out.line(format!(
        "        let mut data = RecordData::for_type({});",
        quote(ctx.post_type)
    ));
    for prop in ctx.props {
        let m = &prop.member;
        let assignment = match prop.source {
            PropertySource::Record(RecordField::Title) => format!("data.title = self.{m}.clone();"),
            PropertySource::Record(RecordField::Content) => {
                format!("data.content = self.{m}.clone();")
            }
            PropertySource::Record(RecordField::Excerpt) => {
                format!("data.excerpt = self.{m}.clone();")
            }
            PropertySource::Record(RecordField::Author) => {
                format!("data.author = self.{m}.map(|v| v as u64);")
            }
            _ => continue,
        };
        out.line(format!(
            "        if self.loaded.contains({}) {{",
            quote(key(m))
        ));
        out.line(format!("            {assignment}"));
        out.line("        }");
    }
    out.line("        self.host.update_record(self.id, data)?;");
    for prop in ctx.props {
        let m = &prop.member;
        match &prop.source {
            PropertySource::Record(RecordField::Thumbnail) => {
                out.line(format!(
                    "        if self.loaded.contains({}) {{",
                    quote(key(m))
                ));
                out.line(format!(
                    "            if let Some(url) = self.{m}.as_deref().filter(|url| !url.is_empty()) {{"
                ));
                out.line("                self.host.set_thumbnail(self.id, url)?;");
                out.line("            }");
                out.line("        }");
            }
            PropertySource::Meta { key: field_key } => {
                out.line(format!(
                    "        if self.loaded.contains({}) {{",
                    quote(key(m))
                ));
                out.line(format!(
                    "            self.host.set_field({}, self.id, {})?;",
                    quote(field_key),
                    json_expr(prop)
                ));
                out.line("        }");
            }
            PropertySource::Taxonomy { key: tax_key } => {
                out.line(format!(
                    "        if self.loaded.contains({}) {{",
                    quote(key(m))
                ));
                out.line(format!(
                    "            let terms: Vec<i64> = self.{m}.iter().flatten().map(|t| t.id).collect();"
                ));
                out.line(format!(
                    "            self.host.set_terms(self.id, {}, &terms)?;",
                    quote(tax_key)
                ));
                out.line("        }");
            }
            _ => {}
        }
    }
    out.line("        self.loaded.clear();");
    out.line("        Ok(())");
    out.line("    }");
    out.blank();
}

fn render_delete(out: &mut SourceBuilder, _ctx: &Ctx) {
    out.line("    /// Permanently remove the underlying record.");
    out.line("    pub fn delete(&self) -> bool {");
    out.line("        self.host.delete_record(self.id, true)");
    out.line("    }");
    out.blank();
}

fn render_serialize(out: &mut SourceBuilder, ctx: &Ctx) {
    out.line("    /// Flatten every property into a key → value map.");
    out.line("    ///");
    out.line("    /// Values never loaded serialize as `null`.");
    out.line("    pub fn to_map(&self) -> Map<String, Value> {");
    out.line("        let mut map = Map::new();");
    for prop in ctx.props {
        out.line(format!(
            "        map.insert({}.to_string(), {});",
            quote(key(&prop.member)),
            json_expr(prop)
        ));
    }
    out.line("        map");
    out.line("    }");
    out.blank();
    out.line("    /// Render the property map as a JSON document.");
    out.line("    pub fn to_json(&self) -> String {");
    out.line("        Value::Object(self.to_map()).to_string()");
    out.line("    }");
    out.blank();
}

fn render_validate(out: &mut SourceBuilder, _ctx: &Ctx) {
    out.line("    /// Check `value` against a declared property type tag.");
    out.line("    fn check_type(property: &str, value: &Value, expected: &'static str) -> Result<(), ModelError> {");
    out.line("        let ok = match expected {");
    out.line("            \"string\" => value.is_string(),");
    out.line("            \"integer\" => value.is_i64() || value.is_u64(),");
    out.line("            \"boolean\" => value.is_boolean(),");
    out.line("            \"list\" => value.is_array(),");
    out.line("            \"datetime\" => value");
    out.line("                .as_str()");
    out.line("                .map(|s| NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).is_ok())");
    out.line("                .unwrap_or(false),");
    out.line("            _ => true,");
    out.line("        };");
    out.line("        if ok {");
    out.line("            Ok(())");
    out.line("        } else {");
    out.line("            Err(ModelError::TypeMismatch {");
    out.line("                property: property.to_string(),");
    out.line("                expected,");
    out.line("            })");
    out.line("        }");
    out.line("    }");
}

fn render_close(out: &mut SourceBuilder) {
    out.line("}");
}

fn render_tests(out: &mut SourceBuilder, ctx: &Ctx) {
    out.blank();
    out.line("#[cfg(test)]");
    out.line("mod tests {");
    out.line("    use super::*;");
    out.line("    use postforge::host::MemoryHost;");
    out.blank();
    out.line("    #[test]");
    out.line("    fn constructs_from_a_new_record() {");
    out.line("        let host = Arc::new(MemoryHost::new());");
    out.line("        let id = host");
    out.line(format!(
        "            .insert_record(RecordData::for_type({}))",
        quote(ctx.post_type)
    ));
    out.line("            .expect(\"insert record\");");
    out.line(format!(
        "        assert!({}::new(host, id).is_ok());",
        ctx.type_name
    ));
    out.line("    }");
    out.line("}");
}
