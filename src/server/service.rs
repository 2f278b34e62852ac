use std::io;
use std::sync::Arc;

use askama::Template;
use may_minihttp::{HttpService, Request, Response};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::request::{parse_request, ParsedRequest};
use super::response::{sanitize_file_name, write_attachment, write_html, write_json_error};
use crate::generator::{model_file_name, render_model, GenerationOptions};
use crate::schema::{collect_schema, ContentTypeDef, SchemaSource};
use crate::security::{AdminAuth, SecurityRequest, TokenStore};

/// The admin form page.
#[derive(Template)]
#[template(path = "admin.html")]
struct AdminPageTemplate {
    content_types: Vec<ContentTypeDef>,
    token: String,
}

/// What a handler decided to send, before it touches the wire.
///
/// Keeping this separate from `may_minihttp::Response` lets the routing and
/// generation flow be tested without a socket.
#[derive(Debug, PartialEq)]
pub enum Reply {
    Json { status: u16, body: Value },
    Html { status: u16, body: String },
    Attachment { filename: String, body: String },
}

impl Reply {
    fn json(status: u16, body: Value) -> Self {
        Reply::Json { status, body }
    }

    pub fn status(&self) -> u16 {
        match self {
            Reply::Json { status, .. } | Reply::Html { status, .. } => *status,
            Reply::Attachment { .. } => 200,
        }
    }
}

/// The admin service: form page plus the generation endpoint.
#[derive(Clone)]
pub struct AdminService {
    pub schema: Arc<dyn SchemaSource>,
    pub auth: Arc<dyn AdminAuth>,
    pub tokens: Arc<TokenStore>,
}

impl AdminService {
    pub fn new(
        schema: Arc<dyn SchemaSource>,
        auth: Arc<dyn AdminAuth>,
        tokens: Arc<TokenStore>,
    ) -> Self {
        Self {
            schema,
            auth,
            tokens,
        }
    }

    fn security<'a>(parsed: &'a ParsedRequest) -> SecurityRequest<'a> {
        SecurityRequest {
            headers: &parsed.headers,
            cookies: &parsed.cookies,
            query: &parsed.query_params,
        }
    }

    /// Route one parsed request.
    pub fn handle(&self, parsed: &ParsedRequest) -> Reply {
        match (parsed.method.as_str(), parsed.path.as_str()) {
            ("GET", "/health") => Reply::json(200, json!({ "status": "ok" })),
            ("GET", "/" | "/admin") => self.admin_page(parsed),
            ("POST", "/generate") => self.generate(parsed),
            _ => Reply::json(
                404,
                json!({ "error": "Not Found", "method": parsed.method, "path": parsed.path }),
            ),
        }
    }

    /// Render the admin form with a fresh anti-forgery token.
    fn admin_page(&self, parsed: &ParsedRequest) -> Reply {
        if !self.auth.authorize(&Self::security(parsed)) {
            return Reply::json(403, json!({ "error": "Unauthorized user" }));
        }
        let page = AdminPageTemplate {
            content_types: self.schema.content_types(),
            token: self.tokens.issue(),
        };
        match page.render() {
            Ok(html) => Reply::Html {
                status: 200,
                body: html,
            },
            Err(err) => {
                warn!(error = %err, "admin page render failed");
                Reply::json(500, json!({ "error": "Internal Server Error" }))
            }
        }
    }

    /// Validate the submission, collect the schema, render, and package the
    /// result as a download.
    fn generate(&self, parsed: &ParsedRequest) -> Reply {
        if !self.auth.authorize(&Self::security(parsed)) {
            return Reply::json(403, json!({ "error": "Unauthorized user" }));
        }
        let token_ok = parsed
            .form
            .get("_token")
            .map(|token| self.tokens.validate(token))
            .unwrap_or(false);
        if !token_ok {
            return Reply::json(403, json!({ "error": "Invalid request token" }));
        }

        let post_type = parsed.form.get("post_type").map(String::as_str).unwrap_or("");
        let schema = match collect_schema(self.schema.as_ref(), post_type) {
            Ok(schema) => schema,
            Err(err) => {
                warn!(post_type, error = %err, "generation rejected");
                return Reply::json(400, json!({ "error": "Invalid post type" }));
            }
        };

        let opts = GenerationOptions {
            magic_accessors: parsed.form.contains_key("use_magic_methods"),
            emit_tests: parsed.form.contains_key("generate_tests"),
        };
        let source = render_model(&schema, &opts);
        info!(
            post_type = %schema.post_type,
            magic = opts.magic_accessors,
            tests = opts.emit_tests,
            bytes = source.len(),
            "model generated"
        );
        Reply::Attachment {
            filename: sanitize_file_name(&model_file_name(&schema.post_type)),
            body: source,
        }
    }
}

impl HttpService for AdminService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);
        match self.handle(&parsed) {
            Reply::Json { status, body } => write_json_error(res, status, body),
            Reply::Html { status, body } => write_html(res, status, body),
            Reply::Attachment { filename, body } => write_attachment(res, &filename, body),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, SchemaRegistry, TaxonomyDescriptor};
    use crate::security::ApiKeyAdminAuth;
    use std::collections::HashMap;

    fn service() -> AdminService {
        let registry = SchemaRegistry::new(vec![ContentTypeDef {
            name: "event".to_string(),
            label: "Events".to_string(),
            fields: vec![FieldDescriptor::new("location", "Location", "text")],
            taxonomies: vec![TaxonomyDescriptor::new("event_category", "Event Categories")],
        }]);
        AdminService::new(
            Arc::new(registry),
            Arc::new(ApiKeyAdminAuth::new("k3y").cookie_name("admin_key")),
            Arc::new(TokenStore::new("test-secret")),
        )
    }

    fn authorized_post(form: &[(&str, &str)]) -> ParsedRequest {
        let mut headers = HashMap::new();
        headers.insert("x-admin-key".to_string(), "k3y".to_string());
        ParsedRequest {
            method: "POST".to_string(),
            path: "/generate".to_string(),
            headers,
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..ParsedRequest::default()
        }
    }

    #[test]
    fn test_health() {
        let reply = service().handle(&ParsedRequest {
            method: "GET".to_string(),
            path: "/health".to_string(),
            ..ParsedRequest::default()
        });
        assert_eq!(reply, Reply::json(200, json!({ "status": "ok" })));
    }

    #[test]
    fn test_admin_page_requires_capability() {
        let svc = service();
        let reply = svc.handle(&ParsedRequest {
            method: "GET".to_string(),
            path: "/admin".to_string(),
            ..ParsedRequest::default()
        });
        assert_eq!(reply.status(), 403);
    }

    #[test]
    fn test_admin_page_lists_content_types_and_token() {
        let svc = service();
        let mut headers = HashMap::new();
        headers.insert("x-admin-key".to_string(), "k3y".to_string());
        let reply = svc.handle(&ParsedRequest {
            method: "GET".to_string(),
            path: "/admin".to_string(),
            headers,
            ..ParsedRequest::default()
        });
        let Reply::Html { status, body } = reply else {
            panic!("expected html");
        };
        assert_eq!(status, 200);
        assert!(body.contains("value=\"event\""));
        assert!(body.contains("name=\"_token\""));
        assert!(body.contains("name=\"use_magic_methods\""));
    }

    #[test]
    fn test_generate_without_capability_is_403() {
        let svc = service();
        let mut req = authorized_post(&[("post_type", "event")]);
        req.headers.clear();
        assert_eq!(svc.handle(&req).status(), 403);
    }

    #[test]
    fn test_generate_without_token_is_403() {
        let svc = service();
        let req = authorized_post(&[("post_type", "event")]);
        assert_eq!(svc.handle(&req).status(), 403);
    }

    #[test]
    fn test_generate_with_reused_token_is_403() {
        let svc = service();
        let token = svc.tokens.issue();
        let req = authorized_post(&[("post_type", "event"), ("_token", &token)]);
        assert_eq!(svc.handle(&req).status(), 200);
        let req = authorized_post(&[("post_type", "event"), ("_token", &token)]);
        assert_eq!(svc.handle(&req).status(), 403);
    }

    #[test]
    fn test_generate_with_unknown_post_type_is_400() {
        let svc = service();
        let token = svc.tokens.issue();
        let req = authorized_post(&[("post_type", "missing"), ("_token", &token)]);
        assert_eq!(svc.handle(&req).status(), 400);
    }

    #[test]
    fn test_generate_streams_model_attachment() {
        let svc = service();
        let token = svc.tokens.issue();
        let req = authorized_post(&[
            ("post_type", "event"),
            ("use_magic_methods", "1"),
            ("_token", &token),
        ]);
        let Reply::Attachment { filename, body } = svc.handle(&req) else {
            panic!("expected attachment");
        };
        assert_eq!(filename, "event_class.rs");
        assert!(body.contains("pub struct Event {"));
        assert!(body.contains("pub fn get(&mut self, name: &str)"));
    }

    #[test]
    fn test_generate_options_follow_presence_flags() {
        let svc = service();
        let token = svc.tokens.issue();
        let req = authorized_post(&[("post_type", "event"), ("_token", &token)]);
        let Reply::Attachment { body, .. } = svc.handle(&req) else {
            panic!("expected attachment");
        };
        // No use_magic_methods flag → explicit accessors, no tests module
        assert!(body.contains("pub fn set_location"));
        assert!(!body.contains("#[cfg(test)]"));
    }

    #[test]
    fn test_unknown_route_is_404() {
        let reply = service().handle(&ParsedRequest {
            method: "GET".to_string(),
            path: "/nope".to_string(),
            ..ParsedRequest::default()
        });
        assert_eq!(reply.status(), 404);
    }
}
