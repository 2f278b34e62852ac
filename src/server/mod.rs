//! # Server Module
//!
//! The admin HTTP surface, built on `may_minihttp` coroutines.
//!
//! [`AdminService`] routes three paths: `GET /health`, the admin form at
//! `GET /admin` (and `/`), and `POST /generate`, which runs the full
//! authorize → verify token → validate content type → collect → render →
//! download pipeline. Routing and the generation flow live behind
//! [`Reply`] so they are testable without a socket; the
//! `may_minihttp::HttpService` impl is a thin adapter over it.

mod http_server;
mod request;
mod response;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_cookies, parse_form, parse_query_params, parse_request, ParsedRequest};
pub use response::{sanitize_file_name, write_attachment, write_html, write_json_error};
pub use service::{AdminService, Reply};
