//! Admin service over a real socket: capability, token, and download flow.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use postforge::schema::load_registry;
use postforge::security::{ApiKeyAdminAuth, TokenStore};
use postforge::server::{AdminService, HttpServer, ServerHandle};

mod common;
use common::{temp_files, test_server};

const ADMIN_KEY: &str = "integration-key";

struct TestService {
    handle: Option<ServerHandle>,
    addr: SocketAddr,
    tokens: Arc<TokenStore>,
}

impl Drop for TestService {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}

fn start_service() -> TestService {
    test_server::setup_may_runtime();
    let path = temp_files::create_temp_registry(common::EVENT_REGISTRY, "yaml");
    let registry = load_registry(&path).unwrap();
    temp_files::cleanup(&[path]);

    let tokens = Arc::new(TokenStore::new("integration-secret"));
    let service = AdminService::new(
        Arc::new(registry),
        Arc::new(ApiKeyAdminAuth::new(ADMIN_KEY).cookie_name("admin_key")),
        Arc::clone(&tokens),
    );

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let handle = HttpServer(service).start(addr).unwrap();
    handle.wait_ready().unwrap();
    TestService {
        handle: Some(handle),
        addr,
        tokens,
    }
}

fn send_request(addr: &SocketAddr, req: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(req.as_bytes()).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_millis(200)))
        .unwrap();
    let mut buf = Vec::new();
    loop {
        let mut tmp = [0u8; 1024];
        match stream.read(&mut tmp) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                break
            }
            Err(e) => panic!("read error: {e:?}"),
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn get(addr: &SocketAddr, path: &str, headers: &[(&str, &str)]) -> String {
    let mut req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n");
    for (name, value) in headers {
        req.push_str(&format!("{name}: {value}\r\n"));
    }
    req.push_str("Connection: close\r\n\r\n");
    send_request(addr, &req)
}

fn post_form(addr: &SocketAddr, path: &str, headers: &[(&str, &str)], form: &[(&str, &str)]) -> String {
    let body: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form.iter().copied())
        .finish();
    let mut req = format!(
        "POST {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n",
        body.len()
    );
    for (name, value) in headers {
        req.push_str(&format!("{name}: {value}\r\n"));
    }
    req.push_str("Connection: close\r\n\r\n");
    req.push_str(&body);
    send_request(addr, &req)
}

fn split_response(resp: &str) -> (u16, HashMap<String, String>, String) {
    let mut parts = resp.splitn(2, "\r\n\r\n");
    let head = parts.next().unwrap_or("");
    let body = parts.next().unwrap_or("").to_string();
    let mut status = 0;
    let mut headers = HashMap::new();
    for (i, line) in head.lines().enumerate() {
        if i == 0 {
            status = line.split_whitespace().nth(1).unwrap_or("0").parse().unwrap_or(0);
        } else if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }
    (status, headers, body)
}

#[test]
fn test_health_endpoint() {
    let service = start_service();
    let (status, _, body) = split_response(&get(&service.addr, "/health", &[]));
    assert_eq!(status, 200);
    assert!(body.contains("\"status\":\"ok\""));
}

#[test]
fn test_admin_page_requires_key() {
    let service = start_service();
    let (status, _, _) = split_response(&get(&service.addr, "/admin", &[]));
    assert_eq!(status, 403);

    let (status, _, body) =
        split_response(&get(&service.addr, "/admin", &[("x-admin-key", ADMIN_KEY)]));
    assert_eq!(status, 200);
    assert!(body.contains("name=\"_token\""));
    assert!(body.contains("value=\"event\""));
}

#[test]
fn test_generate_without_token_is_403() {
    let service = start_service();
    let resp = post_form(
        &service.addr,
        "/generate",
        &[("x-admin-key", ADMIN_KEY)],
        &[("post_type", "event")],
    );
    let (status, _, body) = split_response(&resp);
    assert_eq!(status, 403);
    assert!(body.contains("Invalid request token"));
}

#[test]
fn test_generate_with_bad_post_type_is_400() {
    let service = start_service();
    let token = service.tokens.issue();
    let resp = post_form(
        &service.addr,
        "/generate",
        &[("x-admin-key", ADMIN_KEY)],
        &[("post_type", "widget"), ("_token", &token)],
    );
    let (status, _, body) = split_response(&resp);
    assert_eq!(status, 400);
    assert!(body.contains("Invalid post type"));
}

#[test]
fn test_generate_streams_attachment() {
    let service = start_service();
    let token = service.tokens.issue();
    let resp = post_form(
        &service.addr,
        "/generate",
        &[("x-admin-key", ADMIN_KEY)],
        &[
            ("post_type", "event"),
            ("use_magic_methods", "1"),
            ("_token", &token),
        ],
    );
    let (status, headers, body) = split_response(&resp);
    assert_eq!(status, 200);
    assert_eq!(
        headers.get("content-type").map(String::as_str),
        Some("application/octet-stream")
    );
    assert_eq!(
        headers.get("content-disposition").map(String::as_str),
        Some("attachment; filename=\"event_class.rs\"")
    );
    assert_eq!(headers.get("pragma").map(String::as_str), Some("public"));
    assert!(body.contains("pub struct Event {"));
    assert!(body.contains("pub fn get(&mut self, name: &str)"));
}

#[test]
fn test_full_form_flow_with_cookie_auth() {
    let service = start_service();

    // Fetch the form with the admin cookie, pull the embedded token out of it
    let page = get(
        &service.addr,
        "/admin",
        &[("Cookie", &format!("admin_key={ADMIN_KEY}"))],
    );
    let (status, _, html) = split_response(&page);
    assert_eq!(status, 200);
    let token = html
        .split("name=\"_token\" value=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .expect("token embedded in form");

    let resp = post_form(
        &service.addr,
        "/generate",
        &[("Cookie", &format!("admin_key={ADMIN_KEY}"))],
        &[("post_type", "event"), ("_token", token)],
    );
    let (status, headers, body) = split_response(&resp);
    assert_eq!(status, 200);
    assert!(headers.contains_key("content-disposition"));
    // No magic flag submitted → explicit accessors
    assert!(body.contains("pub fn set_location"));

    // The token was consumed; replaying the submission fails
    let replay = post_form(
        &service.addr,
        "/generate",
        &[("Cookie", &format!("admin_key={ADMIN_KEY}"))],
        &[("post_type", "event"), ("_token", token)],
    );
    let (status, _, _) = split_response(&replay);
    assert_eq!(status, 403);
}
