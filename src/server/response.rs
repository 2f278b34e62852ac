use may_minihttp::Response;
use serde_json::Value;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

pub fn write_json(res: &mut Response, status: u16, body: Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}

pub fn write_json_error(res: &mut Response, status: u16, body: Value) {
    write_json(res, status, body);
}

pub fn write_html(res: &mut Response, status: u16, html: String) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: text/html; charset=utf-8");
    res.body_vec(html.into_bytes());
}

/// Stream `body` as a forced download.
///
/// The no-cache trio keeps intermediaries from retaining generated source.
pub fn write_attachment(res: &mut Response, filename: &str, body: String) {
    res.status_code(200, "OK");
    res.header("Content-Type: application/octet-stream");
    let disposition = format!("Content-Disposition: attachment; filename=\"{filename}\"");
    // may_minihttp headers are &'static str; one small leak per download
    res.header(Box::leak(disposition.into_boxed_str()));
    res.header("Expires: 0");
    res.header("Cache-Control: must-revalidate");
    res.header("Pragma: public");
    res.body_vec(body.into_bytes());
}

/// Strip anything that does not belong in a download filename.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "download".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(403), "Forbidden");
        assert_eq!(status_reason(404), "Not Found");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("event_class.rs"), "event_class.rs");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name("..."), "download");
    }
}
