use treeserve::http::request::{Method, Request, RequestBuilder};

fn get(path: &str, headers: &[(&str, &str)]) -> Request {
    headers
        .iter()
        .fold(RequestBuilder::get(path), |builder, (k, v)| builder.header(*k, *v))
        .build()
        .unwrap()
}

#[test]
fn test_request_header_retrieval() {
    let req = get("/", &[("Host", "example.com"), ("Range", "bytes=0-9")]);

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("Range"), Some("bytes=0-9"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_header_lookup_ignores_case() {
    let req = get("/", &[("range", "bytes=5-")]);

    assert_eq!(req.header("Range"), Some("bytes=5-"));
    assert_eq!(req.range(), Some("bytes=5-"));
}

#[test]
fn test_request_content_length_parsing() {
    let req = get("/", &[("Content-Length", "42")]);
    assert_eq!(req.content_length(), 42);
}

#[test]
fn test_request_content_length_invalid() {
    let req = get("/", &[("Content-Length", "not-a-number")]);
    assert_eq!(req.content_length(), 0);
}

#[test]
fn test_request_keep_alive_http11_default() {
    // HTTP/1.1 defaults to keep-alive
    assert!(get("/", &[]).keep_alive());
}

#[test]
fn test_request_keep_alive_http10_default() {
    let mut req = get("/", &[]);
    req.version = "HTTP/1.0".to_string();
    assert!(!req.keep_alive());

    req.headers.insert("Connection".to_string(), "Keep-Alive".to_string());
    assert!(req.keep_alive());
}

#[test]
fn test_request_keep_alive_close() {
    assert!(!get("/", &[("Connection", "close")]).keep_alive());
    assert!(!get("/", &[("Connection", "Close")]).keep_alive());
}

#[test]
fn test_target_path_strips_query_and_fragment() {
    assert_eq!(get("/games/tetris.rom?v=2", &[]).target_path(), "/games/tetris.rom");
    assert_eq!(get("/docs/a.txt#top", &[]).target_path(), "/docs/a.txt");
}

#[test]
fn test_target_path_percent_decodes() {
    assert_eq!(get("/my%20disk/file%2B1.dsk", &[]).target_path(), "/my disk/file+1.dsk");
    assert_eq!(get("/%2e%2e/etc/passwd", &[]).target_path(), "/../etc/passwd");
}

#[test]
fn test_target_path_absolute_form() {
    assert_eq!(get("http://example.com:3333/a/b.bin?x=1", &[]).target_path(), "/a/b.bin");
}

#[test]
fn test_request_method_from_string() {
    assert_eq!(Method::from_str("GET"), Some(Method::GET));
    assert_eq!(Method::from_str("POST"), Some(Method::POST));
    assert_eq!(Method::from_str("INVALID"), None);
    assert_eq!(Method::from_str("get"), None); // Case-sensitive
}

#[test]
fn test_request_builder() {
    let req = RequestBuilder::get("/file.bin").range("bytes=0-0").build().unwrap();

    assert_eq!(req.method, Method::GET);
    assert_eq!(req.version, "HTTP/1.1");
    assert_eq!(req.range(), Some("bytes=0-0"));
    assert!(req.body.is_empty());
}

#[test]
fn test_request_builder_requires_method_and_target() {
    assert!(RequestBuilder::new().path("/").build().is_err());
    assert!(RequestBuilder::new().method(Method::GET).build().is_err());
}
