use std::path::PathBuf;

use treeserve::config::Config;
use treeserve::http::handler::handle_request;
use treeserve::http::request::{Method, Request, RequestBuilder};
use treeserve::http::response::{Body, Response, StatusCode};
use treeserve::http::writer::ResponseWriter;
use treeserve::server::ServeContext;

fn served_dir() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = std::fs::canonicalize(dir.path()).unwrap();
    let content: Vec<u8> = (0..100u8).collect();
    std::fs::write(root.join("data.bin"), content).unwrap();
    std::fs::create_dir(root.join("docs")).unwrap();
    (dir, root)
}

fn get(path: &str) -> Request {
    RequestBuilder::get(path).build().unwrap()
}

fn get_range(path: &str, range: &str) -> Request {
    RequestBuilder::get(path).range(range).build().unwrap()
}

async fn body_of(response: Response) -> Vec<u8> {
    let mut writer = ResponseWriter::new(response);
    let head_len = writer.head().len();
    let mut out = Vec::new();
    writer.write_to_stream(&mut out).await.unwrap();
    out.split_off(head_len)
}

#[tokio::test]
async fn test_full_file() {
    let (_dir, root) = served_dir();
    let ctx = ServeContext::new(&root);

    let response = handle_request(&ctx, &get("/data.bin")).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.headers.get("Content-Length").unwrap(), "100");
    assert_eq!(
        response.headers.get("Content-Type").unwrap(),
        "application/octet-stream"
    );
    assert!(response.headers.get("Content-Range").is_none());
    assert_eq!(body_of(response).await, (0..100u8).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_partial_file() {
    let (_dir, root) = served_dir();
    let ctx = ServeContext::new(&root);

    let response = handle_request(&ctx, &get_range("/data.bin", "bytes=10-19")).await;

    assert_eq!(response.status, StatusCode::PartialContent);
    assert_eq!(response.headers.get("Content-Range").unwrap(), "bytes 10-19/100");
    assert_eq!(response.headers.get("Content-Length").unwrap(), "10");
    assert_eq!(body_of(response).await, (10..20u8).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_open_ended_range() {
    let (_dir, root) = served_dir();
    let ctx = ServeContext::new(&root);

    let response = handle_request(&ctx, &get_range("/data.bin", "bytes=95-")).await;

    assert_eq!(response.status, StatusCode::PartialContent);
    assert_eq!(response.headers.get("Content-Range").unwrap(), "bytes 95-99/100");
    assert_eq!(body_of(response).await, vec![95, 96, 97, 98, 99]);
}

#[tokio::test]
async fn test_unsatisfiable_range() {
    let (_dir, root) = served_dir();
    let ctx = ServeContext::new(&root);

    let response = handle_request(&ctx, &get_range("/data.bin", "bytes=150-200")).await;

    assert_eq!(response.status, StatusCode::RangeNotSatisfiable);
    assert_eq!(response.headers.get("Content-Range").unwrap(), "bytes */100");
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_malformed_range_serves_whole_file() {
    let (_dir, root) = served_dir();
    let ctx = ServeContext::new(&root);

    let response = handle_request(&ctx, &get_range("/data.bin", "bytes=-10")).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body.len(), 100);
}

#[tokio::test]
async fn test_directory_is_not_found() {
    let (_dir, root) = served_dir();
    let ctx = ServeContext::new(&root);

    for path in ["/", "/docs", "/docs/"] {
        let response = handle_request(&ctx, &get(path)).await;
        assert_eq!(response.status, StatusCode::NotFound, "{}", path);
    }
}

#[tokio::test]
async fn test_missing_file() {
    let (_dir, root) = served_dir();
    let ctx = ServeContext::new(&root);

    let response = handle_request(&ctx, &get("/missing.bin")).await;

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.body.as_bytes(), Some(&b"404 Not Found"[..]));
}

#[tokio::test]
async fn test_escape_is_forbidden() {
    let (_dir, root) = served_dir();
    let ctx = ServeContext::new(&root);

    for path in ["/../secret", "/docs/../../secret", "/%2e%2e/secret"] {
        let response = handle_request(&ctx, &get(path)).await;
        assert_eq!(response.status, StatusCode::Forbidden, "{}", path);
    }
}

#[tokio::test]
async fn test_percent_encoded_name() {
    let (_dir, root) = served_dir();
    std::fs::write(root.join("my disk.dsk"), b"disk").unwrap();
    let ctx = ServeContext::new(&root);

    let response = handle_request(&ctx, &get("/my%20disk.dsk?download=1")).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(body_of(response).await, b"disk");
}

#[tokio::test]
async fn test_non_get_is_rejected() {
    let (_dir, root) = served_dir();
    let ctx = ServeContext::new(&root);

    let request = RequestBuilder::new()
        .method(Method::POST)
        .path("/data.bin")
        .build()
        .unwrap();
    let response = handle_request(&ctx, &request).await;

    assert_eq!(response.status, StatusCode::MethodNotAllowed);
    assert_eq!(response.headers.get("Allow").unwrap(), "GET");
}

#[tokio::test]
async fn test_empty_file() {
    let (_dir, root) = served_dir();
    std::fs::write(root.join("empty.bin"), b"").unwrap();
    let ctx = ServeContext::new(&root);

    let response = handle_request(&ctx, &get("/empty.bin")).await;
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.headers.get("Content-Length").unwrap(), "0");
    assert!(matches!(response.body, Body::File { len: 0, .. }));
}

#[cfg(unix)]
#[tokio::test]
async fn test_strict_symlinks() {
    let outside = tempfile::tempdir().unwrap();
    std::fs::write(outside.path().join("secret.txt"), b"secret").unwrap();

    let (_dir, root) = served_dir();
    std::os::unix::fs::symlink(outside.path().join("secret.txt"), root.join("link.txt")).unwrap();

    // Lenient by default: the lexical path is inside the root.
    let lenient = ServeContext::new(&root);
    let response = handle_request(&lenient, &get("/link.txt")).await;
    assert_eq!(response.status, StatusCode::Ok);

    let cfg = Config {
        root: root.clone(),
        strict_symlinks: true,
        ..Config::default()
    };
    let strict = ServeContext::from_config(&cfg).unwrap();
    let response = handle_request(&strict, &get("/link.txt")).await;
    assert_eq!(response.status, StatusCode::Forbidden);

    let response = handle_request(&strict, &get("/data.bin")).await;
    assert_eq!(response.status, StatusCode::Ok);
}

#[test]
fn test_context_rejects_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config {
        root: dir.path().join("nope"),
        ..Config::default()
    };

    assert!(ServeContext::from_config(&cfg).is_err());
}

#[test]
fn test_context_exit_path() {
    let ctx = ServeContext::new("/srv");
    assert!(ctx.is_exit_path("/exit"));
    assert!(!ctx.is_exit_path("/exit/"));

    let cfg = Config {
        root: std::env::temp_dir(),
        exit_path: String::new(),
        ..Config::default()
    };
    let ctx = ServeContext::from_config(&cfg).unwrap();
    assert!(!ctx.is_exit_path("/exit"));
    assert!(!ctx.is_exit_path(""));
}
