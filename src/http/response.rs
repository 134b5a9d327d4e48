use std::collections::HashMap;

use tokio::fs::File;

use crate::http::range::{ByteRange, unsatisfied_content_range};

/// HTTP status codes the file server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 206 Partial Content
    PartialContent,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 410 Gone, answered to the shutdown path
    Gone,
    /// 416 Range Not Satisfiable
    RangeNotSatisfiable,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use treeserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::RangeNotSatisfiable.as_u16(), 416);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::PartialContent => 206,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::Gone => 410,
            StatusCode::RangeNotSatisfiable => 416,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::PartialContent => "Partial Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::Gone => "Gone",
            StatusCode::RangeNotSatisfiable => "Range Not Satisfiable",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Response payload.
#[derive(Debug)]
pub enum Body {
    /// A small in-memory body.
    Bytes(Vec<u8>),
    /// `len` bytes of an open file starting at `start`, streamed by the writer.
    File { file: File, start: u64, len: u64 },
}

impl Body {
    /// Number of bytes this body puts on the wire.
    pub fn len(&self) -> u64 {
        match self {
            Body::Bytes(bytes) => bytes.len() as u64,
            Body::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The in-memory content, or `None` for a file body.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Bytes(bytes) => Some(bytes),
            Body::File { .. } => None,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Bytes(Vec::new())
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Response body
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body(b"hello".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Body,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Body::default(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets an in-memory body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Body::Bytes(body);
        self
    }

    /// Streams `len` bytes of `file` starting at offset `start`.
    pub fn file(mut self, file: File, start: u64, len: u64) -> Self {
        self.body = Body::File { file, start, len };
        self
    }

    /// Builds the final Response.
    ///
    /// Adds a Content-Length header from the body size unless one is set.
    pub fn build(mut self) -> Response {
        let len = self.body.len();
        self.headers
            .entry("Content-Length".to_string())
            .or_insert_with(|| len.to_string());

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// 200 OK streaming a whole file of `size` bytes.
    pub fn file(file: File, size: u64) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "application/octet-stream")
            .file(file, 0, size)
            .build()
    }

    /// 206 Partial Content streaming `range` of a `size`-byte file.
    pub fn partial(file: File, range: ByteRange, size: u64) -> Self {
        ResponseBuilder::new(StatusCode::PartialContent)
            .header("Content-Type", "application/octet-stream")
            .header("Content-Range", range.content_range(size))
            .file(file, range.start, range.len())
            .build()
    }

    /// 416 with `Content-Range: bytes */<size>` and no body.
    pub fn range_not_satisfiable(size: u64) -> Self {
        ResponseBuilder::new(StatusCode::RangeNotSatisfiable)
            .header("Content-Range", unsatisfied_content_range(size))
            .build()
    }

    /// Creates a 403 Forbidden response naming the rejected path.
    pub fn forbidden(path: &str) -> Self {
        ResponseBuilder::new(StatusCode::Forbidden)
            .header("Content-Type", "text/plain")
            .body(format!("403 Forbidden: {}", path).into_bytes())
            .build()
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .header("Content-Type", "text/plain")
            .body(b"404 Not Found".to_vec())
            .build()
    }

    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .header("Content-Type", "text/plain")
            .body(b"400 Bad Request".to_vec())
            .build()
    }

    pub fn method_not_allowed() -> Self {
        ResponseBuilder::new(StatusCode::MethodNotAllowed)
            .header("Allow", "GET")
            .header("Content-Type", "text/plain")
            .body(b"405 Method Not Allowed".to_vec())
            .build()
    }

    /// Empty 410 Gone, sent before the server shuts down.
    pub fn gone() -> Self {
        ResponseBuilder::new(StatusCode::Gone).build()
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::InternalServerError)
            .header("Content-Type", "text/plain")
            .body(b"500 Internal Server Error".to_vec())
            .build()
    }
}
