use std::collections::HashMap;

/// HTTP request methods.
///
/// Only GET is served. The others are recognised so they can be answered
/// with 405 Method Not Allowed instead of a parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
}

/// Represents a parsed HTTP request from a client.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target, e.g. "/games/tetris.rom?x=1"
    pub path: String,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
    /// Request headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Request body, read and discarded for GET
    pub body: Vec<u8>,
}

/// Assembles a [`Request`] piece by piece, as the parser reads it off the
/// wire. Method and target are required; the version defaults to HTTP/1.1.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// Method names are case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use treeserve::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A GET for `target`.
    pub fn get(target: impl Into<String>) -> Self {
        Self::new().method(Method::GET).path(target)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the `Range` header, e.g. `bytes=0-99`.
    pub fn range(self, spec: impl Into<String>) -> Self {
        self.header("Range", spec)
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by name.
    ///
    /// An exact match wins; otherwise names are compared ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(key)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .map(|v| v.as_str())
    }

    /// Retrieves the Content-Length header value and parses it as a usize.
    ///
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        self.header("Content-Length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// The `Range` header, if any.
    pub fn range(&self) -> Option<&str> {
        self.header("Range")
    }

    /// Determines whether the connection should remain open after the response.
    ///
    /// An explicit `Connection` header decides. Without one, HTTP/1.1 keeps
    /// the connection open and HTTP/1.0 closes it.
    pub fn keep_alive(&self) -> bool {
        match self.header("Connection") {
            Some(v) if v.eq_ignore_ascii_case("close") => false,
            Some(v) if v.eq_ignore_ascii_case("keep-alive") => true,
            _ => self.version != "HTTP/1.0",
        }
    }

    /// The request path as a filesystem-relative string.
    ///
    /// Absolute-form targets (`http://host/a/b`) are reduced to their path,
    /// the query string and fragment are dropped and percent escapes are
    /// decoded. Invalid escapes leave the path as sent.
    pub fn target_path(&self) -> String {
        let target = if self.path.starts_with("http://") || self.path.starts_with("https://") {
            match url::Url::parse(&self.path) {
                Ok(url) => url.path().to_string(),
                Err(_) => self.path.clone(),
            }
        } else {
            self.path.clone()
        };

        let raw = target.split(['?', '#']).next().unwrap_or_default();

        match urlencoding::decode(raw) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => raw.to_string(),
        }
    }
}
