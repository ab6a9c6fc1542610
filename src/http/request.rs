use std::fmt;

/// HTTP request methods.
///
/// Only GET and POST are served; every other token is kept so the router can
/// answer it with 405 Method Not Allowed and the access log can record it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a file or directory listing
    GET,
    /// POST - Submit form data to be echoed back
    POST,
    /// Any other token, kept verbatim
    Other(String),
}

impl Method {
    /// Parses a method token. Matching is case-sensitive, so `get` is `Other`.
    ///
    /// # Example
    ///
    /// ```
    /// # use hearth::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("PUT"), Method::Other("PUT".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request as read from a single socket read.
///
/// Headers are kept as raw lines; nothing downstream needs them parsed. The
/// body may be truncated if the client sent more than one read could hold.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Request target exactly as sent, percent-escapes included
    pub path: String,
    pub version: String,
    /// Header lines in the order received
    pub raw_headers: Vec<String>,
    pub body: Vec<u8>,
}
