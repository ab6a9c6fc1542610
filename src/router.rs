//! Method dispatch.
//!
//! ```text
//!   raw bytes ──parse──┬─ error ───────────────────────────── 400
//!                      └─ GET  ──resolve──┬─ Forbidden ────── 403
//!                      │                  ├─ Missing ──────── 404
//!                      │                  ├─ Directory ── listing / index.html
//!                      │                  └─ File ─────── static file
//!                      └─ POST ── form echo ───────────────── 200
//!                      └─ other ───────────────────────────── 405
//! ```

use crate::config::Config;
use crate::error::ServeError;
use crate::http::parser::parse_http_request;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::http::writer::serialize_response;
use crate::serve::form::echo_form;
use crate::serve::listing::serve_directory;
use crate::serve::static_files::serve_file;
use crate::serve::{PathResolver, ResolvedPath};

/// Placeholder logged for the method and path of an unparsable request.
pub const UNPARSED: &str = "-";

/// The outcome of handling one request, with what the access log needs.
#[derive(Debug, Clone)]
pub struct Handled {
    pub method: String,
    pub path: String,
    pub response: Response,
}

impl Handled {
    pub fn status(&self) -> StatusCode {
        self.response.status
    }

    /// Wire bytes and status, ready for the connection.
    pub fn into_wire(self) -> (Vec<u8>, StatusCode) {
        (serialize_response(&self.response), self.response.status)
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    resolver: PathResolver,
}

impl Router {
    pub fn new(cfg: &Config) -> Self {
        Self {
            resolver: PathResolver::from_config(cfg),
        }
    }

    /// Parses and answers the bytes of one read. Never fails: every error
    /// kind becomes its response here.
    pub fn handle(&self, raw: &[u8]) -> Handled {
        match parse_http_request(raw) {
            Ok(request) => Handled {
                method: request.method.to_string(),
                path: request.path.clone(),
                response: self.route(&request),
            },
            Err(e) => {
                tracing::debug!(error = ?e, "Malformed request");
                Handled {
                    method: UNPARSED.to_string(),
                    path: UNPARSED.to_string(),
                    response: ServeError::MalformedRequest.into_response(),
                }
            }
        }
    }

    pub fn route(&self, request: &Request) -> Response {
        let result = match &request.method {
            Method::GET => self.get(&request.path),
            Method::POST => Ok(echo_form(&request.body)),
            other => Err(ServeError::UnsupportedMethod(other.to_string())),
        };

        result.unwrap_or_else(|e| Self::fail(request, e))
    }

    fn get(&self, path: &str) -> Result<Response, ServeError> {
        match self.resolver.resolve(path) {
            ResolvedPath::Forbidden => Err(ServeError::PathEscape(path.to_string())),
            ResolvedPath::Missing(_) => Err(ServeError::ResourceMissing(path.to_string())),
            ResolvedPath::Directory(dir) => serve_directory(&self.resolver, &dir, path),
            ResolvedPath::File(file) => serve_file(&file),
        }
    }

    fn fail(request: &Request, error: ServeError) -> Response {
        let status = error.status();
        if status == StatusCode::InternalServerError {
            tracing::error!(
                method = %request.method,
                path = %request.path,
                error = %error,
                "Failed to serve request"
            );
        } else {
            tracing::debug!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                error = %error,
                "Request rejected"
            );
        }
        error.into_response()
    }
}
