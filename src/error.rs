//! Failure kinds raised while serving a request.
//!
//! Every kind maps to exactly one status code; the router turns them into
//! responses so nothing escapes to the connection layer.

use std::path::PathBuf;

use thiserror::Error;

use crate::http::response::{Response, StatusCode};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("malformed request line")]
    MalformedRequest,

    #[error("path escapes the web root: {0}")]
    PathEscape(String),

    #[error("no resource at {0}")]
    ResourceMissing(String),

    #[error("unsupported method {0}")]
    UnsupportedMethod(String),

    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    Decode { path: PathBuf },
}

impl ServeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ServeError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::MalformedRequest => StatusCode::BadRequest,
            ServeError::PathEscape(_) => StatusCode::Forbidden,
            ServeError::ResourceMissing(_) => StatusCode::NotFound,
            ServeError::UnsupportedMethod(_) => StatusCode::MethodNotAllowed,
            ServeError::Io { .. } | ServeError::Decode { .. } => StatusCode::InternalServerError,
        }
    }

    /// Converts the error into the generic client-facing response.
    ///
    /// Paths and underlying errors stay out of the body.
    pub fn into_response(self) -> Response {
        Response::error(self.status())
    }
}
