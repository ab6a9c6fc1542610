//! Content-type lookup by file extension.

use std::path::Path;

pub const DEFAULT_MIME: &str = "application/octet-stream";

pub const CACHE_NO_STORE: &str = "no-cache, no-store, must-revalidate";
pub const CACHE_PUBLIC: &str = "public, max-age=3600";

const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("xml", "application/xml"),
    ("json", "application/json"),
    ("wasm", "application/wasm"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
];

/// How a file's bytes must be read and sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8 text, decoded on read
    Text,
    /// Opaque bytes
    Binary,
}

/// Everything the static file server needs to know about a file's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentType {
    pub mime: &'static str,
    pub encoding: Encoding,
}

impl ContentType {
    /// Resolves the content type of `path` from its extension
    /// (case-insensitive). Unknown or missing extensions are
    /// `application/octet-stream`.
    pub fn for_path(path: &Path) -> Self {
        let mime = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| {
                MIME_TYPES
                    .iter()
                    .find(|(known, _)| known.eq_ignore_ascii_case(ext))
                    .map(|(_, mime)| *mime)
            })
            .unwrap_or(DEFAULT_MIME);

        Self::from_mime(mime)
    }

    pub fn from_mime(mime: &'static str) -> Self {
        let encoding = if mime.starts_with("text/") {
            Encoding::Text
        } else {
            Encoding::Binary
        };
        Self { mime, encoding }
    }

    pub fn is_binary(&self) -> bool {
        self.encoding == Encoding::Binary
    }

    /// `Cache-Control` value: HTML is never cached, everything else for an hour.
    pub fn cache_control(&self) -> &'static str {
        if self.mime == "text/html" {
            CACHE_NO_STORE
        } else {
            CACHE_PUBLIC
        }
    }
}
