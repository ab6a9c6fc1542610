use std::path::Path;

use crate::error::ServeError;
use crate::http::mime::{ContentType, Encoding};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Reads the file at `path` and builds a 200 response for it.
///
/// Text types must decode as UTF-8; binary types are sent untouched. Either
/// way the body is the exact byte content of the file.
pub fn serve_file(path: &Path) -> Result<Response, ServeError> {
    let content_type = ContentType::for_path(path);
    let bytes = std::fs::read(path).map_err(|e| ServeError::io(path, e))?;

    let builder = ResponseBuilder::new(StatusCode::Ok)
        .content_type(content_type.mime)
        .header("Cache-Control", content_type.cache_control());

    let response = match content_type.encoding {
        Encoding::Text => {
            let text = String::from_utf8(bytes).map_err(|_| ServeError::Decode {
                path: path.to_path_buf(),
            })?;
            builder.text(text).build()
        }
        Encoding::Binary => builder.bytes(bytes).build(),
    };

    tracing::debug!(
        path = %path.display(),
        mime = content_type.mime,
        bytes = response.body.len(),
        binary = response.is_binary,
        "Serving file"
    );

    Ok(response)
}
