use std::fmt::Write;
use std::path::Path;

use html_escape::{encode_double_quoted_attribute, encode_text};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::error::ServeError;
use crate::http::response::Response;
use crate::serve::resolver::{PathResolver, ResolvedPath, strip_query};
use crate::serve::static_files::serve_file;

/// Characters escaped when an entry name becomes a path segment of an href.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\');

struct Entry {
    name: String,
    is_dir: bool,
}

/// Serves a directory: its `index.html` when there is one, otherwise a
/// generated listing of its immediate, non-hidden entries sorted by name.
///
/// The index goes through the same web-root check as a direct request, so a
/// symlinked `index.html` pointing outside the root is `PathEscape`.
pub fn serve_directory(
    resolver: &PathResolver,
    dir: &Path,
    request_path: &str,
) -> Result<Response, ServeError> {
    match resolver.classify(dir.join("index.html")) {
        ResolvedPath::File(index) => return serve_file(&index),
        ResolvedPath::Forbidden => return Err(ServeError::PathEscape(request_path.to_string())),
        ResolvedPath::Directory(_) | ResolvedPath::Missing(_) => {}
    }

    let entries = read_entries(dir)?;
    Ok(Response::html(render_listing(strip_query(request_path), &entries)))
}

fn read_entries(dir: &Path) -> Result<Vec<Entry>, ServeError> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(|e| ServeError::io(dir, e))? {
        let entry = entry.map_err(|e| ServeError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push(Entry { name, is_dir });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn render_listing(request_path: &str, entries: &[Entry]) -> String {
    let base = request_path.trim_end_matches('/');
    let title = percent_decode_str(request_path).decode_utf8_lossy();

    let mut html = String::new();
    let _ = writeln!(html, "<h1>Index of {}</h1>", encode_text(&title));
    html.push_str("<ul>\n");

    for entry in entries {
        let href = format!("{}/{}", base, utf8_percent_encode(&entry.name, SEGMENT));
        let suffix = if entry.is_dir { "/" } else { "" };
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}{}</a></li>",
            encode_double_quoted_attribute(&href),
            encode_text(&entry.name),
            suffix
        );
    }

    html.push_str("</ul>\n");
    html
}
