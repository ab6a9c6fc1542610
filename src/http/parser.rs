use crate::http::request::{Method, Request};

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing was read
    Empty,
    /// Request line has fewer than three tokens
    InvalidRequestLine,
}

/// Parses the bytes of a single read into a [`Request`].
///
/// The buffer is never accumulated further: whatever arrived is what gets
/// parsed. When the blank line separating headers from body is missing, the
/// remainder is kept as header lines and the body is empty.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::Empty);
    }

    let line_end = buf.iter().position(|&b| b == b'\n').unwrap_or(buf.len());
    let request_line = String::from_utf8_lossy(&buf[..line_end]);
    let mut parts = request_line.trim_end_matches('\r').split_whitespace();

    let method = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    let path = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    let version = parts.next().ok_or(ParseError::InvalidRequestLine)?;

    // The separator may start at the request line's own CRLF when there are
    // no header lines at all.
    let (header_bytes, body) = match find_headers_end(buf) {
        Some(end) => {
            let start = (line_end + 1).min(end);
            (&buf[start..end], buf[end + 4..].to_vec())
        }
        None => (buf.get(line_end + 1..).unwrap_or_default(), Vec::new()),
    };

    let raw_headers = String::from_utf8_lossy(header_bytes)
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Request {
        method: Method::parse(method),
        path: path.to_string(),
        version: version.to_string(),
        raw_headers,
        body,
    })
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
