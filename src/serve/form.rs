use std::collections::BTreeMap;
use std::fmt::Write;

use html_escape::encode_text;

use crate::http::response::Response;

/// Decoded form fields. Keys are sorted; repeated fields keep every value in
/// the order submitted.
pub type FormData = BTreeMap<String, Vec<String>>;

/// Decodes an `application/x-www-form-urlencoded` body.
///
/// `+` becomes a space and percent-escapes are decoded. A truncated body
/// simply yields whatever pairs it still contains.
pub fn decode_form(body: &[u8]) -> FormData {
    let mut fields = FormData::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        fields
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    fields
}

/// Echoes the decoded fields back as an HTML fragment.
pub fn render_form_echo(fields: &FormData) -> String {
    let mut html = String::from("<h1>Form Submitted</h1>\n");

    if fields.is_empty() {
        html.push_str("<p>No fields submitted.</p>\n");
        return html;
    }

    html.push_str("<ul>\n");
    for (key, values) in fields {
        let values: Vec<_> = values.iter().map(|v| encode_text(v)).collect();
        let _ = writeln!(
            html,
            "<li><strong>{}</strong>: {}</li>",
            encode_text(key),
            values.join(", ")
        );
    }
    html.push_str("</ul>\n");
    html
}

/// Handles a form submission. Field contents are not validated.
pub fn echo_form(body: &[u8]) -> Response {
    let fields = decode_form(body);
    tracing::debug!(fields = fields.len(), "Echoing form submission");
    Response::html(render_form_echo(&fields))
}
