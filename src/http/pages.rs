//! Minimal HTML page rendering for error responses.
//!
//! # Responsibilities
//! - Render the built-in 404 and 500 pages
//! - HTML-escape untrusted text and attribute values

/// Render a page with an escaped text body.
pub fn render_page_text(page_title: &str, body_title: &str, body_text: &str) -> String {
    render_page(page_title, body_title, &escape_html(body_text))
}

/// Render a page with a pre-rendered HTML body.
pub fn render_page(page_title: &str, body_title: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE HTML><html>",
            "<head>",
            "<meta charset=\"utf-8\"/>",
            "<title>{title}</title>",
            "<style>body {{ font-family: sans-serif; }}</style>",
            "</head>",
            "<body>",
            "<h1>{heading}</h1>",
            "{body}",
            "</body>",
            "</html>"
        ),
        title = escape_html(page_title),
        heading = escape_html(body_title),
        body = body,
    )
}

/// Escape text for an HTML element body.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '/' => escaped.push_str("&#x2F;"),
            '\u{00A0}' => escaped.push_str("&#xa0;"),
            ch => escaped.push(ch),
        }
    }
    escaped
}

/// Escape text for an HTML attribute value.
pub fn escape_html_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            ch => escaped.push(ch),
        }
    }
    escaped
}
