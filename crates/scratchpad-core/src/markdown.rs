//! Markdown to HTML rendering for presentation callers.
//!
//! Rendering is best effort. When the renderer fails the raw markdown is
//! returned as escaped preformatted text and a warning is logged; a note must
//! never become unreadable because it could not be prettified. Either way the
//! output is safe to insert into a page.

use std::panic::{self, AssertUnwindSafe};

use pulldown_cmark::{html, Event, Options, Parser};
use tracing::warn;

fn options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts
}

/// Render markdown to HTML.
///
/// Raw HTML embedded in the markdown is emitted as escaped text rather than
/// passed through, since note content comes from untrusted clients.
pub fn try_render_markdown(content: &str) -> Result<String, String> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        let parser = Parser::new_ext(content, options()).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });
        let mut out = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }))
    .map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "renderer panicked".to_string())
    })
}

/// Escape text for insertion into HTML element content or attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render markdown to HTML, falling back to escaped raw content on failure.
pub fn render_markdown(content: &str) -> String {
    render_with(content, try_render_markdown)
}

fn render_with<F>(content: &str, render: F) -> String
where
    F: FnOnce(&str) -> Result<String, String>,
{
    match render(content) {
        Ok(html) => html,
        Err(reason) => {
            warn!(
                subsystem = "service",
                component = "markdown",
                error = %reason,
                content_len = content.len(),
                "Markdown rendering failed, serving raw content"
            );
            format!("<pre>{}</pre>", escape_html(content))
        }
    }
}
