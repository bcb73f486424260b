//! Writing markup into attribute-marked containers.
//!
//! Pages mark insertion points with data attributes:
//!
//! ```html
//! <nav data-breadcrumb></nav>
//! <div data-related-links></div>
//! <header data-include="partials/nav.html"></header>
//! ```
//!
//! This module finds such elements and replaces their inner HTML, leaving
//! every other byte of the document untouched. Elements are located with a
//! `quick-xml` reader relaxed for HTML: end names are not checked, stray end
//! tags are allowed, void elements never open a scope and unclosed elements
//! are closed by their nearest enclosing end tag. `<script>` and `<style>`
//! content is raw text and never holds containers.

use crate::render::RenderResult;
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::ops::Range;
use tracing::warn;

pub const BREADCRUMB_ATTR: &str = "data-breadcrumb";
pub const RELATED_ATTR: &str = "data-related-links";
pub const INCLUDE_ATTR: &str = "data-include";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// An element carrying the marker attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedElement {
    /// Lowercased tag name.
    pub tag: String,
    /// Attribute value, `None` for a bare or empty attribute.
    pub value: Option<String>,
    /// Byte range of the element's inner HTML.
    pub inner: Range<usize>,
}

/// An element whose end tag hasn't been seen yet.
struct OpenElement {
    name: String,
    /// Attribute value and inner start, if this element carries the marker.
    marker: Option<(Option<String>, usize)>,
}

fn html_reader(html: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;
    reader
}

/// All elements with attribute `attr`, in document order.
///
/// Marked elements nested inside another marked element are not reported:
/// the outer element's content is replaced as a whole. A document the reader
/// gives up on yields the elements found before that point.
pub fn find_marked(html: &str, attr: &str) -> Vec<MarkedElement> {
    let mut found = Vec::new();
    let mut open: Vec<OpenElement> = Vec::new();
    // Byte offset of the reader's input within `html`
    let mut base = 0;
    let mut reader = html_reader(html);

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                warn!(
                    position = base + reader.error_position() as usize,
                    error = %e,
                    "stopped scanning malformed HTML"
                );
                break;
            }
        };
        let pos = base + reader.buffer_position() as usize;
        match event {
            Event::Start(start) => {
                let name = lower_name(start.name().as_ref());
                if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                    base = raw_text_end(html, pos, &name);
                    reader = html_reader(&html[base..]);
                    continue;
                }
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }
                let inside_marked = open.iter().any(|el| el.marker.is_some());
                let marker = if inside_marked {
                    None
                } else {
                    marker_value(&start, attr).map(|value| (value, pos))
                };
                open.push(OpenElement { name, marker });
            }
            Event::End(end) => {
                let name = lower_name(end.name().as_ref());
                let Some(idx) = open.iter().rposition(|el| el.name == name) else {
                    continue;
                };
                // Elements left open inside this one are closed with it
                open.truncate(idx + 1);
                let Some(closed) = open.pop() else {
                    continue;
                };
                if let Some((value, inner_start)) = closed.marker {
                    let close_lt = html[..pos].rfind("</").unwrap_or(pos);
                    found.push(MarkedElement {
                        tag: closed.name,
                        value,
                        inner: inner_start..close_lt,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    found
}

/// Replace the inner HTML of marked elements.
///
/// `fill` is called for each element in document order; `None` leaves the
/// element unchanged. Returns the new document and the number of replacements.
pub fn replace_marked<F>(html: &str, attr: &str, mut fill: F) -> (String, usize)
where
    F: FnMut(&MarkedElement) -> Option<String>,
{
    let replacements: Vec<(Range<usize>, String)> = find_marked(html, attr)
        .into_iter()
        .filter_map(|el| fill(&el).map(|content| (el.inner, content)))
        .collect();
    let count = replacements.len();

    let mut out = html.to_string();
    for (range, content) in replacements.into_iter().rev() {
        out.replace_range(range, &content);
    }
    (out, count)
}

/// Replace the inner HTML of the first element with `attr`.
pub fn replace_first(html: &str, attr: &str, content: &str) -> Option<String> {
    let mut done = false;
    let (out, count) = replace_marked(html, attr, |_| {
        if done {
            None
        } else {
            done = true;
            Some(content.to_string())
        }
    });
    (count > 0).then_some(out)
}

/// Write rendered navigation into the page's breadcrumb and related-links
/// containers. Absent fragments and absent containers leave the page as is.
pub fn inject_navigation(html: &str, result: &RenderResult) -> String {
    let mut page = html.to_string();
    if let Some(breadcrumb) = &result.breadcrumb {
        if let Some(updated) = replace_first(&page, BREADCRUMB_ATTR, &breadcrumb.0) {
            page = updated;
        }
    }
    if let Some(related) = &result.related {
        if let Some(updated) = replace_first(&page, RELATED_ATTR, &related.0) {
            page = updated;
        }
    }
    page
}

fn lower_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_ascii_lowercase()
}

/// `Some(value)` if `start` carries `attr`; the value is `None` when bare or empty.
fn marker_value(start: &BytesStart<'_>, attr: &str) -> Option<Option<String>> {
    let found = start
        .html_attributes()
        .filter_map(Result::ok)
        .find(|a| a.key.as_ref().eq_ignore_ascii_case(attr.as_bytes()))?;
    let raw = String::from_utf8_lossy(&found.value);
    let value = unescape(&raw).map(|v| v.into_owned()).unwrap_or_else(|_| raw.to_string());
    Some((!value.is_empty()).then_some(value))
}

/// Byte just past the end tag closing raw-text element `name`, searching from
/// `from`. The end of the document if it's never closed.
fn raw_text_end(html: &str, from: usize, name: &str) -> usize {
    let bytes = html.as_bytes();
    let mut pos = from;
    while let Some(offset) = html[pos..].find("</") {
        let start = pos + offset + 2;
        let end = start + name.len();
        let name_matches = bytes
            .get(start..end)
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name.as_bytes()));
        let terminated = bytes
            .get(end)
            .is_some_and(|b| *b == b'>' || b.is_ascii_whitespace());
        if name_matches && terminated {
            return html[end..].find('>').map_or(html.len(), |gt| end + gt + 1);
        }
        pos = start;
    }
    html.len()
}
