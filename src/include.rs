//! Shared fragment includes.
//!
//! A page pulls shared markup (the navbar, the footer) in by declaring an
//! empty element with a `data-include` URL:
//!
//! ```html
//! <div data-include="partials/nav.html"></div>
//! ```
//!
//! The URL is resolved against the page's directory (or the site root when it
//! starts with `/`) and the fragment becomes the element's content. A fragment
//! that can't be loaded is logged and its element left as written; the rest
//! of the page is still processed. Fragments are inserted verbatim: includes
//! inside a fragment are not expanded.

use crate::href::resolve_href;
use crate::inject::{INCLUDE_ATTR, replace_marked};
use crate::source::Source;
use std::io;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum IncludeError {
    #[error("data-include has no URL")]
    MissingUrl,
    #[error("include {url} is not a site path")]
    External { url: String },
    #[error("include {url} points outside the site root")]
    OutsideRoot { url: String },
    #[error("failed to load include {path}: {source}")]
    Io { path: String, source: io::Error },
}

/// What happened to the includes of one page.
#[derive(Debug, Default)]
pub struct IncludeReport {
    /// Site paths of stitched fragments, in document order.
    pub stitched: Vec<String>,
    pub failed: Vec<IncludeError>,
}

/// Expand every `data-include` element of a page.
pub fn stitch_includes(html: &str, source: &dyn Source, current_id: &str) -> (String, IncludeReport) {
    let mut report = IncludeReport::default();
    let (page, _) = replace_marked(html, INCLUDE_ATTR, |el| {
        match load_fragment(source, current_id, el.value.as_deref()) {
            Ok((path, fragment)) => {
                debug!(page = %current_id, include = %path, "stitched include");
                report.stitched.push(path);
                Some(fragment)
            }
            Err(e) => {
                error!(page = %current_id, error = %e, "include failed");
                report.failed.push(e);
                None
            }
        }
    });
    (page, report)
}

fn load_fragment(
    source: &dyn Source,
    current_id: &str,
    url: Option<&str>,
) -> Result<(String, String), IncludeError> {
    let url = url.map(str::trim).filter(|u| !u.is_empty());
    let url = url.ok_or(IncludeError::MissingUrl)?;
    if url.contains("://") || url.starts_with("//") {
        return Err(IncludeError::External {
            url: url.to_string(),
        });
    }
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = resolve_href(current_id, path).ok_or_else(|| IncludeError::OutsideRoot {
        url: url.to_string(),
    })?;
    let fragment = source.read(&path).map_err(|source| IncludeError::Io {
        path: path.clone(),
        source,
    })?;
    Ok((path, fragment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    const NAV: &str = r#"<nav><a href="/index.html">Home</a></nav>"#;

    #[test]
    fn stitches_fragment_relative_to_page() {
        let source = memory_source(&[("partials/nav.html", NAV)]);
        let page = r#"<body><div data-include="../partials/nav.html"></div></body>"#;
        let (out, report) = stitch_includes(page, &source, "countries/index.html");
        assert_eq!(
            out,
            format!(r#"<body><div data-include="../partials/nav.html">{NAV}</div></body>"#)
        );
        assert_eq!(report.stitched, vec!["partials/nav.html"]);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn root_absolute_include() {
        let source = memory_source(&[("partials/nav.html", NAV)]);
        let page = r#"<div data-include="/partials/nav.html"></div>"#;
        let (_, report) = stitch_includes(page, &source, "a/b/c.html");
        assert_eq!(report.stitched, vec!["partials/nav.html"]);
    }

    #[test]
    fn query_string_is_ignored() {
        let source = memory_source(&[("nav.html", NAV)]);
        let page = r#"<div data-include="nav.html?v=2"></div>"#;
        let (out, _) = stitch_includes(page, &source, "index.html");
        assert!(out.contains(NAV));
    }

    #[test]
    fn missing_fragment_leaves_element_and_continues() {
        let source = memory_source(&[("footer.html", "<footer>f</footer>")]);
        let page = r#"<div data-include="nav.html">fallback</div><div data-include="footer.html"></div>"#;
        let (out, report) = stitch_includes(page, &source, "index.html");
        assert!(out.contains(r#"<div data-include="nav.html">fallback</div>"#));
        assert!(out.contains("<footer>f</footer>"));
        assert_eq!(report.stitched, vec!["footer.html"]);
        assert!(matches!(report.failed[0], IncludeError::Io { .. }));
    }

    #[test]
    fn empty_url_is_reported() {
        let source = memory_source(&[]);
        let (_, report) = stitch_includes(r#"<div data-include=""></div>"#, &source, "index.html");
        assert!(matches!(report.failed[0], IncludeError::MissingUrl));
    }

    #[test]
    fn external_url_is_rejected() {
        let source = memory_source(&[]);
        let page = r#"<div data-include="https://cdn.example.org/nav.html"></div>"#;
        let (_, report) = stitch_includes(page, &source, "index.html");
        assert!(matches!(report.failed[0], IncludeError::External { .. }));
    }

    #[test]
    fn escaping_root_is_rejected() {
        let source = memory_source(&[]);
        let page = r#"<div data-include="../../nav.html"></div>"#;
        let (_, report) = stitch_includes(page, &source, "a.html");
        assert!(matches!(report.failed[0], IncludeError::OutsideRoot { .. }));
    }

    #[test]
    fn fragments_are_not_expanded_recursively() {
        let inner = r#"<div data-include="other.html"></div>"#;
        let source = memory_source(&[("outer.html", inner), ("other.html", "X")]);
        let (out, report) = stitch_includes(
            r#"<section data-include="outer.html"></section>"#,
            &source,
            "index.html",
        );
        assert!(out.contains(inner));
        assert_eq!(report.stitched.len(), 1);
    }
}
