//! Shared test utilities for the navstitch test suite.
//!
//! Provides the fixture site copy, an in-memory [`Source`](crate::source::Source)
//! builder and a sitemap exercising every breadcrumb resolution path.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = memory_source(&[("data/links.json", SAMPLE_SITEMAP)]);
//! let store = sitemap::load(&source, "a/b.html", &default_candidates()).unwrap();
//! ```

use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

use crate::sitemap::DEFAULT_CANDIDATES;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// In-memory documents
// =========================================================================

/// Build an in-memory source from `(site path, body)` pairs.
pub fn memory_source(docs: &[(&str, &str)]) -> HashMap<String, String> {
    docs.iter()
        .map(|(path, body)| (path.to_string(), body.to_string()))
        .collect()
}

/// The stock sitemap candidate list, owned.
pub fn default_candidates() -> Vec<String> {
    DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect()
}

/// Sitemap covering every breadcrumb and related-link case.
///
/// - `a/b.html`: title-index (`Home`), shortcut (`Section`), dangling related
/// - `guides/deep/page.html`: title beats shortcut (`Guides`), root-absolute
///   shortcut (`Deep`)
/// - `orphan.html`: unresolvable label (`Nowhere`)
/// - `start.html`: only resolvable through a custom home label
/// - `related-only.html`: related links without a breadcrumb
/// - `dangling.html`: related ids that all dangle
/// - `collide.html`: label matching two pages titled `Visa`
pub const SAMPLE_SITEMAP: &str = r#"{
    "pages": {
        "index.html": { "title": "Home", "breadcrumb": ["Home"] },
        "a/b.html": {
            "title": "B",
            "breadcrumb": ["Home", "Section", "B"],
            "related": ["a/c.html", "missing.html", "index.html"]
        },
        "a/c.html": { "title": "C", "breadcrumb": ["Home", "C"] },
        "guides/index.html": { "title": "Guides" },
        "guides/deep/page.html": {
            "title": "Deep Page",
            "breadcrumb": ["Home", "Guides", "Deep", "Page"]
        },
        "orphan.html": { "title": "Orphan", "breadcrumb": ["Home", "Nowhere", "Orphan"] },
        "start.html": { "title": "Start Here", "breadcrumb": ["Start", "Here"] },
        "related-only.html": { "title": "Related Only", "related": ["a/c.html"] },
        "dangling.html": {
            "title": "Dangling",
            "breadcrumb": ["Home", "Dangling"],
            "related": ["x.html", "y.html"]
        },
        "visa/first.html": { "title": "Visa" },
        "visa/second.html": { "title": "Visa" },
        "collide.html": { "title": "Collide", "breadcrumb": ["Home", "Visa", "Collide"] }
    },
    "titles": {
        "Section": "a/index.html",
        "Guides": "elsewhere.html",
        "Deep": "/guides/deep/index.html"
    }
}"#;
