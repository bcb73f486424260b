//! Sitemap store.
//!
//! The sitemap is a JSON document describing every page's title, breadcrumb
//! trail and related pages:
//!
//! ```json
//! {
//!   "pages": {
//!     "countries/germany/visa.html": {
//!       "title": "Germany Visa",
//!       "breadcrumb": ["Home", "Countries", "Germany", "Visa"],
//!       "related": ["countries/germany/salary.html"]
//!     }
//!   },
//!   "titles": { "Countries": "countries/index.html" }
//! }
//! ```
//!
//! It is loaded once per page and read-only afterwards. Loading tries a list
//! of candidate locations in order and keeps the first that can be read, so
//! the same page works whether it sits at the site root or two levels down.
//!
//! ## Title index
//!
//! Breadcrumb labels are plain strings. To link them, the store keeps a
//! title → id index built in document order. When two pages share a title
//! the later one wins; [`SitemapStore::diagnostics`] lists such collisions.

use crate::href;
use crate::location::DEFAULT_ROOT_ID;
use crate::source::Source;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::{debug, info};

/// Candidate sitemap locations: root-absolute, page-relative, parent-relative.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "/data/links.json",
    "data/links.json",
    "../../data/links.json",
];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("sitemap unreachable (tried {})", .tried.join(", "))]
    Unreachable { tried: Vec<String> },
    #[error("sitemap at {location} is malformed: {source}")]
    ParseError {
        location: String,
        source: serde_json::Error,
    },
}

/// Outcome of a sitemap load, as reported per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SitemapStatus {
    Loaded,
    Unreachable,
    Malformed,
}

impl From<&LoadError> for SitemapStatus {
    fn from(err: &LoadError) -> Self {
        match err {
            LoadError::Unreachable { .. } => Self::Unreachable,
            LoadError::ParseError { .. } => Self::Malformed,
        }
    }
}

/// One page of the site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    pub id: String,
    pub title: String,
    /// Ancestor labels ending with this page's own label. Never empty.
    pub breadcrumb: Option<Vec<String>>,
    /// Ids of related pages, possibly dangling.
    pub related: Vec<String>,
}

/// Sitemap document as stored on disk.
#[derive(Debug, Deserialize)]
struct SitemapDocument {
    pages: IndexMap<String, PageEntry>,
    #[serde(default)]
    titles: IndexMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    breadcrumb: Option<Vec<String>>,
    #[serde(default)]
    related: Vec<String>,
}

/// Loaded sitemap: pages by id plus the indexes used to link labels.
#[derive(Debug, Clone)]
pub struct SitemapStore {
    pages: IndexMap<String, PageRecord>,
    title_index: HashMap<String, String>,
    shortcuts: IndexMap<String, String>,
    root_id: String,
    served_from: Option<String>,
}

impl SitemapStore {
    /// Parse a sitemap body. `location` is only used in error messages.
    pub fn from_json(body: &str, location: &str) -> Result<Self, LoadError> {
        let doc: SitemapDocument =
            serde_json::from_str(body).map_err(|source| LoadError::ParseError {
                location: location.to_string(),
                source,
            })?;

        let pages: IndexMap<String, PageRecord> = doc
            .pages
            .into_iter()
            .map(|(id, entry)| {
                let record = PageRecord {
                    id: id.clone(),
                    title: entry.title,
                    breadcrumb: entry.breadcrumb.filter(|b| !b.is_empty()),
                    related: entry.related,
                };
                (id, record)
            })
            .collect();

        // Document order, later entries overwrite earlier ones
        let mut title_index = HashMap::new();
        for record in pages.values() {
            title_index.insert(record.title.clone(), record.id.clone());
        }

        Ok(Self {
            pages,
            title_index,
            shortcuts: doc.titles,
            root_id: DEFAULT_ROOT_ID.to_string(),
            served_from: None,
        })
    }

    /// Use `root_id` as the target of the `Home` breadcrumb.
    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    pub fn page(&self, id: &str) -> Option<&PageRecord> {
        self.pages.get(id)
    }

    /// Pages in document order.
    pub fn pages(&self) -> impl Iterator<Item = &PageRecord> {
        self.pages.values()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Id of the page with this title. Last page in document order wins.
    pub fn id_for_title(&self, title: &str) -> Option<&str> {
        self.title_index.get(title).map(String::as_str)
    }

    /// Href from the document's `titles` shortcut table.
    pub fn shortcut(&self, label: &str) -> Option<&str> {
        self.shortcuts.get(label).map(String::as_str)
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Debug view of the store: sizes, source location and title collisions.
    pub fn diagnostics(&self) -> Diagnostics {
        let mut by_title: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for record in self.pages.values() {
            by_title
                .entry(record.title.as_str())
                .or_default()
                .push(record.id.as_str());
        }
        let title_collisions = by_title
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(title, ids)| TitleCollision {
                title: title.to_string(),
                winner: ids.last().map(|id| id.to_string()).unwrap_or_default(),
                ids: ids.into_iter().map(str::to_string).collect(),
            })
            .collect();

        Diagnostics {
            served_from: self.served_from.clone(),
            root_id: self.root_id.clone(),
            pages: self.pages.len(),
            titles: self.title_index.len(),
            shortcuts: self.shortcuts.len(),
            title_collisions,
        }
    }
}

/// Snapshot returned by [`SitemapStore::diagnostics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub served_from: Option<String>,
    pub root_id: String,
    pub pages: usize,
    pub titles: usize,
    pub shortcuts: usize,
    pub title_collisions: Vec<TitleCollision>,
}

/// Pages sharing one title, and which of them breadcrumb labels link to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleCollision {
    pub title: String,
    pub ids: Vec<String>,
    pub winner: String,
}

/// Load the sitemap for the page `current_id`.
///
/// Each candidate is resolved against the page's directory (root-absolute
/// candidates against the site root) and tried once, in order. The first
/// readable one is parsed; a malformed body is an error even if later
/// candidates exist.
pub fn load(
    source: &dyn Source,
    current_id: &str,
    candidates: &[String],
) -> Result<SitemapStore, LoadError> {
    let mut tried = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let Some(path) = href::resolve_href(current_id, candidate) else {
            debug!(%candidate, "candidate escapes the site root");
            tried.push(candidate.clone());
            continue;
        };
        match source.read(&path) {
            Ok(body) => {
                let mut store = SitemapStore::from_json(&body, &path)?;
                info!(location = %path, pages = store.len(), "sitemap loaded");
                store.served_from = Some(path);
                return Ok(store);
            }
            Err(e) => {
                debug!(location = %path, error = %e, "sitemap candidate unavailable");
                tried.push(path);
            }
        }
    }
    Err(LoadError::Unreachable { tried })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    const DOC: &str = r#"{
        "pages": {
            "index.html": { "title": "Home" },
            "a/b.html": {
                "title": "B",
                "breadcrumb": ["Home", "Section", "B"],
                "related": ["a/c.html", "missing.html"]
            },
            "a/c.html": { "title": "C", "breadcrumb": [] }
        },
        "titles": { "Section": "a/index.html" }
    }"#;

    #[test]
    fn parses_pages_in_document_order() {
        let store = SitemapStore::from_json(DOC, "test").unwrap();
        let ids: Vec<&str> = store.pages().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["index.html", "a/b.html", "a/c.html"]);
        assert_eq!(store.page("a/b.html").unwrap().related.len(), 2);
    }

    #[test]
    fn empty_breadcrumb_is_absent() {
        let store = SitemapStore::from_json(DOC, "test").unwrap();
        assert_eq!(store.page("a/c.html").unwrap().breadcrumb, None);
    }

    #[test]
    fn title_index_and_shortcuts() {
        let store = SitemapStore::from_json(DOC, "test").unwrap();
        assert_eq!(store.id_for_title("C"), Some("a/c.html"));
        assert_eq!(store.id_for_title("Nope"), None);
        assert_eq!(store.shortcut("Section"), Some("a/index.html"));
    }

    #[test]
    fn titles_table_is_optional() {
        let store = SitemapStore::from_json(r#"{"pages": {}}"#, "test").unwrap();
        assert!(store.is_empty());
        assert_eq!(store.shortcut("Home"), None);
    }

    #[test]
    fn title_collision_last_write_wins() {
        let doc = r#"{"pages": {
            "x/one.html": { "title": "Visa" },
            "y/two.html": { "title": "Visa" },
            "z/three.html": { "title": "Other" }
        }}"#;
        let store = SitemapStore::from_json(doc, "test").unwrap();
        assert_eq!(store.id_for_title("Visa"), Some("y/two.html"));

        let diag = store.diagnostics();
        assert_eq!(diag.title_collisions.len(), 1);
        assert_eq!(diag.title_collisions[0].winner, "y/two.html");
        assert_eq!(diag.title_collisions[0].ids, vec!["x/one.html", "y/two.html"]);
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let result = SitemapStore::from_json("not json", "data/links.json");
        assert!(matches!(result, Err(LoadError::ParseError { .. })));
    }

    #[test]
    fn missing_pages_key_is_parse_error() {
        let result = SitemapStore::from_json(r#"{"titles": {}}"#, "x");
        assert!(matches!(result, Err(LoadError::ParseError { .. })));
    }

    #[test]
    fn load_prefers_root_absolute_candidate() {
        let source = memory_source(&[("data/links.json", DOC)]);
        let store = load(&source, "a/b.html", &default_candidates()).unwrap();
        assert_eq!(store.diagnostics().served_from.as_deref(), Some("data/links.json"));
    }

    #[test]
    fn load_falls_back_to_page_relative() {
        let source = memory_source(&[("a/data/links.json", DOC)]);
        let store = load(&source, "a/b.html", &default_candidates()).unwrap();
        assert_eq!(store.diagnostics().served_from.as_deref(), Some("a/data/links.json"));
    }

    #[test]
    fn load_falls_back_to_parent_relative() {
        let source = memory_source(&[("x/data/links.json", DOC)]);
        let store = load(&source, "x/y/z/page.html", &default_candidates()).unwrap();
        assert_eq!(store.diagnostics().served_from.as_deref(), Some("x/data/links.json"));
    }

    #[test]
    fn load_unreachable_lists_every_candidate() {
        let source = memory_source(&[]);
        let err = load(&source, "a/b.html", &default_candidates()).unwrap_err();
        match err {
            LoadError::Unreachable { tried } => assert_eq!(tried.len(), 3),
            other => panic!("expected Unreachable, got {other:?}"),
        }
    }

    #[test]
    fn load_stops_at_first_readable_even_if_malformed() {
        let source = memory_source(&[("data/links.json", "{"), ("a/data/links.json", DOC)]);
        let err = load(&source, "a/b.html", &default_candidates()).unwrap_err();
        assert!(matches!(err, LoadError::ParseError { .. }));
    }

    #[test]
    fn root_id_override() {
        let store = SitemapStore::from_json(DOC, "t").unwrap().with_root_id("home.html");
        assert_eq!(store.root_id(), "home.html");
        assert_eq!(store.diagnostics().root_id, "home.html");
    }
}
