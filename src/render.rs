//! Breadcrumb and related-links rendering.
//!
//! Turns the sitemap entry of the current page into two markup fragments:
//!
//! ```text
//! breadcrumb:  <a href="../index.html">Home</a> / <a href="index.html">Section</a> / <span>B</span>
//! related:     <a class="related-link" href="c.html">C</a>
//! ```
//!
//! Each fragment is optional. A page missing from the sitemap, a page without
//! a breadcrumb, or a page whose related ids all dangle leaves the matching
//! container untouched. Nothing here is an error; misses are logged.
//!
//! ## Breadcrumb links
//!
//! Every label except the last is linked if a target can be found, in order:
//!
//! 1. a page whose title equals the label ([`SitemapStore::id_for_title`])
//! 2. the document's `titles` shortcut table ([`SitemapStore::shortcut`])
//! 3. the home label, which links to the store's root id
//!
//! Otherwise the label is plain text. The last label is the current page and
//! is never linked. All hrefs are relative to the current page.

use crate::href::compute_relative_href;
use crate::sitemap::{self, SitemapStatus, SitemapStore};
use crate::source::Source;
use maud::{Markup, html};
use tracing::{debug, warn};

/// Label that links to the root page when nothing else matches.
pub const DEFAULT_HOME_LABEL: &str = "Home";

/// Text between breadcrumb entries.
pub const DEFAULT_SEPARATOR: &str = " / ";

#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    pub home_label: &'a str,
    pub separator: &'a str,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            home_label: DEFAULT_HOME_LABEL,
            separator: DEFAULT_SEPARATOR,
        }
    }
}

/// One breadcrumb entry. `href` is `None` for plain-text entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub href: Option<String>,
}

/// One related-page link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedLink {
    pub id: String,
    pub title: String,
    pub href: String,
}

/// Rendered fragments. `None` means "leave the container alone".
#[derive(Debug, Clone, Default)]
pub struct RenderResult {
    pub breadcrumb: Option<Markup>,
    pub related: Option<Markup>,
}

impl RenderResult {
    pub fn is_empty(&self) -> bool {
        self.breadcrumb.is_none() && self.related.is_none()
    }
}

/// Breadcrumb entries for `current_id`, or `None` when the page has no trail.
pub fn breadcrumbs(
    store: &SitemapStore,
    current_id: &str,
    opts: &RenderOptions<'_>,
) -> Option<Vec<Crumb>> {
    let Some(record) = store.page(current_id) else {
        debug!(page = %current_id, "page not in sitemap");
        return None;
    };
    let Some(labels) = &record.breadcrumb else {
        debug!(page = %current_id, "page has no breadcrumb");
        return None;
    };

    let last = labels.len() - 1;
    let crumbs = labels
        .iter()
        .enumerate()
        .map(|(idx, label)| Crumb {
            label: label.clone(),
            href: if idx == last {
                None
            } else {
                crumb_target(store, label, opts)
                    .map(|target| compute_relative_href(current_id, &target))
            },
        })
        .collect();
    Some(crumbs)
}

/// Link target for a breadcrumb label, as a page id or root-absolute href.
fn crumb_target(store: &SitemapStore, label: &str, opts: &RenderOptions<'_>) -> Option<String> {
    if let Some(id) = store.id_for_title(label) {
        return Some(id.to_string());
    }
    if let Some(href) = store.shortcut(label) {
        return Some(href.to_string());
    }
    if label == opts.home_label {
        return Some(store.root_id().to_string());
    }
    debug!(%label, "breadcrumb label has no link target");
    None
}

/// Related links for `current_id` in declared order, skipping dangling ids.
pub fn related_links(store: &SitemapStore, current_id: &str) -> Vec<RelatedLink> {
    let Some(record) = store.page(current_id) else {
        return Vec::new();
    };
    record
        .related
        .iter()
        .filter_map(|id| match store.page(id) {
            Some(target) => Some(RelatedLink {
                id: id.clone(),
                title: target.title.clone(),
                href: compute_relative_href(current_id, id),
            }),
            None => {
                debug!(page = %current_id, related = %id, "dropping unknown related page");
                None
            }
        })
        .collect()
}

pub fn render_breadcrumb(crumbs: &[Crumb], separator: &str) -> Markup {
    html! {
        @for (idx, crumb) in crumbs.iter().enumerate() {
            @if idx > 0 { (separator) }
            @match &crumb.href {
                Some(href) => { a href=(href) { (crumb.label) } },
                None => { span { (crumb.label) } },
            }
        }
    }
}

pub fn render_related(links: &[RelatedLink]) -> Markup {
    html! {
        @for link in links {
            a.related-link href=(link.href) { (link.title) }
        }
    }
}

/// Render both fragments for `current_id`.
///
/// The breadcrumb and related sections are decided independently: a page
/// without a trail can still get related links.
pub fn render(store: &SitemapStore, current_id: &str, opts: &RenderOptions<'_>) -> RenderResult {
    let breadcrumb =
        breadcrumbs(store, current_id, opts).map(|crumbs| render_breadcrumb(&crumbs, opts.separator));

    let links = related_links(store, current_id);
    let related = if links.is_empty() {
        None
    } else {
        debug!(page = %current_id, count = links.len(), "rendered related links");
        Some(render_related(&links))
    };

    RenderResult {
        breadcrumb,
        related,
    }
}

/// Lifecycle of navigation for one page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Ready,
    Rendered,
}

/// Navigation state for one page view: load the sitemap once, render once.
///
/// A failed load still moves the session to [`Phase::Ready`]; rendering then
/// produces an empty result.
#[derive(Debug)]
pub struct NavSession {
    phase: Phase,
    store: Option<SitemapStore>,
    status: SitemapStatus,
    root_id: Option<String>,
}

impl Default for NavSession {
    fn default() -> Self {
        Self::new()
    }
}

impl NavSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
            store: None,
            status: SitemapStatus::Unreachable,
            root_id: None,
        }
    }

    /// Override the root id of the store this session loads.
    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = Some(root_id.into());
        self
    }

    /// Start a session from an already loaded store.
    pub fn with_store(store: SitemapStore) -> Self {
        Self {
            phase: Phase::Ready,
            store: Some(store),
            status: SitemapStatus::Loaded,
            root_id: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The loaded store, for inspection.
    pub fn store(&self) -> Option<&SitemapStore> {
        self.store.as_ref()
    }

    /// Load the sitemap for `current_id`. Only the first call has an effect.
    ///
    /// Returns the outcome of that load.
    pub fn load(
        &mut self,
        source: &dyn Source,
        current_id: &str,
        candidates: &[String],
    ) -> SitemapStatus {
        if self.phase == Phase::Uninitialized {
            self.phase = Phase::Ready;
            match sitemap::load(source, current_id, candidates) {
                Ok(store) => {
                    self.store = Some(match self.root_id.take() {
                        Some(root_id) => store.with_root_id(root_id),
                        None => store,
                    });
                    self.status = SitemapStatus::Loaded;
                }
                Err(e) => {
                    warn!(page = %current_id, error = %e, "navigation disabled: could not load sitemap");
                    self.status = SitemapStatus::from(&e);
                }
            }
        }
        self.status
    }

    /// Render navigation for `current_id`. Empty unless the session is ready
    /// with a store.
    pub fn render(&mut self, current_id: &str, opts: &RenderOptions<'_>) -> RenderResult {
        match self.phase {
            Phase::Uninitialized => {
                debug!("render requested before sitemap load");
                return RenderResult::default();
            }
            Phase::Rendered => {
                debug!("navigation already rendered for this page view");
                return RenderResult::default();
            }
            Phase::Ready => {}
        }
        self.phase = Phase::Rendered;
        match &self.store {
            Some(store) => render(store, current_id, opts),
            None => RenderResult::default(),
        }
    }
}
