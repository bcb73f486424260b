//! # navstitch
//!
//! Build-time navigation for hand-written static sites. Pages stay plain
//! HTML; a single sitemap document (`data/links.json`) describes every page's
//! title, breadcrumb trail and related pages, and navstitch fills the marked
//! containers of each page from it:
//!
//! ```html
//! <div data-include="partials/nav.html"></div>
//! <nav class="breadcrumb" data-breadcrumb></nav>
//! <div data-related-links></div>
//! ```
//!
//! # Pipeline
//!
//! Each page goes through the same steps a browser would take for one page
//! view, so a site built by navstitch and a site served with a client-side
//! loader link identically:
//!
//! ```text
//! 1. Resolve   location  →  page id            (served path or file path)
//! 2. Stitch    page      →  page + fragments   (data-include)
//! 3. Load      sitemap candidates → store      (first reachable wins)
//! 4. Render    store + id → breadcrumb, related links
//! 5. Inject    fragments → marked containers
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`location`] | Turns a browser location into a site-relative page id |
//! | [`href`] | Relative hrefs between page ids, and their inverse |
//! | [`source`] | Read access to site documents: a directory or an in-memory map |
//! | [`sitemap`] | Sitemap document parsing, title index, candidate loading |
//! | [`render`] | Breadcrumb and related-link fragments, per-page session |
//! | [`inject`] | Finds marked containers in HTML and replaces their content |
//! | [`include`] | `data-include` fragment stitching |
//! | [`countries`] | Country overview cards for the country selector |
//! | [`generate`] | Whole-site build: walk, process pages, copy the rest |
//! | [`config`] | `navstitch.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Ids, Not URLs
//!
//! Everything inside the sitemap is keyed by page id: the page's path relative
//! to the site root, with forward slashes. Hrefs are computed from ids at
//! render time, relative to the current page, so the built site works from any
//! mount point and straight from disk.
//!
//! ## Missing Navigation Is Not an Error
//!
//! An unreachable or malformed sitemap, a page without a record, a label with
//! no link target: all of these degrade the page's navigation, never the build.
//! Containers are left as written and the problem is logged.
//!
//! ## Maud for Fragments
//!
//! Breadcrumb, related-link and country fragments are built with
//! [Maud](https://maud.lambda.xyz/), so titles and labels from the sitemap are
//! escaped on the way in.

pub mod config;
pub mod countries;
pub mod generate;
pub mod href;
pub mod include;
pub mod inject;
pub mod location;
pub mod output;
pub mod render;
pub mod sitemap;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;
