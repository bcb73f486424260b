//! Site generation.
//!
//! Walks a hand-written site directory and writes a copy in which every page
//! has its shared fragments stitched in and its navigation containers filled.
//! Each page is handled the way a browser would handle one page view:
//!
//! ```text
//! page.html ─▶ resolve id ─▶ stitch data-include ─▶ load sitemap ─▶ render ─▶ inject
//! ```
//!
//! The sitemap is loaded fresh for every page through the configured candidate
//! locations, exactly as the page would find it when served. Navigation
//! problems never fail the build; they show up in the [`BuildReport`] and in
//! the log.
//!
//! ## Output Structure
//!
//! The output mirrors the site directory. HTML pages are rewritten, every
//! other file (styles, scripts, images, the sitemap itself) is copied as is.
//! HTML files under `build.skip_dirs` are fragments and are copied too.

use crate::config::SiteConfig;
use crate::include::stitch_includes;
use crate::inject::inject_navigation;
use crate::location::{Location, resolve_current_page_id};
use crate::render::{NavSession, RenderResult};
use crate::sitemap::{Diagnostics, SitemapStatus};
use crate::source::{SiteDir, Source};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Site directory not found: {0}")]
    MissingSite(PathBuf),
    #[error("Output directory {0} is the site directory")]
    OutputIsSite(PathBuf),
}

/// What happened to one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub id: String,
    pub sitemap: SitemapStatus,
    pub breadcrumb: bool,
    pub related: bool,
    pub includes: usize,
    pub include_failures: usize,
}

/// Summary of a site build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Processed pages, sorted by id.
    pub pages: Vec<PageReport>,
    /// Files copied without processing.
    pub copied: usize,
}

/// Navigation for a single page, as the `render` command shows it.
#[derive(Debug)]
pub struct PageNavigation {
    pub id: String,
    pub result: RenderResult,
    pub sitemap: SitemapStatus,
    pub diagnostics: Option<Diagnostics>,
}

/// Build the site at `site_dir` into `output_dir`.
pub fn generate(
    site_dir: &Path,
    output_dir: &Path,
    config: &SiteConfig,
) -> Result<BuildReport, GenerateError> {
    if !site_dir.is_dir() {
        return Err(GenerateError::MissingSite(site_dir.to_path_buf()));
    }
    fs::create_dir_all(output_dir)?;
    let site_root = site_dir.canonicalize()?;
    let output_root = output_dir.canonicalize()?;
    if site_root == output_root {
        return Err(GenerateError::OutputIsSite(output_dir.to_path_buf()));
    }

    let source = SiteDir::new(&site_root);
    let mut report = BuildReport::default();

    let walker = WalkDir::new(&site_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.path() != output_root);

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(&site_root).unwrap_or(entry.path());
        let rel_str = site_relative(rel);
        let dst = output_root.join(rel);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }

        if is_page(rel, config) {
            let html = fs::read_to_string(entry.path())?;
            let (page, page_report) = process_page(&source, &rel_str, &html, config);
            fs::write(&dst, page)?;
            info!(
                page = %page_report.id,
                breadcrumb = page_report.breadcrumb,
                related = page_report.related,
                includes = page_report.includes,
                "processed page"
            );
            report.pages.push(page_report);
        } else {
            fs::copy(entry.path(), &dst)?;
            debug!(file = %rel_str, "copied");
            report.copied += 1;
        }
    }

    report.pages.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(report)
}

/// Stitch includes and inject navigation into one page.
///
/// `path` is the page's site-relative path; its id is resolved the same way
/// a served location would be.
pub fn process_page(
    source: &dyn Source,
    path: &str,
    html: &str,
    config: &SiteConfig,
) -> (String, PageReport) {
    let id = resolve_current_page_id(
        &Location::served(format!("/{path}")),
        &config.resolve_options(),
    );

    let (stitched, includes) = stitch_includes(html, source, &id);

    let mut session = NavSession::new().with_root_id(&config.root_id);
    let sitemap = session.load(source, &id, &config.sitemap_candidates);
    let result = session.render(&id, &config.render_options());
    let page = inject_navigation(&stitched, &result);

    let report = PageReport {
        sitemap,
        breadcrumb: result.breadcrumb.is_some(),
        related: result.related.is_some(),
        includes: includes.stitched.len(),
        include_failures: includes.failed.len(),
        id,
    };
    (page, report)
}

/// Resolve `location` and render its navigation against the site at `site_dir`.
pub fn render_location(site_dir: &Path, location: &Location, config: &SiteConfig) -> PageNavigation {
    let source = SiteDir::new(site_dir);
    let id = resolve_current_page_id(location, &config.resolve_options());

    let mut session = NavSession::new().with_root_id(&config.root_id);
    let sitemap = session.load(&source, &id, &config.sitemap_candidates);
    let diagnostics = session.store().map(|s| s.diagnostics());
    let result = session.render(&id, &config.render_options());

    PageNavigation {
        id,
        result,
        sitemap,
        diagnostics,
    }
}

fn is_page(rel: &Path, config: &SiteConfig) -> bool {
    let is_html = rel
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"));
    if !is_html {
        return false;
    }
    let mut components = rel.components();
    let top = components.next();
    let nested = components.next().is_some();
    let skipped = nested
        && top.is_some_and(|c| {
            config
                .build
                .skip_dirs
                .iter()
                .any(|d| c.as_os_str() == d.as_str())
        });
    !skipped
}

/// Site-relative path with forward slashes.
fn site_relative(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
