//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **page-centric**. The primary display for every page is its
//! positional index and id; what navstitch did to it (trail, related links,
//! includes) follows on the same line or as indented context lines. A build
//! reads as an inventory of the site's navigation.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 about.html → breadcrumb
//!     Includes: 1
//! 002 countries/index.html → breadcrumb
//!     Includes: 1
//! 003 orphan.html → no navigation
//!     Sitemap: unreachable
//!
//! Built 3 pages, copied 4 files
//! ```
//!
//! ## Render
//!
//! ```text
//! Page: countries/germany/visa.html
//! Sitemap: data/links.json (5 pages, 5 titles, 1 shortcut)
//! Breadcrumb
//!     <a href="../../index.html">Home</a> / <span>Visa</span>
//! Related
//!     (none)
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::countries::CountryInfo;
use crate::generate::{BuildReport, PageNavigation, PageReport};
use crate::sitemap::{Diagnostics, SitemapStatus};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Why no sitemap was available, for context lines.
fn sitemap_problem(status: SitemapStatus) -> Option<&'static str> {
    match status {
        SitemapStatus::Loaded => None,
        SitemapStatus::Unreachable => Some("unreachable"),
        SitemapStatus::Malformed => Some("malformed"),
    }
}

/// `1 file`, `3 files`.
fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// What was filled on a page, for the header line.
fn page_summary(page: &PageReport) -> String {
    let filled: Vec<&str> = [
        (page.breadcrumb, "breadcrumb"),
        (page.related, "related"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    if filled.is_empty() {
        "no navigation".to_string()
    } else {
        filled.join(", ")
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the result of a site build.
///
/// Every page gets a header line; context lines appear only when there is
/// something to say (stitched or failed includes, missing sitemap).
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.pages.is_empty() {
        lines.push("Pages".to_string());
    }
    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            page.id,
            page_summary(page)
        ));
        if let Some(problem) = sitemap_problem(page.sitemap) {
            lines.push(format!("{}Sitemap: {}", indent(1), problem));
        }
        match (page.includes, page.include_failures) {
            (0, 0) => {}
            (n, 0) => lines.push(format!("{}Includes: {}", indent(1), n)),
            (n, f) => lines.push(format!("{}Includes: {} ({} failed)", indent(1), n, f)),
        }
    }

    if !report.pages.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Built {}, copied {}",
        plural(report.pages.len(), "page"),
        plural(report.copied, "file")
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Render output
// ============================================================================

/// One-line description of where the sitemap came from, or why it's missing.
fn sitemap_line(status: SitemapStatus, diagnostics: Option<&Diagnostics>) -> String {
    if let Some(problem) = sitemap_problem(status) {
        return format!("Sitemap: {}", problem);
    }
    match diagnostics {
        Some(d) => format!(
            "Sitemap: {} ({}, {}, {})",
            d.served_from.as_deref().unwrap_or("(inline)"),
            plural(d.pages, "page"),
            plural(d.titles, "title"),
            plural(d.shortcuts, "shortcut")
        ),
        None => "Sitemap: (none)".to_string(),
    }
}

/// Format the navigation rendered for one location.
pub fn format_page_navigation(nav: &PageNavigation) -> Vec<String> {
    let mut lines = vec![
        format!("Page: {}", nav.id),
        sitemap_line(nav.sitemap, nav.diagnostics.as_ref()),
    ];

    let sections = [
        ("Breadcrumb", &nav.result.breadcrumb),
        ("Related", &nav.result.related),
    ];
    for (name, fragment) in sections {
        lines.push(name.to_string());
        match fragment {
            Some(markup) => lines.push(format!("{}{}", indent(1), markup.0)),
            None => lines.push(format!("{}(none)", indent(1))),
        }
    }
    lines
}

/// Print render output to stdout.
pub fn print_page_navigation(nav: &PageNavigation) {
    for line in format_page_navigation(nav) {
        println!("{}", line);
    }
}

// ============================================================================
// Inspect output
// ============================================================================

/// Format sitemap diagnostics, including any title collisions.
pub fn format_diagnostics(diagnostics: &Diagnostics) -> Vec<String> {
    let mut lines = vec![
        sitemap_line(SitemapStatus::Loaded, Some(diagnostics)),
        format!("Root: {}", diagnostics.root_id),
    ];
    if !diagnostics.title_collisions.is_empty() {
        lines.push("Title collisions".to_string());
        for (i, collision) in diagnostics.title_collisions.iter().enumerate() {
            lines.push(format!(
                "{} {} \u{2192} {}",
                format_index(i + 1),
                collision.title,
                collision.winner
            ));
            for id in &collision.ids {
                lines.push(format!("{}{}", indent(1), id));
            }
        }
    }
    lines
}

/// Print sitemap diagnostics to stdout.
pub fn print_diagnostics(diagnostics: &Diagnostics) {
    for line in format_diagnostics(diagnostics) {
        println!("{}", line);
    }
}

// ============================================================================
// Country output
// ============================================================================

pub fn format_country(info: &CountryInfo) -> Vec<String> {
    vec![
        format!("{} ({})", info.name, info.continent),
        format!("{}Visa: {}", indent(1), info.visa),
        format!("{}Living expenses: {}", indent(1), info.expenses),
        format!("{}Lifestyle: {}", indent(1), info.lifestyle),
    ]
}

pub fn print_country(info: &CountryInfo) {
    for line in format_country(info) {
        println!("{}", line);
    }
}
