//! Page id resolution from a location.
//!
//! The same pages are reached in several ways: served from the site root,
//! served from a sub-path by a local dev server, or opened straight from disk.
//! Each way yields a different raw path for the same page. Resolution turns
//! all of them into one page id, the key used by the sitemap.
//!
//! Normalization is a fixed list of rules, each a small pure function:
//!
//! | Rule | Applies to | Effect |
//! |------|------------|--------|
//! | [`strip_to_project_root`] | file origin | keep what follows the project-root marker |
//! | [`strip_leading_separator`] | all | `/a/b.html` → `a/b.html` |
//! | [`strip_loopback_prefix`] | all | drop `localhost:8000/<project>/` |
//! | fallback | all | empty → root id (`index.html`) |
//!
//! Unrecognized shapes pass through unchanged: resolution never fails.

use serde::Serialize;
use tracing::debug;
use url::Url;

/// Page id used when a location resolves to nothing.
pub const DEFAULT_ROOT_ID: &str = "index.html";

/// Default project-root directory name searched for in filesystem paths.
pub const DEFAULT_PROJECT_ROOT_MARKER: &str = "GlobalNRI";

/// Host tokens that identify a local dev server embedded in a path.
pub const DEFAULT_LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1"];

/// Where a location's path comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Served over HTTP; the path is a URL path.
    Served,
    /// Opened straight from disk; the path is a filesystem path.
    File,
}

/// The current page's location as seen by the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub origin: Origin,
}

impl Location {
    pub fn served(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            origin: Origin::Served,
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            origin: Origin::File,
        }
    }

    /// Classify a raw location string.
    ///
    /// - `file:///E:/Site/a.html` → file origin, path `/E:/Site/a.html`
    /// - `E:\Site\a.html` (drive letter) → file origin, path unchanged
    /// - `http://host:8000/a.html?x#y` → served, path `/a.html`
    /// - anything else → served, path unchanged
    ///
    /// Schemes are matched case-insensitively. URLs with other schemes are
    /// treated as served paths.
    pub fn parse(raw: &str) -> Self {
        // A drive letter parses as a one-letter URL scheme
        if has_drive_prefix(raw) {
            return Self::file(raw);
        }
        let Ok(url) = Url::parse(raw) else {
            return Self::served(raw);
        };
        match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_else(|_| url.path().to_string());
                Self::file(path)
            }
            "http" | "https" => Self::served(url.path()),
            _ => Self::served(raw),
        }
    }
}

/// Normalization settings for [`resolve_current_page_id`].
#[derive(Debug, Clone)]
pub struct ResolveOptions<'a> {
    pub project_root_marker: &'a str,
    pub loopback_hosts: &'a [String],
    pub root_id: &'a str,
}

/// Resolve a location to a page id. Never returns an empty string.
pub fn resolve_current_page_id(location: &Location, opts: &ResolveOptions<'_>) -> String {
    debug!(path = %location.path, origin = ?location.origin, "resolving page id");

    if location.origin == Origin::File {
        if let Some(id) = strip_to_project_root(&location.path, opts.project_root_marker) {
            debug!(%id, "resolved from filesystem path");
            return id;
        }
    }

    let path = strip_leading_separator(&location.path);
    let path = strip_loopback_prefix(path, opts.loopback_hosts);

    let id = if path.is_empty() {
        opts.root_id.to_string()
    } else {
        path.to_string()
    };
    debug!(%id, "resolved page id");
    id
}

/// Everything after the project-root marker directory, with `\` turned into `/`.
///
/// The marker is matched case-insensitively as a whole path segment.
/// Returns `None` when the marker is absent or nothing follows it.
pub fn strip_to_project_root(path: &str, marker: &str) -> Option<String> {
    if marker.is_empty() {
        return None;
    }
    let normalized = path.replace('\\', "/");
    let segments: Vec<&str> = normalized.split('/').collect();
    let pos = segments
        .iter()
        .position(|s| s.eq_ignore_ascii_case(marker))?;
    let rest: Vec<&str> = segments[pos + 1..]
        .iter()
        .copied()
        .filter(|s| !s.is_empty())
        .collect();
    if rest.is_empty() {
        None
    } else {
        Some(rest.join("/"))
    }
}

/// Drop one leading `/`.
pub fn strip_leading_separator(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Drop a dev-server prefix embedded in the path.
///
/// Finds the first segment that is a loopback host (`localhost` or
/// `localhost:8000`), then discards it together with the first non-empty
/// segment after it (the project directory the server was started above).
/// If the host is the last meaningful segment, the result is empty. Segments
/// that merely mention a host, like `localhost-setup.html`, are page names.
pub fn strip_loopback_prefix<'a>(path: &'a str, hosts: &[String]) -> &'a str {
    let mut offset = 0;
    let mut host_seen = false;
    for segment in path.split('/') {
        let next = (offset + segment.len() + 1).min(path.len());
        if host_seen && !segment.is_empty() {
            return &path[next..];
        }
        if !host_seen && is_loopback_segment(segment, hosts) {
            host_seen = true;
        }
        offset = next;
    }
    if host_seen { "" } else { path }
}

/// `host` or `host:port` for one of the loopback `hosts`.
fn is_loopback_segment(segment: &str, hosts: &[String]) -> bool {
    let (host, port) = match segment.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (segment, None),
    };
    let port_ok = port.is_none_or(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    port_ok && hosts.iter().any(|h| h.eq_ignore_ascii_case(host))
}

fn has_drive_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'\\'
}
