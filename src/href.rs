//! Relative hyperlinks between page ids.
//!
//! Page ids are slash-separated paths relative to the site root
//! (`countries/germany/visa.html`). Links written into a page must work no
//! matter where the site is mounted, so every href is expressed relative to
//! the directory of the page that contains it:
//!
//! ```text
//! from: countries/germany/visa.html
//! to:   countries/canada/index.html
//!       ^^^^^^^^^ shared prefix
//! href: ../canada/index.html
//! ```
//!
//! [`resolve_href`] is the inverse: it joins an href back onto the directory
//! of the page it appears in.

/// Placeholder for a link with no target. Clicking it does not navigate.
pub const INERT_HREF: &str = "#";

/// Returned when the target is the directory of the source page itself.
pub const CURRENT_DIR_HREF: &str = "./";

/// Compute the shortest relative href from page `from_id` to `to_id`.
///
/// - empty `to_id` → [`INERT_HREF`]
/// - `to_id` starting with `/` → the rest of `to_id`, unchanged
/// - otherwise `../` once per directory of `from_id` not shared with `to_id`,
///   followed by the unshared segments of `to_id`
pub fn compute_relative_href(from_id: &str, to_id: &str) -> String {
    if to_id.is_empty() {
        return INERT_HREF.to_string();
    }
    if let Some(rest) = to_id.strip_prefix('/') {
        return rest.to_string();
    }

    let from_dir = directory_segments(from_id);
    let to: Vec<&str> = segments(to_id).collect();

    let common = from_dir
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let parts: Vec<&str> = std::iter::repeat_n("..", from_dir.len() - common)
        .chain(to[common..].iter().copied())
        .collect();

    if parts.is_empty() {
        CURRENT_DIR_HREF.to_string()
    } else {
        parts.join("/")
    }
}

/// Join a relative `href` onto the directory of `from_id`, normalizing `.`
/// and `..` segments. Returns `None` when the href climbs above the site root.
///
/// Root-relative and inert hrefs are returned as their page id.
pub fn resolve_href(from_id: &str, href: &str) -> Option<String> {
    if href == INERT_HREF {
        return None;
    }
    if let Some(rest) = href.strip_prefix('/') {
        return Some(rest.to_string());
    }

    let mut stack = directory_segments(from_id);
    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop()?;
            }
            other => stack.push(other),
        }
    }
    Some(stack.join("/"))
}

/// Non-empty segments of a slash-separated id.
fn segments(id: &str) -> impl Iterator<Item = &str> {
    id.split('/').filter(|s| !s.is_empty())
}

/// Directory segments of a page id: everything but the final filename.
fn directory_segments(id: &str) -> Vec<&str> {
    let dir = match id.rfind('/') {
        Some(pos) => &id[..pos],
        None => "",
    };
    segments(dir).collect()
}
