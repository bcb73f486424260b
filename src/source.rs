//! Where documents come from.
//!
//! The sitemap and include fragments are addressed by site-relative paths
//! (`data/links.json`, `partials/nav.html`). A [`Source`] turns such a path
//! into the document body. The CLI reads from the site directory on disk;
//! tests use an in-memory map.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read access to site documents by site-relative path.
pub trait Source {
    fn read(&self, path: &str) -> io::Result<String>;
}

/// A site directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct SiteDir {
    root: PathBuf,
}

impl SiteDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Source for SiteDir {
    fn read(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(self.root.join(path))
    }
}

/// Documents held in memory, keyed by site-relative path.
impl Source for HashMap<String, String> {
    fn read(&self, path: &str) -> io::Result<String> {
        self.get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}
