//! Site configuration module.
//!
//! Handles loading and validating `navstitch.toml`. Stock defaults are
//! serialized to a TOML table, the user's file is merged on top key by key,
//! and the result is deserialized with unknown keys rejected.
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── navstitch.toml          # Optional; every key has a default
//! ├── index.html
//! ├── data/links.json         # Sitemap
//! └── countries/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! sitemap_candidates = ["/data/links.json", "data/links.json", "../../data/links.json"]
//! root_id = "index.html"            # Page linked by the home breadcrumb
//! home_label = "Home"               # Breadcrumb label that falls back to root_id
//! separator = " / "                 # Text between breadcrumb entries
//! project_root_marker = "GlobalNRI" # Directory name searched in file:// paths
//! loopback_hosts = ["localhost", "127.0.0.1"]
//!
//! [build]
//! skip_dirs = ["partials", "data"]  # Copied verbatim, pages not processed
//! ```

use crate::location::{DEFAULT_LOOPBACK_HOSTS, DEFAULT_PROJECT_ROOT_MARKER, DEFAULT_ROOT_ID, ResolveOptions};
use crate::render::{DEFAULT_HOME_LABEL, DEFAULT_SEPARATOR, RenderOptions};
use crate::sitemap::DEFAULT_CANDIDATES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the site root.
pub const CONFIG_FILE: &str = "navstitch.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `navstitch.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Sitemap locations tried in order for every page.
    pub sitemap_candidates: Vec<String>,
    /// Id of the site's root page.
    pub root_id: String,
    /// Breadcrumb label linked to `root_id` when no page or shortcut matches.
    pub home_label: String,
    /// Text between breadcrumb entries.
    pub separator: String,
    /// Directory name marking the site root inside filesystem paths.
    pub project_root_marker: String,
    /// Host tokens of local dev servers that leak into paths.
    pub loopback_hosts: Vec<String>,
    /// Site build settings.
    pub build: BuildConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            sitemap_candidates: DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect(),
            root_id: DEFAULT_ROOT_ID.to_string(),
            home_label: DEFAULT_HOME_LABEL.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            project_root_marker: DEFAULT_PROJECT_ROOT_MARKER.to_string(),
            loopback_hosts: DEFAULT_LOOPBACK_HOSTS.iter().map(|h| h.to_string()).collect(),
            build: BuildConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sitemap_candidates.is_empty() {
            return Err(ConfigError::Validation(
                "sitemap_candidates must not be empty".into(),
            ));
        }
        if self.sitemap_candidates.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "sitemap_candidates must not contain empty paths".into(),
            ));
        }
        if self.root_id.is_empty() || self.root_id.starts_with('/') {
            return Err(ConfigError::Validation(
                "root_id must be a non-empty site-relative page id".into(),
            ));
        }
        if self.loopback_hosts.iter().any(|h| h.is_empty()) {
            return Err(ConfigError::Validation(
                "loopback_hosts must not contain empty entries".into(),
            ));
        }
        Ok(())
    }

    pub fn resolve_options(&self) -> ResolveOptions<'_> {
        ResolveOptions {
            project_root_marker: &self.project_root_marker,
            loopback_hosts: &self.loopback_hosts,
            root_id: &self.root_id,
        }
    }

    pub fn render_options(&self) -> RenderOptions<'_> {
        RenderOptions {
            home_label: &self.home_label,
            separator: &self.separator,
        }
    }
}

/// Site build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Top-level directories whose HTML files are copied without processing.
    pub skip_dirs: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            skip_dirs: vec!["partials".to_string(), "data".to_string()],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` if it doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file, or `navstitch.toml` in the site root.
pub fn load_config(site_root: &Path, explicit: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let overlay = match explicit {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Some(toml::from_str(&content)?)
        }
        None => load_raw_config(&site_root.join(CONFIG_FILE))?,
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `navstitch.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# navstitch configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Sitemap locations, tried in order for every page. A leading "/" means the
# site root; anything else is relative to the page being processed.
sitemap_candidates = ["/data/links.json", "data/links.json", "../../data/links.json"]

# Page id of the site's root page.
root_id = "index.html"

# Breadcrumb label that links to root_id when no page title or shortcut matches.
home_label = "Home"

# Text placed between breadcrumb entries.
separator = " / "

# Directory name that marks the site root inside filesystem paths
# (used when resolving file:// locations).
project_root_marker = "GlobalNRI"

# Host tokens of local dev servers that sometimes leak into page paths.
loopback_hosts = ["localhost", "127.0.0.1"]

# ---------------------------------------------------------------------------
# Site build
# ---------------------------------------------------------------------------
[build]
# Top-level directories copied verbatim: their HTML files are fragments or
# data, not pages.
skip_dirs = ["partials", "data"]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.root_id, "index.html");
        assert_eq!(config.home_label, "Home");
        assert_eq!(config.sitemap_candidates.len(), 3);
        assert_eq!(config.sitemap_candidates[0], "/data/links.json");
        assert_eq!(config.build.skip_dirs, vec!["partials", "data"]);
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(r#"home_label = "Start""#).unwrap();
        assert_eq!(config.home_label, "Start");
        assert_eq!(config.separator, " / ");
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path(), None).unwrap();
        assert_eq!(config.root_id, "index.html");
    }

    #[test]
    fn load_config_reads_site_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
separator = " › "

[build]
skip_dirs = ["fragments"]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path(), None).unwrap();
        assert_eq!(config.separator, " › ");
        assert_eq!(config.build.skip_dirs, vec!["fragments"]);
        // Unspecified values should be defaults
        assert_eq!(config.home_label, "Home");
    }

    #[test]
    fn load_config_explicit_path_wins() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), r#"home_label = "Site""#).unwrap();
        let explicit = tmp.path().join("other.toml");
        fs::write(&explicit, r#"home_label = "Explicit""#).unwrap();

        let config = load_config(tmp.path(), Some(&explicit)).unwrap();
        assert_eq!(config.home_label, "Explicit");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path(), None);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result = resolve_config(Some(toml::from_str("sitemap = 1").unwrap()));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn empty_candidates_rejected() {
        let result = resolve_config(Some(toml::from_str("sitemap_candidates = []").unwrap()));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn absolute_root_id_rejected() {
        let result = resolve_config(Some(toml::from_str(r#"root_id = "/index.html""#).unwrap()));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
a = 1
[build]
skip_dirs = ["x"]
keep = true
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[build]
skip_dirs = ["y"]
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["build"]["skip_dirs"][0].as_str(), Some("y"));
        assert_eq!(merged["build"]["keep"].as_bool(), Some(true));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.sitemap_candidates, defaults.sitemap_candidates);
        assert_eq!(config.loopback_hosts, defaults.loopback_hosts);
        assert_eq!(config.build.skip_dirs, defaults.build.skip_dirs);
        assert_eq!(config.project_root_marker, defaults.project_root_marker);
    }

    #[test]
    fn options_borrow_config_values() {
        let config = SiteConfig {
            home_label: "Start".into(),
            ..SiteConfig::default()
        };
        assert_eq!(config.render_options().home_label, "Start");
        assert_eq!(config.resolve_options().root_id, "index.html");
    }
}
