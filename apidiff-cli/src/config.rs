//! apidiff configuration loading from `.apidiffrc.toml`.
//!
//! Configuration is optional; apidiff uses the built-in defaults when no file
//! exists. Command-line flags override anything set here.
//!
//! # Example Configuration
//!
//! ```toml
//! [diff]
//! attributes_to_exclude = ["T:System.ObsoleteAttribute"]
//! apis_to_exclude = ["T:MyNamespace.Internal"]
//! hide_implicit_default_constructors = true
//! add_partial_modifier = false
//! title = "release"
//! jobs = 4
//!
//! [output]
//! format = "table"
//! color = true
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use apidiff_core::differ::AttributeExclusions;
use apidiff_core::DiffOptions;
use serde::Deserialize;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = ".apidiffrc.toml";

/// Root configuration structure loaded from `.apidiffrc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct ApiDiffConfig {
    /// Diff engine defaults.
    #[serde(default)]
    pub diff: DiffSection,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Diff engine defaults.
#[derive(Debug, Deserialize, Default)]
pub struct DiffSection {
    /// Attribute type identities to hide.
    ///
    /// Absent means the built-in list applies; an empty list hides nothing.
    #[serde(default)]
    pub attributes_to_exclude: Option<Vec<String>>,

    /// Declaration identities to drop together with their descendants.
    #[serde(default)]
    pub apis_to_exclude: Vec<String>,

    #[serde(default)]
    pub hide_implicit_default_constructors: bool,

    #[serde(default)]
    pub add_partial_modifier: bool,

    /// Index title; also prefixes module document names.
    #[serde(default)]
    pub title: Option<String>,

    /// Worker thread count.
    #[serde(default)]
    pub jobs: Option<usize>,
}

/// Output formatting preferences.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default output format: `table`, `json` or `markdown`.
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output.
    #[serde(default)]
    pub color: Option<bool>,
}

impl ApiDiffConfig {
    /// Load configuration from `.apidiffrc.toml` in the given directory.
    ///
    /// A missing file yields defaults. Read and parse errors are logged as
    /// warnings and also yield defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    /// Diff options described by the `[diff]` section.
    pub fn diff_options(&self) -> DiffOptions {
        let attributes_to_exclude = match &self.diff.attributes_to_exclude {
            None => AttributeExclusions::UseBuiltInDefaults,
            Some(ids) => AttributeExclusions::exact(ids.iter().cloned()),
        };
        DiffOptions {
            attributes_to_exclude,
            apis_to_exclude: self.diff.apis_to_exclude.iter().cloned().collect::<BTreeSet<_>>(),
            hide_implicit_default_constructors: self.diff.hide_implicit_default_constructors,
            add_partial_modifier: self.diff.add_partial_modifier,
            table_of_contents_title: self.diff.title.clone(),
            num_threads: self.diff.jobs,
        }
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiDiffConfig::default();
        assert!(config.diff.attributes_to_exclude.is_none());
        assert!(config.output.format.is_none());

        let options = config.diff_options();
        assert_eq!(
            options.attributes_to_exclude,
            AttributeExclusions::UseBuiltInDefaults
        );
        assert!(options.table_of_contents_title.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[diff]
attributes_to_exclude = ["T:System.ObsoleteAttribute"]
apis_to_exclude = ["T:N.Hidden", "M:N.C.M"]
hide_implicit_default_constructors = true
add_partial_modifier = true
title = "release"
jobs = 2

[output]
format = "json"
color = false
"#;
        let config: ApiDiffConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.default_format(), Some("json"));
        assert_eq!(config.use_color(), Some(false));

        let options = config.diff_options();
        assert_eq!(
            options.attributes_to_exclude,
            AttributeExclusions::exact(["T:System.ObsoleteAttribute"])
        );
        assert_eq!(options.apis_to_exclude.len(), 2);
        assert!(options.hide_implicit_default_constructors);
        assert!(options.add_partial_modifier);
        assert_eq!(options.table_of_contents_title.as_deref(), Some("release"));
        assert_eq!(options.num_threads, Some(2));
    }

    #[test]
    fn test_empty_attribute_list_is_exact() {
        let config: ApiDiffConfig = toml::from_str("[diff]\nattributes_to_exclude = []\n").unwrap();
        assert_eq!(
            config.diff_options().attributes_to_exclude,
            AttributeExclusions::UseExactList(BTreeSet::new())
        );
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[diff\nbroken").unwrap();
        let config = ApiDiffConfig::load(dir.path());
        assert!(config.diff.title.is_none());
    }
}
