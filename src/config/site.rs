//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub static_dir: String,
    pub output_dir: String,

    // Writing
    pub highlight_theme: String,
    pub line_numbers: bool,
    pub toc_max_depth: u8,

    // Feed
    pub feed_limit: usize,

    // Tags
    pub default_tag_style: String,
    #[serde(default)]
    pub tag_styles: HashMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: "Anonymous".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "content/blog".to_string(),
            static_dir: "public".to_string(),
            output_dir: "dist".to_string(),

            highlight_theme: "base16-ocean.dark".to_string(),
            line_numbers: false,
            toc_max_depth: 4,

            feed_limit: 20,

            default_tag_style: "tag-default".to_string(),
            tag_styles: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config {:?}", path))?;
        Ok(config)
    }

    /// CSS class used to present a tag control
    pub fn tag_style(&self, tag: &str) -> &str {
        self.tag_styles
            .get(tag)
            .map(String::as_str)
            .unwrap_or(&self.default_tag_style)
    }
}
