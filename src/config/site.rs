//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Text shown on a card when a post has no summary
pub const SUMMARY_FALLBACK: &str = "No summary available.";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Writing
    pub summary_fallback: String,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Search
    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Portfolio".to_string(),
            description: "Notes, essays and experiments.".to_string(),
            author: "Anonymous".to_string(),
            url: "http://localhost:3000".to_string(),

            content_dir: "posts".to_string(),
            public_dir: "public".to_string(),

            summary_fallback: SUMMARY_FALLBACK.to_string(),
            highlight: HighlightConfig::default(),

            search: SearchConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Search page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Path of the JSON post collection, relative to the site root
    pub endpoint: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "/api/posts.json".to_string(),
        }
    }
}
