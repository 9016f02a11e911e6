//! quillpost: a small blog engine
//!
//! Posts are MDX/Markdown files with a `key: 'value'` front-matter block.
//! The crate loads them, lists them newest first, renders them with
//! highlighted code and math, and serves a whole-word title search.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod search;
pub mod server;
pub mod templates;
pub mod views;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The blog application
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the post files
    pub content_dir: PathBuf,
    /// Output directory for static builds
    pub public_dir: PathBuf,
}

impl Site {
    /// Create a site rooted at a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// Load all posts in load order
    pub fn load_posts(&self) -> Result<Vec<content::Post>> {
        content::loader::ContentLoader::new(self).load_posts()
    }

    /// Load all posts in listing order, newest first
    pub fn listed_posts(&self) -> Result<Vec<content::Post>> {
        let mut posts = self.load_posts()?;
        views::sort_by_published(&mut posts);
        Ok(posts)
    }

    /// Build the static site
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::create_post(self, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_site_reads_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: Notes\ncontent_dir: content\npublic_dir: out\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Notes");
        assert_eq!(site.content_dir, dir.path().join("content"));
        assert_eq!(site.public_dir, dir.path().join("out"));
    }

    #[test]
    fn test_listed_posts_are_sorted() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("a.mdx"),
            "---\ntitle: 'A'\npublishedAt: '2023-01-01'\n---\n",
        )
        .unwrap();
        fs::write(
            posts.join("b.mdx"),
            "---\ntitle: 'B'\npublishedAt: '2024-01-01'\n---\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        let slugs: Vec<_> = site
            .listed_posts()
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["b", "a"]);
    }
}
