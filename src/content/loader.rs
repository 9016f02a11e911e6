//! Content loader - loads posts from the content directory

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, Post};
use crate::Site;

/// Loads posts from the content store
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Load every post in the content directory, in file name order.
    ///
    /// A missing directory yields an empty collection. Files whose
    /// front-matter cannot be read are skipped with a warning.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let content_dir = &self.site.content_dir;
        if !content_dir.exists() {
            tracing::debug!("Content directory {:?} does not exist", content_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(content_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_post_file(path) {
                match load_post(path) {
                    Ok(post) => {
                        tracing::debug!("Loaded post {}", post.slug);
                        posts.push(post);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(posts)
    }

    /// Find a single post by slug
    pub fn find_post(&self, slug: &str) -> Result<Option<Post>> {
        Ok(self.load_posts()?.into_iter().find(|p| p.slug == slug))
    }
}

/// Load a single post from a file
fn load_post(path: &Path) -> Result<Post> {
    let content = fs::read_to_string(path)?;
    let (fm, body) = FrontMatter::parse(&content)?;
    let metadata = fm.into_metadata()?;

    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string();

    Ok(Post::new(slug, metadata, body))
}

/// Check if a file is an MDX or markdown post
fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "mdx" || e == "md")
        .unwrap_or(false)
}
