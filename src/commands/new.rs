//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Scaffold a post file named after the title, dated today
pub fn create_post(site: &Site, title: &str) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    fs::create_dir_all(&site.content_dir)?;
    let file_path = site.content_dir.join(format!("{}.mdx", slug));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntitle: '{}'\npublishedAt: '{}'\nsummary: ''\n---\n\n",
        title,
        now.format("%Y-%m-%d")
    );
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_post_round_trips_through_loader() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = site.new_post("Graphs & Autograd").unwrap();
        assert_eq!(path.file_name().unwrap(), "graphs-autograd.mdx");

        let posts = site.load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "graphs-autograd");
        assert_eq!(posts[0].metadata.title, "Graphs & Autograd");
        assert!(posts[0].metadata.summary.is_none());
        assert!(posts[0].metadata.published().is_some());
    }

    #[test]
    fn test_create_post_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        site.new_post("Hello").unwrap();
        assert!(site.new_post("Hello").is_err());
    }
}
