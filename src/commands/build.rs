//! Build the site to static files

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::PostSummary;
use crate::search::SearchState;
use crate::views::Views;
use crate::Site;

/// Write every page and the JSON post collection to the public directory
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let posts = site.listed_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    let views = Views::new(site)?;
    let public = &site.public_dir;

    write_page(&public.join("blog/index.html"), &views.listing(&posts)?)?;

    for post in &posts {
        let path = public.join("blog").join(&post.slug).join("index.html");
        write_page(&path, &views.post(post)?)?;
    }

    let summaries: Vec<PostSummary> = posts.iter().map(PostSummary::from).collect();

    let mut search = SearchState::new();
    search.set_posts(summaries.clone());
    write_page(&public.join("search/index.html"), &views.search(&search)?)?;

    let endpoint = site.config.search.endpoint.trim_start_matches('/');
    write_page(&public.join(endpoint), &serde_json::to_string_pretty(&summaries)?)?;

    write_page(&public.join("404.html"), &views.not_found()?)?;

    let duration = start.elapsed();
    tracing::info!("Built {} posts in {:.2}s", posts.len(), duration.as_secs_f64());

    Ok(())
}

fn write_page(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    tracing::debug!("Generated: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_writes_pages() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("hello.mdx"),
            "---\ntitle: 'Hello'\npublishedAt: '2024-01-01'\n---\n# Hi\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        site.build().unwrap();

        let public = dir.path().join("public");
        assert!(public.join("blog/index.html").exists());
        assert!(public.join("search/index.html").exists());
        assert!(public.join("404.html").exists());

        let post = fs::read_to_string(public.join("blog/hello/index.html")).unwrap();
        assert!(post.contains(r#"<h1 id="hi">"#));

        let json = fs::read_to_string(public.join("api/posts.json")).unwrap();
        let entries: Vec<PostSummary> = serde_json::from_str(&json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].slug, "hello");
    }
}
