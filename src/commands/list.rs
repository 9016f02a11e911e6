//! List posts

use anyhow::Result;

use crate::helpers::full_url_for;
use crate::Site;

/// Print posts in listing order
pub fn run(site: &Site) -> Result<()> {
    let posts = site.listed_posts()?;

    println!("Posts ({}):", posts.len());
    for post in posts {
        println!(
            "  {} - {} ({})",
            post.metadata.published_at,
            post.metadata.title,
            full_url_for(&site.config, &post.path())
        );
    }

    Ok(())
}
