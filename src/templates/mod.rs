//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary, so a site needs nothing but its
//! content directory.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Post, PostSummary};
use crate::helpers::{format_date, html_escape};

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Context values are escaped when the view data is built
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("search.html", include_str!("site/search.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            (
                "partials/post_card.html",
                include_str!("site/partials/post_card.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: format a publication date, optionally with `relative=true`
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let relative = match args.get("relative") {
        Some(val) => tera::try_get_value!("date_format", "relative", bool, val),
        None => false,
    };
    Ok(tera::Value::String(html_escape(&format_date(&s, relative))))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub search_endpoint: String,
    pub summary_fallback: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: html_escape(&config.title),
            description: html_escape(&config.description),
            author: html_escape(&config.author),
            search_endpoint: html_escape(&config.search.endpoint),
            summary_fallback: html_escape(&config.summary_fallback),
        }
    }
}

/// One summary card in a listing or search result
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub path: String,
    pub title: String,
    pub published_at: String,
    pub summary: String,
}

impl PostCard {
    pub fn new(entry: &PostSummary, summary_fallback: &str) -> Self {
        Self {
            path: html_escape(&entry.path()),
            title: html_escape(&entry.metadata.title),
            published_at: entry.metadata.published_at.clone(),
            summary: html_escape(entry.metadata.summary_or(summary_fallback)),
        }
    }
}

/// A full post page. `content` is rendered HTML.
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub published_at: String,
    pub summary: String,
    pub image: Option<String>,
    pub content: String,
}

impl PostData {
    pub fn new(post: &Post, content: String, summary_fallback: &str) -> Self {
        Self {
            title: html_escape(&post.metadata.title),
            published_at: post.metadata.published_at.clone(),
            summary: html_escape(post.metadata.summary_or(summary_fallback)),
            image: post.metadata.image.as_deref().map(html_escape),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_date_format_filter() {
        let mut args = HashMap::new();
        let value = tera::Value::String("2024-04-08".to_string());
        let out = date_format_filter(&value, &args).unwrap();
        assert_eq!(out, tera::Value::String("April 8, 2024".to_string()));

        args.insert("relative".to_string(), tera::Value::Bool(true));
        let out = date_format_filter(&value, &args).unwrap();
        assert!(out.as_str().unwrap().starts_with("April 8, 2024 ("));
    }
}
