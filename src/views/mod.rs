//! Page views: listing, single post, search and not-found pages

mod listing;

use anyhow::Result;
use tera::Context;

pub use listing::sort_by_published;

use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, Post, PostSummary};
use crate::helpers::html_escape;
use crate::search::SearchState;
use crate::templates::{PostCard, PostData, SiteData, TemplateRenderer};
use crate::Site;

/// Renders every page of the site
pub struct Views {
    config: SiteConfig,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Views {
    /// Create views for a site
    pub fn new(site: &Site) -> Result<Self> {
        let highlight = &site.config.highlight;
        Ok(Self {
            config: site.config.clone(),
            templates: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::with_options(&highlight.theme, highlight.line_number),
        })
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::from(&self.config));
        context
    }

    fn cards<'a>(&self, entries: impl IntoIterator<Item = &'a PostSummary>) -> Vec<PostCard> {
        entries
            .into_iter()
            .map(|entry| PostCard::new(entry, &self.config.summary_fallback))
            .collect()
    }

    /// The `/blog` listing. Expects posts already in listing order.
    pub fn listing(&self, posts: &[Post]) -> Result<String> {
        let summaries: Vec<PostSummary> = posts.iter().map(Post::summary).collect();

        let mut context = self.base_context();
        context.insert("posts", &self.cards(&summaries));
        self.templates.render("blog.html", &context)
    }

    /// A single post page
    pub fn post(&self, post: &Post) -> Result<String> {
        let content = self.markdown.render(&post.raw_body)?;
        let data = PostData::new(post, content, &self.config.summary_fallback);

        let mut context = self.base_context();
        context.insert("post", &data);
        self.templates.render("post.html", &context)
    }

    /// The `/search` page with the current query and its matches
    pub fn search(&self, state: &SearchState) -> Result<String> {
        let mut context = self.base_context();
        context.insert("query", &html_escape(state.query()));
        context.insert("results", &self.cards(state.results()));
        self.templates.render("search.html", &context)
    }

    pub fn not_found(&self) -> Result<String> {
        self.templates.render("not_found.html", &self.base_context())
    }
}
