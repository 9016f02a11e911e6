//! Title search: a one-shot fetch of the post collection followed by a pure,
//! synchronous whole-word filter that is re-run on every query change.

mod client;

use std::collections::HashSet;

pub use client::{fetch_posts, FetchError};

use crate::content::PostSummary;

/// Lowercase, whitespace-delimited query words
pub fn query_words(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Lowercase title words, split at every non-alphanumeric character
pub fn title_words(title: &str) -> HashSet<String> {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether every query word is a whole word of the title.
///
/// An empty word list matches nothing.
pub fn matches(title: &str, words: &[String]) -> bool {
    if words.is_empty() {
        return false;
    }
    let title_words = title_words(title);
    words.iter().all(|w| title_words.contains(w))
}

/// Posts whose title contains every word of `query`, in input order
pub fn filter_posts(posts: &[PostSummary], query: &str) -> Vec<PostSummary> {
    let words = query_words(query);
    if words.is_empty() {
        return Vec::new();
    }
    posts
        .iter()
        .filter(|p| matches(&p.metadata.title, &words))
        .cloned()
        .collect()
}

/// State owned by one search view
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    all_posts: Vec<PostSummary>,
    filtered_posts: Vec<PostSummary>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the outcome of the initial fetch. A failed fetch leaves the
    /// collection empty.
    pub fn load(&mut self, result: Result<Vec<PostSummary>, FetchError>) {
        match result {
            Ok(posts) => {
                tracing::debug!("Search loaded {} posts", posts.len());
                self.set_posts(posts);
            }
            Err(e) => {
                tracing::warn!("Failed to fetch posts for search: {}", e);
                self.set_posts(Vec::new());
            }
        }
    }

    pub fn set_posts(&mut self, posts: Vec<PostSummary>) {
        self.all_posts = posts;
        self.recompute();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.recompute();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn all_posts(&self) -> &[PostSummary] {
        &self.all_posts
    }

    pub fn results(&self) -> &[PostSummary] {
        &self.filtered_posts
    }

    fn recompute(&mut self) {
        self.filtered_posts = filter_posts(&self.all_posts, &self.query);
    }
}
