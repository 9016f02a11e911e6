//! Post models

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::frontmatter::parse_date_string;
use crate::helpers::post_url;

/// Post metadata read from front-matter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,

    /// Publication date, verbatim from the front-matter
    pub published_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Cover image path or URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Any other front-matter keys, serialized beside the known ones
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

impl Metadata {
    /// Parsed publication timestamp
    pub fn published(&self) -> Option<NaiveDateTime> {
        parse_date_string(&self.published_at)
    }

    /// Summary text, or `fallback` when the post has none
    pub fn summary_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.summary.as_deref().unwrap_or(fallback)
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Unique routing key, taken from the file name
    pub slug: String,

    pub metadata: Metadata,

    /// Markup body after the front-matter
    pub raw_body: String,
}

impl Post {
    pub fn new(slug: impl Into<String>, metadata: Metadata, raw_body: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            metadata,
            raw_body: raw_body.into(),
        }
    }

    /// Site path of the post page
    pub fn path(&self) -> String {
        post_url(&self.slug)
    }

    /// The post without its body, as served to the search view
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            metadata: self.metadata.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Wire shape of one entry in the JSON post collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub metadata: Metadata,
    pub slug: String,
}

impl PostSummary {
    pub fn path(&self) -> String {
        post_url(&self.slug)
    }
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        post.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(title: &str, published_at: &str) -> Metadata {
        Metadata {
            title: title.to_string(),
            published_at: published_at.to_string(),
            summary: None,
            image: None,
            extra: IndexMap::new(),
        }
    }

    #[test]
    fn test_summary_wire_format() {
        let mut meta = metadata("Hello", "2024-04-08");
        meta.summary = Some("First post".to_string());
        let post = Post::new("hello", meta, "# Hello");

        let json = serde_json::to_value(post.summary()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "metadata": {
                    "title": "Hello",
                    "publishedAt": "2024-04-08",
                    "summary": "First post"
                },
                "slug": "hello"
            })
        );
    }

    #[test]
    fn test_extra_keys_sit_beside_known_fields() {
        let mut meta = metadata("Hello", "2024-04-08");
        meta.extra.insert("tags".to_string(), "rust".to_string());
        let post = Post::new("hello", meta, "");

        let json = serde_json::to_value(post.summary()).unwrap();
        assert_eq!(
            json["metadata"],
            serde_json::json!({
                "title": "Hello",
                "publishedAt": "2024-04-08",
                "tags": "rust"
            })
        );

        let entry: PostSummary = serde_json::from_value(json).unwrap();
        assert_eq!(entry.metadata.extra["tags"], "rust");
        assert!(entry.metadata.summary.is_none());
    }

    #[test]
    fn test_summary_fallback() {
        let meta = metadata("Hello", "2024-04-08");
        assert_eq!(meta.summary_or("No summary available."), "No summary available.");
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{"metadata":{"title":"T","publishedAt":"2023-01-01"},"slug":"t"}"#;
        let entry: PostSummary = serde_json::from_str(json).unwrap();
        assert_eq!(entry.slug, "t");
        assert_eq!(entry.path(), "/blog/t");
        assert!(entry.metadata.summary.is_none());
    }
}
