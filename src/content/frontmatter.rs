//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use super::post::Metadata;

lazy_static! {
    static ref QUOTED: Regex = Regex::new(r#"^['"](.*)['"]$"#).unwrap();
}

/// Errors that can occur when reading a front-matter block.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("Unclosed front-matter block - missing closing ---")]
    Unclosed,

    #[error("Front-matter is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Raw `key: value` pairs from a front-matter block, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub fields: IndexMap<String, String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start();

        let Some(rest) = content.strip_prefix("---") else {
            return Ok((FrontMatter::default(), content.trim()));
        };

        let Some(end_pos) = rest.find("\n---") else {
            return Err(FrontMatterError::Unclosed);
        };

        let block = &rest[..end_pos];
        let body = rest[end_pos + 4..].trim_start_matches('-').trim();

        let mut fields = IndexMap::new();
        for line in block.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // The key ends at the first ": ", so values may contain colons
            let (key, value) = match line.split_once(": ") {
                Some((key, value)) => (key, value),
                None => match line.strip_suffix(':') {
                    Some(key) => (key, ""),
                    None => continue,
                },
            };

            fields.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        }

        Ok((FrontMatter { fields }, body))
    }

    /// Convert into post metadata, requiring `title` and `publishedAt`
    pub fn into_metadata(mut self) -> Result<Metadata, FrontMatterError> {
        let title = self
            .fields
            .shift_remove("title")
            .ok_or(FrontMatterError::MissingField("title"))?;
        let published_at = self
            .fields
            .shift_remove("publishedAt")
            .ok_or(FrontMatterError::MissingField("publishedAt"))?;
        let summary = self.fields.shift_remove("summary").filter(|s| !s.is_empty());
        let image = self.fields.shift_remove("image").filter(|s| !s.is_empty());

        Ok(Metadata {
            title,
            published_at,
            summary,
            image,
            extra: self.fields,
        })
    }
}

/// Strip one pair of surrounding quotes
fn unquote(value: &str) -> &str {
    QUOTED
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(value)
}

/// Parse a publication date. Date-only values resolve to midnight.
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_frontmatter() {
        let content = r#"---
title: 'Spaces vs. Tabs: The Indentation Debate'
publishedAt: '2024-04-08'
summary: "Exploring the debate."
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(body, "This is the content.");

        let metadata = fm.into_metadata().unwrap();
        assert_eq!(metadata.title, "Spaces vs. Tabs: The Indentation Debate");
        assert_eq!(metadata.published_at, "2024-04-08");
        assert_eq!(metadata.summary.as_deref(), Some("Exploring the debate."));
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = FrontMatter::parse("# Just Markdown\n").unwrap();
        assert!(fm.fields.is_empty());
        assert_eq!(body, "# Just Markdown");
    }

    #[test]
    fn test_unclosed_frontmatter() {
        let result = FrontMatter::parse("---\ntitle: 'Test'\n# No closing");
        assert!(matches!(result, Err(FrontMatterError::Unclosed)));
    }

    #[test]
    fn test_missing_summary_is_none() {
        let (fm, _) =
            FrontMatter::parse("---\ntitle: 'A'\npublishedAt: '2024-01-01'\n---\nbody").unwrap();
        let metadata = fm.into_metadata().unwrap();
        assert_eq!(metadata.title, "A");
        assert_eq!(metadata.summary, None);
    }

    #[test]
    fn test_missing_title_is_an_error() {
        let (fm, _) = FrontMatter::parse("---\npublishedAt: '2024-01-01'\n---\n").unwrap();
        assert!(matches!(
            fm.into_metadata(),
            Err(FrontMatterError::MissingField("title"))
        ));
    }

    #[test]
    fn test_extra_fields_keep_order() {
        let content = "---\ntitle: 'A'\nzeta: '1'\npublishedAt: '2024-01-01'\nalpha: 2\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        let metadata = fm.into_metadata().unwrap();
        let keys: Vec<_> = metadata.extra.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(metadata.extra["alpha"], "2");
    }

    #[test]
    fn test_parse_date() {
        let dt = parse_date_string("2024-01-15").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 00:00");

        let dt = parse_date_string("2024-01-15T10:30:00").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "10:30");

        let dt = parse_date_string("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "08:30");

        assert!(parse_date_string("someday").is_none());
    }
}
