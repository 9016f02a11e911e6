//! Content module - posts, front-matter and markup rendering

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::{parse_date_string, FrontMatter, FrontMatterError};
pub use markdown::{slugify, MarkdownRenderer};
pub use post::{Metadata, Post, PostSummary};
