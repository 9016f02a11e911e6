//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Whether a link stays on this site: a root-relative path or an in-page anchor
pub fn is_internal_link(href: &str) -> bool {
    href.starts_with('/') || href.starts_with('#')
}

/// Site path of a post page
///
/// # Examples
/// ```ignore
/// post_url("hello world") // -> "/blog/hello%20world"
/// ```
pub fn post_url(slug: &str) -> String {
    format!("/blog/{}", utf8_percent_encode(slug, SEGMENT))
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog/") // -> "https://example.com/blog/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
