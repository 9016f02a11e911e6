//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Extra attributes for an `<a>` tag: off-site links open in a new tab
/// without leaking the referrer or `window.opener`
pub fn link_attrs(href: &str) -> &'static str {
    if super::is_internal_link(href) {
        ""
    } else {
        r#" target="_blank" rel="noopener noreferrer""#
    }
}
