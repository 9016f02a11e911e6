//! Listing order

use crate::content::Post;

/// Order posts newest first by `publishedAt`.
///
/// The sort is stable: posts with equal timestamps keep load order.
/// Posts whose date does not parse go last.
pub fn sort_by_published(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.metadata.published().cmp(&a.metadata.published()));
}
