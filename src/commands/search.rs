//! Search post titles on a running site

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::search::{fetch_posts, SearchState};
use crate::Site;

/// Fetch the post collection from `base_url`, then filter by `query`.
///
/// In interactive mode every line read from stdin replaces the query and
/// the matches are printed again.
pub async fn run(
    site: &Site,
    base_url: &str,
    query: Option<&str>,
    interactive: bool,
) -> Result<()> {
    let endpoint = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        site.config.search.endpoint.trim_start_matches('/')
    );
    tracing::debug!("Fetching posts from {}", endpoint);

    let mut state = SearchState::new();
    state.load(fetch_posts(&endpoint).await);
    tracing::info!("Searching {} posts", state.all_posts().len());

    if let Some(query) = query {
        state.set_query(query);
        print_results(&state);
    }

    if interactive {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            state.set_query(line);
            print_results(&state);
        }
    }

    Ok(())
}

fn print_results(state: &SearchState) {
    let results = state.results();
    if results.is_empty() {
        println!("No posts match {:?}", state.query());
        return;
    }

    for post in results {
        println!(
            "  {} - {} [{}]",
            post.metadata.published_at,
            post.metadata.title,
            post.path()
        );
    }
}
