//! HTTP server for the blog
//!
//! Every request reloads posts from disk, so edits show up on refresh.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::loader::ContentLoader;
use crate::content::PostSummary;
use crate::search::SearchState;
use crate::views::Views;
use crate::Site;

/// Server state. Views (templates and syntax sets) are built once.
struct ServerState {
    site: Site,
    views: Views,
}

/// Query string of the search page
#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Internal error rendered as a 500 response
struct ServerError(anyhow::Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for ServerError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

type HandlerResult = std::result::Result<Response, ServerError>;

/// Build the application router
pub fn router(site: Site) -> Result<Router> {
    let views = Views::new(&site)?;
    let endpoint = format!("/{}", site.config.search.endpoint.trim_start_matches('/'));
    let state = Arc::new(ServerState { site, views });

    Ok(Router::new()
        .route("/", get(|| async { Redirect::temporary("/blog") }))
        .route("/blog", get(listing_handler))
        .route("/blog/:slug", get(post_handler))
        .route("/search", get(search_handler))
        .route(&endpoint, get(posts_json_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(site.clone())?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}/blog", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn listing_handler(State(state): State<Arc<ServerState>>) -> HandlerResult {
    let posts = state.site.listed_posts()?;
    Ok(Html(state.views.listing(&posts)?).into_response())
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> HandlerResult {
    let views = &state.views;
    match ContentLoader::new(&state.site).find_post(&slug)? {
        Some(post) => Ok(Html(views.post(&post)?).into_response()),
        None => {
            tracing::debug!("No post with slug {:?}", slug);
            Ok((StatusCode::NOT_FOUND, Html(views.not_found()?)).into_response())
        }
    }
}

async fn search_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> HandlerResult {
    let posts = state.site.listed_posts()?;

    let mut search = SearchState::new();
    search.set_posts(posts.iter().map(PostSummary::from).collect());
    search.set_query(params.q);

    Ok(Html(state.views.search(&search)?).into_response())
}

async fn posts_json_handler(State(state): State<Arc<ServerState>>) -> HandlerResult {
    let posts: Vec<PostSummary> = state
        .site
        .listed_posts()?
        .iter()
        .map(PostSummary::from)
        .collect();
    Ok(Json(posts).into_response())
}

/// Serve files from the public directory, with the site's 404 page for misses
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> HandlerResult {
    let mut service = ServeDir::new(&state.site.public_dir);
    let response = service.try_call(request).await?;

    if response.status() == StatusCode::NOT_FOUND {
        let page = state.views.not_found()?;
        return Ok((StatusCode::NOT_FOUND, Html(page)).into_response());
    }

    Ok(response.into_response())
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
