//! Application assembly: route tables, middleware and format-suffix handling.

pub mod common;
pub mod styles;

pub use common::common_routes;
pub use styles::{canonical_routes, default_router, style_routes};

use crate::config::{ApiStyle, Settings};
use crate::extractors::strip_format_suffix;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Request},
    http::Method,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower::util::MapRequest;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// The routed application behind the format-suffix rewrite (`/snippets/3.json` -> `/snippets/3/`).
pub type App = MapRequest<Router, fn(Request) -> Request>;

/// Strip `.json`/`.html` from the path before routing; handlers read the format from extensions.
pub fn with_format_suffixes(router: Router) -> App {
    MapRequest::new(router, strip_format_suffix as fn(Request) -> Request)
}

/// HEAD answers carry the GET headers and no body, whichever handler style produced them.
async fn strip_head_body(req: Request, next: Next) -> Response {
    let head = req.method() == Method::HEAD;
    let mut response = next.run(req).await;
    if head {
        *response.body_mut() = Body::empty();
    }
    response
}

/// `max_body_bytes` is the only body limit; axum's built-in default is switched off.
pub fn build_router(state: AppState, style: ApiStyle, max_body_bytes: usize) -> Router {
    Router::new()
        .merge(canonical_routes(style))
        .merge(style_routes())
        .merge(common_routes())
        .layer(middleware::from_fn(strip_head_body))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The full application for `settings`, ready to serve.
pub fn build_app(state: AppState, settings: &Settings) -> App {
    tracing::info!(style = %settings.api_style, "canonical routes served by style");
    with_format_suffixes(build_router(state, settings.api_style, settings.max_body_bytes))
}
