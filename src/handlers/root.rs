//! Discovery document for the hand-written route tables.

use crate::error::AppError;
use crate::views::router::api_root as render_root;
use crate::views::ApiRequest;
use axum::response::Response;

pub const PREFIXES: [&str; 2] = ["users", "snippets"];

pub async fn api_root(req: ApiRequest) -> Result<Response, AppError> {
    render_root(&req, &PREFIXES)
}
