//! Snippet endpoints as plain async functions, branching on the HTTP method.

use crate::error::AppError;
use crate::extractors::Format;
use crate::model::Snippet;
use crate::permissions::{check_object_permissions, check_permissions, Owned, SNIPPET_PERMISSIONS};
use crate::resources::render_highlight;
use crate::serializers::SnippetSerializer;
use crate::views::api_view::{options_response, LIST_CREATE, RETRIEVE_UPDATE_DESTROY};
use crate::views::ApiRequest;
use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

const RENDERERS: &[Format] = &[Format::Json];

/// Negotiation, view permissions and the method whitelist. `Some` carries the OPTIONS answer.
fn precheck(req: &ApiRequest, name: &str, allowed: &[Method]) -> Result<Option<Response>, AppError> {
    req.negotiate(RENDERERS)?;
    check_permissions(SNIPPET_PERMISSIONS, &req.method, &req.identity)?;
    if req.method == Method::OPTIONS {
        return Ok(Some(options_response(name, allowed, RENDERERS)));
    }
    if req.method != Method::HEAD && !allowed.contains(&req.method) {
        return Err(req.not_allowed());
    }
    Ok(None)
}

/// List all snippets, or create a new one.
pub async fn snippet_list(req: ApiRequest) -> Result<Response, AppError> {
    if let Some(options) = precheck(&req, "Snippet List", &LIST_CREATE)? {
        return Ok(options);
    }
    match req.method {
        Method::GET | Method::HEAD => {
            let snippets = req.state.store.list_snippets().await?;
            Ok(Json(SnippetSerializer::many(&snippets)).into_response())
        }
        Method::POST => {
            let owner = req.identity.require()?;
            let input = SnippetSerializer::validate(&req.payload()?, None, false)?;
            let highlighted = render_highlight(&req.state, &input)?;
            let snippet = req.state.store.insert_snippet(input.into_new(owner.id, highlighted)).await?;
            tracing::debug!(snippet_id = snippet.id, "snippet created");
            Ok((StatusCode::CREATED, Json(SnippetSerializer::to_representation(&snippet))).into_response())
        }
        _ => Err(req.not_allowed()),
    }
}

/// Retrieve, update or delete a snippet.
pub async fn snippet_detail(req: ApiRequest) -> Result<Response, AppError> {
    if let Some(options) = precheck(&req, "Snippet Detail", &RETRIEVE_UPDATE_DESTROY)? {
        return Ok(options);
    }
    let snippet: Snippet = req.state.store.get_snippet(req.pk()?).await?.ok_or(AppError::NotFound)?;
    check_object_permissions(SNIPPET_PERMISSIONS, &req.method, &req.identity, Some(snippet.owner_id()))?;

    match req.method {
        Method::GET | Method::HEAD => Ok(Json(SnippetSerializer::to_representation(&snippet)).into_response()),
        Method::PUT | Method::PATCH => {
            let partial = req.method == Method::PATCH;
            let input = SnippetSerializer::validate(&req.payload()?, Some(&snippet), partial)?;
            let highlighted = render_highlight(&req.state, &input)?;
            let updated = req
                .state
                .store
                .update_snippet(snippet.id, input.into_changes(highlighted))
                .await?
                .ok_or(AppError::NotFound)?;
            Ok(Json(SnippetSerializer::to_representation(&updated)).into_response())
        }
        Method::DELETE => {
            if !req.state.store.delete_snippet(snippet.id).await? {
                return Err(AppError::NotFound);
            }
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        _ => Err(req.not_allowed()),
    }
}
