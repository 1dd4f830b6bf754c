//! Snippet endpoints as class-style views: one struct per endpoint, one method per verb.

use crate::error::AppError;
use crate::model::Snippet;
use crate::permissions::{check_object_permissions, Owned, Permission, SNIPPET_PERMISSIONS};
use crate::resources::render_highlight;
use crate::serializers::SnippetSerializer;
use crate::views::api_view::{LIST_CREATE, RETRIEVE_UPDATE_DESTROY};
use crate::views::{ApiRequest, ApiView, View};
use async_trait::async_trait;
use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

pub struct SnippetList;

impl View for SnippetList {
    fn name(&self) -> &'static str {
        "Snippet List"
    }

    fn permissions(&self) -> &'static [&'static dyn Permission] {
        SNIPPET_PERMISSIONS
    }
}

#[async_trait]
impl ApiView for SnippetList {
    fn allowed_methods(&self) -> &'static [Method] {
        &LIST_CREATE
    }

    async fn get(&self, req: ApiRequest) -> Result<Response, AppError> {
        let snippets = req.state.store.list_snippets().await?;
        Ok(Json(SnippetSerializer::many(&snippets)).into_response())
    }

    async fn post(&self, req: ApiRequest) -> Result<Response, AppError> {
        let owner = req.identity.require()?;
        let input = SnippetSerializer::validate(&req.payload()?, None, false)?;
        let highlighted = render_highlight(&req.state, &input)?;
        let snippet = req.state.store.insert_snippet(input.into_new(owner.id, highlighted)).await?;
        Ok((StatusCode::CREATED, Json(SnippetSerializer::to_representation(&snippet))).into_response())
    }
}

pub struct SnippetDetail;

impl SnippetDetail {
    async fn get_object(&self, req: &ApiRequest) -> Result<Snippet, AppError> {
        let snippet = req.state.store.get_snippet(req.pk()?).await?.ok_or(AppError::NotFound)?;
        check_object_permissions(self.permissions(), &req.method, &req.identity, Some(snippet.owner_id()))?;
        Ok(snippet)
    }

    async fn save(&self, req: ApiRequest, partial: bool) -> Result<Response, AppError> {
        let snippet = self.get_object(&req).await?;
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
}

impl View for SnippetDetail {
    fn name(&self) -> &'static str {
        "Snippet Detail"
    }

    fn permissions(&self) -> &'static [&'static dyn Permission] {
        SNIPPET_PERMISSIONS
    }
}

#[async_trait]
impl ApiView for SnippetDetail {
    fn allowed_methods(&self) -> &'static [Method] {
        &RETRIEVE_UPDATE_DESTROY
    }

    async fn get(&self, req: ApiRequest) -> Result<Response, AppError> {
        let snippet = self.get_object(&req).await?;
        Ok(Json(SnippetSerializer::to_representation(&snippet)).into_response())
    }

    async fn put(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.save(req, false).await
    }

    async fn patch(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.save(req, true).await
    }

    async fn delete(&self, req: ApiRequest) -> Result<Response, AppError> {
        let snippet = self.get_object(&req).await?;
        if !req.state.store.delete_snippet(snippet.id).await? {
            return Err(AppError::NotFound);
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
