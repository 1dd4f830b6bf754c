//! Endpoints configured from the pre-assembled generic views, plus the HTML highlight page.

use crate::error::AppError;
use crate::extractors::Format;
use crate::permissions::SNIPPET_PERMISSIONS;
use crate::resources::{SnippetResource, UserResource};
use crate::views::api_view::READ_ONLY;
use crate::views::{
    ApiRequest, ApiView, GenericApiView, ListApiView, ListCreateApiView, RetrieveApiView, RetrieveUpdateDestroyApiView,
    View,
};
use async_trait::async_trait;
use axum::{
    http::Method,
    response::{Html, IntoResponse, Response},
};

pub fn snippet_list() -> ListCreateApiView<SnippetResource> {
    ListCreateApiView::new("Snippet List").with_permissions(SNIPPET_PERMISSIONS)
}

pub fn snippet_detail() -> RetrieveUpdateDestroyApiView<SnippetResource> {
    RetrieveUpdateDestroyApiView::new("Snippet Detail").with_permissions(SNIPPET_PERMISSIONS)
}

pub fn user_list() -> ListApiView<UserResource> {
    ListApiView::new("User List")
}

pub fn user_detail() -> RetrieveApiView<UserResource> {
    RetrieveApiView::new("User Detail")
}

/// The stored highlighted page of one snippet, served as `text/html`.
pub struct SnippetHighlight;

pub(crate) const HTML_ONLY: &[Format] = &[Format::Html];

impl View for SnippetHighlight {
    fn name(&self) -> &'static str {
        "Snippet Highlight"
    }

    fn renderers(&self) -> &'static [Format] {
        HTML_ONLY
    }
}

impl GenericApiView<SnippetResource> for SnippetHighlight {}

#[async_trait]
impl ApiView for SnippetHighlight {
    fn allowed_methods(&self) -> &'static [Method] {
        &READ_ONLY
    }

    async fn get(&self, req: ApiRequest) -> Result<Response, AppError> {
        let snippet = self.get_object(&req).await?;
        Ok(Html(snippet.highlighted).into_response())
    }
}
