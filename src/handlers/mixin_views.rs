//! Snippet endpoints composed from the generic base and the CRUD mixins.

use crate::error::AppError;
use crate::permissions::{Permission, SNIPPET_PERMISSIONS};
use crate::resources::SnippetResource;
use crate::views::api_view::{LIST_CREATE, RETRIEVE_UPDATE_DESTROY};
use crate::views::{
    ApiRequest, ApiView, CreateMixin, DestroyMixin, GenericApiView, ListMixin, RetrieveMixin, UpdateMixin, View,
};
use async_trait::async_trait;
use axum::{http::Method, response::Response};

pub struct SnippetList;

impl View for SnippetList {
    fn name(&self) -> &'static str {
        "Snippet List"
    }

    fn permissions(&self) -> &'static [&'static dyn Permission] {
        SNIPPET_PERMISSIONS
    }
}

impl GenericApiView<SnippetResource> for SnippetList {}
impl ListMixin<SnippetResource> for SnippetList {}
impl CreateMixin<SnippetResource> for SnippetList {}

#[async_trait]
impl ApiView for SnippetList {
    fn allowed_methods(&self) -> &'static [Method] {
        &LIST_CREATE
    }

    async fn get(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.list(&req).await
    }

    async fn post(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.create(&req).await
    }
}

pub struct SnippetDetail;

impl View for SnippetDetail {
    fn name(&self) -> &'static str {
        "Snippet Detail"
    }

    fn permissions(&self) -> &'static [&'static dyn Permission] {
        SNIPPET_PERMISSIONS
    }
}

impl GenericApiView<SnippetResource> for SnippetDetail {}
impl RetrieveMixin<SnippetResource> for SnippetDetail {}
impl UpdateMixin<SnippetResource> for SnippetDetail {}
impl DestroyMixin<SnippetResource> for SnippetDetail {}

#[async_trait]
impl ApiView for SnippetDetail {
    fn allowed_methods(&self) -> &'static [Method] {
        &RETRIEVE_UPDATE_DESTROY
    }

    async fn get(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.retrieve(&req).await
    }

    async fn put(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.update(&req, false).await
    }

    async fn patch(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.partial_update(&req).await
    }

    async fn delete(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.destroy(&req).await
    }
}
