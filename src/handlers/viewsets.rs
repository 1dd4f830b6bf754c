//! Snippets and users as viewsets: one controller per resource, actions instead of verbs.

use super::generic_views::HTML_ONLY;
use crate::error::AppError;
use crate::permissions::{Permission, SNIPPET_PERMISSIONS};
use crate::resources::{SnippetResource, UserResource};
use crate::views::api_view::READ_ONLY;
use crate::views::viewsets::{model_action, MODEL_ACTIONS};
use crate::views::{
    Action, ApiRequest, CreateMixin, DestroyMixin, ExtraAction, GenericApiView, ListMixin, ReadOnlyModelViewSet,
    RetrieveMixin, UpdateMixin, View, ViewSet,
};
use async_trait::async_trait;
use axum::response::{Html, IntoResponse, Response};

pub static SNIPPET_EXTRA_ACTIONS: [ExtraAction; 1] = [ExtraAction {
    name: "highlight",
    detail: true,
    methods: &READ_ONLY,
    renderers: HTML_ONLY,
}];

/// list, create, retrieve, update, partial_update and destroy, plus `highlight`.
pub struct SnippetViewSet;

impl View for SnippetViewSet {
    fn name(&self) -> &'static str {
        "Snippet"
    }

    fn permissions(&self) -> &'static [&'static dyn Permission] {
        SNIPPET_PERMISSIONS
    }
}

impl GenericApiView<SnippetResource> for SnippetViewSet {}
impl ListMixin<SnippetResource> for SnippetViewSet {}
impl CreateMixin<SnippetResource> for SnippetViewSet {}
impl RetrieveMixin<SnippetResource> for SnippetViewSet {}
impl UpdateMixin<SnippetResource> for SnippetViewSet {}
impl DestroyMixin<SnippetResource> for SnippetViewSet {}

impl SnippetViewSet {
    async fn highlight(&self, req: &ApiRequest) -> Result<Response, AppError> {
        let snippet = self.get_object(req).await?;
        Ok(Html(snippet.highlighted).into_response())
    }
}

#[async_trait]
impl ViewSet for SnippetViewSet {
    fn actions(&self) -> &'static [Action] {
        MODEL_ACTIONS
    }

    fn extra_actions(&self) -> &'static [ExtraAction] {
        &SNIPPET_EXTRA_ACTIONS
    }

    async fn perform(&self, action: Action, req: ApiRequest) -> Result<Response, AppError> {
        match action {
            Action::Extra("highlight") => self.highlight(&req).await,
            other => model_action::<SnippetResource, _>(self, other, &req).await,
        }
    }
}

pub type UserViewSet = ReadOnlyModelViewSet<UserResource>;

pub fn user_viewset() -> UserViewSet {
    ReadOnlyModelViewSet::new("User")
}
