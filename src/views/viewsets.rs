//! Viewsets: one controller per resource exposing named actions instead of verbs.

use super::api_view::options_response;
use super::generic::{GenericApiView, Resource, WritableResource};
use super::mixins::{CreateMixin, DestroyMixin, ListMixin, RetrieveMixin, UpdateMixin};
use super::request::ApiRequest;
use super::View;
use crate::error::AppError;
use crate::extractors::Format;
use crate::permissions::{check_permissions, Permission};
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    http::Method,
    response::Response,
    routing::{any, MethodRouter},
};
use std::marker::PhantomData;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    List,
    Create,
    Retrieve,
    Update,
    PartialUpdate,
    Destroy,
    /// A custom action, addressed by name.
    Extra(&'static str),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Create => "create",
            Action::Retrieve => "retrieve",
            Action::Update => "update",
            Action::PartialUpdate => "partial_update",
            Action::Destroy => "destroy",
            Action::Extra(name) => *name,
        }
    }
}

pub const MODEL_ACTIONS: &[Action] = &[
    Action::List,
    Action::Create,
    Action::Retrieve,
    Action::Update,
    Action::PartialUpdate,
    Action::Destroy,
];

pub const READ_ONLY_ACTIONS: &[Action] = &[Action::List, Action::Retrieve];

/// A custom action beyond the standard six.
#[derive(Clone, Copy, Debug)]
pub struct ExtraAction {
    pub name: &'static str,
    /// Detail actions live under `/<prefix>/<pk>/<name>/`, others under `/<prefix>/<name>/`.
    pub detail: bool,
    pub methods: &'static [Method],
    pub renderers: &'static [Format],
}

#[async_trait]
pub trait ViewSet: View {
    /// Standard actions this viewset implements.
    fn actions(&self) -> &'static [Action];

    fn extra_actions(&self) -> &'static [ExtraAction] {
        &[]
    }

    async fn perform(&self, action: Action, req: ApiRequest) -> Result<Response, AppError>;
}

/// Bind HTTP methods on one path to viewset actions, e.g. `GET => list, POST => create`.
pub fn bind<V: ViewSet + ?Sized>(
    viewset: Arc<V>,
    bindings: &[(Method, Action)],
    renderers: &'static [Format],
) -> MethodRouter<AppState> {
    let bindings: Arc<[(Method, Action)]> = bindings.into();
    any(move |req: ApiRequest| {
        let viewset = Arc::clone(&viewset);
        let bindings = Arc::clone(&bindings);
        async move { dispatch_action(viewset.as_ref(), &bindings, renderers, req).await }
    })
}

async fn dispatch_action<V: ViewSet + ?Sized>(
    viewset: &V,
    bindings: &[(Method, Action)],
    renderers: &[Format],
    req: ApiRequest,
) -> Result<Response, AppError> {
    req.negotiate(renderers)?;
    check_permissions(viewset.permissions(), &req.method, &req.identity)?;
    if req.method == Method::OPTIONS {
        let methods: Vec<Method> = bindings.iter().map(|(m, _)| m.clone()).collect();
        return Ok(options_response(viewset.name(), &methods, renderers));
    }
    let method = if req.method == Method::HEAD { Method::GET } else { req.method.clone() };
    let Some(action) = bindings.iter().find(|(m, _)| *m == method).map(|(_, a)| *a) else {
        return Err(req.not_allowed());
    };
    tracing::debug!(viewset = viewset.name(), action = action.name(), "dispatching action");
    viewset.perform(action, req).await
}

/// Run a standard action through the full set of mixins.
pub async fn model_action<R, V>(view: &V, action: Action, req: &ApiRequest) -> Result<Response, AppError>
where
    R: WritableResource,
    V: ListMixin<R> + CreateMixin<R> + RetrieveMixin<R> + UpdateMixin<R> + DestroyMixin<R>,
{
    match action {
        Action::List => view.list(req).await,
        Action::Create => view.create(req).await,
        Action::Retrieve => view.retrieve(req).await,
        Action::Update => view.update(req, false).await,
        Action::PartialUpdate => view.partial_update(req).await,
        Action::Destroy => view.destroy(req).await,
        Action::Extra(_) => Err(AppError::NotFound),
    }
}

/// Run `list` or `retrieve`; every other action is refused.
pub async fn read_only_action<R, V>(view: &V, action: Action, req: &ApiRequest) -> Result<Response, AppError>
where
    R: Resource,
    V: ListMixin<R> + RetrieveMixin<R>,
{
    match action {
        Action::List => view.list(req).await,
        Action::Retrieve => view.retrieve(req).await,
        _ => Err(req.not_allowed()),
    }
}

/// `list` and `retrieve` over any resource.
pub struct ReadOnlyModelViewSet<R> {
    name: &'static str,
    permissions: &'static [&'static dyn Permission],
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ReadOnlyModelViewSet<R> {
    pub fn new(name: &'static str) -> Self {
        ReadOnlyModelViewSet {
            name,
            permissions: &[],
            _resource: PhantomData,
        }
    }

    pub fn with_permissions(mut self, permissions: &'static [&'static dyn Permission]) -> Self {
        self.permissions = permissions;
        self
    }
}

impl<R: Resource> View for ReadOnlyModelViewSet<R> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn permissions(&self) -> &'static [&'static dyn Permission] {
        self.permissions
    }
}

impl<R: Resource> GenericApiView<R> for ReadOnlyModelViewSet<R> {}
impl<R: Resource> ListMixin<R> for ReadOnlyModelViewSet<R> {}
impl<R: Resource> RetrieveMixin<R> for ReadOnlyModelViewSet<R> {}

#[async_trait]
impl<R: Resource> ViewSet for ReadOnlyModelViewSet<R> {
    fn actions(&self) -> &'static [Action] {
        READ_ONLY_ACTIONS
    }

    async fn perform(&self, action: Action, req: ApiRequest) -> Result<Response, AppError> {
        read_only_action::<R, _>(self, action, &req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names() {
        let names: Vec<&str> = MODEL_ACTIONS.iter().map(Action::name).collect();
        assert_eq!(
            names,
            ["list", "create", "retrieve", "update", "partial_update", "destroy"]
        );
        assert_eq!(Action::Extra("highlight").name(), "highlight");
    }
}
