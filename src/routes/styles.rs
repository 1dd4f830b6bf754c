//! Route tables: the canonical paths (served by one chosen style) and the per-style paths.

use crate::config::ApiStyle;
use crate::extractors::Format;
use crate::handlers::generic_views::{self, SnippetHighlight, HTML_ONLY};
use crate::handlers::{api_root, api_views, functions, mixin_views, user_viewset, SnippetViewSet};
use crate::state::AppState;
use crate::views::viewsets::bind;
use crate::views::{as_view, Action, DefaultRouter};
use axum::{
    http::Method,
    routing::{any, MethodRouter},
    Router,
};
use std::sync::Arc;

const JSON_ONLY: &[Format] = &[Format::Json];

/// `users` and `snippets` viewsets registered on a [`DefaultRouter`].
pub fn default_router() -> DefaultRouter {
    DefaultRouter::new()
        .register("users", Arc::new(user_viewset()))
        .register("snippets", Arc::new(SnippetViewSet))
}

/// Collection and detail endpoints for snippets in the given style.
fn snippet_endpoints(style: ApiStyle) -> (MethodRouter<AppState>, MethodRouter<AppState>) {
    match style {
        ApiStyle::Function => (any(functions::snippet_list), any(functions::snippet_detail)),
        ApiStyle::ApiView => (as_view(api_views::SnippetList), as_view(api_views::SnippetDetail)),
        ApiStyle::Mixin => (as_view(mixin_views::SnippetList), as_view(mixin_views::SnippetDetail)),
        ApiStyle::Generic | ApiStyle::ViewSet | ApiStyle::Router => (
            as_view(generic_views::snippet_list()),
            as_view(generic_views::snippet_detail()),
        ),
    }
}

/// Viewsets bound to paths by hand, one method-to-action map per path.
fn viewset_routes() -> Router<AppState> {
    let snippets = Arc::new(SnippetViewSet);
    let users = Arc::new(user_viewset());
    Router::new()
        .route("/", any(api_root))
        .route("/users/", bind(Arc::clone(&users), &[(Method::GET, Action::List)], JSON_ONLY))
        .route("/users/:pk/", bind(users, &[(Method::GET, Action::Retrieve)], JSON_ONLY))
        .route(
            "/snippets/",
            bind(
                Arc::clone(&snippets),
                &[(Method::GET, Action::List), (Method::POST, Action::Create)],
                JSON_ONLY,
            ),
        )
        .route(
            "/snippets/:pk/",
            bind(
                Arc::clone(&snippets),
                &[
                    (Method::GET, Action::Retrieve),
                    (Method::PUT, Action::Update),
                    (Method::PATCH, Action::PartialUpdate),
                    (Method::DELETE, Action::Destroy),
                ],
                JSON_ONLY,
            ),
        )
        .route(
            "/snippets/:pk/highlight/",
            bind(snippets, &[(Method::GET, Action::Extra("highlight"))], HTML_ONLY),
        )
}

/// `/`, `/users/...` and `/snippets/...` served by `style`.
pub fn canonical_routes(style: ApiStyle) -> Router<AppState> {
    match style {
        ApiStyle::Router => default_router().into_router(),
        ApiStyle::ViewSet => viewset_routes(),
        other => {
            let (list, detail) = snippet_endpoints(other);
            Router::new()
                .route("/", any(api_root))
                .route("/users/", as_view(generic_views::user_list()))
                .route("/users/:pk/", as_view(generic_views::user_detail()))
                .route("/snippets/", list)
                .route("/snippets/:pk/", detail)
                .route("/snippets/:pk/highlight/", as_view(SnippetHighlight))
        }
    }
}

/// Every snippet style under its own prefix, mounted regardless of the canonical style.
pub fn style_routes() -> Router<AppState> {
    let (fbv_list, fbv_detail) = snippet_endpoints(ApiStyle::Function);
    let (api_list, api_detail) = snippet_endpoints(ApiStyle::ApiView);
    let (mixin_list, mixin_detail) = snippet_endpoints(ApiStyle::Mixin);
    let (generic_list, generic_detail) = snippet_endpoints(ApiStyle::Generic);
    Router::new()
        .route("/snippets_fbv/", fbv_list)
        .route("/snippets_fbv/:pk/", fbv_detail)
        .route("/snippets_apiview/", api_list)
        .route("/snippets_apiview/:pk/", api_detail)
        .route("/snippets_generic_mixin_apiview/", mixin_list)
        .route("/snippets_generic_mixin_apiview/:pk/", mixin_detail)
        .route("/snippets_list_create_apiview/", generic_list)
        .route("/snippets_retrieve_update_destroy_apiview/:pk/", generic_detail)
}
