//! Class-style views: one object per endpoint, one method per HTTP verb.

use super::request::ApiRequest;
use super::View;
use crate::error::AppError;
use crate::extractors::Format;
use crate::permissions::check_permissions;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    http::{header::ALLOW, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, MethodRouter},
    Json,
};
use std::sync::Arc;

pub static READ_ONLY: [Method; 1] = [Method::GET];
pub static LIST_CREATE: [Method; 2] = [Method::GET, Method::POST];
pub static RETRIEVE_UPDATE_DESTROY: [Method; 4] = [Method::GET, Method::PUT, Method::PATCH, Method::DELETE];

/// Verb handlers default to 405; implementors override the verbs they list in `allowed_methods`.
#[async_trait]
pub trait ApiView: View {
    fn allowed_methods(&self) -> &'static [Method];

    async fn get(&self, req: ApiRequest) -> Result<Response, AppError> {
        Err(req.not_allowed())
    }

    async fn post(&self, req: ApiRequest) -> Result<Response, AppError> {
        Err(req.not_allowed())
    }

    async fn put(&self, req: ApiRequest) -> Result<Response, AppError> {
        Err(req.not_allowed())
    }

    async fn patch(&self, req: ApiRequest) -> Result<Response, AppError> {
        Err(req.not_allowed())
    }

    async fn delete(&self, req: ApiRequest) -> Result<Response, AppError> {
        Err(req.not_allowed())
    }
}

/// Content negotiation, then view-level permissions, then the verb handler.
pub async fn dispatch<V: ApiView + ?Sized>(view: &V, req: ApiRequest) -> Result<Response, AppError> {
    req.negotiate(view.renderers())?;
    check_permissions(view.permissions(), &req.method, &req.identity)?;
    let allowed = view.allowed_methods();
    if req.method == Method::OPTIONS {
        return Ok(options_response(view.name(), allowed, view.renderers()));
    }
    let served = if req.method == Method::HEAD { Method::GET } else { req.method.clone() };
    if !allowed.contains(&served) {
        return Err(req.not_allowed());
    }
    match served {
        Method::GET => view.get(req).await,
        Method::POST => view.post(req).await,
        Method::PUT => view.put(req).await,
        Method::PATCH => view.patch(req).await,
        Method::DELETE => view.delete(req).await,
        _ => Err(req.not_allowed()),
    }
}

/// Mount a view on a path: every method reaches [`dispatch`].
pub fn as_view<V: ApiView>(view: V) -> MethodRouter<AppState> {
    let view = Arc::new(view);
    any(move |req: ApiRequest| {
        let view = Arc::clone(&view);
        async move { dispatch(view.as_ref(), req).await }
    })
}

/// Metadata answer for OPTIONS, with the `Allow` header listing served methods.
pub fn options_response(name: &str, allowed: &[Method], renderers: &[Format]) -> Response {
    let mut methods: Vec<&str> = allowed.iter().map(Method::as_str).collect();
    if allowed.contains(&Method::GET) {
        methods.push("HEAD");
    }
    methods.push("OPTIONS");
    let renders: Vec<&str> = renderers
        .iter()
        .map(|f| match f {
            Format::Json => "application/json",
            Format::Html => "text/html",
        })
        .collect();
    let body = serde_json::json!({
        "name": name,
        "renders": renders,
        "parses": ["application/json"],
    });
    let mut response = (StatusCode::OK, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(&methods.join(", ")) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}
