//! Derive URL routes from registered viewsets, plus a root view listing them.

use super::request::ApiRequest;
use super::viewsets::{bind, Action, ViewSet};
use crate::error::AppError;
use crate::extractors::Format;
use crate::state::AppState;
use axum::{
    http::Method,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::{Map, Value};
use std::sync::Arc;

static LIST_BINDINGS: [(Method, Action); 2] = [(Method::GET, Action::List), (Method::POST, Action::Create)];

static DETAIL_BINDINGS: [(Method, Action); 4] = [
    (Method::GET, Action::Retrieve),
    (Method::PUT, Action::Update),
    (Method::PATCH, Action::PartialUpdate),
    (Method::DELETE, Action::Destroy),
];

const JSON_ONLY: &[Format] = &[Format::Json];

/// One generated route: path template, method-to-action bindings and renderers.
#[derive(Clone, Debug)]
pub struct RouteSpec {
    pub path: String,
    pub bindings: Vec<(Method, Action)>,
    pub renderers: &'static [Format],
}

/// Routes for every registered viewset: `/<prefix>/`, `/<prefix>/:pk/`, extra actions,
/// and a root view at `/` mapping each prefix to its collection URL.
#[derive(Default)]
pub struct DefaultRouter {
    registry: Vec<(String, Arc<dyn ViewSet>)>,
}

impl DefaultRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, prefix: &str, viewset: Arc<dyn ViewSet>) -> Self {
        self.registry.push((prefix.trim_matches('/').to_string(), viewset));
        self
    }

    pub fn prefixes(&self) -> Vec<String> {
        self.registry.iter().map(|(p, _)| p.clone()).collect()
    }

    /// Route table for one registered viewset; paths with no bound action are skipped.
    pub fn routes_for(prefix: &str, viewset: &dyn ViewSet) -> Vec<RouteSpec> {
        let supported = viewset.actions();
        let standard = |table: &[(Method, Action)]| -> Vec<(Method, Action)> {
            table
                .iter()
                .filter(|(_, action)| supported.contains(action))
                .cloned()
                .collect()
        };
        let mut routes = vec![RouteSpec {
            path: format!("/{}/", prefix),
            bindings: standard(&LIST_BINDINGS),
            renderers: JSON_ONLY,
        }];
        for extra in viewset.extra_actions().iter().filter(|e| !e.detail) {
            routes.push(RouteSpec {
                path: format!("/{}/{}/", prefix, extra.name),
                bindings: extra.methods.iter().map(|m| (m.clone(), Action::Extra(extra.name))).collect(),
                renderers: extra.renderers,
            });
        }
        routes.push(RouteSpec {
            path: format!("/{}/:pk/", prefix),
            bindings: standard(&DETAIL_BINDINGS),
            renderers: JSON_ONLY,
        });
        for extra in viewset.extra_actions().iter().filter(|e| e.detail) {
            routes.push(RouteSpec {
                path: format!("/{}/:pk/{}/", prefix, extra.name),
                bindings: extra.methods.iter().map(|m| (m.clone(), Action::Extra(extra.name))).collect(),
                renderers: extra.renderers,
            });
        }
        routes.retain(|r| !r.bindings.is_empty());
        routes
    }

    pub fn into_router(self) -> Router<AppState> {
        let prefixes: Arc<[String]> = self.prefixes().into();
        let mut router = Router::new().route(
            "/",
            any(move |req: ApiRequest| {
                let prefixes = Arc::clone(&prefixes);
                async move { api_root(&req, &prefixes[..]) }
            }),
        );
        for (prefix, viewset) in &self.registry {
            for route in Self::routes_for(prefix, viewset.as_ref()) {
                tracing::debug!(path = %route.path, actions = ?route.bindings, "route registered");
                router = router.route(&route.path, bind(Arc::clone(viewset), &route.bindings, route.renderers));
            }
        }
        router
    }
}

/// Discovery document: `{prefix: absolute collection URL}`, keeping any requested format suffix.
pub fn api_root<S: AsRef<str>>(req: &ApiRequest, prefixes: &[S]) -> Result<Response, AppError> {
    req.negotiate(JSON_ONLY)?;
    if req.method != Method::GET && req.method != Method::HEAD {
        return Err(req.not_allowed());
    }
    let suffix = req.format.suffix();
    let mut body = Map::new();
    for prefix in prefixes {
        let prefix = prefix.as_ref();
        let path = if suffix.is_empty() {
            format!("/{}/", prefix)
        } else {
            format!("/{}{}", prefix, suffix)
        };
        body.insert(prefix.to_string(), Value::String(req.absolute_url(&path)));
    }
    Ok(Json(Value::Object(body)).into_response())
}
