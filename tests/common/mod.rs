#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderMap, Method, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use snippets_api::{build_router, ensure_account, with_format_suffixes, ApiStyle, App, AppState};
use tower::ServiceExt;

pub const ALICE: (&str, &str) = ("alice", "alice-pw");
pub const BOB: (&str, &str) = ("bob", "bob-pw");

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!("body is not JSON ({e}): {}", String::from_utf8_lossy(&self.body))
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// In-process app over a fresh in-memory store with `alice` and `bob` provisioned.
pub struct TestApp {
    pub app: App,
    pub state: AppState,
}

impl TestApp {
    pub async fn new(style: ApiStyle) -> Self {
        let state = AppState::in_memory();
        for (user, pw) in [ALICE, BOB] {
            ensure_account(state.store.as_ref(), user, pw).await.unwrap();
        }
        let app = with_format_suffixes(build_router(state.clone(), style, 64 * 1024));
        TestApp { app, state }
    }

    pub async fn send(&self, method: Method, uri: &str, user: Option<(&str, &str)>, body: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri).header(header::HOST, "testserver");
        if let Some((name, pw)) = user {
            builder = builder.header(header::AUTHORIZATION, basic(name, pw));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = self.app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
        Reply { status, headers, body }
    }

    pub async fn get(&self, uri: &str) -> Reply {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, user: (&str, &str), body: Value) -> Reply {
        self.send(Method::POST, uri, Some(user), Some(body)).await
    }
}

pub fn basic(user: &str, pw: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{pw}")))
}

/// (app style, collection path, detail path prefix) for every way snippets are served.
pub fn snippet_styles() -> Vec<(ApiStyle, &'static str, &'static str)> {
    let mut styles: Vec<_> = ApiStyle::ALL
        .into_iter()
        .map(|style| (style, "/snippets/", "/snippets/"))
        .collect();
    styles.extend([
        (ApiStyle::Router, "/snippets_fbv/", "/snippets_fbv/"),
        (ApiStyle::Router, "/snippets_apiview/", "/snippets_apiview/"),
        (
            ApiStyle::Router,
            "/snippets_generic_mixin_apiview/",
            "/snippets_generic_mixin_apiview/",
        ),
        (
            ApiStyle::Router,
            "/snippets_list_create_apiview/",
            "/snippets_retrieve_update_destroy_apiview/",
        ),
    ]);
    styles
}
