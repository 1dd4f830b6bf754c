//! The request object every handler style receives.

use crate::error::AppError;
use crate::extractors::{Format, Identity, Payload, RequestedFormat};
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, FromRequestParts, Path, Query, Request},
    http::{header::HOST, HeaderMap, Method, StatusCode, Uri},
};
use std::collections::HashMap;

/// Parsed request: identity, requested format, path/query parameters and the raw body.
///
/// The body is only decoded when a handler asks for [`ApiRequest::payload`].
pub struct ApiRequest {
    pub state: AppState,
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub identity: Identity,
    pub format: RequestedFormat,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    body: Bytes,
}

#[async_trait]
impl FromRequest<AppState> for ApiRequest {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let identity = Identity::from_request_parts(&mut parts, state).await?;
        let format = RequestedFormat::from_request_parts(&mut parts, state)
            .await
            .unwrap_or_default();
        let params = Path::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map(|Path(p)| p)
            .unwrap_or_default();
        let query = Query::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map(|Query(q)| q)
            .unwrap_or_default();
        let (method, uri, headers) = (parts.method.clone(), parts.uri.clone(), parts.headers.clone());
        let body = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(body_error)?;
        Ok(ApiRequest {
            state: state.clone(),
            method,
            uri,
            headers,
            identity,
            format,
            params,
            query,
            body,
        })
    }
}

/// An over-limit body is 413; any other read failure is a bad request.
fn body_error(rejection: BytesRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(format!("could not read request body: {}", rejection.body_text()))
    }
}

impl ApiRequest {
    /// Build a request directly, bypassing HTTP extraction.
    pub fn new(state: AppState, method: Method, uri: Uri) -> Self {
        ApiRequest {
            state,
            method,
            uri,
            headers: HeaderMap::new(),
            identity: Identity::anonymous(),
            format: RequestedFormat::default(),
            params: HashMap::new(),
            query: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Integer primary key from the `pk` path parameter. Anything else is an unknown URL.
    pub fn pk(&self) -> Result<i64, AppError> {
        self.params
            .get("pk")
            .and_then(|s| s.parse().ok())
            .ok_or(AppError::NotFound)
    }

    pub fn payload(&self) -> Result<Payload, AppError> {
        Payload::from_body(&self.headers, &self.body)
    }

    pub fn negotiate(&self, supported: &[Format]) -> Result<Format, AppError> {
        self.format.negotiate(supported)
    }

    /// `scheme://host` as the client addressed us.
    pub fn base_url(&self) -> String {
        let scheme = self
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .or_else(|| self.uri.scheme_str())
            .unwrap_or("http");
        let host = self
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| self.uri.authority().map(|a| a.as_str()))
            .unwrap_or("localhost");
        format!("{}://{}", scheme, host)
    }

    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    pub fn not_allowed(&self) -> AppError {
        AppError::MethodNotAllowed(self.method.to_string())
    }
}
