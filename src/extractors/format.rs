//! Format suffixes (`/snippets/3.json`): stripped before routing, then read back by handlers.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, uri::PathAndQuery, Uri},
};
use regex::Regex;
use std::convert::Infallible;
use std::sync::OnceLock;

/// Representation a response can be rendered in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Html,
}

impl Format {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(Format::Json),
            "html" => Some(Format::Html),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Html => "html",
        }
    }
}

/// Format forced by a path suffix, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestedFormat(pub Option<Format>);

impl RequestedFormat {
    /// Pick the representation for an endpoint rendering `supported` (first entry is the default).
    /// A suffix the endpoint cannot render is treated as an unknown URL.
    pub fn negotiate(&self, supported: &[Format]) -> Result<Format, AppError> {
        match self.0 {
            None => supported.first().copied().ok_or(AppError::NotFound),
            Some(f) if supported.contains(&f) => Ok(f),
            Some(_) => Err(AppError::NotFound),
        }
    }

    /// Suffix to append when building URLs that should keep the requested format.
    pub fn suffix(&self) -> String {
        self.0.map(|f| format!(".{}", f.extension())).unwrap_or_default()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestedFormat
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestedFormat(parts.extensions.get::<Format>().copied()))
    }
}

fn suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<stem>/(?:.*?))\.(?P<ext>[a-z0-9]+)/?$").expect("format suffix pattern is valid")
    })
}

/// Split `/snippets/3.json` into (`/snippets/3/`, Json). Unknown extensions are left alone.
pub fn split_format_suffix(path: &str) -> Option<(String, Format)> {
    let caps = suffix_pattern().captures(path)?;
    let format = Format::from_extension(&caps["ext"])?;
    let stem = &caps["stem"];
    let rewritten = if stem.ends_with('/') {
        stem.to_string()
    } else {
        format!("{}/", stem)
    };
    Some((rewritten, format))
}

/// Rewrites the request path before routing and records the requested [`Format`] in the extensions.
pub fn strip_format_suffix(mut req: Request) -> Request {
    let Some((path, format)) = split_format_suffix(req.uri().path()) else {
        return req;
    };
    let path_and_query = match req.uri().query() {
        Some(q) => format!("{}?{}", path, q),
        None => path,
    };
    let mut parts = req.uri().clone().into_parts();
    let Ok(pq) = PathAndQuery::try_from(path_and_query) else {
        return req;
    };
    parts.path_and_query = Some(pq);
    if let Ok(uri) = Uri::from_parts(parts) {
        *req.uri_mut() = uri;
        req.extensions_mut().insert(format);
    }
    req
}
