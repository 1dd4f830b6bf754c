//! Opt-in limit/offset pagination for list endpoints.

use super::request::ApiRequest;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug)]
pub struct LimitOffsetPagination {
    /// Used when the client sends `offset` without `limit`.
    pub default_limit: usize,
    pub max_limit: Option<usize>,
}

impl Default for LimitOffsetPagination {
    fn default() -> Self {
        LimitOffsetPagination {
            default_limit: 10,
            max_limit: Some(100),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub count: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl LimitOffsetPagination {
    /// `None` when the query carries neither a usable `limit` nor `offset`.
    pub fn page(&self, query: &HashMap<String, String>, count: usize) -> Option<Page> {
        let limit = query
            .get("limit")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&l| l > 0);
        let offset = query.get("offset").and_then(|s| s.parse::<usize>().ok());
        if limit.is_none() && offset.is_none() {
            return None;
        }
        let mut limit = limit.unwrap_or(self.default_limit);
        if let Some(max) = self.max_limit {
            limit = limit.min(max);
        }
        Some(Page {
            count,
            limit,
            offset: offset.unwrap_or(0),
        })
    }
}

impl Page {
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = start.saturating_add(self.limit).min(items.len());
        &items[start..end]
    }

    pub fn next_offset(&self) -> Option<usize> {
        let next = self.offset.saturating_add(self.limit);
        (next < self.count).then_some(next)
    }

    pub fn previous_offset(&self) -> Option<usize> {
        (self.offset > 0).then(|| self.offset.saturating_sub(self.limit))
    }

    pub fn into_body<T>(self, req: &ApiRequest, results: Vec<T>) -> Paginated<T> {
        let next = self.next_offset().map(|o| page_url(req, self.limit, o));
        let previous = self.previous_offset().map(|o| page_url(req, self.limit, o));
        Paginated {
            count: self.count,
            next,
            previous,
            results,
        }
    }
}

/// The current URL (format suffix and unrelated query parameters kept) at another page.
/// `offset` is omitted for the first page.
fn page_url(req: &ApiRequest, limit: usize, offset: usize) -> String {
    let path = req.uri.path();
    let suffix = req.format.suffix();
    let path = if suffix.is_empty() {
        path.to_string()
    } else {
        match path.trim_end_matches('/') {
            "" => format!("/{}", suffix),
            stem => format!("{}{}", stem, suffix),
        }
    };
    let mut query: Vec<String> = req
        .uri
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or("");
            !pair.is_empty() && key != "limit" && key != "offset"
        })
        .map(str::to_string)
        .collect();
    query.push(format!("limit={}", limit));
    if offset > 0 {
        query.push(format!("offset={}", offset));
    }
    req.absolute_url(&format!("{}?{}", path, query.join("&")))
}
