// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request and response values exchanged between hyper and the router.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONNECTION, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use mx_core::ErrorBody;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Content type of every response body
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf8";

/// Request target errors
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("malformed request: {0}")]
    Malformed(String),
}

/// A routed request: method, decoded path segments and query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    /// Path as sent (still percent-encoded)
    pub path: String,
    /// Decoded, non-empty path segments
    pub segments: Vec<String>,
    /// Decoded query parameters; flags such as `?lock` map to ""
    pub query: HashMap<String, String>,
}

impl HttpRequest {
    /// Build a request from a method and an origin-form target (`/a/b?c=d`).
    ///
    /// Segments are split before decoding and never normalized, so `.`,
    /// `..` and `%2F` reach the router as literal names.
    pub fn from_target(method: &str, target: &str) -> Result<Self, HttpError> {
        if !target.starts_with('/') {
            return Err(HttpError::Malformed(format!(
                "unsupported request target '{}'",
                target
            )));
        }

        let (path, query) = target.split_once('?').unwrap_or((target, ""));

        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                urlencoding::decode(s)
                    .map(|decoded| decoded.into_owned())
                    .map_err(|_| HttpError::Malformed("path is not valid UTF-8".to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            segments,
            query: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        })
    }

    /// Whether the query names `key`, with or without a value
    pub fn has(&self, key: &str) -> bool {
        self.query.contains_key(key)
    }

    /// Non-empty query value for `key`
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    pub fn is_post(&self) -> bool {
        self.method == "POST"
    }
}

/// A complete response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Serialize `value` as the body
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(mut body) => {
                body.push(b'\n');
                Self { status, body }
            }
            Err(e) => Self::error(500, format!("failed to encode response: {}", e)),
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        let body = ErrorBody {
            status_code: status,
            error_message: message.into(),
        };
        // ErrorBody is plain strings and integers; encoding cannot fail
        let mut bytes = serde_json::to_vec(&body).unwrap_or_default();
        bytes.push(b'\n');
        Self {
            status,
            body: bytes,
        }
    }

    /// Convert into a hyper response that closes the connection
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(CONNECTION, HeaderValue::from_static("close"));
        response
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
