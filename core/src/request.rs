//! Request descriptor: URL, headers, auth token and query for one call.
//!
//! # Design
//! A descriptor is consumed by `build_get` or `build_post`, which produce an
//! `HttpRequest` ready for a `Transport`. Headers behave like a dictionary:
//! setting a name that is already present (ignoring case) replaces it. The
//! JSON `Accept` / `Content-Type` headers are set last, so they win over
//! caller-supplied values.

use crate::http::{HttpMethod, HttpRequest};
use crate::query::{apply_query, Query};

/// Header carrying the caller's auth token.
pub const AUTH_TOKEN_HEADER: &str = "AuthToken";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    url: String,
    headers: Vec<(String, String)>,
    auth_token: Option<String>,
    query: Option<Query>,
}

impl RequestDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name.into(), value.into());
        self
    }

    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            set_header(&mut self.headers, name.into(), value.into());
        }
        self
    }

    /// `None` sends no `AuthToken` header at all.
    pub fn auth_token(mut self, token: Option<impl Into<String>>) -> Self {
        self.auth_token = token.map(Into::into);
        self
    }

    pub fn query(mut self, query: Option<Query>) -> Self {
        self.query = query;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fully-qualified target URL, query string included.
    pub fn target_url(&self) -> String {
        apply_query(&self.url, self.query.as_ref())
    }

    pub fn build_get(self) -> HttpRequest {
        self.build(HttpMethod::Get, "Accept", None)
    }

    pub fn build_post(self, body: String) -> HttpRequest {
        self.build(HttpMethod::Post, "Content-Type", Some(body))
    }

    fn build(self, method: HttpMethod, json_header: &str, body: Option<String>) -> HttpRequest {
        let url = self.target_url();
        let mut headers = self.headers;
        if let Some(token) = self.auth_token {
            set_header(&mut headers, AUTH_TOKEN_HEADER.to_string(), token);
        }
        set_header(&mut headers, json_header.to_string(), JSON_CONTENT_TYPE.to_string());
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
    headers.push((name, value));
}
