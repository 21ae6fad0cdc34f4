//! Normalized view of one HTTP request.
//!
//! [`RequestContext`] captures everything the dispatcher and authenticator
//! need from a request's head. The path and query string are kept verbatim
//! as received on the wire - signature canonicalization must see the
//! original encoding - while decoded forms are derived on the side: a query
//! multimap, and per-segment-decoded bucket/key extraction.

use http::HeaderMap;
use silo_auth::SigningView;
use silo_auth::canonical::{parse_query_pairs, url_decode};

/// Normalized request head.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Uppercase HTTP method.
    pub method: String,
    /// Request path as received, still percent-encoded.
    pub raw_path: String,
    /// Query string as received, without the leading `?`.
    pub raw_query: String,
    /// Decoded query parameters as an ordered multimap.
    pub query: Vec<(String, String)>,
    /// Request headers. Names are lowercase by `HeaderMap` construction.
    pub headers: HeaderMap,
    /// The `Host` header value, trimmed.
    pub host: Option<String>,
    /// Effective scheme: `https` behind a TLS-terminating proxy
    /// (`x-forwarded-proto: https`), else `http`.
    pub scheme: String,
    /// The server's own hostname, for host-candidate fallbacks.
    pub server_name: String,
    /// The server's listen port, for host-candidate fallbacks.
    pub server_port: u16,
}

impl RequestContext {
    /// Build a context from request parts and the server's own identity.
    #[must_use]
    pub fn from_parts(parts: &http::request::Parts, server_name: &str, server_port: u16) -> Self {
        let raw_path = parts.uri.path().to_owned();
        let raw_query = parts.uri.query().unwrap_or("").to_owned();
        let query = parse_query_pairs(&raw_query);

        let host = parts
            .headers
            .get(http::header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_owned());

        let scheme = if parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("https"))
        {
            "https"
        } else {
            "http"
        };

        Self {
            method: parts.method.as_str().to_uppercase(),
            raw_path,
            raw_query,
            query,
            headers: parts.headers.clone(),
            host,
            scheme: scheme.to_owned(),
            server_name: server_name.to_owned(),
            server_port,
        }
    }

    /// Whether a query parameter is present (with or without a value).
    #[must_use]
    pub fn query_has(&self, name: &str) -> bool {
        self.query.iter().any(|(key, _)| key == name)
    }

    /// The first value of a query parameter.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// A header value exactly as received.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Extract `(bucket, key)` from the path.
    ///
    /// The leading `/` is trimmed, the remainder split on `/`, and every
    /// segment URL-decoded once. The first segment is the bucket; the rest,
    /// rejoined with `/`, is the key (possibly empty).
    #[must_use]
    pub fn bucket_and_key(&self) -> (String, String) {
        let trimmed = self.raw_path.strip_prefix('/').unwrap_or(&self.raw_path);
        match trimmed.split_once('/') {
            Some((bucket, rest)) => {
                let key = rest
                    .split('/')
                    .map(url_decode)
                    .collect::<Vec<_>>()
                    .join("/");
                (url_decode(bucket), key)
            }
            None => (url_decode(trimmed), String::new()),
        }
    }

    /// The authenticator's view of this request.
    #[must_use]
    pub fn signing_view(&self) -> SigningView<'_> {
        SigningView {
            method: &self.method,
            path: &self.raw_path,
            raw_query: &self.raw_query,
            headers: &self.headers,
            scheme: &self.scheme,
            server_name: &self.server_name,
            server_port: self.server_port,
        }
    }
}
