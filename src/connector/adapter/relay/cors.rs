use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "content-type";
const PREFLIGHT_MAX_AGE_SECS: &str = "600";

/// Exact-match origin allow-list. There is no wildcard: every browser origin
/// that may call the relay has to be listed.
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl CorsPolicy {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_origins = origins
            .into_iter()
            .map(|o| o.as_ref().trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();
        Self { allowed_origins }
    }

    /// Parse a comma-separated origin list.
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        self.allowed_origins.iter().any(|o| o == origin)
    }

    fn apply(&self, headers: &mut HeaderMap, origin: &HeaderValue) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }

    fn apply_preflight(&self, headers: &mut HeaderMap, origin: &HeaderValue) {
        self.apply(headers, origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
        );
    }
}

/// Origin gate in front of every route.
///
/// - no `Origin` header: not a browser cross-origin call, passed through
/// - origin not on the list: `403`, the handler never runs
/// - `OPTIONS` from an allowed origin: answered here with `204`
/// - anything else from an allowed origin: handled, then CORS headers added
pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(origin) = request.headers().get(header::ORIGIN).cloned() else {
        return next.run(request).await;
    };

    let origin_str = origin.to_str().unwrap_or_default();
    if !policy.is_allowed(origin_str) {
        warn!(origin = origin_str, method = %request.method(), "Rejected request from origin not on allow-list");
        return (StatusCode::FORBIDDEN, "Origin not allowed").into_response();
    }

    if request.method() == Method::OPTIONS {
        debug!(origin = origin_str, "Answering CORS preflight");
        let mut response = StatusCode::NO_CONTENT.into_response();
        policy.apply_preflight(response.headers_mut(), &origin);
        return response;
    }

    let mut response = next.run(request).await;
    policy.apply(response.headers_mut(), &origin);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_origins_ignoring_trailing_slash() {
        let policy = CorsPolicy::from_list("https://campusfix.example.edu/, http://localhost:5173");

        assert!(policy.is_allowed("https://campusfix.example.edu"));
        assert!(policy.is_allowed("http://localhost:5173/"));
        assert!(!policy.is_allowed("https://evil.example.com"));
        assert!(!policy.is_allowed("http://localhost:3000"));
    }

    #[test]
    fn empty_entries_are_ignored() {
        let policy = CorsPolicy::from_list(" , ,");
        assert!(policy.allowed_origins().is_empty());
        assert!(!policy.is_allowed(""));
    }
}
