use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::presentation::handlers::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared secret inbound requests must present in `x-api-key`.
#[derive(Clone, Debug)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: &str) -> Self {
        Self(Arc::from(key))
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        let candidate = candidate.as_bytes();
        expected.len() == candidate.len()
            && expected
                .iter()
                .zip(candidate)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

pub async fn api_key_middleware(
    State(expected): State<ApiKey>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|supplied| expected.matches(supplied));

    if !authorized {
        tracing::warn!(uri = %request.uri().path(), "Rejected request with invalid api key");
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}
