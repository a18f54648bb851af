//! Request gating by static API key.

use super::AppState;
use crate::config::{AuthConfig, ConfigError};
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashSet;
use tracing::warn;

/// Decides whether a request may reach the task routes.
pub trait RequestGate: Send + Sync {
    fn admit(&self, path: &str, headers: &HeaderMap) -> bool;
}

/// Admits requests that carry a known key in the configured header,
/// plus any request to a whitelisted path.
#[derive(Debug, Clone)]
pub struct ApiKeyGate {
    header: HeaderName,
    keys: HashSet<String>,
    whitelist: Vec<String>,
}

impl ApiKeyGate {
    pub fn new(
        header: HeaderName,
        keys: impl IntoIterator<Item = String>,
        whitelist: Vec<String>,
    ) -> Self {
        Self {
            header,
            keys: keys.into_iter().filter(|k| !k.is_empty()).collect(),
            whitelist,
        }
    }

    pub fn from_config(auth: &AuthConfig) -> Result<Self, ConfigError> {
        let header = HeaderName::from_bytes(auth.header.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(auth.header.clone()))?;
        Ok(Self::new(
            header,
            auth.api_keys.iter().cloned(),
            auth.whitelist.clone(),
        ))
    }

    /// Exact match or a sub-path of a whitelisted prefix.
    fn is_whitelisted(&self, path: &str) -> bool {
        self.whitelist.iter().any(|prefix| {
            let prefix = prefix.trim_end_matches('/');
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

impl RequestGate for ApiKeyGate {
    fn admit(&self, path: &str, headers: &HeaderMap) -> bool {
        if self.is_whitelisted(path) {
            return true;
        }
        headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|key| self.keys.contains(key))
    }
}

/// Middleware rejecting requests the gate does not admit.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if state.gate.admit(path, request.headers()) {
        return next.run(request).await;
    }

    warn!(method = %request.method(), path = %path, "Rejected request without valid API key");
    ApiError::unauthorized().into_response()
}
