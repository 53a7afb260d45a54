//! HTTP Basic authentication for write requests.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use base64::{engine::general_purpose, Engine as _};
use tracing::warn;

use crate::errors::ApiError;
use crate::server::state::AppState;

/// Username and password expected on mutating requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check an `Authorization` header against these credentials.
    pub fn verify(&self, header: Option<&HeaderValue>) -> bool {
        let Some(encoded) = header
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Basic "))
        else {
            return false;
        };

        let Ok(decoded) = general_purpose::STANDARD.decode(encoded.trim()) else {
            return false;
        };

        match String::from_utf8(decoded)
            .ok()
            .as_deref()
            .and_then(|pair| pair.split_once(':'))
        {
            Some((username, password)) => username == self.username && password == self.password,
            None => false,
        }
    }

    /// The `Authorization` header value a client sends for these credentials.
    pub fn header_value(&self) -> String {
        let pair = format!("{}:{}", self.username, self.password);
        format!("Basic {}", general_purpose::STANDARD.encode(pair))
    }
}

/// Extractor guarding mutating handlers.
///
/// Succeeds when no credentials are configured, or when the request carries
/// matching Basic credentials. Rejects with [`ApiError::Unauthorized`] otherwise.
pub struct Authorized;

#[async_trait]
impl FromRequestParts<AppState> for Authorized {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(credentials) = state.credentials.as_deref() else {
            return Ok(Authorized);
        };

        if credentials.verify(parts.headers.get(AUTHORIZATION)) {
            Ok(Authorized)
        } else {
            warn!(method = %parts.method, path = %parts.uri.path(), "Rejected unauthenticated write");
            Err(ApiError::Unauthorized)
        }
    }
}
