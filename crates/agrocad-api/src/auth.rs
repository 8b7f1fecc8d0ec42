//! # Authentication Middleware
//!
//! Optional static bearer token authentication. When no token is
//! configured the middleware is a pass-through — the registry runs open in
//! development and behind a token in deployed environments.
//!
//! Token comparison is constant-time (`subtle`) so the middleware does not
//! leak prefix-match timing.

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Authentication configuration injected as a request extension.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// The expected bearer token. `None` disables authentication.
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Constant-time string comparison.
fn token_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Bearer token middleware.
///
/// Reads the expected token from the [`AuthConfig`] extension. Requests
/// must carry `Authorization: Bearer <token>`; anything else is rejected
/// with 401 before reaching a handler.
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let config = request
        .extensions()
        .get::<AuthConfig>()
        .cloned()
        .unwrap_or_default();

    let expected = match config.token {
        Some(token) => token,
        None => return next.run(request).await,
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(token) if token_matches(token, &expected) => next.run(request).await,
        Some(_) => AppError::Unauthorized("invalid bearer token".to_string()).into_response(),
        None => {
            AppError::Unauthorized("missing Authorization header".to_string()).into_response()
        }
    }
}
