//! # Authentication Middleware
//!
//! Bearer token middleware that establishes who is calling.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {username}:{secret}  : acts as that platform user
//! Bearer {secret}             : service principal
//! ```
//!
//! The secret is the shared `AUTH_TOKEN`. When no token is configured,
//! authentication is disabled and every request runs as the service
//! principal.
//!
//! Authentication only establishes identity. Whether that identity may
//! generate credentials for a given course is decided per request by
//! [`crate::access`].

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use elmcred_core::Username;
use subtle::ConstantTimeEq;

use crate::error::{AppError, ErrorBody};

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity of the authenticated caller, available to handlers via
/// Axum's `FromRequestParts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerIdentity {
    /// Trusted integration holding the shared secret. Unrestricted.
    Service,
    /// A platform user; access is checked against the course.
    User(Username),
}

impl CallerIdentity {
    /// Label used in logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Service => "service".to_string(),
            Self::User(name) => format!("user:{name}"),
        }
    }
}

/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if no identity is present.
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer secrets.
///
/// When lengths differ, performs a dummy comparison so the mismatch takes
/// the same path as a content mismatch.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse a bearer token in `{username}:{secret}` or `{secret}` form.
///
/// The whole token is tried as a bare secret first, so secrets that
/// themselves contain `:` keep working as service tokens.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    if constant_time_token_eq(provided, expected_secret) {
        return Ok(CallerIdentity::Service);
    }

    let Some((user, secret)) = provided.split_once(':') else {
        return Err("invalid bearer token".into());
    };

    if !constant_time_token_eq(secret, expected_secret) {
        return Err("invalid bearer token".into());
    }

    Username::new(user)
        .map(CallerIdentity::User)
        .map_err(|_| "bearer token names an empty username".to_string())
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Validate the Bearer token and inject the caller's identity.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected_token = request.extensions().get::<AuthConfig>().cloned();

    match expected_token {
        Some(AuthConfig {
            token: Some(ref expected),
        }) => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            match auth_header {
                Some(header_value) if header_value.starts_with("Bearer ") => {
                    let provided = &header_value[7..];
                    match parse_bearer_token(provided, expected) {
                        Ok(identity) => {
                            request.extensions_mut().insert(identity);
                            next.run(request).await
                        }
                        Err(msg) => {
                            tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                            unauthorized_response(&msg)
                        }
                    }
                }
                Some(_) => {
                    tracing::warn!("authentication failed: non-Bearer authorization scheme");
                    unauthorized_response("authorization header must use Bearer scheme")
                }
                None => {
                    tracing::warn!("authentication failed: missing authorization header");
                    unauthorized_response("missing authorization header")
                }
            }
        }
        _ => {
            request.extensions_mut().insert(CallerIdentity::Service);
            next.run(request).await
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: vec![message.to_string()],
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
