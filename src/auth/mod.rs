//! Gateway authentication and identity resolution.
//!
//! Requests arrive through a trusted gateway that has already validated
//! the end user's token. The gateway authenticates to this service with a
//! pre-shared key (constant-time compared to mitigate timing attacks) and
//! forwards the resolved user id in a header.

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Header name for the gateway pre-shared key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the resolved platform user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Resolved identity of the caller, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
}

/// Authentication layer: verifies the gateway PSK, then resolves the
/// caller's identity from the forwarded user-id header.
///
/// A request without a resolvable identity is rejected as not-found rather
/// than unauthorized, so the API leaks nothing about valid routes.
pub async fn identity_layer(
    expected_psk: Option<String>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = expected_psk {
        if !psk_matches(&request, &expected) {
            return AppError::Unauthorized("Missing or invalid API key".to_string())
                .into_response();
        }
    }
    // If no PSK is configured, allow all requests (dev mode)

    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    let Some(user_id) = user_id else {
        return AppError::NotFound("not found".to_string()).into_response();
    };

    request.extensions_mut().insert(Identity { user_id });
    next.run(request).await
}

/// Check the PSK from `x-api-key` or an Authorization bearer token.
fn psk_matches(request: &Request, expected: &str) -> bool {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        });

    match provided {
        Some(key) => constant_time_compare(key, expected),
        None => false,
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }
}
