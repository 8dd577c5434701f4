//! Bearer-token authentication middleware.
//!
//! Accepts any non-empty bearer token and attaches an [`AuthPrincipal`] to
//! the request extensions. There is no signature verification, expiry, or
//! user lookup: this is a placeholder to be swapped for a real token check.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::errors::{ErrorCode, error_response};

/// The authenticated caller, available from request extensions after
/// [`bearer_auth_middleware`] has run.
#[derive(Clone, Debug)]
pub struct AuthPrincipal {
    /// The raw bearer token presented by the caller
    pub token: String,
}

/// Extract the bearer token from the Authorization header.
///
/// Returns `None` for a missing header or a header that is not exactly
/// `Bearer <token>` (scheme is case-insensitive).
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("authorization")?.to_str().ok()?;

    let mut parts = auth_header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;

    if !scheme.eq_ignore_ascii_case("bearer") || parts.next().is_some() {
        return None;
    }

    Some(token.to_string())
}

/// Bearer authentication middleware.
///
/// Rejects requests without a well-formed, non-empty bearer token with 401.
/// On success, inserts [`AuthPrincipal`] into the request extensions.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware, routing::get};
/// use axum_helpers::auth::bearer_auth_middleware;
///
/// let protected = Router::new()
///     .route("/items", get(list_items))
///     .layer(middleware::from_fn(bearer_auth_middleware));
/// ```
pub async fn bearer_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    if !headers.contains_key("authorization") {
        tracing::warn!("Missing Authorization header");
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header".to_string(),
            ErrorCode::Unauthorized,
        ));
    }

    let token = match extract_bearer_token(&headers) {
        Some(t) => t,
        None => {
            tracing::warn!("Invalid Authorization header format");
            return Err(error_response(
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format. Use 'Bearer <token>'".to_string(),
                ErrorCode::Unauthorized,
            ));
        }
    };

    // Any non-empty token is accepted as valid. A real deployment would
    // verify the token against a JWT secret or a user store here.
    tracing::debug!("Request authenticated");

    request.extensions_mut().insert(AuthPrincipal { token });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_valid_bearer_token() {
        let headers = headers_with_auth("Bearer my-token");
        assert_eq!(extract_bearer_token(&headers), Some("my-token".to_string()));
    }

    #[test]
    fn test_extract_scheme_is_case_insensitive() {
        let headers = headers_with_auth("bearer my-token");
        assert_eq!(extract_bearer_token(&headers), Some("my-token".to_string()));
    }

    #[test]
    fn test_extract_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn test_extract_wrong_scheme() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn test_extract_empty_token() {
        let headers = headers_with_auth("Bearer ");
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn test_extract_too_many_parts() {
        let headers = headers_with_auth("Bearer one two");
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
