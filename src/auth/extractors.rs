use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;

/// Header carrying the token verbatim (no Bearer scheme).
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Resolved request identity. Handlers taking this extractor can only run
/// once the token has been verified; there is no other way to construct one
/// from a request.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        // Absent header and unusable header are distinct failures: anything
        // presented as a token is judged as one.
        let header = parts
            .headers
            .get(TOKEN_HEADER)
            .ok_or(ApiError::MissingToken)?;
        let token = header.to_str().map_err(|_| ApiError::InvalidToken)?;

        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims.sub)),
            Err(_) => {
                warn!("invalid or expired token");
                Err(ApiError::InvalidToken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::FromRef, http::Request};

    use crate::state::AppState;

    async fn extract(state: &AppState, token: Option<&str>) -> Result<AuthUser, ApiError> {
        let mut builder = Request::builder().uri("/profile/me");
        if let Some(t) = token {
            builder = builder.header(TOKEN_HEADER, t);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let state = AppState::fake();
        let err = extract(&state, None).await.err().expect("should reject");
        assert!(matches!(err, ApiError::MissingToken));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let state = AppState::fake();
        let err = extract(&state, Some("garbage"))
            .await
            .err()
            .expect("should reject");
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[tokio::test]
    async fn non_utf8_header_is_rejected_as_invalid() {
        let state = AppState::fake();
        let value = axum::http::HeaderValue::from_bytes(b"\xfe\xff").unwrap();
        let (mut parts, _) = Request::builder()
            .uri("/profile/me")
            .header(TOKEN_HEADER, value)
            .body(())
            .unwrap()
            .into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("should reject");
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[tokio::test]
    async fn valid_token_resolves_user() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).expect("sign");
        let AuthUser(resolved) = extract(&state, Some(&token)).await.expect("should pass");
        assert_eq!(resolved, user_id);
    }
}
