use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// One user-visible failure message. All error responses carry a list of
/// these under an `errors` key so clients handle every failure the same way.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub msg: String,
}

impl FieldError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing input fields, accumulated (not first-failure).
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// A single client error with a fixed message (duplicate email,
    /// bad credentials, missing profile on a mutation).
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("No Token, authorization denied")]
    MissingToken,

    #[error("Token is not valid")]
    InvalidToken,

    /// 401 with an endpoint-specific message. `GET /profile/me` answers 401
    /// rather than 404 when no profile exists yet.
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    /// Store failures are logged server-side and never leak detail.
    #[error("store unavailable")]
    Store(#[from] sqlx::Error),

    /// Upstream (non-store) service failure, kept distinct from `Store`.
    #[error("upstream request failed")]
    Upstream(#[source] reqwest::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msgs: Vec<String>) -> Self {
        Self::Validation(msgs.into_iter().map(FieldError::new).collect())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, errors),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, vec![FieldError::new(msg)]),
            ApiError::MissingToken | ApiError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                vec![FieldError::new(self.to_string())],
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, vec![FieldError::new(msg)]),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, vec![FieldError::new(msg)]),
            ApiError::Store(e) => {
                error!(error = %e, "store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec![FieldError::new("Server Error")],
                )
            }
            ApiError::Upstream(e) => {
                error!(error = %e, "upstream error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec![FieldError::new("Server Error")],
                )
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec![FieldError::new("Server Error")],
                )
            }
        };
        (status, Json(json!({ "errors": errors }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_accumulates_all_messages() {
        let err = ApiError::validation(vec!["Status is required".into(), "Skills is required".into()]);
        match err {
            ApiError::Validation(msgs) => {
                assert_eq!(msgs.len(), 2);
                assert_eq!(msgs[0].msg, "Status is required");
                assert_eq!(msgs[1].msg, "Skills is required");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn store_error_hides_detail() {
        let resp = ApiError::Store(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_token_is_unauthorized() {
        let resp = ApiError::MissingToken.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
