use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use thiserror::Error;
use tracing::{instrument, warn};

use crate::{error::ApiError, state::AppState};

/// Upstream lookup failures, kept apart from store errors so a flaky GitHub
/// never reads as a broken database.
#[derive(Error, Debug)]
pub enum GithubError {
    #[error("no GitHub profile for that username")]
    NotFound,
    #[error("github request failed")]
    Upstream(#[from] reqwest::Error),
}

#[async_trait]
pub trait GithubClient: Send + Sync {
    /// The user's five most recently created repositories, as returned by
    /// the GitHub API.
    async fn recent_repos(&self, username: &str) -> Result<Vec<serde_json::Value>, GithubError>;
}

pub struct Github {
    http: reqwest::Client,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl Github {
    pub fn new(client_id: Option<String>, client_secret: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("devconnect")
            .build()?;
        Ok(Self {
            http,
            client_id,
            client_secret,
        })
    }
}

#[async_trait]
impl GithubClient for Github {
    async fn recent_repos(&self, username: &str) -> Result<Vec<serde_json::Value>, GithubError> {
        let mut request = self
            .http
            .get(format!("https://api.github.com/users/{username}/repos"))
            .query(&[("per_page", "5"), ("sort", "created:asc")]);
        if let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) {
            request =
                request.query(&[("client_id", id.as_str()), ("client_secret", secret.as_str())]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            warn!(username, status = %response.status(), "github lookup failed");
            return Err(GithubError::NotFound);
        }
        Ok(response.json().await?)
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/profile/github/:username", get(github_repos))
}

/// GET /profile/github/:username: public passthrough to GitHub.
#[instrument(skip(state))]
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<serde_json::Value>>, ApiError> {
    let repos = state
        .github
        .recent_repos(&username)
        .await
        .map_err(|e| match e {
            GithubError::NotFound => ApiError::NotFound("No GitHub profile found"),
            GithubError::Upstream(e) => ApiError::Upstream(e),
        })?;
    Ok(Json(repos))
}
