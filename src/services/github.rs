use crate::config::GithubConfig;
use crate::utils::error::AppError;

/// GitHub repository proxy. The client verifies TLS certificates through
/// rustls; failures of any kind surface as the same 404 to the caller.
pub struct GithubClient {
    http: reqwest::Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("devconnect-api/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(AppError::internal)?;

        Ok(Self { http, config })
    }

    /// The user's five oldest repositories, returned as the raw upstream
    /// JSON. No retry or backoff; any failure maps to a 404.
    pub async fn user_repos(&self, username: &str) -> Result<serde_json::Value, AppError> {
        let url = format!(
            "{}/users/{}/repos?per_page=5&sort=created:asc",
            self.config.api_base_url, username
        );

        let mut request = self.http.get(&url);
        if let Some(token) = &self.config.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await.map_err(|err| {
            log::warn!("github request for {} failed: {}", username, err);
            AppError::not_found("No Github profile found")
        })?;

        if !response.status().is_success() {
            log::warn!("github returned {} for {}", response.status(), username);
            return Err(AppError::not_found("No Github profile found"));
        }

        response.json().await.map_err(|err| {
            log::warn!("github response for {} unreadable: {}", username, err);
            AppError::not_found("No Github profile found")
        })
    }
}
