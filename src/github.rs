use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::{Result, TrackError};
use crate::host::RepoHost;
use crate::types::{Issue, IssueQuery, RepositoryDetail};

const USER_AGENT: &str = concat!("repotrack/", env!("CARGO_PKG_VERSION"));

pub struct GitHub {
    client: Client,
    base_url: String,
    web_base: String,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("base_url", &self.base_url)
            .field("web_base", &self.web_base)
            .finish_non_exhaustive()
    }
}

impl From<reqwest::Error> for TrackError {
    fn from(err: reqwest::Error) -> Self {
        TrackError::Api(err.to_string())
    }
}

impl GitHub {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let web_base = web_base(&base_url);
        Ok(Self {
            client,
            base_url,
            web_base,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!(url, ?query, "GET");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TrackError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TrackError::Api(format!("GitHub API {}: {}", status, text)));
        }

        Ok(response.json().await?)
    }
}

/// Site root for browser links, derived from the API root:
/// `https://api.github.com/` serves `https://github.com/`, and an Enterprise
/// `https://host/api/v3/` serves `https://host/`.
fn web_base(api_base: &str) -> String {
    let trimmed = api_base.trim_end_matches('/');
    let site = trimmed.strip_suffix("/api/v3").unwrap_or(trimmed);
    format!("{}/", site.replacen("://api.", "://", 1))
}

#[async_trait]
impl RepoHost for GitHub {
    fn web_url(&self, identifier: &str) -> String {
        format!("{}{}", self.web_base, identifier)
    }

    async fn get_repository(&self, identifier: &str) -> Result<RepositoryDetail> {
        let url = self.api_url(&format!("repos/{}", identifier));
        self.get_json(&url, &[]).await
    }

    async fn list_issues(&self, identifier: &str, query: &IssueQuery) -> Result<Vec<Issue>> {
        let url = self.api_url(&format!("repos/{}/issues", identifier));
        let params = [
            ("state", query.filter.as_api_str().to_string()),
            ("page", query.page.get().to_string()),
            ("per_page", query.per_page.to_string()),
        ];
        self.get_json(&url, &params).await
    }
}
