use crate::errors::EngineError;
use async_trait::async_trait;
use serde::Deserialize;

/// Payload the stats provider returns for an account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountStats {
    pub public_repos: u64,
}

/// One asynchronous network call per page load. Failures surface as errors
/// here; the stat coordinator decides how to degrade.
#[async_trait]
pub trait StatFetcher: Send + Sync {
    async fn fetch_account(&self, account: &str) -> Result<AccountStats, EngineError>;
}

pub struct GithubStatFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl GithubStatFetcher {
    pub fn new() -> Self {
        Self::with_base_url("https://api.github.com")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        GithubStatFetcher {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for GithubStatFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatFetcher for GithubStatFetcher {
    async fn fetch_account(&self, account: &str) -> Result<AccountStats, EngineError> {
        let url = format!("{}/users/{account}", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, "profile-page")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::UpstreamStatus(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}
