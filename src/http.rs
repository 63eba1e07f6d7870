use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use thiserror::Error;
use url::Url;

/// Why a single HTTP fetch failed. HTTP-level and transport-level failures
/// stay distinguishable so the orchestrator can report them separately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Transport(error.to_string())
    }
}

/// HTTP collaborator of the page mirror: text for the page itself, raw bytes
/// for resources.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get_text(&self, url: &Url) -> Result<String, FetchError>;
    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Production fetcher backed by reqwest.
#[derive(Clone)]
pub struct ReqwestFetch {
    client: Client,
}

impl ReqwestFetch {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = ClientBuilder::new()
            .use_rustls_tls()
            .user_agent("PageMirror/1.0")
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self { client })
    }

    async fn send(&self, url: &Url) -> Result<reqwest::Response, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetch {
    async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.send(url).await?;
        Ok(response.text().await?)
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.send(url).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
