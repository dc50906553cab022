use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use sub_recoded_types::{is_html_content_type, FetchedResource, ProxyError, ProxyResult};
use tracing::debug;

use crate::config::FetchConfig;

/// Retrieves upstream resources on behalf of the proxy endpoints.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetches `url` and classifies the body as HTML or an opaque asset.
    async fn fetch(&self, url: &str) -> ProxyResult<FetchedResource>;

    /// Fetches `url` as an opaque asset regardless of its content type.
    async fn fetch_asset(&self, url: &str) -> ProxyResult<FetchedResource>;
}

/// Single attempt per call, no retries; redirects are followed by the client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> ProxyResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn get(&self, url: &str) -> ProxyResult<Response> {
        debug!("HTTP GET: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProxyError::FetchFailed(error_chain(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("");
            return Err(ProxyError::FetchFailed(
                format!("{} {}", status.as_u16(), reason).trim_end().to_string(),
            ));
        }

        Ok(response)
    }

    async fn read_asset(response: Response) -> ProxyResult<FetchedResource> {
        let content_type = header_content_type(&response);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProxyError::FetchFailed(format!("Failed to read body: {}", error_chain(&e))))?;
        Ok(FetchedResource::asset(bytes.to_vec(), content_type.as_deref()))
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> ProxyResult<FetchedResource> {
        let response = self.get(url).await?;
        let content_type = header_content_type(&response).unwrap_or_default();

        if !is_html_content_type(&content_type) {
            return Self::read_asset(response).await;
        }

        let effective_base_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| ProxyError::FetchFailed(format!("Failed to read body: {}", error_chain(&e))))?;

        debug!("Fetched {} bytes of HTML from {}", body.len(), effective_base_url);
        Ok(FetchedResource::Html {
            body,
            effective_base_url,
        })
    }

    async fn fetch_asset(&self, url: &str) -> ProxyResult<FetchedResource> {
        let response = self.get(url).await?;
        Self::read_asset(response).await
    }
}

fn header_content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// reqwest's top-level message hides the cause (DNS, timeout, reset).
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
