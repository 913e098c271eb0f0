//! Google Books client and the search seam the finder is written against.

use super::types::*;
use async_trait::async_trait;
use reqwest::Client;
use shared::config::ApiConfig;
use shared::{FinderError, FinderResult};
use std::time::Duration;
use tracing::{debug, warn};

/// External search interface
///
/// One call is one attempt: implementations do not retry. Every failure
/// (network, status, decoding) is reported as [`FinderError::Transport`].
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> FinderResult<Vec<Volume>>;
}

/// Google Books volumes API client
pub struct GoogleBooksClient {
    /// HTTP client
    client: Client,
    /// Volumes endpoint URL
    base_url: String,
    /// API access key
    api_key: String,
}

impl GoogleBooksClient {
    /// Create a new client
    pub fn new(config: &ApiConfig, api_key: impl Into<String>) -> FinderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("book-finder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FinderError::configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: api_key.into(),
        })
    }

    /// Query parameters for a request, in the order the API documents them
    fn query_params(&self, request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", request.term.clone()),
            ("printType", request.print_type.clone()),
            ("orderBy", request.order_by.as_str().to_string()),
            ("maxResults", request.max_results.to_string()),
            ("startIndex", request.start_index.to_string()),
            ("key", self.api_key.clone()),
        ];
        if let Some(lang) = &request.lang_restrict {
            params.push(("langRestrict", lang.clone()));
        }
        params
    }
}

#[async_trait]
impl SearchBackend for GoogleBooksClient {
    async fn search(&self, request: &SearchRequest) -> FinderResult<Vec<Volume>> {
        debug!(
            term = %request.term,
            start_index = request.start_index,
            max_results = request.max_results,
            lang = ?request.lang_restrict,
            "Making search request"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query_params(request))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Search request error");
                FinderError::transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = %status, error = %error_text, "Search request failed");
            return Err(FinderError::transport(format!(
                "request failed with status {}",
                status
            )));
        }

        let page: VolumesResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse search response");
            FinderError::transport(format!("failed to parse response: {}", e))
        })?;

        let items = page.into_items();
        debug!(count = items.len(), "Search request successful");
        Ok(items)
    }
}
