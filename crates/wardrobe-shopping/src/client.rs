use std::time::Duration;

use reqwest::Client;
use wardrobe_core::AppConfig;

use crate::error::ShoppingError;
use crate::query::SearchRequest;
use crate::rate_limit::retry_with_backoff;
use crate::types::{ChatCompletionRequest, ProviderResponse};

/// Seconds to assume when a 429 carries no parseable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Sampling temperature for search requests.
const SEARCH_TEMPERATURE: f32 = 0.2;

/// HTTP client for an OpenAI-compatible chat-completion endpoint with web
/// search and citations.
///
/// Rate limiting (429) and other non-2xx responses come back as typed errors.
/// Transient errors (429, network failures) are retried with exponential
/// backoff up to `max_retries` additional attempts; the default is none.
pub struct SearchClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_secs", &self.backoff_base_secs)
            .finish_non_exhaustive()
    }
}

impl SearchClient {
    /// Creates a `SearchClient` with a request timeout, `User-Agent` and retry
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL, or [`ShoppingError::Http`] if the underlying
    /// `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ShoppingError> {
        let parsed = reqwest::Url::parse(base_url).map_err(|e| ShoppingError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ShoppingError::InvalidUrl {
                url: base_url.to_owned(),
                reason: "search base URL must be http or https".to_owned(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the `WARDROBE_SEARCH_*` settings.
    ///
    /// # Errors
    ///
    /// See [`SearchClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ShoppingError> {
        Self::new(
            &config.search_base_url,
            &config.search_api_key,
            &config.search_model,
            config.search_request_timeout_secs,
            &config.search_user_agent,
            config.search_max_retries,
            config.search_retry_backoff_base_secs,
        )
    }

    /// Sends one search request and validates the body into a
    /// [`ProviderResponse`].
    ///
    /// # Errors
    ///
    /// - [`ShoppingError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ShoppingError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ShoppingError::Http`]: network or TLS failure after all retries.
    /// - [`ShoppingError::Deserialize`]: body is not the expected JSON.
    /// - [`ShoppingError::EmptyResponse`]: body has no choices and no citations.
    pub async fn search(&self, request: &SearchRequest) -> Result<ProviderResponse, ShoppingError> {
        let url = self.completions_url();
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: request.messages.clone(),
            search_domain_filter: request.domain_filter.clone(),
            return_citations: true,
            temperature: SEARCH_TEMPERATURE,
        };

        tracing::debug!(
            branch = %request.label,
            domains = request.domain_filter.len(),
            "sending search request"
        );

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let body = &body;
            async move {
                let response = self
                    .client
                    .post(&url)
                    .bearer_auth(&self.api_key)
                    .json(body)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    return Err(ShoppingError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(ShoppingError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let text = response.text().await?;
                let parsed = serde_json::from_str::<ProviderResponse>(&text).map_err(|e| {
                    ShoppingError::Deserialize {
                        context: format!("search response for \"{}\"", request.label),
                        source: e,
                    }
                })?;

                if parsed.choices.is_empty()
                    && parsed.citations.is_empty()
                    && parsed.search_results.is_empty()
                {
                    return Err(ShoppingError::EmptyResponse);
                }

                Ok(parsed)
            }
        })
        .await
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}
