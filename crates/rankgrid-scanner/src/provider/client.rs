//! HTTP client for the DataForSEO Google Maps SERP endpoint.

use std::time::Duration;

use async_trait::async_trait;
use rankgrid_core::AppConfig;
use reqwest::{Client, Url};

use super::wire::{MapsItem, MapsResponse, MapsTaskRequest, STATUS_NO_RESULTS, STATUS_OK};
use super::{BusinessLookup, RankProvider, ResolvedBusiness};
use crate::error::ProviderError;
use crate::location::normalize_location;
use crate::matcher::{match_business, MatchTarget};
use crate::retry::retry_with_backoff;
use crate::types::{ItemKind, RankItem};

const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com/";
const MAPS_LIVE_PATH: &str = "v3/serp/google/maps/live/advanced";
const LANGUAGE_CODE: &str = "en";
const DEFAULT_ZOOM: u8 = 15;
const LOOKUP_DEPTH: u32 = 10;

/// Client for the provider's live Maps ranking endpoint.
///
/// Each call submits a single task and waits for the live result. Transient
/// failures are retried per [`MapsRankClient::with_retry_policy`]; every call
/// is bounded by the configured request timeout.
pub struct MapsRankClient {
    client: Client,
    login: String,
    password: String,
    endpoint: Url,
    zoom: u8,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl MapsRankClient {
    /// Creates a client pointed at the production API with retries disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        login: &str,
        password: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(login, password, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built, or
    /// [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        login: &str,
        password: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(MAPS_LIVE_PATH))
            .map_err(|e| ProviderError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            login: login.to_owned(),
            password: password.to_owned(),
            endpoint,
            zoom: DEFAULT_ZOOM,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Builds a client from application config, including its retry policy.
    ///
    /// # Errors
    ///
    /// See [`MapsRankClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        Ok(Self::with_base_url(
            &config.provider_login,
            &config.provider_password,
            config.provider_timeout_secs,
            &config.user_agent,
            &config.provider_base_url,
        )?
        .with_retry_policy(config.provider_max_retries, config.provider_backoff_base_ms))
    }

    /// Sets the number of extra attempts on transient errors and the base
    /// back-off delay in milliseconds.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Sets the map zoom level sent with coordinate queries.
    #[must_use]
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Formats a coordinate the way the endpoint expects: `lat,lng,<zoom>z`.
    fn location_coordinate(&self, lat: f64, lng: f64) -> String {
        format!("{lat:.7},{lng:.7},{}z", self.zoom)
    }

    async fn run_task(&self, task: &MapsTaskRequest<'_>) -> Result<Vec<MapsItem>, ProviderError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || self.post_task(task)).await
    }

    /// Posts one task and unwraps the envelope.
    ///
    /// Returns an empty list when the provider reports no results for the
    /// location.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::RateLimited`] on HTTP 429.
    /// - [`ProviderError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ProviderError::Api`] when the envelope or task status is not OK.
    /// - [`ProviderError::Deserialize`] when the body is not the expected shape.
    async fn post_task(&self, task: &MapsTaskRequest<'_>) -> Result<Vec<MapsItem>, ProviderError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(&self.login, Some(&self.password))
            .json(&[task])
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ProviderError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        let envelope: MapsResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
                context: format!("maps task for '{}'", task.keyword),
                source: e,
            })?;

        if envelope.status_code != STATUS_OK {
            return Err(ProviderError::Api {
                status_code: envelope.status_code,
                message: envelope.status_message,
            });
        }

        let Some(task_result) = envelope.tasks.and_then(|tasks| tasks.into_iter().next()) else {
            return Err(ProviderError::Api {
                status_code: envelope.status_code,
                message: "response contained no tasks".to_owned(),
            });
        };

        if task_result.status_code == STATUS_NO_RESULTS {
            tracing::debug!(keyword = task.keyword, "provider reported no results");
            return Ok(Vec::new());
        }
        if task_result.status_code != STATUS_OK {
            return Err(ProviderError::Api {
                status_code: task_result.status_code,
                message: task_result.status_message,
            });
        }

        Ok(task_result
            .result
            .and_then(|results| results.into_iter().next())
            .and_then(|r| r.items)
            .unwrap_or_default())
    }
}

#[async_trait]
impl RankProvider for MapsRankClient {
    async fn rank_items(
        &self,
        keyword: &str,
        lat: f64,
        lng: f64,
        depth: u32,
    ) -> Result<Vec<RankItem>, ProviderError> {
        let task = MapsTaskRequest {
            keyword,
            location_coordinate: Some(self.location_coordinate(lat, lng)),
            location_name: None,
            language_code: LANGUAGE_CODE,
            depth,
        };
        let items = self.run_task(&task).await?;
        Ok(items
            .into_iter()
            .filter_map(MapsItem::into_rank_item)
            .collect())
    }
}

#[async_trait]
impl BusinessLookup for MapsRankClient {
    /// Searches the business name within the normalized location and picks
    /// the first organic listing with coordinates whose title contains the
    /// name. No such listing means the business was not found.
    async fn lookup_business(
        &self,
        business_name: &str,
        location: &str,
    ) -> Result<Option<ResolvedBusiness>, ProviderError> {
        let location_name = normalize_location(location);
        let task = MapsTaskRequest {
            keyword: business_name,
            location_coordinate: None,
            location_name: Some(&location_name),
            language_code: LANGUAGE_CODE,
            depth: LOOKUP_DEPTH,
        };
        let items: Vec<RankItem> = self
            .run_task(&task)
            .await?
            .into_iter()
            .filter_map(MapsItem::into_rank_item)
            .filter(|item| {
                item.kind == ItemKind::Organic && item.lat.is_finite() && item.lng.is_finite()
            })
            .collect();

        let target = MatchTarget::new(None, Some(business_name.to_owned()));
        let chosen = match_business(&items, &target)
            .rank
            .and_then(|rank| items.get(rank as usize - 1));

        Ok(chosen.map(|item| ResolvedBusiness {
            lat: item.lat,
            lng: item.lng,
            place_id: Some(item.place_id.clone()).filter(|p| !p.is_empty()),
            title: item.title.clone(),
        }))
    }
}
