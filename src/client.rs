use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};

use crate::fetch_error::FetchError;
use crate::models::{
    CitiesResponse, City, CitySuggestion, CitySuggestionsResponse, HealthStatus,
    WeatherDataResponse,
};

/// Minimum query length before the suggestion endpoint is consulted
pub const MIN_SUGGESTION_QUERY_LEN: usize = 2;

/// Typed client for the weather dashboard backend
#[derive(Clone)]
pub struct WeatherApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl WeatherApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_cities(&self) -> Result<Vec<City>, FetchError> {
        debug!("Requesting city list");
        let response = self
            .client
            .get(format!("{}/api/cities", self.base_url))
            .send()
            .await?;

        let body: CitiesResponse = Self::decode(response).await?;
        if !body.success {
            return Err(Self::api_error(body.error, "Failed to load cities"));
        }

        debug!("Loaded {} cities", body.cities.len());
        Ok(body.cities)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_weather_data(
        &self,
        city: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<WeatherDataResponse, FetchError> {
        let start = start_date.format("%Y-%m-%d").to_string();
        let end = end_date.format("%Y-%m-%d").to_string();

        debug!("Requesting weather data for '{}' from {} to {}", city, start, end);
        let response = self
            .client
            .get(format!("{}/api/weather-data", self.base_url))
            .query(&[("city", city), ("start_date", start.as_str()), ("end_date", end.as_str())])
            .send()
            .await?;

        let body: WeatherDataResponse = Self::decode(response).await?;
        if !body.success {
            if !body.suggestions.is_empty() {
                debug!("Backend suggestions: {:?}", body.suggestions);
            }
            return Err(Self::api_error(body.error, "Failed to load weather data"));
        }

        debug!(
            "Received {} records for '{}' (source: {:?})",
            body.data.len(),
            city,
            body.source
        );
        Ok(body)
    }

    /// Look up cities matching a partial name; short queries return nothing without a request
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_city_suggestions(
        &self,
        query: &str,
    ) -> Result<Vec<CitySuggestion>, FetchError> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGESTION_QUERY_LEN {
            debug!("Suggestion query too short, skipping request");
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(format!("{}/api/city-suggestions", self.base_url))
            .query(&[("q", query)])
            .send()
            .await?;

        let body: CitySuggestionsResponse = Self::decode(response).await?;
        if !body.success {
            return Err(Self::api_error(body.error, "Failed to load city suggestions"));
        }

        Ok(body.suggestions)
    }

    /// Backend health; a 503 still carries a status body and is returned as unhealthy
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn health(&self) -> Result<HealthStatus, FetchError> {
        let response = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 503 {
            let text = response.text().await?;
            warn!("Backend reported unhealthy");
            return serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()));
        }

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        let text = response.text().await?;
        if !status.is_success() {
            error!("Request failed with status {}", status);
            debug!(
                "Response preview (first 200 chars): {}",
                text.chars().take(200).collect::<String>()
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: Self::error_message(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            error!("Failed to decode response body: {}", e);
            FetchError::Decode(e.to_string())
        })
    }

    /// Pull the `error` field out of a JSON error body, else fall back to the raw text
    fn error_message(text: &str) -> String {
        serde_json::from_str::<serde_json::Value>(text)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| text.trim().to_string())
    }

    fn api_error(message: Option<String>, fallback: &str) -> FetchError {
        let message = message.unwrap_or_else(|| fallback.to_string());
        warn!("API returned success=false: {}", message);
        FetchError::Api(message)
    }
}
