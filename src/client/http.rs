//! HTTP implementation of the Booking Service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;

use crate::client::BookingService;
use crate::client::classify::{classify_booking, classify_query};
use crate::config::ServiceConfig;
use crate::credentials::Credentials;
use crate::domain::{BookingResult, PollOutcome, SlotRecord};
use crate::error::{Result, SlotwatchError};

/// Booking request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookingRequest<'a> {
    locale_id: &'a str,
    data: BookingData<'a>,
}

#[derive(Debug, Serialize)]
struct BookingData<'a> {
    effectdate: &'a str,
    newonbrdtcity: Option<&'a str>,
    onbrdaddress: Option<&'a str>,
}

/// reqwest-backed Booking Service client with bounded connect/read timeouts
pub struct HttpBookingClient {
    client: Client,
    config: ServiceConfig,
}

impl HttpBookingClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()
            .map_err(|e| SlotwatchError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl BookingService for HttpBookingClient {
    async fn query_available_slots(&self, credentials: &Credentials) -> PollOutcome {
        log::debug!("POST {}", self.config.query_url);
        let response = match self
            .client
            .post(&self.config.query_url)
            .headers(credentials.headers().clone())
            .json(&json!({}))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return PollOutcome::TransientError(format!("request failed: {}", e)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return PollOutcome::TransientError(format!("failed to read body: {}", e)),
        };

        classify_query(status, &body)
    }

    async fn submit_booking(&self, credentials: &Credentials, slot: &SlotRecord) -> BookingResult {
        let request = BookingRequest {
            locale_id: &self.config.locale_id,
            data: BookingData {
                effectdate: &slot.date,
                newonbrdtcity: slot.city_id.as_deref(),
                onbrdaddress: slot.address.as_deref(),
            },
        };

        log::debug!("POST {} for {}", self.config.book_url, slot.date);
        let response = match self
            .client
            .post(&self.config.book_url)
            .headers(credentials.headers().clone())
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return BookingResult::NetworkError(format!("request failed: {}", e)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return BookingResult::NetworkError(format!("failed to read body: {}", e)),
        };

        classify_booking(status, &body, &slot.date)
    }
}
