//! # Backend Client
//!
//! The page talks to exactly two backend endpoints. [`ReservationApi`] is the
//! seam the widgets depend on; [`HttpReservationApi`] is the `reqwest`
//! implementation used outside of tests.
//!
//! Both endpoints report failures as a JSON object with an `error` field and a
//! 4xx/5xx status, so bodies are decoded regardless of the status code and the
//! `error` field is interpreted by the caller.

use async_trait::async_trait;
use mockall::automock;
use pianoroom_core::{
    errors::{ClientError, ClientResult},
    models::{
        availability::{AvailabilityQuery, AvailabilityResponse},
        server_time::ServerTimeResponse,
    },
};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::ClientConfig;

pub const AVAILABILITY_PATH: &str = "/reservation/check-availability";
pub const SERVER_TIME_PATH: &str = "/admin/system/server-time";

#[automock]
#[async_trait]
pub trait ReservationApi: Send + Sync {
    /// `GET /reservation/check-availability?room_id={id}&date={YYYY-MM-DD}`
    async fn check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> ClientResult<AvailabilityResponse>;

    /// `GET /admin/system/server-time`
    async fn server_time(&self) -> ClientResult<ServerTimeResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpReservationApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpReservationApi {
    /// Builds the underlying `reqwest::Client` from `config`.
    ///
    /// # Errors
    ///
    /// * `ClientError::Validation` - the session cookie is not a valid header value
    /// * `ClientError::Transport` - the HTTP client could not be initialised
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie).map_err(|_| {
                ClientError::Validation("session cookie is not a valid header value".to_string())
            })?;
            headers.insert(COOKIE, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::transport)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn fetch_json<T>(&self, request: reqwest::RequestBuilder) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(ClientError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ClientError::transport)?;
        debug!(%status, bytes = body.len(), "Received backend response");

        serde_json::from_str(&body).map_err(ClientError::transport)
    }
}

#[async_trait]
impl ReservationApi for HttpReservationApi {
    async fn check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> ClientResult<AvailabilityResponse> {
        info!(room_id = %query.room_id, date = %query.date, "Checking room availability");
        let request = self
            .client
            .get(self.config.endpoint(AVAILABILITY_PATH))
            .query(query);
        self.fetch_json(request).await
    }

    async fn server_time(&self) -> ClientResult<ServerTimeResponse> {
        info!("Probing server time");
        let request = self.client.get(self.config.endpoint(SERVER_TIME_PATH));
        self.fetch_json(request).await
    }
}
