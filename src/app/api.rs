// WolPanel - app/api.rs
//
// Client for the relay's REST API.
//
// `RelayApi` is the seam between the request managers and the network: the
// real implementation uses reqwest's blocking client and is only ever called
// from background threads; tests substitute an in-memory fake.

use crate::core::model::{
    ClientConfig, ConfigDocument, LogsResponse, RelayLogRecord, SaveResponse,
};
use crate::util::constants::{CONFIG_ENDPOINT, LOGS_ENDPOINT};
use crate::util::error::ApiError;
use std::time::Duration;

/// Operations the panel needs from the relay.
pub trait RelayApi: Send + Sync {
    /// `GET /api/config`: the full client list.
    fn fetch_config(&self) -> Result<Vec<ClientConfig>, ApiError>;

    /// `POST /api/config`: replace the full client list.
    fn save_config(&self, document: &ConfigDocument) -> Result<SaveResponse, ApiError>;

    /// `GET /api/logs`: log records produced since the previous call.
    fn fetch_logs(&self) -> Result<Vec<RelayLogRecord>, ApiError>;
}

/// `RelayApi` over HTTP.
pub struct HttpRelayApi {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpRelayApi {
    /// Create a client for the relay at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Client { source })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Check the status and decode a JSON body.
    fn decode<T: serde::de::DeserializeOwned>(
        url: String,
        response: reqwest::blocking::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }
        response
            .json::<T>()
            .map_err(|source| ApiError::Decode { url, source })
    }
}

impl RelayApi for HttpRelayApi {
    fn fetch_config(&self) -> Result<Vec<ClientConfig>, ApiError> {
        let url = self.url(CONFIG_ENDPOINT);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let document: ConfigDocument = Self::decode(url, response)?;
        tracing::debug!(clients = document.clients.len(), "Fetched client config");
        Ok(document.clients)
    }

    fn save_config(&self, document: &ConfigDocument) -> Result<SaveResponse, ApiError> {
        let url = self.url(CONFIG_ENDPOINT);
        let response = self
            .client
            .post(&url)
            .json(document)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let reply: SaveResponse = Self::decode(url, response)?;
        tracing::debug!(
            clients = document.clients.len(),
            success = reply.success,
            "Posted client config"
        );
        Ok(reply)
    }

    fn fetch_logs(&self) -> Result<Vec<RelayLogRecord>, ApiError> {
        let url = self.url(LOGS_ENDPOINT);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let body: LogsResponse = Self::decode(url, response)?;
        Ok(body.logs)
    }
}
