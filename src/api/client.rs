use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use super::types::{ScreenPayload, ScreensResponse, SessionRequest, SessionResponse};
use super::SessionBackend;
use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};

const SCREENS_PATH: &str = "/api/screens";
const SESSION_PATH: &str = "/api/session";

/// reqwest-backed client for the agent's HTTP API
pub struct HttpBackend {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &ViewerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|source| ViewerError::Request {
                endpoint: config.server_url.clone(),
                source,
            })?;

        Ok(Self {
            base_url: config.server_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(ViewerError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| ViewerError::Request {
            endpoint: endpoint.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|e| ViewerError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl SessionBackend for HttpBackend {
    async fn list_screens(&self) -> Result<Vec<ScreenPayload>> {
        let endpoint = self.endpoint(SCREENS_PATH);
        let response = self
            .http
            .get(&endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ViewerError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        let payload: ScreensResponse = Self::read_json(&endpoint, response).await?;
        tracing::info!("Agent reports {} screen(s)", payload.screens.len());
        Ok(payload.screens)
    }

    async fn start_session(&self, offer: &str, screen: i32) -> Result<String> {
        let endpoint = self.endpoint(SESSION_PATH);
        let request = SessionRequest {
            offer: offer.to_string(),
            screen,
        };
        tracing::debug!("Posting offer for screen {}:\n{}", screen, offer);

        let response = self
            .http
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|source| ViewerError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        let payload: SessionResponse = Self::read_json(&endpoint, response).await?;
        tracing::debug!("Received answer:\n{}", payload.answer);
        Ok(payload.answer)
    }
}
