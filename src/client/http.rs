//! HTTP client for the schedule REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use super::ScheduleApi;
use crate::api::{ErrorResponse, MessageResponse};
use crate::calendar::Event;
use crate::config::McpConfig;
use crate::error::{ApiError, Result};

/// Schedule API client over HTTP.
///
/// Every call is a single request; failures are never retried.
#[derive(Clone)]
pub struct HttpScheduleClient {
    client: Client,
    base_url: String,
}

impl HttpScheduleClient {
    /// Create a client for a base URL such as `http://127.0.0.1:8000`.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the adapter configuration.
    pub fn from_config(config: &McpConfig) -> Result<Self> {
        Self::new(&config.api_base_url, config.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("Calendar API request failed: {}", e);
            if e.is_timeout() {
                ApiError::Request("Request timed out".to_string())
            } else if e.is_connect() {
                ApiError::Request(format!("Connection failed: {}", e))
            } else {
                ApiError::Request(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => body.error,
            Err(_) => match serde_json::from_str::<serde_json::Value>(&text) {
                // FastAPI-style {"detail": ...}
                Ok(value) if value.get("detail").is_some() => value["detail"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| value["detail"].to_string()),
                _ => text,
            },
        };

        error!("Calendar API returned {}: {}", status, message);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        }
        .into())
    }

    async fn call<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;
        let value = response.json::<T>().await.map_err(ApiError::from)?;
        Ok(value)
    }
}

/// Path for a single schedule, with the id percent-encoded.
fn schedule_path(id: &str) -> String {
    format!("/schedules/{}", urlencoding::encode(id))
}

#[async_trait]
impl ScheduleApi for HttpScheduleClient {
    async fn info(&self) -> Result<serde_json::Value> {
        self.call::<_, ()>(Method::GET, "/", None).await
    }

    async fn list(&self) -> Result<Vec<Event>> {
        self.call::<_, ()>(Method::GET, "/schedules", None).await
    }

    async fn get(&self, id: &str) -> Result<Vec<Event>> {
        let path = schedule_path(id);
        self.call::<_, ()>(Method::GET, &path, None).await
    }

    async fn create(&self, event: &Event) -> Result<Event> {
        self.call(Method::POST, "/schedules", Some(event)).await
    }

    async fn update(&self, id: &str, event: &Event) -> Result<Event> {
        let path = schedule_path(id);
        self.call(Method::PUT, &path, Some(event)).await
    }

    async fn delete(&self, id: &str) -> Result<String> {
        let path = schedule_path(id);
        let response: MessageResponse = self.call::<_, ()>(Method::DELETE, &path, None).await?;
        Ok(response.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalendarError;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = HttpScheduleClient::new("http://127.0.0.1:8000/", 5).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_from_config() {
        let config = McpConfig::default();
        let client = HttpScheduleClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_schedule_path_encoding() {
        assert_eq!(
            schedule_path("mcp-event-1700000000000"),
            "/schedules/mcp-event-1700000000000"
        );
        assert_eq!(schedule_path("a b/c"), "/schedules/a%20b%2Fc");
    }

    #[tokio::test]
    async fn test_connection_failure_is_request_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = HttpScheduleClient::new("http://127.0.0.1:9", 2).unwrap();
        let err = client.list().await.unwrap_err();
        assert!(matches!(err, CalendarError::Api(ApiError::Request(_))));
    }
}
