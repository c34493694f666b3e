//! HTTP gateway to the ticketing backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use metrodesk_api::envelope;

use crate::config::DeskConfig;
use crate::session::Session;
use crate::signal::{Signal, SignalBus};
use crate::{DeskError, Result};

/// Transport seam between the resource layer and the HTTP client.
///
/// Every call resolves to the decoded JSON body. Authentication and the 401
/// side effects live behind this trait, so callers never see a credential.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value>;
    async fn post(&self, path: &str, body: Value) -> Result<Value>;
    async fn patch(&self, path: &str, body: Value) -> Result<Value>;
    async fn put(&self, path: &str, body: Value) -> Result<Value>;
    async fn delete(&self, path: &str) -> Result<Value>;
}

/// HTTP implementation of [`Backend`].
///
/// Attaches the session bearer credential to every request. A 401 response
/// drops the credential, emits [`Signal::SessionExpired`] and surfaces as
/// [`DeskError::Unauthorized`]; any other non-2xx status carries the
/// backend's failure message.
pub struct Gateway {
    http: Client,
    base_url: String,
    session: Arc<Session>,
    bus: Arc<SignalBus>,
}

impl Gateway {
    pub fn new(config: &DeskConfig, session: Arc<Session>, bus: Arc<SignalBus>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            session,
            bus,
        })
    }

    #[tracing::instrument(skip(self, body), fields(method = %method, path))]
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(target = "gateway", "{} {}", method, url);

        let mut req = self.http.request(method, &url);
        if let Some(token) = self.session.token().await {
            req = req.bearer_auth(token);
        }
        if let Some(body) = &body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(target = "gateway", "401 from {}, dropping credential", path);
            if let Err(e) = self.session.clear().await {
                warn!(target = "gateway", "failed to drop credential: {}", e);
            }
            self.bus.emit(Signal::SessionExpired);
            return Err(DeskError::Unauthorized);
        }

        if !status.is_success() {
            let message = match resp.json::<Value>().await {
                Ok(v) => envelope::failure_message(&v),
                Err(_) => format!("HTTP {}", status.as_u16()),
            };
            return Err(DeskError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Backend for Gateway {
    async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, None).await
    }
}
