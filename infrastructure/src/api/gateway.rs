//! HTTP widget configuration gateway

use super::error::{HttpGatewayError, Result};
use super::protocol::{DuplicateRequest, Envelope, StoredResponse, rejection};
use crate::config::FileApiConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use widgetdesk_application::{
    ConfigId, GatewayError, StoredConfig, TestReport, ValidationReport, WidgetConfigGateway,
    WidgetConfigPayload,
};

/// Gateway implementation backed by the widget configuration REST API
pub struct HttpWidgetConfigGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpWidgetConfigGateway {
    /// Create a gateway for the service rooted at `base_url`
    pub fn new(base_url: &str, token: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(HttpGatewayError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        info!("HttpWidgetConfigGateway initialized for {}", base_url);

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Create a gateway from the `[api]` config section
    pub fn from_config(api: &FileApiConfig) -> Result<Self> {
        let timeout = (api.timeout_secs > 0).then(|| Duration::from_secs(api.timeout_secs));
        Self::new(&api.base_url, api.token.clone(), timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/widget-configs{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(HttpGatewayError::from)?;
        let status = response.status();
        let raw = response.text().await.map_err(HttpGatewayError::from)?;
        debug!("Service responded {} ({} bytes)", status, raw.len());

        if !status.is_success() {
            return Err(rejection(status.as_u16(), status.canonical_reason(), &raw));
        }

        serde_json::from_str::<Envelope<T>>(&raw)
            .map(Envelope::into_inner)
            .map_err(|error| HttpGatewayError::Parse { error, raw }.into())
    }
}

#[async_trait]
impl WidgetConfigGateway for HttpWidgetConfigGateway {
    async fn get(&self, id: &ConfigId) -> Result<WidgetConfigPayload, GatewayError> {
        debug!("GET widget config {}", id);
        self.send(self.client.get(self.url(&format!("/{id}"))))
            .await
    }

    async fn create(&self, payload: &WidgetConfigPayload) -> Result<StoredConfig, GatewayError> {
        debug!("POST widget config \"{}\"", payload.widget_name);
        self.send::<StoredResponse>(self.client.post(self.url("")).json(payload))
            .await
            .map(StoredConfig::from)
    }

    async fn update(
        &self,
        id: &ConfigId,
        payload: &WidgetConfigPayload,
    ) -> Result<WidgetConfigPayload, GatewayError> {
        debug!("PUT widget config {}", id);
        self.send(self.client.put(self.url(&format!("/{id}"))).json(payload))
            .await
    }

    async fn duplicate(&self, id: &ConfigId, new_name: &str) -> Result<StoredConfig, GatewayError> {
        debug!("POST duplicate of widget config {}", id);
        let body = DuplicateRequest {
            widget_name: new_name,
        };
        self.send::<StoredResponse>(
            self.client
                .post(self.url(&format!("/{id}/duplicate")))
                .json(&body),
        )
        .await
        .map(StoredConfig::from)
    }

    async fn validate(&self, payload: &WidgetConfigPayload) -> Result<ValidationReport, GatewayError> {
        debug!("POST validate widget config");
        self.send(self.client.post(self.url("/validate")).json(payload))
            .await
    }

    async fn test(&self, payload: &WidgetConfigPayload) -> Result<TestReport, GatewayError> {
        debug!("POST test widget config");
        self.send(self.client.post(self.url("/test")).json(payload))
            .await
    }
}
