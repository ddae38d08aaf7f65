//! WidgetApiClient - REST client for the `/rag-widget/widget` endpoints.
//!
//! Every request carries the stored bearer token when one exists. Non-2xx
//! responses are turned into `WidgetError::Backend`, keeping the backend's
//! `detail` field so the orchestrator can show it verbatim.

use async_trait::async_trait;
use ragwidget_core::WidgetError;
use ragwidget_core::backend::{
    BulkScrapeReport, BulkScrapeRequest, QueryAnswer, QueryRequest, ScrapeReport, ScrapeRequest,
    UploadEventStream, UploadFile, WidgetBackend,
};
use ragwidget_core::config::WidgetConfig;
use ragwidget_core::identity::CredentialStore;
use ragwidget_core::knowledge::KnowledgeState;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the widget backend.
#[derive(Clone)]
pub struct WidgetApiClient {
    pub(crate) client: Client,
    /// Base of the widget endpoints, e.g. `http://localhost:8000/api/rag-widget/widget`.
    endpoint: String,
    credential_store: Option<Arc<dyn CredentialStore>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl WidgetApiClient {
    /// Creates a client for the given widget endpoint with default settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            credential_store: None,
        }
    }

    /// Creates a client from the runtime config, using its credential store
    /// for bearer authentication.
    pub fn from_config(config: &WidgetConfig, timeout: Duration) -> ragwidget_core::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WidgetError::config(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(
            "[WidgetApi] Initialized with endpoint: {}, timeout: {:?}",
            config.widget_endpoint(),
            timeout
        );

        Ok(Self {
            client,
            endpoint: config.widget_endpoint(),
            credential_store: Some(config.credential_store.clone()),
        })
    }

    /// Sets the credential store used for the `Authorization` header.
    pub fn with_credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credential_store = Some(store);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credential_store.as_ref().and_then(|s| s.load_token()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request and decodes a JSON success body.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ragwidget_core::Result<T> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                WidgetError::Serialization {
                    format: "JSON".to_string(),
                    message: e.to_string(),
                }
            } else {
                transport_error(e)
            }
        })
    }

    /// Sends a request, turning non-2xx statuses into `WidgetError::Backend`.
    async fn send(&self, request: RequestBuilder) -> ragwidget_core::Result<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }
}

/// Maps a reqwest failure that happened before a status was available.
pub(crate) fn transport_error(err: reqwest::Error) -> WidgetError {
    if err.is_timeout() {
        WidgetError::transport(format!("Request timed out: {}", err))
    } else {
        WidgetError::transport(err.to_string())
    }
}

/// Builds a `Backend` error, extracting the `detail` field when present.
///
/// Validation errors carry a structured `detail`; it is kept as compact JSON.
pub(crate) async fn error_from_response(response: Response) -> WidgetError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.detail)
        .map(|value| match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

    tracing::debug!("[WidgetApi] Backend returned {}: {}", status, body);
    WidgetError::backend(status, detail)
}

#[async_trait]
impl WidgetBackend for WidgetApiClient {
    async fn query(&self, request: &QueryRequest) -> ragwidget_core::Result<QueryAnswer> {
        self.send_json(self.client.post(self.url("/query")).json(request))
            .await
    }

    async fn scrape(&self, request: &ScrapeRequest) -> ragwidget_core::Result<ScrapeReport> {
        self.send_json(self.client.post(self.url("/scrape")).json(request))
            .await
    }

    async fn bulk_scrape(
        &self,
        request: &BulkScrapeRequest,
    ) -> ragwidget_core::Result<BulkScrapeReport> {
        self.send_json(self.client.post(self.url("/bulk-scrape")).json(request))
            .await
    }

    async fn knowledge_stats(&self) -> ragwidget_core::Result<KnowledgeState> {
        self.send_json(self.client.get(self.url("/knowledge-stats")))
            .await
    }

    async fn clear_knowledge(&self) -> ragwidget_core::Result<()> {
        self.send(self.client.delete(self.url("/clear-knowledge")))
            .await?;
        Ok(())
    }

    fn upload_file(&self, file: UploadFile) -> UploadEventStream {
        crate::upload::upload_stream(self.clone(), file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragwidget_core::identity::InMemoryCredentialStore;

    #[test]
    fn test_url_joins_endpoint_and_path() {
        let client = WidgetApiClient::new("http://localhost:8000/api/rag-widget/widget/");
        assert_eq!(
            client.url("/query"),
            "http://localhost:8000/api/rag-widget/widget/query"
        );
    }

    #[test]
    fn test_from_config_uses_widget_endpoint() {
        let config = WidgetConfig::new(
            "http://backend:9000/api",
            Arc::new(InMemoryCredentialStore::new()),
            None,
        );
        let client = WidgetApiClient::from_config(&config, DEFAULT_REQUEST_TIMEOUT).unwrap();
        assert_eq!(client.endpoint(), "http://backend:9000/api/rag-widget/widget");
    }
}
