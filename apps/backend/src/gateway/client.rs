use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::{debug, warn};

use super::endpoints::{Operation, UpstreamEndpoints};
use super::envelope::{ChatMessage, InferenceEnvelope};
use super::response::UpstreamResponse;
use super::GatewayError;
use crate::logging::pii::body_preview;
use crate::state::model_selection::ModelSelection;

/// Reference timeout for every upstream call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(1200);

const OCTET_STREAM: &str = "application/octet-stream";
const JSON: &str = "application/json";

/// Shared client for the inference service.
///
/// Cheap to clone; every clone uses the same connection pool, timeout and
/// model selection.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    endpoints: Arc<UpstreamEndpoints>,
    models: ModelSelection,
}

/// Body attached to an outbound request.
struct Payload {
    content_type: &'static str,
    bytes: Bytes,
}

impl GatewayClient {
    pub fn new(
        endpoints: UpstreamEndpoints,
        models: ModelSelection,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::ClientSetup)?;

        Ok(Self {
            http,
            endpoints: Arc::new(endpoints),
            models,
        })
    }

    pub fn models(&self) -> &ModelSelection {
        &self.models
    }

    pub fn endpoints(&self) -> &UpstreamEndpoints {
        &self.endpoints
    }

    /// Forward a raw document for indexing under `storage_name`.
    pub async fn upload_document(
        &self,
        id: i64,
        title: &str,
        storage_name: &str,
        bytes: Bytes,
    ) -> Result<UpstreamResponse, GatewayError> {
        let headers = [
            ("title", title.to_string()),
            ("x-filename", storage_name.to_string()),
            ("id", id.to_string()),
        ];
        self.send(
            Operation::DocumentUpload,
            &headers,
            Some(Payload {
                content_type: OCTET_STREAM,
                bytes,
            }),
        )
        .await
    }

    /// Forward a JSON chat message to be stored in the caller's history.
    pub async fn upload_message(&self, id: i64, bytes: Bytes) -> Result<UpstreamResponse, GatewayError> {
        self.send(
            Operation::MessageUpload,
            &[("id", id.to_string())],
            Some(Payload {
                content_type: JSON,
                bytes,
            }),
        )
        .await
    }

    /// Ask for a completion. The model comes from the message or, failing
    /// that, the current selection at the moment this is called.
    pub async fn inference(
        &self,
        id: i64,
        deep_think: &str,
        message: ChatMessage,
        preamble: String,
    ) -> Result<UpstreamResponse, GatewayError> {
        let envelope = InferenceEnvelope::build(message, preamble, &self.models);
        // Serializing a struct of strings and an integer cannot fail
        let bytes = serde_json::to_vec(&envelope).map(Bytes::from).unwrap_or_default();

        self.send(
            Operation::Inference,
            &[("id", id.to_string()), ("deep_think", deep_think.to_string())],
            Some(Payload {
                content_type: JSON,
                bytes,
            }),
        )
        .await
    }

    pub async fn history(&self, id: i64) -> Result<UpstreamResponse, GatewayError> {
        self.send(Operation::History, &[("id", id.to_string())], None)
            .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<UpstreamResponse, GatewayError> {
        self.send(Operation::DeleteUser, &[("id", id.to_string())], None)
            .await
    }

    pub async fn delete_document(
        &self,
        id: i64,
        storage_name: &str,
    ) -> Result<UpstreamResponse, GatewayError> {
        let headers = [
            ("id", id.to_string()),
            ("x-filename", storage_name.to_string()),
        ];
        self.send(Operation::DeleteDocument, &headers, None).await
    }

    pub async fn delete_chat(&self, id: i64) -> Result<UpstreamResponse, GatewayError> {
        self.send(Operation::DeleteChat, &[("id", id.to_string())], None)
            .await
    }

    pub async fn list_models(&self) -> Result<UpstreamResponse, GatewayError> {
        self.send(Operation::ListModels, &[], None).await
    }

    async fn send(
        &self,
        op: Operation,
        headers: &[(&'static str, String)],
        payload: Option<Payload>,
    ) -> Result<UpstreamResponse, GatewayError> {
        if op.requires_body() && payload.as_ref().map_or(true, |p| p.bytes.is_empty()) {
            debug!(operation = op.as_str(), "empty payload, not forwarding");
            return Err(GatewayError::EmptyPayload);
        }

        let mut header_map = HeaderMap::with_capacity(headers.len() + 1);
        for &(name, ref value) in headers {
            let value =
                HeaderValue::from_str(value).map_err(|_| GatewayError::InvalidHeader(name))?;
            header_map.insert(HeaderName::from_static(name), value);
        }

        let url = self.endpoints.url_for(op);
        let method = op.method();
        let mut request = self.http.request(method.clone(), url.clone());

        let (body_len, preview) = match payload {
            Some(Payload {
                content_type,
                bytes,
            }) => {
                header_map.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                let summary = (bytes.len(), body_preview(Some(content_type), &bytes));
                request = request.body(bytes);
                summary
            }
            None => (0, String::new()),
        };

        debug!(
            operation = op.as_str(),
            %method,
            %url,
            headers = ?header_map.keys().map(HeaderName::as_str).collect::<Vec<_>>(),
            id = header_map.get("id").and_then(|v| v.to_str().ok()),
            body_len,
            body_preview = %preview,
            "upstream request"
        );

        let response = match request.headers(header_map).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(operation = op.as_str(), %url, error = %e, timeout = e.is_timeout(), "upstream request failed");
                return Err(GatewayError::UpstreamUnreachable(e));
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| {
            warn!(operation = op.as_str(), %url, status, error = %e, "upstream body read failed");
            GatewayError::UpstreamUnreachable(e)
        })?;

        debug!(
            operation = op.as_str(),
            status,
            content_type = content_type.as_deref(),
            body_len = body.len(),
            body_preview = %body_preview(content_type.as_deref(), &body),
            "upstream response"
        );

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
