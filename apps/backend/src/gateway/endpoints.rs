use reqwest::{Method, Url};

use super::GatewayError;

pub const DEFAULT_PIPELINE_BASE: &str = "http://ml_pipeline:3030";
pub const DEFAULT_MODEL_REGISTRY_BASE: &str = "http://ollama:11434";

/// The upstream operations the gateway knows how to forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    DocumentUpload,
    MessageUpload,
    Inference,
    History,
    DeleteUser,
    DeleteDocument,
    DeleteChat,
    ListModels,
}

impl Operation {
    pub fn method(&self) -> Method {
        match self {
            Self::DocumentUpload | Self::MessageUpload => Method::POST,
            // The pipeline reads the inference envelope from a GET body
            Self::Inference | Self::History | Self::ListModels => Method::GET,
            Self::DeleteUser | Self::DeleteDocument | Self::DeleteChat => Method::DELETE,
        }
    }

    pub const fn path(&self) -> &'static str {
        match self {
            Self::DocumentUpload => "/api/document/upload",
            Self::MessageUpload => "/api/message/upload",
            Self::Inference => "/api/message/inference",
            Self::History => "/api/message/history",
            Self::DeleteUser => "/api/delete/user",
            Self::DeleteDocument => "/api/delete/document",
            Self::DeleteChat => "/api/delete/history",
            Self::ListModels => "/api/tags",
        }
    }

    /// Operations that must never be sent with an empty body.
    pub const fn requires_body(&self) -> bool {
        matches!(
            self,
            Self::DocumentUpload | Self::MessageUpload | Self::Inference
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentUpload => "document_upload",
            Self::MessageUpload => "message_upload",
            Self::Inference => "inference",
            Self::History => "history",
            Self::DeleteUser => "delete_user",
            Self::DeleteDocument => "delete_document",
            Self::DeleteChat => "delete_chat",
            Self::ListModels => "list_models",
        }
    }
}

/// Base URLs of the two upstream services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoints {
    /// ML pipeline: documents, messages, inference, history, deletions
    pub pipeline_base: Url,
    /// Model registry: model listing
    pub model_registry_base: Url,
}

impl UpstreamEndpoints {
    pub fn parse(pipeline_base: &str, model_registry_base: &str) -> Result<Self, GatewayError> {
        Ok(Self {
            pipeline_base: parse_base(pipeline_base)?,
            model_registry_base: parse_base(model_registry_base)?,
        })
    }

    /// Full URL for `op`. Any path prefix on the base is kept.
    pub fn url_for(&self, op: Operation) -> Url {
        let base = match op {
            Operation::ListModels => &self.model_registry_base,
            _ => &self.pipeline_base,
        };
        let mut url = base.clone();
        let path = format!("{}{}", base.path().trim_end_matches('/'), op.path());
        url.set_path(&path);
        url
    }
}

fn parse_base(raw: &str) -> Result<Url, GatewayError> {
    let invalid = |reason: String| GatewayError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http(s) base URL".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("base URL must not carry a query or fragment".to_string()));
    }
    Ok(url)
}
