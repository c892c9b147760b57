use std::fmt;
use std::sync::Arc;

use super::default_prompt::DefaultPrompt;
use super::model_selection::ModelSelection;
use super::security_config::SecurityConfig;
use crate::gateway::GatewayClient;
use crate::repos::Store;

/// Shared resources handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    /// Session token key and lifetime
    pub security: SecurityConfig,
    /// Client for the inference service; holds the same `models` handle
    pub gateway: GatewayClient,
    pub models: ModelSelection,
    pub default_prompt: DefaultPrompt,
    pub store: Arc<dyn Store>,
    /// Largest accepted request body (document uploads)
    pub max_upload_bytes: usize,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("security", &self.security)
            .field("gateway", &self.gateway)
            .field("models", &self.models)
            .field("default_prompt", &self.default_prompt.path())
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish_non_exhaustive()
    }
}
