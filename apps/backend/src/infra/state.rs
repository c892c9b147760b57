use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::app::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PROMPT_PATH};
use crate::config::Config;
use crate::error::AppError;
use crate::gateway::client::DEFAULT_UPSTREAM_TIMEOUT;
use crate::gateway::endpoints::{DEFAULT_MODEL_REGISTRY_BASE, DEFAULT_PIPELINE_BASE};
use crate::gateway::{GatewayClient, UpstreamEndpoints};
use crate::repos::{MemoryStore, NewUser, Store};
use crate::state::app_state::AppState;
use crate::state::default_prompt::{DefaultPrompt, BUILTIN_PROMPT};
use crate::state::model_selection::{ModelSelection, DEFAULT_MODEL};
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    endpoints: Option<UpstreamEndpoints>,
    upstream_timeout: Duration,
    default_model: String,
    default_prompt: Option<DefaultPrompt>,
    store: Option<Arc<dyn Store>>,
    max_upload_bytes: usize,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            endpoints: None,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            default_model: DEFAULT_MODEL.to_string(),
            default_prompt: None,
            store: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Everything production needs: loads the default prompt file and seeds
    /// the administrator.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let security = SecurityConfig::new(&config.token_secret).with_session_ttl(config.session_ttl);
        let default_prompt = DefaultPrompt::load(config.default_prompt_path.clone()).await;

        let admin = NewUser::admin(
            config.admin_name.clone(),
            config.admin_email.clone(),
            config.admin_password.clone(),
        );
        let store = MemoryStore::with_admin(admin, &default_prompt.current())?;

        Ok(Self::new()
            .with_security(security)
            .with_endpoints(config.endpoints.clone())
            .with_upstream_timeout(config.upstream_timeout)
            .with_default_model(config.default_model.clone())
            .with_default_prompt(default_prompt)
            .with_store(Arc::new(store))
            .with_max_upload_bytes(config.max_upload_bytes))
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_endpoints(mut self, endpoints: UpstreamEndpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_default_prompt(mut self, prompt: DefaultPrompt) -> Self {
        self.default_prompt = Some(prompt);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let endpoints = match self.endpoints {
            Some(endpoints) => endpoints,
            None => UpstreamEndpoints::parse(DEFAULT_PIPELINE_BASE, DEFAULT_MODEL_REGISTRY_BASE)?,
        };

        let models = ModelSelection::new(self.default_model);
        let gateway = GatewayClient::new(endpoints, models.clone(), self.upstream_timeout)?;

        let default_prompt = self
            .default_prompt
            .unwrap_or_else(|| DefaultPrompt::new(BUILTIN_PROMPT, PathBuf::from(DEFAULT_PROMPT_PATH)));
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn Store>);

        Ok(AppState {
            security: self.security_config,
            gateway,
            models,
            default_prompt,
            store,
            max_upload_bytes: self.max_upload_bytes,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[tokio::test]
    async fn test_build_with_defaults() {
        let state = build_state().build().await.unwrap();
        assert_eq!(state.models.current(), "gemma3:12b");
        assert_eq!(state.default_prompt.current(), BUILTIN_PROMPT);
        assert!(state.store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_builder_defaults_match_config_defaults() {
        let state = build_state().build().await.unwrap();
        assert_eq!(state.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(state.default_prompt.path(), Path::new(DEFAULT_PROMPT_PATH));
    }

    #[tokio::test]
    async fn test_gateway_shares_model_selection() {
        let state = build_state().with_default_model("m1").build().await.unwrap();
        state.models.select("m2");
        assert_eq!(state.gateway.models().current(), "m2");
    }

    #[tokio::test]
    async fn test_from_config_seeds_admin_and_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_lookup(|name| match name {
            "GATEWAY_TOKEN_SECRET" => Some("0123456789abcdef0123456789abcdef".to_string()),
            "ADMIN_EMAIL" => Some("root@example.test".to_string()),
            "ADMIN_PASSWORD" => Some("pw".to_string()),
            "DEFAULT_PROMPT_PATH" => Some(
                dir.path()
                    .join("default_prompt.txt")
                    .to_string_lossy()
                    .into_owned(),
            ),
            _ => None,
        })
        .unwrap();

        let state = StateBuilder::from_config(&config).await.unwrap().build().await.unwrap();

        let admin = state
            .store
            .find_user_by_email("root@example.test")
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_admin);
        assert_eq!(
            state.store.prompt_for(admin.id).await.unwrap().as_deref(),
            Some(BUILTIN_PROMPT)
        );
        assert!(dir.path().join("default_prompt.txt").exists());
    }
}
