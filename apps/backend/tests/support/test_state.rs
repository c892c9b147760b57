//! Per-test application state backed by an httpmock upstream.

use std::sync::Arc;

use inference_gateway::gateway::UpstreamEndpoints;
use inference_gateway::infra::state::build_state;
use inference_gateway::repos::{MemoryStore, NewUser, SignupRequest, Store, UserRecord};
use inference_gateway::state::app_state::AppState;
use inference_gateway::state::default_prompt::DefaultPrompt;
use inference_gateway::state::security_config::SecurityConfig;
use tempfile::TempDir;
use httpmock::{Mock, MockServer};

use super::auth::bearer_header;

pub const TEST_SECRET: &str = "integration_test_secret_with_enough_bytes";
pub const DEFAULT_PROMPT_TEXT: &str = "Antworte immer auf Deutsch.";
pub const USER_PROMPT_TEXT: &str = "Antworte knapp.";
pub const USER_PASSWORD: &str = "user-password";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestContext {
    pub upstream: MockServer,
    pub state: AppState,
    pub admin: UserRecord,
    pub user: UserRecord,
    pub prompt_dir: TempDir,
}

impl TestContext {
    /// Fresh store with one admin and one regular user; both upstream bases
    /// point at the same mock server.
    pub async fn new() -> Self {
        let upstream = MockServer::start_async().await;
        let prompt_dir = tempfile::tempdir().expect("create temp dir");

        let store = MemoryStore::new();
        let admin = store
            .create_user(
                NewUser::admin("Admin", "admin@example.test", ADMIN_PASSWORD),
                DEFAULT_PROMPT_TEXT,
            )
            .await
            .expect("seed admin");
        let user = store
            .create_user(
                NewUser::from_signup(SignupRequest {
                    name: "Erika".to_string(),
                    email: "erika@example.test".to_string(),
                    password: USER_PASSWORD.to_string(),
                }),
                USER_PROMPT_TEXT,
            )
            .await
            .expect("seed user");

        let endpoints = UpstreamEndpoints::parse(&upstream.base_url(), &upstream.base_url())
            .expect("mock server url");
        let state = build_state()
            .with_security(SecurityConfig::new(TEST_SECRET))
            .with_endpoints(endpoints)
            .with_default_prompt(DefaultPrompt::new(
                DEFAULT_PROMPT_TEXT,
                prompt_dir.path().join("default_prompt.txt"),
            ))
            .with_store(Arc::new(store))
            .with_max_upload_bytes(1024 * 1024)
            .build()
            .await
            .expect("build state");

        Self {
            upstream,
            state,
            admin,
            user,
            prompt_dir,
        }
    }

    /// Matches any request; tests assert it was never hit.
    pub async fn upstream_tripwire(&self) -> Mock<'_> {
        self.upstream
            .mock_async(|when, then| {
                when.any_request();
                then.status(599);
            })
            .await
    }

    pub fn user_bearer(&self) -> String {
        bearer_header(&self.user, &self.state.security)
    }

    pub fn admin_bearer(&self) -> String {
        bearer_header(&self.admin, &self.state.security)
    }
}
