//! Datastore contracts consumed by the HTTP handlers.
//!
//! Handlers only see [`Store`]; the shipped implementation is the in-memory
//! [`memory::MemoryStore`].

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::MemoryStore;

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Stored as given; hashing is not done here
    pub password: String,
    pub is_admin: bool,
    pub is_premium: bool,
}

/// Account fields for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
    pub is_premium: bool,
}

impl NewUser {
    /// Regular account created from an accepted signup request.
    pub fn from_signup(request: SignupRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
            is_admin: false,
            is_premium: false,
        }
    }

    /// Seeded administrator.
    pub fn admin(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            is_admin: true,
            is_premium: true,
        }
    }
}

/// Public view of an account; never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserSummary {
    pub email: String,
    pub is_admin: bool,
}

/// Pending signup as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    #[serde(alias = "name", rename = "Name")]
    pub name: String,
    #[serde(alias = "email", rename = "Email")]
    pub email: String,
    #[serde(alias = "password", rename = "Password")]
    pub password: String,
}

/// Public view of a pending signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignupSummary {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentRecord {
    pub original_name: String,
    pub storage_name: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("email {0} is already registered or pending")]
    Conflict(String),
    #[error("no account with id {0}")]
    UnknownUser(i64),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Lookups and writes the gateway needs from the account store.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError>;

    /// Remove the account together with its documents and preamble.
    async fn delete_user(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Grant admin; `false` when no such account exists.
    async fn promote_user(&self, email: &str) -> Result<bool, StoreError>;

    async fn prompt_for(&self, user_id: i64) -> Result<Option<String>, StoreError>;

    /// Fails with [`StoreError::UnknownUser`] once the account is gone.
    async fn set_prompt(&self, user_id: i64, text: &str) -> Result<(), StoreError>;

    async fn list_documents(&self, user_id: i64) -> Result<Vec<DocumentRecord>, StoreError>;

    /// Fails with [`StoreError::UnknownUser`] once the account is gone.
    async fn add_document(
        &self,
        user_id: i64,
        original_name: &str,
        storage_name: &str,
    ) -> Result<(), StoreError>;

    /// `false` when the caller owns no document with that storage name.
    async fn delete_document(&self, user_id: i64, storage_name: &str) -> Result<bool, StoreError>;

    /// Fails with [`StoreError::Conflict`] if the email is taken by an
    /// account or another pending request.
    async fn add_signup_request(&self, request: SignupRequest) -> Result<(), StoreError>;

    async fn list_signup_requests(&self) -> Result<Vec<SignupSummary>, StoreError>;

    async fn take_signup_request(&self, email: &str) -> Result<Option<SignupRequest>, StoreError>;

    /// Insert an account with its initial preamble.
    async fn create_user(&self, new_user: NewUser, prompt: &str) -> Result<UserRecord, StoreError>;
}
