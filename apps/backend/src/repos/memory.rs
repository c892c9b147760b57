use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{
    DocumentRecord, NewUser, SignupRequest, SignupSummary, Store, StoreError, UserRecord,
    UserSummary,
};

#[derive(Debug, Default)]
struct Tables {
    next_user_id: i64,
    users: BTreeMap<i64, UserRecord>,
    prompts: BTreeMap<i64, String>,
    documents: BTreeMap<i64, Vec<DocumentRecord>>,
    // Insertion order is kept so admins see the oldest request first
    signups: Vec<SignupRequest>,
}

impl Tables {
    fn user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.values().find(|u| u.email == email)
    }

    fn email_taken(&self, email: &str) -> bool {
        self.user_by_email(email).is_some() || self.signups.iter().any(|s| s.email == email)
    }

    fn require_user(&self, user_id: i64) -> Result<(), StoreError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(StoreError::UnknownUser(user_id))
        }
    }
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one administrator account.
    pub fn with_admin(admin: NewUser, prompt: &str) -> Result<Self, StoreError> {
        let store = Self::new();
        store.insert_user(admin, prompt)?;
        Ok(store)
    }

    fn insert_user(&self, new_user: NewUser, prompt: &str) -> Result<UserRecord, StoreError> {
        let mut tables = self.tables.write();
        if tables.user_by_email(&new_user.email).is_some() {
            return Err(StoreError::Conflict(new_user.email));
        }

        tables.next_user_id += 1;
        let record = UserRecord {
            id: tables.next_user_id,
            name: new_user.name,
            email: new_user.email,
            password: new_user.password,
            is_admin: new_user.is_admin,
            is_premium: new_user.is_premium,
        };
        tables.users.insert(record.id, record.clone());
        tables.prompts.insert(record.id, prompt.to_string());
        Ok(record)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.tables.read().user_by_email(email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .map(|u| UserSummary {
                email: u.email.clone(),
                is_admin: u.is_admin,
            })
            .collect())
    }

    async fn delete_user(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let mut tables = self.tables.write();
        let Some(id) = tables.user_by_email(email).map(|u| u.id) else {
            return Ok(None);
        };
        tables.prompts.remove(&id);
        tables.documents.remove(&id);
        Ok(tables.users.remove(&id))
    }

    async fn promote_user(&self, email: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write();
        match tables.users.values_mut().find(|u| u.email == email) {
            Some(user) => {
                user.is_admin = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn prompt_for(&self, user_id: i64) -> Result<Option<String>, StoreError> {
        Ok(self.tables.read().prompts.get(&user_id).cloned())
    }

    async fn set_prompt(&self, user_id: i64, text: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        tables.require_user(user_id)?;
        tables.prompts.insert(user_id, text.to_string());
        Ok(())
    }

    async fn list_documents(&self, user_id: i64) -> Result<Vec<DocumentRecord>, StoreError> {
        Ok(self
            .tables
            .read()
            .documents
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_document(
        &self,
        user_id: i64,
        original_name: &str,
        storage_name: &str,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        tables.require_user(user_id)?;
        let docs = tables.documents.entry(user_id).or_default();
        // Re-uploading the same file replaces its record
        docs.retain(|d| d.storage_name != storage_name);
        docs.push(DocumentRecord {
            original_name: original_name.to_string(),
            storage_name: storage_name.to_string(),
        });
        Ok(())
    }

    async fn delete_document(&self, user_id: i64, storage_name: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write();
        let Some(docs) = tables.documents.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|d| d.storage_name != storage_name);
        Ok(docs.len() != before)
    }

    async fn add_signup_request(&self, request: SignupRequest) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if tables.email_taken(&request.email) {
            return Err(StoreError::Conflict(request.email));
        }
        tables.signups.push(request);
        Ok(())
    }

    async fn list_signup_requests(&self) -> Result<Vec<SignupSummary>, StoreError> {
        Ok(self
            .tables
            .read()
            .signups
            .iter()
            .map(|s| SignupSummary {
                name: s.name.clone(),
                email: s.email.clone(),
            })
            .collect())
    }

    async fn take_signup_request(&self, email: &str) -> Result<Option<SignupRequest>, StoreError> {
        let mut tables = self.tables.write();
        let position = tables.signups.iter().position(|s| s.email == email);
        Ok(position.map(|i| tables.signups.remove(i)))
    }

    async fn create_user(&self, new_user: NewUser, prompt: &str) -> Result<UserRecord, StoreError> {
        self.insert_user(new_user, prompt)
    }
}
