//! In-process store used when no database is configured, and by tests.

use super::Store;
use crate::error::AppError;
use crate::model::{Account, AccountId, NewSnippet, Snippet, SnippetChanges, SnippetId};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    snippets: BTreeMap<SnippetId, Snippet>,
    next_account_id: AccountId,
    next_snippet_id: SnippetId,
}

/// Ids are assigned sequentially from 1, so map order is creation order.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.tables.read().await.accounts.values().cloned().collect())
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, AppError> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn find_account(&self, username: &str) -> Result<Option<Account>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.username == username).cloned())
    }

    async fn create_account(&self, username: &str, password_hash: &str) -> Result<Account, AppError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.values().any(|a| a.username == username) {
            return Err(AppError::Conflict(format!("username '{}' already exists", username)));
        }
        tables.next_account_id += 1;
        let account = Account {
            id: tables.next_account_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            date_joined: Utc::now(),
        };
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn snippet_ids_by_owner(&self) -> Result<HashMap<AccountId, Vec<SnippetId>>, AppError> {
        let tables = self.tables.read().await;
        let mut by_owner: HashMap<AccountId, Vec<SnippetId>> = HashMap::new();
        for snippet in tables.snippets.values() {
            by_owner.entry(snippet.owner).or_default().push(snippet.id);
        }
        Ok(by_owner)
    }

    async fn list_snippets(&self) -> Result<Vec<Snippet>, AppError> {
        Ok(self.tables.read().await.snippets.values().cloned().collect())
    }

    async fn get_snippet(&self, id: SnippetId) -> Result<Option<Snippet>, AppError> {
        Ok(self.tables.read().await.snippets.get(&id).cloned())
    }

    async fn insert_snippet(&self, new: NewSnippet) -> Result<Snippet, AppError> {
        let mut tables = self.tables.write().await;
        // Mirrors the NOT NULL foreign key on snippets.owner_id.
        let owner_username = tables
            .accounts
            .get(&new.owner)
            .map(|a| a.username.clone())
            .ok_or_else(|| AppError::Conflict(format!("owner {} does not exist", new.owner)))?;
        tables.next_snippet_id += 1;
        let snippet = Snippet {
            id: tables.next_snippet_id,
            created: Utc::now(),
            title: new.title,
            code: new.code,
            linenos: new.linenos,
            language: new.language,
            style: new.style,
            owner: new.owner,
            owner_username,
            highlighted: new.highlighted,
        };
        tables.snippets.insert(snippet.id, snippet.clone());
        Ok(snippet)
    }

    async fn update_snippet(&self, id: SnippetId, changes: SnippetChanges) -> Result<Option<Snippet>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(snippet) = tables.snippets.get_mut(&id) else {
            return Ok(None);
        };
        snippet.title = changes.title;
        snippet.code = changes.code;
        snippet.linenos = changes.linenos;
        snippet.language = changes.language;
        snippet.style = changes.style;
        snippet.highlighted = changes.highlighted;
        Ok(Some(snippet.clone()))
    }

    async fn delete_snippet(&self, id: SnippetId) -> Result<bool, AppError> {
        Ok(self.tables.write().await.snippets.remove(&id).is_some())
    }
}
