//! Persistence for accounts and snippets. Every operation touches a single row.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, ensure_tables, PgStore};

use crate::error::AppError;
use crate::model::{Account, AccountId, NewSnippet, Snippet, SnippetChanges, SnippetId};
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait Store: Send + Sync {
    /// All accounts in creation order.
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError>;

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, AppError>;

    async fn find_account(&self, username: &str) -> Result<Option<Account>, AppError>;

    /// Fails with `Conflict` when the username is taken.
    async fn create_account(&self, username: &str, password_hash: &str) -> Result<Account, AppError>;

    /// Snippet ids grouped by owner, each list in creation order.
    async fn snippet_ids_by_owner(&self) -> Result<HashMap<AccountId, Vec<SnippetId>>, AppError>;

    /// All snippets in creation order.
    async fn list_snippets(&self) -> Result<Vec<Snippet>, AppError>;

    async fn get_snippet(&self, id: SnippetId) -> Result<Option<Snippet>, AppError>;

    async fn insert_snippet(&self, snippet: NewSnippet) -> Result<Snippet, AppError>;

    /// Returns `None` when the snippet no longer exists.
    async fn update_snippet(&self, id: SnippetId, changes: SnippetChanges) -> Result<Option<Snippet>, AppError>;

    /// Returns whether a row was removed.
    async fn delete_snippet(&self, id: SnippetId) -> Result<bool, AppError>;
}
