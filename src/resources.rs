//! The two resources served by the generic views and viewsets.

use crate::error::AppError;
use crate::extractors::Payload;
use crate::model::{Account, AccountId, Snippet};
use crate::permissions::Owned;
use crate::serializers::{SnippetInput, SnippetRepr, SnippetSerializer, UserRepr, UserSerializer};
use crate::state::AppState;
use crate::views::{Resource, WritableResource};
use async_trait::async_trait;

/// Render the highlighted page for validated input.
pub fn render_highlight(state: &AppState, input: &SnippetInput) -> Result<String, AppError> {
    state
        .highlighter
        .render(&input.title, &input.code, input.language, input.style, input.linenos)
}

pub struct SnippetResource;

#[async_trait]
impl Resource for SnippetResource {
    type Record = Snippet;
    type Repr = SnippetRepr;

    async fn all(state: &AppState) -> Result<Vec<Snippet>, AppError> {
        state.store.list_snippets().await
    }

    async fn get(state: &AppState, pk: i64) -> Result<Option<Snippet>, AppError> {
        state.store.get_snippet(pk).await
    }

    fn owner(record: &Snippet) -> Option<AccountId> {
        Some(record.owner_id())
    }

    async fn represent(_state: &AppState, records: &[Snippet]) -> Result<Vec<SnippetRepr>, AppError> {
        Ok(SnippetSerializer::many(records))
    }
}

#[async_trait]
impl WritableResource for SnippetResource {
    type Input = SnippetInput;

    fn validate(payload: &Payload, instance: Option<&Snippet>, partial: bool) -> Result<SnippetInput, AppError> {
        SnippetSerializer::validate(payload, instance, partial)
    }

    async fn insert(state: &AppState, input: SnippetInput, owner: &Account) -> Result<Snippet, AppError> {
        let highlighted = render_highlight(state, &input)?;
        let snippet = state.store.insert_snippet(input.into_new(owner.id, highlighted)).await?;
        tracing::info!(snippet_id = snippet.id, owner = %owner.username, "snippet created");
        Ok(snippet)
    }

    async fn save(state: &AppState, instance: &Snippet, input: SnippetInput) -> Result<Snippet, AppError> {
        let highlighted = render_highlight(state, &input)?;
        state
            .store
            .update_snippet(instance.id, input.into_changes(highlighted))
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn remove(state: &AppState, instance: &Snippet) -> Result<(), AppError> {
        if state.store.delete_snippet(instance.id).await? {
            tracing::info!(snippet_id = instance.id, "snippet deleted");
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }
}

/// Accounts, read-only, each listing the ids of the snippets it owns.
pub struct UserResource;

#[async_trait]
impl Resource for UserResource {
    type Record = Account;
    type Repr = UserRepr;

    async fn all(state: &AppState) -> Result<Vec<Account>, AppError> {
        state.store.list_accounts().await
    }

    async fn get(state: &AppState, pk: i64) -> Result<Option<Account>, AppError> {
        state.store.get_account(pk).await
    }

    async fn represent(state: &AppState, records: &[Account]) -> Result<Vec<UserRepr>, AppError> {
        let by_owner = state.store.snippet_ids_by_owner().await?;
        Ok(UserSerializer::many(records, &by_owner))
    }
}
