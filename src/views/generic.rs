//! Resource-aware base view: queryset access and permission-checked object lookup.

use super::pagination::LimitOffsetPagination;
use super::request::ApiRequest;
use super::View;
use crate::error::AppError;
use crate::extractors::Payload;
use crate::model::{Account, AccountId};
use crate::permissions::check_object_permissions;
use crate::state::AppState;
use async_trait::async_trait;
use serde::Serialize;

/// A kind of record a generic view can serve.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Record: Send + Sync + 'static;
    type Repr: Serialize + Send + 'static;

    async fn all(state: &AppState) -> Result<Vec<Self::Record>, AppError>;

    async fn get(state: &AppState, pk: i64) -> Result<Option<Self::Record>, AppError>;

    /// Owner checked by object permissions; `None` for unowned records.
    fn owner(_record: &Self::Record) -> Option<AccountId> {
        None
    }

    async fn represent(state: &AppState, records: &[Self::Record]) -> Result<Vec<Self::Repr>, AppError>;

    async fn represent_one(state: &AppState, record: &Self::Record) -> Result<Self::Repr, AppError> {
        Self::represent(state, std::slice::from_ref(record))
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::NotFound)
    }
}

/// A resource clients can create, update and delete.
#[async_trait]
pub trait WritableResource: Resource {
    type Input: Send + 'static;

    /// `instance` is the record being updated; `partial` relaxes required fields.
    fn validate(payload: &Payload, instance: Option<&Self::Record>, partial: bool) -> Result<Self::Input, AppError>;

    async fn insert(state: &AppState, input: Self::Input, owner: &Account) -> Result<Self::Record, AppError>;

    async fn save(state: &AppState, instance: &Self::Record, input: Self::Input) -> Result<Self::Record, AppError>;

    async fn remove(state: &AppState, instance: &Self::Record) -> Result<(), AppError>;
}

#[async_trait]
pub trait GenericApiView<R: Resource>: View {
    async fn get_queryset(&self, req: &ApiRequest) -> Result<Vec<R::Record>, AppError> {
        R::all(&req.state).await
    }

    /// Record named by the `pk` path parameter, after object-level permission checks.
    async fn get_object(&self, req: &ApiRequest) -> Result<R::Record, AppError> {
        let pk = req.pk()?;
        let record = R::get(&req.state, pk).await?.ok_or(AppError::NotFound)?;
        check_object_permissions(self.permissions(), &req.method, &req.identity, R::owner(&record))?;
        Ok(record)
    }

    /// `None` disables pagination for this view.
    fn paginator(&self) -> Option<LimitOffsetPagination> {
        Some(LimitOffsetPagination::default())
    }
}
