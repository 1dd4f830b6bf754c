//! Reusable list/create/retrieve/update/destroy behaviour over [`GenericApiView`].
//!
//! A view opts into a behaviour with an empty `impl`, and may override the `perform_*` hooks.

use super::generic::{GenericApiView, Resource, WritableResource};
use super::request::ApiRequest;
use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

#[async_trait]
pub trait ListMixin<R: Resource>: GenericApiView<R> {
    async fn list(&self, req: &ApiRequest) -> Result<Response, AppError> {
        let records = self.get_queryset(req).await?;
        if let Some(page) = self.paginator().and_then(|p| p.page(&req.query, records.len())) {
            let results = R::represent(&req.state, page.slice(&records)).await?;
            return Ok(Json(page.into_body(req, results)).into_response());
        }
        Ok(Json(R::represent(&req.state, &records).await?).into_response())
    }
}

#[async_trait]
pub trait CreateMixin<R: WritableResource>: GenericApiView<R> {
    async fn create(&self, req: &ApiRequest) -> Result<Response, AppError> {
        let payload = req.payload()?;
        let input = R::validate(&payload, None, false)?;
        let record = self.perform_create(req, input).await?;
        let body = R::represent_one(&req.state, &record).await?;
        Ok((StatusCode::CREATED, Json(body)).into_response())
    }

    /// Persists with the requester as owner.
    async fn perform_create(&self, req: &ApiRequest, input: R::Input) -> Result<R::Record, AppError> {
        let owner = req.identity.require()?;
        R::insert(&req.state, input, owner).await
    }
}

#[async_trait]
pub trait RetrieveMixin<R: Resource>: GenericApiView<R> {
    async fn retrieve(&self, req: &ApiRequest) -> Result<Response, AppError> {
        let record = self.get_object(req).await?;
        Ok(Json(R::represent_one(&req.state, &record).await?).into_response())
    }
}

#[async_trait]
pub trait UpdateMixin<R: WritableResource>: GenericApiView<R> {
    async fn update(&self, req: &ApiRequest, partial: bool) -> Result<Response, AppError> {
        let instance = self.get_object(req).await?;
        let payload = req.payload()?;
        let input = R::validate(&payload, Some(&instance), partial)?;
        let record = self.perform_update(req, &instance, input).await?;
        Ok(Json(R::represent_one(&req.state, &record).await?).into_response())
    }

    async fn partial_update(&self, req: &ApiRequest) -> Result<Response, AppError> {
        self.update(req, true).await
    }

    async fn perform_update(&self, req: &ApiRequest, instance: &R::Record, input: R::Input) -> Result<R::Record, AppError> {
        R::save(&req.state, instance, input).await
    }
}

#[async_trait]
pub trait DestroyMixin<R: WritableResource>: GenericApiView<R> {
    async fn destroy(&self, req: &ApiRequest) -> Result<Response, AppError> {
        let instance = self.get_object(req).await?;
        self.perform_destroy(req, &instance).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn perform_destroy(&self, req: &ApiRequest, instance: &R::Record) -> Result<(), AppError> {
        R::remove(&req.state, instance).await
    }
}
