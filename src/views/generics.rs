//! Mixins pre-assembled into endpoint types, configured by resource type and permissions.

use super::api_view::{ApiView, LIST_CREATE, READ_ONLY, RETRIEVE_UPDATE_DESTROY};
use super::generic::{GenericApiView, Resource, WritableResource};
use super::mixins::{CreateMixin, DestroyMixin, ListMixin, RetrieveMixin, UpdateMixin};
use super::request::ApiRequest;
use super::View;
use crate::error::AppError;
use crate::permissions::Permission;
use async_trait::async_trait;
use axum::{http::Method, response::Response};
use std::marker::PhantomData;

macro_rules! generic_view {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<R> {
            name: &'static str,
            permissions: &'static [&'static dyn Permission],
            _resource: PhantomData<fn() -> R>,
        }

        impl<R: Resource> $name<R> {
            pub fn new(name: &'static str) -> Self {
                $name {
                    name,
                    permissions: &[],
                    _resource: PhantomData,
                }
            }

            pub fn with_permissions(mut self, permissions: &'static [&'static dyn Permission]) -> Self {
                self.permissions = permissions;
                self
            }
        }

        impl<R: Resource> View for $name<R> {
            fn name(&self) -> &'static str {
                self.name
            }

            fn permissions(&self) -> &'static [&'static dyn Permission] {
                self.permissions
            }
        }

        impl<R: Resource> GenericApiView<R> for $name<R> {}
    };
}

generic_view!(
    /// GET collection.
    ListApiView
);
generic_view!(
    /// GET one record.
    RetrieveApiView
);
generic_view!(
    /// GET collection, POST to create.
    ListCreateApiView
);
generic_view!(
    /// GET, PUT, PATCH and DELETE on one record.
    RetrieveUpdateDestroyApiView
);

impl<R: Resource> ListMixin<R> for ListApiView<R> {}

#[async_trait]
impl<R: Resource> ApiView for ListApiView<R> {
    fn allowed_methods(&self) -> &'static [Method] {
        &READ_ONLY
    }

    async fn get(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.list(&req).await
    }
}

impl<R: Resource> RetrieveMixin<R> for RetrieveApiView<R> {}

#[async_trait]
impl<R: Resource> ApiView for RetrieveApiView<R> {
    fn allowed_methods(&self) -> &'static [Method] {
        &READ_ONLY
    }

    async fn get(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.retrieve(&req).await
    }
}

impl<R: WritableResource> ListMixin<R> for ListCreateApiView<R> {}
impl<R: WritableResource> CreateMixin<R> for ListCreateApiView<R> {}

#[async_trait]
impl<R: WritableResource> ApiView for ListCreateApiView<R> {
    fn allowed_methods(&self) -> &'static [Method] {
        &LIST_CREATE
    }

    async fn get(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.list(&req).await
    }

    async fn post(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.create(&req).await
    }
}

impl<R: WritableResource> RetrieveMixin<R> for RetrieveUpdateDestroyApiView<R> {}
impl<R: WritableResource> UpdateMixin<R> for RetrieveUpdateDestroyApiView<R> {}
impl<R: WritableResource> DestroyMixin<R> for RetrieveUpdateDestroyApiView<R> {}

#[async_trait]
impl<R: WritableResource> ApiView for RetrieveUpdateDestroyApiView<R> {
    fn allowed_methods(&self) -> &'static [Method] {
        &RETRIEVE_UPDATE_DESTROY
    }

    async fn get(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.retrieve(&req).await
    }

    async fn put(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.update(&req, false).await
    }

    async fn patch(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.partial_update(&req).await
    }

    async fn delete(&self, req: ApiRequest) -> Result<Response, AppError> {
        self.destroy(&req).await
    }
}
