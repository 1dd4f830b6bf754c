//! Reusable handler layers, from bare verb dispatch up to routed viewsets.
//!
//! Each layer builds on the one before it:
//! - [`api_view`]: one object per endpoint with a method per verb;
//! - [`generic`]: a resource-aware base (queryset, object lookup with permission checks);
//! - [`mixins`]: list/create/retrieve/update/destroy behaviour over the generic base;
//! - [`generics`]: the mixins pre-assembled into ready-made endpoint types;
//! - [`viewsets`] and [`router`]: named actions bound to URL shapes automatically.

pub mod api_view;
pub mod generic;
pub mod generics;
pub mod mixins;
pub mod pagination;
pub mod request;
pub mod router;
pub mod viewsets;

pub use api_view::{as_view, dispatch, ApiView};
pub use generic::{GenericApiView, Resource, WritableResource};
pub use generics::{ListApiView, ListCreateApiView, RetrieveApiView, RetrieveUpdateDestroyApiView};
pub use mixins::{CreateMixin, DestroyMixin, ListMixin, RetrieveMixin, UpdateMixin};
pub use request::ApiRequest;
pub use router::DefaultRouter;
pub use viewsets::{Action, ExtraAction, ReadOnlyModelViewSet, ViewSet};

use crate::extractors::Format;
use crate::permissions::Permission;

/// What every view, generic view and viewset declares about itself.
pub trait View: Send + Sync + 'static {
    /// Display name, reported by OPTIONS.
    fn name(&self) -> &'static str;

    fn permissions(&self) -> &'static [&'static dyn Permission] {
        &[]
    }

    /// Representations this view can render; the first is the default.
    fn renderers(&self) -> &'static [Format] {
        &[Format::Json]
    }
}
