//! Concrete endpoints. The snippet endpoints exist once per handler style:
//! plain functions, class-style views, mixins, generics and viewsets.

pub mod api_views;
pub mod functions;
pub mod generic_views;
pub mod mixin_views;
pub mod root;
pub mod viewsets;

pub use root::api_root;
pub use viewsets::{user_viewset, SnippetViewSet, UserViewSet};
