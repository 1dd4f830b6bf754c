//! Snippets API: owned code snippets over HTTP, with the same endpoints built
//! five ways (functions, class-style views, mixins, generics and viewsets).

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod highlight;
pub mod model;
pub mod permissions;
pub mod resources;
pub mod routes;
pub mod serializers;
pub mod state;
pub mod store;
pub mod views;

pub use auth::ensure_account;
pub use config::{ApiStyle, SeedAccount, Settings};
pub use error::{AppError, ConfigError, FieldErrors};
pub use routes::{build_app, build_router, with_format_suffixes, App};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables, MemoryStore, PgStore, Store};
