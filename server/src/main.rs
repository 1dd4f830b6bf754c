//! Snippets API server.
//!
//! Run from repo root: `cargo run -p snippets-server`
//! Configure with environment variables or a `.env` file (see `Settings`).

use axum::{extract::Request, ServiceExt};
use snippets_api::{
    build_app, ensure_account, ensure_database_exists, ensure_tables, AppState, MemoryStore, PgStore, Settings, Store,
};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn open_store(settings: &Settings) -> Result<Arc<dyn Store>, Box<dyn std::error::Error>> {
    let Some(database_url) = settings.database_url.as_deref() else {
        tracing::info!("DATABASE_URL not set, using the in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    };
    ensure_database_exists(database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.database_max_connections)
        .connect(database_url)
        .await?;
    ensure_tables(&pool).await?;
    tracing::info!("connected to PostgreSQL");
    Ok(Arc::new(PgStore::new(pool)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("snippets_api=info,snippets_server=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let store = open_store(&settings).await?;
    for seed in &settings.seed_accounts {
        ensure_account(store.as_ref(), &seed.username, &seed.password).await?;
    }

    let app = build_app(AppState::new(store), &settings);
    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("Snippets API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}
