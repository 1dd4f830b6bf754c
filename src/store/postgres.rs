//! PostgreSQL-backed store: table DDL and single-row queries.

use super::Store;
use crate::error::{AppError, ConfigError};
use crate::model::{Account, AccountId, Language, NewSnippet, Snippet, SnippetChanges, SnippetId, Style};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};
use std::collections::HashMap;
use std::str::FromStr;

const SNIPPET_COLUMNS: &str = "s.id, s.created, s.title, s.code, s.linenos, s.language, s.style, s.owner_id, a.username AS owner_username, s.highlighted";

/// Create the target database when missing by connecting to the `postgres` maintenance database.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, db_name) = maintenance_target(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Connection options for the `postgres` database on the same server, plus the target database name.
/// Without a path the server default applies: the database named after the user.
fn maintenance_target(database_url: &str) -> Result<(PgConnectOptions, String), AppError> {
    let opts = PgConnectOptions::from_str(database_url).map_err(|e| invalid_url(e.to_string()))?;
    let db_name = opts.get_database().unwrap_or(opts.get_username()).to_string();
    Ok((opts.database("postgres"), db_name))
}

fn invalid_url(message: String) -> AppError {
    AppError::Config(ConfigError::InvalidValue {
        key: "DATABASE_URL",
        message,
    })
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Create `accounts` and `snippets` if they do not exist. Idempotent.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            date_joined TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS snippets (
            id BIGSERIAL PRIMARY KEY,
            created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            title VARCHAR(100) NOT NULL DEFAULT '',
            code TEXT NOT NULL,
            linenos BOOLEAN NOT NULL DEFAULT FALSE,
            language TEXT NOT NULL DEFAULT 'python',
            style TEXT NOT NULL DEFAULT 'friendly',
            owner_id BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
            highlighted TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS snippets_owner_idx ON snippets (owner_id)")
        .execute(pool)
        .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    password_hash: String,
    date_joined: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            date_joined: row.date_joined,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SnippetRow {
    id: i64,
    created: DateTime<Utc>,
    title: String,
    code: String,
    linenos: bool,
    language: String,
    style: String,
    owner_id: i64,
    owner_username: String,
    highlighted: String,
}

impl TryFrom<SnippetRow> for Snippet {
    type Error = AppError;

    fn try_from(row: SnippetRow) -> Result<Self, Self::Error> {
        // Rows written outside this service may carry tags we do not know.
        let language = Language::from_str(&row.language)
            .map_err(|e| AppError::Db(sqlx::Error::Decode(format!("snippet {} language: {}", row.id, e).into())))?;
        let style = Style::from_str(&row.style)
            .map_err(|e| AppError::Db(sqlx::Error::Decode(format!("snippet {} style: {}", row.id, e).into())))?;
        Ok(Snippet {
            id: row.id,
            created: row.created,
            title: row.title,
            code: row.code,
            linenos: row.linenos,
            language,
            style,
            owner: row.owner_id,
            owner_username: row.owner_username,
            highlighted: row.highlighted,
        })
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_snippet(&self, id: SnippetId) -> Result<Option<Snippet>, AppError> {
        let sql = format!(
            "SELECT {} FROM snippets s JOIN accounts a ON a.id = s.owner_id WHERE s.id = $1",
            SNIPPET_COLUMNS
        );
        let row = sqlx::query_as::<_, SnippetRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Snippet::try_from).transpose()
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, password_hash, date_joined FROM accounts ORDER BY date_joined, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Account::from).collect())
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, password_hash, date_joined FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Account::from))
    }

    async fn find_account(&self, username: &str) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, password_hash, date_joined FROM accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Account::from))
    }

    async fn create_account(&self, username: &str, password_hash: &str) -> Result<Account, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "INSERT INTO accounts (username, password_hash) VALUES ($1, $2) \
             ON CONFLICT (username) DO NOTHING \
             RETURNING id, username, password_hash, date_joined",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Account::from)
            .ok_or_else(|| AppError::Conflict(format!("username '{}' already exists", username)))
    }

    async fn snippet_ids_by_owner(&self) -> Result<HashMap<AccountId, Vec<SnippetId>>, AppError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as("SELECT owner_id, id FROM snippets ORDER BY created, id")
            .fetch_all(&self.pool)
            .await?;
        let mut by_owner: HashMap<AccountId, Vec<SnippetId>> = HashMap::new();
        for (owner, id) in rows {
            by_owner.entry(owner).or_default().push(id);
        }
        Ok(by_owner)
    }

    async fn list_snippets(&self) -> Result<Vec<Snippet>, AppError> {
        let sql = format!(
            "SELECT {} FROM snippets s JOIN accounts a ON a.id = s.owner_id ORDER BY s.created, s.id",
            SNIPPET_COLUMNS
        );
        let rows = sqlx::query_as::<_, SnippetRow>(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Snippet::try_from).collect()
    }

    async fn get_snippet(&self, id: SnippetId) -> Result<Option<Snippet>, AppError> {
        self.fetch_snippet(id).await
    }

    async fn insert_snippet(&self, new: NewSnippet) -> Result<Snippet, AppError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO snippets (title, code, linenos, language, style, owner_id, highlighted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(&new.title)
        .bind(&new.code)
        .bind(new.linenos)
        .bind(new.language.as_str())
        .bind(new.style.as_str())
        .bind(new.owner)
        .bind(&new.highlighted)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!(snippet_id = id, owner = new.owner, "snippet inserted");
        self.fetch_snippet(id)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn update_snippet(&self, id: SnippetId, changes: SnippetChanges) -> Result<Option<Snippet>, AppError> {
        let result = sqlx::query(
            "UPDATE snippets SET title = $1, code = $2, linenos = $3, language = $4, style = $5, highlighted = $6 \
             WHERE id = $7",
        )
        .bind(&changes.title)
        .bind(&changes.code)
        .bind(changes.linenos)
        .bind(changes.language.as_str())
        .bind(changes.style.as_str())
        .bind(&changes.highlighted)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_snippet(id).await
    }

    async fn delete_snippet(&self, id: SnippetId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM snippets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintenance_target_swaps_database_name() {
        let (admin, name) = maintenance_target("postgres://u:p@localhost:5432/snippets?sslmode=disable").unwrap();
        assert_eq!(name, "snippets");
        assert_eq!(admin.get_database(), Some("postgres"));
        assert_eq!(admin.get_host(), "localhost");
        assert_eq!(admin.get_port(), 5432);
        assert_eq!(admin.get_username(), "u");
    }

    #[test]
    fn maintenance_target_without_path_uses_user_database() {
        let (admin, name) = maintenance_target("postgres://app@db.internal:5432").unwrap();
        assert_eq!(name, "app");
        assert_eq!(admin.get_host(), "db.internal");
        assert_eq!(admin.get_database(), Some("postgres"));
    }

    #[test]
    fn maintenance_target_ignores_slashes_in_query() {
        let (admin, name) =
            maintenance_target("postgres://u:p@localhost/snippets?options=-c%20search_path%3Da/b").unwrap();
        assert_eq!(name, "snippets");
        assert_eq!(admin.get_host(), "localhost");
        assert_eq!(admin.get_database(), Some("postgres"));
    }

    #[test]
    fn malformed_url_is_a_config_error() {
        assert!(matches!(
            maintenance_target("not a url"),
            Err(AppError::Config(ConfigError::InvalidValue { key: "DATABASE_URL", .. }))
        ));
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("snip\"pets"), "\"snip\"\"pets\"");
    }
}
