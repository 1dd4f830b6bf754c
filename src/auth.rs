//! Password hashing and out-of-band account provisioning.

use crate::error::AppError;
use crate::model::Account;
use crate::store::Store;
use sha2::{Digest, Sha256};

const SCHEME: &str = "sha256";

/// `sha256$<salt>$<hex digest of salt:password>`.
pub fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    format!("{}${}${}", SCHEME, salt, digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        // Salted digests are compared, never the password itself.
        (Some(SCHEME), Some(salt), Some(expected)) => digest(salt, password) == expected,
        _ => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Look up `username` and check `password`. `None` on unknown user or wrong password.
pub async fn authenticate(store: &dyn Store, username: &str, password: &str) -> Result<Option<Account>, AppError> {
    let account = store.find_account(username).await?;
    Ok(account.filter(|a| verify_password(password, &a.password_hash)))
}

/// Provision an account unless the username already exists. Returns the account either way.
pub async fn ensure_account(store: &dyn Store, username: &str, password: &str) -> Result<Account, AppError> {
    if let Some(existing) = store.find_account(username).await? {
        return Ok(existing);
    }
    let account = store.create_account(username, &hash_password(password)).await?;
    tracing::info!(account_id = account.id, username = %account.username, "account provisioned");
    Ok(account)
}
