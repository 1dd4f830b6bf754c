//! Resolve the requesting account from an `Authorization: Basic` header.

use crate::auth::authenticate;
use crate::error::AppError;
use crate::model::{Account, AccountId};
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::{engine::general_purpose::STANDARD, Engine};

/// Authenticated account, or `None` for anonymous requests.
///
/// Requests without credentials, or with a non-Basic scheme, are anonymous.
/// Malformed or wrong Basic credentials are rejected with 401 even on safe methods.
#[derive(Clone, Debug, Default)]
pub struct Identity(pub Option<Account>);

impl Identity {
    pub fn anonymous() -> Self {
        Identity(None)
    }

    pub fn account(&self) -> Option<&Account> {
        self.0.as_ref()
    }

    pub fn id(&self) -> Option<AccountId> {
        self.0.as_ref().map(|a| a.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }

    pub fn require(&self) -> Result<&Account, AppError> {
        self.0.as_ref().ok_or(AppError::NotAuthenticated)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Identity::anonymous());
        };
        let value = value
            .to_str()
            .map_err(|_| AppError::AuthenticationFailed("Invalid basic header. Credentials string should not contain invalid characters.".into()))?;
        let Some((username, password)) = parse_basic(value)? else {
            return Ok(Identity::anonymous());
        };
        match authenticate(state.store.as_ref(), &username, &password).await? {
            Some(account) => Ok(Identity(Some(account))),
            None => {
                tracing::warn!(%username, "rejected credentials");
                Err(AppError::AuthenticationFailed("Invalid username/password.".into()))
            }
        }
    }
}

/// `Ok(None)` when the header uses another scheme.
fn parse_basic(value: &str) -> Result<Option<(String, String)>, AppError> {
    let mut parts = value.split_whitespace();
    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case("basic") => {}
        _ => return Ok(None),
    }
    let encoded = match (parts.next(), parts.next()) {
        (Some(encoded), None) => encoded,
        (None, _) => {
            return Err(AppError::AuthenticationFailed(
                "Invalid basic header. No credentials provided.".into(),
            ))
        }
        (Some(_), Some(_)) => {
            return Err(AppError::AuthenticationFailed(
                "Invalid basic header. Credentials string should not contain spaces.".into(),
            ))
        }
    };
    let invalid = || AppError::AuthenticationFailed("Invalid basic header. Credentials not correctly base64 encoded.".into());
    let decoded = STANDARD.decode(encoded).map_err(|_| invalid())?;
    let decoded = String::from_utf8(decoded).map_err(|_| invalid())?;
    let (username, password) = decoded.split_once(':').ok_or_else(invalid)?;
    Ok(Some((username.to_string(), password.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_credentials() {
        let header = format!("Basic {}", STANDARD.encode("alice:pa:ss"));
        assert_eq!(
            parse_basic(&header).unwrap(),
            Some(("alice".to_string(), "pa:ss".to_string()))
        );
    }

    #[test]
    fn other_schemes_are_anonymous() {
        assert_eq!(parse_basic("Bearer abc").unwrap(), None);
    }

    #[test]
    fn malformed_basic_is_rejected() {
        assert!(parse_basic("Basic").is_err());
        assert!(parse_basic("Basic !!!").is_err());
        assert!(parse_basic("Basic a b").is_err());
        let no_colon = format!("Basic {}", STANDARD.encode("alice"));
        assert!(parse_basic(&no_colon).is_err());
    }
}
