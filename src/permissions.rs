//! Access predicates checked before and after object lookup.

use crate::error::AppError;
use crate::extractors::Identity;
use crate::model::AccountId;
use axum::http::Method;

/// Records that belong to an account.
pub trait Owned {
    fn owner_id(&self) -> AccountId;
}

impl Owned for crate::model::Snippet {
    fn owner_id(&self) -> AccountId {
        self.owner
    }
}

pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// A single access rule. Both hooks default to allowing the request.
pub trait Permission: Send + Sync {
    /// Checked once per request, before any lookup.
    fn has_permission(&self, _method: &Method, _identity: &Identity) -> bool {
        true
    }

    /// Checked after the target record is loaded. Records without an owner pass.
    fn has_object_permission(&self, _method: &Method, _identity: &Identity, _owner: Option<AccountId>) -> bool {
        true
    }
}

/// Anyone may read; writes need an authenticated identity.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsAuthenticatedOrReadOnly;

impl Permission for IsAuthenticatedOrReadOnly {
    fn has_permission(&self, method: &Method, identity: &Identity) -> bool {
        is_safe_method(method) || identity.is_authenticated()
    }
}

/// Anyone may read; only the owner may write.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsOwnerOrReadOnly;

impl Permission for IsOwnerOrReadOnly {
    fn has_object_permission(&self, method: &Method, identity: &Identity, owner: Option<AccountId>) -> bool {
        if is_safe_method(method) {
            return true;
        }
        match owner {
            Some(owner) => identity.id() == Some(owner),
            None => true,
        }
    }
}

/// Permissions every snippet endpoint applies, in every handler style.
pub const SNIPPET_PERMISSIONS: &[&dyn Permission] = &[&IsAuthenticatedOrReadOnly, &IsOwnerOrReadOnly];

fn denied(identity: &Identity) -> AppError {
    if identity.is_authenticated() {
        AppError::Forbidden
    } else {
        AppError::NotAuthenticated
    }
}

pub fn check_permissions(permissions: &[&dyn Permission], method: &Method, identity: &Identity) -> Result<(), AppError> {
    if permissions.iter().all(|p| p.has_permission(method, identity)) {
        Ok(())
    } else {
        Err(denied(identity))
    }
}

pub fn check_object_permissions(
    permissions: &[&dyn Permission],
    method: &Method,
    identity: &Identity,
    owner: Option<AccountId>,
) -> Result<(), AppError> {
    if permissions.iter().all(|p| p.has_object_permission(method, identity, owner)) {
        Ok(())
    } else {
        Err(denied(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Account;
    use chrono::Utc;

    fn user(id: AccountId) -> Identity {
        Identity(Some(Account {
            id,
            username: format!("user{id}"),
            password_hash: String::new(),
            date_joined: Utc::now(),
        }))
    }

    #[test]
    fn reads_are_open() {
        let anon = Identity::anonymous();
        assert!(check_permissions(SNIPPET_PERMISSIONS, &Method::GET, &anon).is_ok());
        assert!(check_object_permissions(SNIPPET_PERMISSIONS, &Method::GET, &anon, Some(1)).is_ok());
    }

    #[test]
    fn writes_need_identity() {
        let anon = Identity::anonymous();
        assert!(matches!(
            check_permissions(SNIPPET_PERMISSIONS, &Method::POST, &anon),
            Err(AppError::NotAuthenticated)
        ));
        assert!(check_permissions(SNIPPET_PERMISSIONS, &Method::POST, &user(1)).is_ok());
    }

    #[test]
    fn writes_need_ownership() {
        for method in [Method::PUT, Method::PATCH, Method::DELETE] {
            assert!(check_object_permissions(SNIPPET_PERMISSIONS, &method, &user(1), Some(1)).is_ok());
            assert!(matches!(
                check_object_permissions(SNIPPET_PERMISSIONS, &method, &user(2), Some(1)),
                Err(AppError::Forbidden)
            ));
        }
    }
}
