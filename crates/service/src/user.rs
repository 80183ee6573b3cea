//! User registration, authentication, and admin-only listing.

use std::sync::Arc;

use trackline_auth::TokenSigner;
use trackline_core::{policy, DomainResult, Error, NewUser, User};
use trackline_store::{Page, UserStore};

/// Input to `register`. The password arrives in plaintext and is hashed
/// here, before storage ever sees it.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expired_minutes: i64,
}

pub struct UserService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenSigner>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenSigner>) -> Self {
        Self { users, tokens }
    }

    /// Create an account. Fails with `UserExists` if the email is taken by
    /// any row, deleted or not.
    pub async fn register(&self, registration: Registration) -> DomainResult<User> {
        if self
            .users
            .get_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(Error::UserExists);
        }

        let password_hash = trackline_auth::hash_password(&registration.password)
            .map_err(|e| Error::storage(e.to_string()))?;

        Ok(self
            .users
            .create(NewUser {
                name: registration.name,
                email: registration.email,
                password_hash,
                is_admin: registration.is_admin,
            })
            .await?)
    }

    /// Verify credentials and mint an access token.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<IssuedToken> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(Error::UserNotFound)?;

        if !trackline_auth::verify_password(password, &user.password_hash) {
            return Err(Error::WrongPassword);
        }

        let access_token = self
            .tokens
            .issue(user.id)
            .map_err(|e| Error::storage(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            expired_minutes: self.tokens.ttl_minutes(),
        })
    }

    /// Resolve a bearer token to its actor. `InvalidToken` for anything
    /// wrong with the token itself; `UserNotFound` when the subject row is
    /// gone (or soft-deleted).
    pub async fn authenticate(&self, token: &str) -> DomainResult<User> {
        let claims = self.tokens.decode(token).map_err(|_| Error::InvalidToken)?;

        self.users
            .get(claims.subject())
            .await?
            .ok_or(Error::UserNotFound)
    }

    /// Admin-only user listing.
    pub async fn list(&self, actor: &User, page: Page) -> DomainResult<Vec<User>> {
        policy::require_admin(actor)?;
        Ok(self.users.list(page).await?)
    }
}
