//! Domain error model.
//!
//! Every fallible policy/service operation returns one of these variants;
//! the API boundary owns the translation to HTTP status codes and response
//! bodies. Keep this focused on deterministic domain failures — the single
//! `Storage` variant carries anything the persistence backend throws at us.

use thiserror::Error;

/// Result type used across the domain and service layers.
pub type DomainResult<T> = Result<T, Error>;

/// Domain-level error taxonomy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// No user with the given id/email (or the user is soft-deleted).
    #[error("user not found")]
    UserNotFound,

    /// Login credentials did not match the stored hash.
    #[error("wrong password")]
    WrongPassword,

    /// Registration attempted with an email that is already taken.
    #[error("user already exists")]
    UserExists,

    /// Operation reserved for admins was attempted by a regular user.
    #[error("user has no admin privileges")]
    UserNotAdmin,

    /// Bearer token was missing, malformed, expired, or badly signed.
    #[error("could not validate credentials")]
    InvalidToken,

    /// No project with the given id (or the project is soft-deleted).
    #[error("project not found")]
    ProjectNotFound,

    /// No issue with the given id (or the issue is soft-deleted).
    #[error("issue not found")]
    IssueNotFound,

    /// Issue creation without a parent project.
    #[error("project is required")]
    ProjectRequired,

    /// The actor exists but the policy denies the operation. Distinct from
    /// the `*NotFound` variants, which say nothing about permission.
    #[error("not enough permissions")]
    PermissionDenied,

    /// Persistence backend failure (connectivity, constraint, etc).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl Error {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
