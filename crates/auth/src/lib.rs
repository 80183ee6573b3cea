//! `trackline-auth` — credential module.
//!
//! Password hashing/verification and JWT issuance/decoding. Intentionally
//! decoupled from HTTP and storage: callers hand in strings and get back
//! strings or claims.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordHashError};
pub use token::{Claims, TokenError, TokenSigner};
