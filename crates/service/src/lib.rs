//! `trackline-service` — CRUD services with policy enforcement.
//!
//! One service per entity. Each service resolves the target record, runs the
//! access-control policy, then performs the data operation; every failure is
//! a `trackline_core::Error` for the API boundary to translate. The issue
//! service additionally owns the fire-and-forget status-change notification.

pub mod issue;
pub mod project;
pub mod user;

pub use issue::{IssueDraft, IssueService};
pub use project::ProjectService;
pub use user::{IssuedToken, Registration, UserService};
