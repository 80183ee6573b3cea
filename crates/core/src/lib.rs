//! `trackline-core` — domain foundation for the issue tracker.
//!
//! This crate contains **pure domain** primitives (no infrastructure
//! concerns): entity ids, the entities themselves, the domain error
//! taxonomy, and the access-control policy.

pub mod entity;
pub mod error;
pub mod id;
pub mod policy;

pub use entity::{
    Issue, IssuePatch, IssueView, NewIssue, NewProject, NewUser, Project, ProjectPatch,
    ProjectView, User, UserView,
};
pub use error::{DomainResult, Error};
pub use id::{IssueId, ProjectId, UserId};
