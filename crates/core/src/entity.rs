//! Domain entities and their public (wire) views.
//!
//! Entities mirror the persisted rows, including the soft-delete flag and —
//! for [`User`] — the password hash. Only the `*View` types are serialized
//! out of the API, so the hash can never leak into a response body.

use serde::{Deserialize, Serialize};

use crate::id::{IssueId, ProjectId, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// A registered account.
///
/// # Invariants
/// - `email` is unique across all rows, deleted or not.
/// - Users are never hard-deleted and the update path is not exposed; rows
///   only ever gain a soft-delete flag.
/// - `is_admin` is a static grant decided at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_deleted: bool,
}

/// Fields needed to persist a new user. The password is already hashed by
/// the time it reaches storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Public JSON shape of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub is_admin: bool,
    pub name: Option<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_admin: user.is_admin,
            name: user.name.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Project
// ─────────────────────────────────────────────────────────────────────────────

/// A project owned by exactly one user, optionally assigned to another.
///
/// # Invariants
/// - `owner_id` is set at creation and never changes.
/// - `assigned_id` is optional and may reference any existing user.
/// - Issue authorization is inherited from `owner_id`/`assigned_id`; issues
///   store no access information of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub owner_id: UserId,
    pub assigned_id: Option<UserId>,
    pub is_deleted: bool,
}

impl Project {
    /// Whether the user is the owner or the assignee.
    pub fn involves(&self, user_id: UserId) -> bool {
        self.owner_id == user_id || self.assigned_id == Some(user_id)
    }
}

/// Fields needed to persist a new project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub owner_id: UserId,
    pub assigned_id: Option<UserId>,
}

/// Partial update: absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub assigned_id: Option<UserId>,
}

/// Public JSON shape of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectView {
    pub id: ProjectId,
    pub title: String,
    pub owner_id: UserId,
    pub assigned_id: Option<UserId>,
}

impl From<&Project> for ProjectView {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            title: project.title.clone(),
            owner_id: project.owner_id,
            assigned_id: project.assigned_id,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Issue
// ─────────────────────────────────────────────────────────────────────────────

/// An issue belonging to a project.
///
/// `kind` is the wire field `type` (a Rust keyword). Both `kind` and
/// `status` are free-form strings, as in the original data model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    pub kind: String,
    pub status: String,
    pub project_id: ProjectId,
    pub is_deleted: bool,
}

/// Fields needed to persist a new issue.
#[derive(Debug, Clone)]
pub struct NewIssue {
    pub title: String,
    pub kind: String,
    pub status: String,
    pub project_id: ProjectId,
}

/// Partial update: absent fields keep their stored values. A present
/// `status` additionally triggers the status-change notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuePatch {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
}

/// Public JSON shape of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueView {
    pub id: IssueId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub project_id: ProjectId,
}

impl From<&Issue> for IssueView {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.id,
            title: issue.title.clone(),
            kind: issue.kind.clone(),
            status: issue.status.clone(),
            project_id: issue.project_id,
        }
    }
}
