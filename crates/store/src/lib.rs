//! `trackline-store` — storage-interface abstraction.
//!
//! One trait per entity, each an explicit list of the access patterns the
//! services need (no dynamic query building). Two implementations:
//! [`PgStore`] for production and [`MemoryStore`] for dev/test.

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use trackline_core::{
    Issue, IssueId, IssuePatch, NewIssue, NewProject, NewUser, Project, ProjectId, ProjectPatch,
    User, UserId,
};

/// Skip/limit pagination window for list queries.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

/// User rows. No update or delete: users are only ever created, and the
/// soft-delete flag exists in the schema but has no exposed operation.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Get by id, excluding soft-deleted rows.
    async fn get(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Get by email across all rows (registration uniqueness spans deleted
    /// rows too, since emails are never freed).
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// List in id order, excluding soft-deleted rows.
    async fn list(&self, page: Page) -> Result<Vec<User>, StoreError>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create(&self, project: NewProject) -> Result<Project, StoreError>;

    /// Get by id, excluding soft-deleted rows.
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, StoreError>;

    /// Get by id including soft-deleted rows. Used only to resolve the
    /// parent of an existing issue for authorization inheritance; never
    /// exposed as a read operation.
    async fn get_any(&self, id: ProjectId) -> Result<Option<Project>, StoreError>;

    /// List in id order, excluding soft-deleted rows.
    async fn list(&self, page: Page) -> Result<Vec<Project>, StoreError>;

    /// Projects where the user is owner or assignee, in id order.
    async fn list_by_user(&self, user_id: UserId, page: Page) -> Result<Vec<Project>, StoreError>;

    /// Apply the present patch fields; absent fields keep stored values.
    /// `RowNotFound` if the row is missing or soft-deleted.
    async fn update(&self, id: ProjectId, patch: ProjectPatch) -> Result<Project, StoreError>;

    /// Set the soft-delete flag and return the row (it stays in storage).
    async fn soft_delete(&self, id: ProjectId) -> Result<Project, StoreError>;
}

#[async_trait]
pub trait IssueStore: Send + Sync {
    async fn create(&self, issue: NewIssue) -> Result<Issue, StoreError>;

    /// Get by id, excluding soft-deleted rows.
    async fn get(&self, id: IssueId) -> Result<Option<Issue>, StoreError>;

    /// List in id order, excluding soft-deleted rows.
    async fn list(&self, page: Page) -> Result<Vec<Issue>, StoreError>;

    /// Issues of one project, in id order.
    async fn list_by_project(
        &self,
        project_id: ProjectId,
        page: Page,
    ) -> Result<Vec<Issue>, StoreError>;

    /// Issues of every project the user owns or is assigned to (join across
    /// project ownership/assignment), in id order.
    async fn list_by_user_projects(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<Issue>, StoreError>;

    /// Apply the present patch fields; absent fields keep stored values.
    async fn update(&self, id: IssueId, patch: IssuePatch) -> Result<Issue, StoreError>;

    /// Set the soft-delete flag and return the row (it stays in storage).
    async fn soft_delete(&self, id: IssueId) -> Result<Issue, StoreError>;
}
