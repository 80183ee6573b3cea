//! Postgres-backed store.
//!
//! One explicit parameterized query per access pattern; rows are mapped by
//! hand via `try_get` so the crate builds without a live database. Every
//! read that backs a retrieval/listing operation carries
//! `is_deleted = FALSE`; only `get_any` (authorization inheritance) and the
//! soft-delete write itself see flagged rows.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use trackline_core::{
    Issue, IssueId, IssuePatch, NewIssue, NewProject, NewUser, Project, ProjectId, ProjectPatch,
    User, UserId,
};

use crate::{IssueStore, Page, ProjectStore, StoreError, UserStore};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Apply the schema DDL (idempotent).
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(include_str!("../schema.sql"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: UserId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        is_admin: row.try_get("is_admin")?,
        is_deleted: row.try_get("is_deleted")?,
    })
}

fn project_from_row(row: &PgRow) -> Result<Project, sqlx::Error> {
    Ok(Project {
        id: ProjectId::new(row.try_get("id")?),
        title: row.try_get("title")?,
        owner_id: UserId::new(row.try_get("owner_id")?),
        assigned_id: row.try_get::<Option<i64>, _>("assigned_id")?.map(UserId::new),
        is_deleted: row.try_get("is_deleted")?,
    })
}

fn issue_from_row(row: &PgRow) -> Result<Issue, sqlx::Error> {
    Ok(Issue {
        id: IssueId::new(row.try_get("id")?),
        title: row.try_get("title")?,
        kind: row.try_get("type")?,
        status: row.try_get("status")?,
        project_id: ProjectId::new(row.try_get("project_id")?),
        is_deleted: row.try_get("is_deleted")?,
    })
}

const USER_COLUMNS: &str = "id, name, email, password_hash, is_admin, is_deleted";
const PROJECT_COLUMNS: &str = "id, title, owner_id, assigned_id, is_deleted";
const ISSUE_COLUMNS: &str = "id, title, type, status, project_id, is_deleted";

#[async_trait]
impl UserStore for PgStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (name, email, password_hash, is_admin) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row)?)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND is_deleted = FALSE"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_deleted = FALSE \
             ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(user_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn create(&self, project: NewProject) -> Result<Project, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO projects (title, owner_id, assigned_id) \
             VALUES ($1, $2, $3) \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(&project.title)
        .bind(project.owner_id.as_i64())
        .bind(project.assigned_id.map(|id| id.as_i64()))
        .fetch_one(&self.pool)
        .await?;

        Ok(project_from_row(&row)?)
    }

    async fn get(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND is_deleted = FALSE"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(project_from_row).transpose()?)
    }

    async fn get_any(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(project_from_row).transpose()?)
    }

    async fn list(&self, page: Page) -> Result<Vec<Project>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE is_deleted = FALSE \
             ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(project_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn list_by_user(&self, user_id: UserId, page: Page) -> Result<Vec<Project>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             WHERE (owner_id = $1 OR assigned_id = $1) AND is_deleted = FALSE \
             ORDER BY id LIMIT $2 OFFSET $3"
        ))
        .bind(user_id.as_i64())
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(project_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn update(&self, id: ProjectId, patch: ProjectPatch) -> Result<Project, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE projects \
             SET title = COALESCE($2, title), \
                 assigned_id = COALESCE($3, assigned_id) \
             WHERE id = $1 AND is_deleted = FALSE \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id.as_i64())
        .bind(&patch.title)
        .bind(patch.assigned_id.map(|id| id.as_i64()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::RowNotFound)?;

        Ok(project_from_row(&row)?)
    }

    async fn soft_delete(&self, id: ProjectId) -> Result<Project, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE projects SET is_deleted = TRUE WHERE id = $1 \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::RowNotFound)?;

        Ok(project_from_row(&row)?)
    }
}

#[async_trait]
impl IssueStore for PgStore {
    async fn create(&self, issue: NewIssue) -> Result<Issue, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO issues (title, type, status, project_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ISSUE_COLUMNS}"
        ))
        .bind(&issue.title)
        .bind(&issue.kind)
        .bind(&issue.status)
        .bind(issue.project_id.as_i64())
        .fetch_one(&self.pool)
        .await?;

        Ok(issue_from_row(&row)?)
    }

    async fn get(&self, id: IssueId) -> Result<Option<Issue>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {ISSUE_COLUMNS} FROM issues WHERE id = $1 AND is_deleted = FALSE"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(issue_from_row).transpose()?)
    }

    async fn list(&self, page: Page) -> Result<Vec<Issue>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ISSUE_COLUMNS} FROM issues WHERE is_deleted = FALSE \
             ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(issue_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
        page: Page,
    ) -> Result<Vec<Issue>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ISSUE_COLUMNS} FROM issues \
             WHERE project_id = $1 AND is_deleted = FALSE \
             ORDER BY id LIMIT $2 OFFSET $3"
        ))
        .bind(project_id.as_i64())
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(issue_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn list_by_user_projects(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<Issue>, StoreError> {
        let rows = sqlx::query(
            "SELECT i.id, i.title, i.type, i.status, i.project_id, i.is_deleted \
             FROM issues i \
             JOIN projects p ON p.id = i.project_id \
             WHERE (p.owner_id = $1 OR p.assigned_id = $1) AND i.is_deleted = FALSE \
             ORDER BY i.id LIMIT $2 OFFSET $3",
        )
        .bind(user_id.as_i64())
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(issue_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn update(&self, id: IssueId, patch: IssuePatch) -> Result<Issue, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE issues \
             SET title = COALESCE($2, title), \
                 type = COALESCE($3, type), \
                 status = COALESCE($4, status) \
             WHERE id = $1 AND is_deleted = FALSE \
             RETURNING {ISSUE_COLUMNS}"
        ))
        .bind(id.as_i64())
        .bind(&patch.title)
        .bind(&patch.kind)
        .bind(&patch.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::RowNotFound)?;

        Ok(issue_from_row(&row)?)
    }

    async fn soft_delete(&self, id: IssueId) -> Result<Issue, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE issues SET is_deleted = TRUE WHERE id = $1 \
             RETURNING {ISSUE_COLUMNS}"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::RowNotFound)?;

        Ok(issue_from_row(&row)?)
    }
}
