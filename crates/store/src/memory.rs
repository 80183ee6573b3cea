//! In-memory store for dev and tests.
//!
//! Rows live in plain vectors behind one lock; ids are assigned
//! sequentially. Soft delete only flips the flag, so "still present in raw
//! storage" is directly observable here.

use std::sync::Mutex;

use async_trait::async_trait;

use trackline_core::{
    Issue, IssueId, IssuePatch, NewIssue, NewProject, NewUser, Project, ProjectId, ProjectPatch,
    User, UserId,
};

use crate::{IssueStore, Page, ProjectStore, StoreError, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    issues: Vec<Issue>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_slice<T: Clone>(items: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    items
        .skip(page.skip.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let row = User {
            id: UserId::new(tables.users.len() as i64 + 1),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            is_deleted: false,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == id && !u.is_deleted)
            .cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(page_slice(
            tables.users.iter().filter(|u| !u.is_deleted).cloned(),
            page,
        ))
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create(&self, project: NewProject) -> Result<Project, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let row = Project {
            id: ProjectId::new(tables.projects.len() as i64 + 1),
            title: project.title,
            owner_id: project.owner_id,
            assigned_id: project.assigned_id,
            is_deleted: false,
        };
        tables.projects.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .projects
            .iter()
            .find(|p| p.id == id && !p.is_deleted)
            .cloned())
    }

    async fn get_any(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<Project>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(page_slice(
            tables.projects.iter().filter(|p| !p.is_deleted).cloned(),
            page,
        ))
    }

    async fn list_by_user(&self, user_id: UserId, page: Page) -> Result<Vec<Project>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(page_slice(
            tables
                .projects
                .iter()
                .filter(|p| !p.is_deleted && p.involves(user_id))
                .cloned(),
            page,
        ))
    }

    async fn update(&self, id: ProjectId, patch: ProjectPatch) -> Result<Project, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let row = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id && !p.is_deleted)
            .ok_or(StoreError::RowNotFound)?;

        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(assigned_id) = patch.assigned_id {
            row.assigned_id = Some(assigned_id);
        }

        Ok(row.clone())
    }

    async fn soft_delete(&self, id: ProjectId) -> Result<Project, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let row = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::RowNotFound)?;
        row.is_deleted = true;
        Ok(row.clone())
    }
}

#[async_trait]
impl IssueStore for MemoryStore {
    async fn create(&self, issue: NewIssue) -> Result<Issue, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let row = Issue {
            id: IssueId::new(tables.issues.len() as i64 + 1),
            title: issue.title,
            kind: issue.kind,
            status: issue.status,
            project_id: issue.project_id,
            is_deleted: false,
        };
        tables.issues.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: IssueId) -> Result<Option<Issue>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .issues
            .iter()
            .find(|i| i.id == id && !i.is_deleted)
            .cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<Issue>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(page_slice(
            tables.issues.iter().filter(|i| !i.is_deleted).cloned(),
            page,
        ))
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
        page: Page,
    ) -> Result<Vec<Issue>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(page_slice(
            tables
                .issues
                .iter()
                .filter(|i| !i.is_deleted && i.project_id == project_id)
                .cloned(),
            page,
        ))
    }

    async fn list_by_user_projects(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<Issue>, StoreError> {
        let tables = self.inner.lock().unwrap();
        let project_ids: Vec<ProjectId> = tables
            .projects
            .iter()
            .filter(|p| p.involves(user_id))
            .map(|p| p.id)
            .collect();

        Ok(page_slice(
            tables
                .issues
                .iter()
                .filter(|i| !i.is_deleted && project_ids.contains(&i.project_id))
                .cloned(),
            page,
        ))
    }

    async fn update(&self, id: IssueId, patch: IssuePatch) -> Result<Issue, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let row = tables
            .issues
            .iter_mut()
            .find(|i| i.id == id && !i.is_deleted)
            .ok_or(StoreError::RowNotFound)?;

        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(kind) = patch.kind {
            row.kind = kind;
        }
        if let Some(status) = patch.status {
            row.status = status;
        }

        Ok(row.clone())
    }

    async fn soft_delete(&self, id: IssueId) -> Result<Issue, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let row = tables
            .issues
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::RowNotFound)?;
        row.is_deleted = true;
        Ok(row.clone())
    }
}
