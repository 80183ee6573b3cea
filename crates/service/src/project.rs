//! Project CRUD behind the access-control policy.

use std::sync::Arc;

use trackline_core::{
    policy, DomainResult, Error, NewProject, Project, ProjectId, ProjectPatch, User, UserId,
};
use trackline_store::{Page, ProjectStore, StoreError, UserStore};

pub struct ProjectService {
    projects: Arc<dyn ProjectStore>,
    users: Arc<dyn UserStore>,
}

impl ProjectService {
    pub fn new(projects: Arc<dyn ProjectStore>, users: Arc<dyn UserStore>) -> Self {
        Self { projects, users }
    }

    pub async fn retrieve(&self, actor: &User, id: ProjectId) -> DomainResult<Project> {
        let project = self
            .projects
            .get(id)
            .await?
            .ok_or(Error::ProjectNotFound)?;

        policy::can_read_project(actor, &project)?;
        Ok(project)
    }

    /// Admin sees all projects; everyone else only those they own or are
    /// assigned to.
    pub async fn list(&self, actor: &User, page: Page) -> DomainResult<Vec<Project>> {
        if actor.is_admin {
            Ok(self.projects.list(page).await?)
        } else {
            Ok(self.projects.list_by_user(actor.id, page).await?)
        }
    }

    /// Create a project with the actor as owner.
    pub async fn create(
        &self,
        actor: &User,
        title: String,
        assigned_id: Option<UserId>,
    ) -> DomainResult<Project> {
        policy::can_create_project(actor)?;

        Ok(self
            .projects
            .create(NewProject {
                title,
                owner_id: actor.id,
                assigned_id,
            })
            .await?)
    }

    /// Partial update. When the payload carries `assigned_id`, the target
    /// user must exist.
    pub async fn update(
        &self,
        actor: &User,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> DomainResult<Project> {
        let project = self
            .projects
            .get(id)
            .await?
            .ok_or(Error::ProjectNotFound)?;

        policy::can_update_project(actor, &project)?;

        if let Some(assigned_id) = patch.assigned_id {
            if self.users.get(assigned_id).await?.is_none() {
                return Err(Error::UserNotFound);
            }
        }

        match self.projects.update(id, patch).await {
            Ok(updated) => Ok(updated),
            Err(StoreError::RowNotFound) => Err(Error::ProjectNotFound),
            Err(err) => Err(err.into()),
        }
    }

    /// Soft delete, owner only.
    pub async fn delete(&self, actor: &User, id: ProjectId) -> DomainResult<Project> {
        let project = self
            .projects
            .get(id)
            .await?
            .ok_or(Error::ProjectNotFound)?;

        policy::can_delete_project(actor, &project)?;

        match self.projects.soft_delete(id).await {
            Ok(deleted) => Ok(deleted),
            Err(StoreError::RowNotFound) => Err(Error::ProjectNotFound),
            Err(err) => Err(err.into()),
        }
    }
}
