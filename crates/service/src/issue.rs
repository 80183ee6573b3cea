//! Issue CRUD behind the access-control policy, plus the status-change
//! notification side effect.

use std::sync::Arc;

use trackline_core::{
    policy, DomainResult, Error, Issue, IssueId, IssuePatch, NewIssue, Project, ProjectId, User,
};
use trackline_notify::{Notifier, StatusChangeNotice};
use trackline_store::{IssueStore, Page, ProjectStore, StoreError, UserStore};

/// Creation input. `project_id` stays optional here so its absence can
/// surface as the domain error `ProjectRequired` instead of a parse failure.
#[derive(Debug, Clone)]
pub struct IssueDraft {
    pub title: String,
    pub kind: String,
    pub status: String,
    pub project_id: Option<ProjectId>,
}

pub struct IssueService {
    issues: Arc<dyn IssueStore>,
    projects: Arc<dyn ProjectStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
}

impl IssueService {
    pub fn new(
        issues: Arc<dyn IssueStore>,
        projects: Arc<dyn ProjectStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            issues,
            projects,
            users,
            notifier,
        }
    }

    /// Resolve an issue's parent for authorization inheritance. Includes
    /// soft-deleted projects: deleting a project does not cut off access to
    /// issues that already exist under it.
    async fn parent(&self, project_id: ProjectId) -> DomainResult<Project> {
        self.projects
            .get_any(project_id)
            .await?
            .ok_or(Error::ProjectNotFound)
    }

    pub async fn retrieve(&self, actor: &User, id: IssueId) -> DomainResult<Issue> {
        let issue = self.issues.get(id).await?.ok_or(Error::IssueNotFound)?;

        let parent = self.parent(issue.project_id).await?;
        policy::can_read_issue(actor, &parent)?;
        Ok(issue)
    }

    /// Admin sees all issues; everyone else only those of projects they own
    /// or are assigned to.
    pub async fn list(&self, actor: &User, page: Page) -> DomainResult<Vec<Issue>> {
        if actor.is_admin {
            Ok(self.issues.list(page).await?)
        } else {
            Ok(self.issues.list_by_user_projects(actor.id, page).await?)
        }
    }

    /// Issues of one project; readable by whoever may read the project.
    pub async fn list_by_project(
        &self,
        actor: &User,
        project_id: ProjectId,
        page: Page,
    ) -> DomainResult<Vec<Issue>> {
        let project = self
            .projects
            .get(project_id)
            .await?
            .ok_or(Error::ProjectNotFound)?;

        policy::can_read_issue(actor, &project)?;
        Ok(self.issues.list_by_project(project_id, page).await?)
    }

    /// Create an issue under an existing, non-deleted project. Only the
    /// project owner may do this; admins may not.
    pub async fn create(&self, actor: &User, draft: IssueDraft) -> DomainResult<Issue> {
        if actor.is_admin {
            return Err(Error::PermissionDenied);
        }

        let project_id = draft.project_id.ok_or(Error::ProjectRequired)?;
        let project = self
            .projects
            .get(project_id)
            .await?
            .ok_or(Error::ProjectNotFound)?;

        policy::can_create_issue(actor, &project)?;

        Ok(self
            .issues
            .create(NewIssue {
                title: draft.title,
                kind: draft.kind,
                status: draft.status,
                project_id,
            })
            .await?)
    }

    /// Partial update. A payload carrying `status` dispatches exactly one
    /// notification to the project owner, off the request path, with the
    /// pre-update status for display.
    pub async fn update(&self, actor: &User, id: IssueId, patch: IssuePatch) -> DomainResult<Issue> {
        let issue = self.issues.get(id).await?.ok_or(Error::IssueNotFound)?;

        let parent = self.parent(issue.project_id).await?;
        policy::can_update_issue(actor, &parent)?;

        let old_status = issue.status.clone();
        let status_changed = patch.status.is_some();

        let updated = match self.issues.update(id, patch).await {
            Ok(updated) => updated,
            Err(StoreError::RowNotFound) => return Err(Error::IssueNotFound),
            Err(err) => return Err(err.into()),
        };

        if status_changed {
            self.dispatch_status_notice(&parent, &updated, old_status);
        }

        Ok(updated)
    }

    /// Soft delete, project owner only (admin is not sufficient).
    pub async fn delete(&self, actor: &User, id: IssueId) -> DomainResult<Issue> {
        let issue = self.issues.get(id).await?.ok_or(Error::IssueNotFound)?;

        let parent = self.parent(issue.project_id).await?;
        policy::can_delete_issue(actor, &parent)?;

        match self.issues.soft_delete(id).await {
            Ok(deleted) => Ok(deleted),
            Err(StoreError::RowNotFound) => Err(Error::IssueNotFound),
            Err(err) => Err(err.into()),
        }
    }

    /// Fire-and-forget: the owner lookup and the send both happen on a
    /// spawned task. Failures are logged and swallowed; the owning request
    /// has already succeeded.
    fn dispatch_status_notice(&self, parent: &Project, issue: &Issue, old_status: String) {
        let users = Arc::clone(&self.users);
        let notifier = Arc::clone(&self.notifier);
        let owner_id = parent.owner_id;
        let notice_base = StatusChangeNotice {
            issue_id: issue.id,
            project_id: parent.id,
            from_status: old_status,
            to_status: issue.status.clone(),
            recipient: String::new(),
        };

        tokio::spawn(async move {
            let owner = match users.get(owner_id).await {
                Ok(Some(owner)) => owner,
                Ok(None) => {
                    tracing::warn!(%owner_id, "status notice dropped: project owner not found");
                    return;
                }
                Err(err) => {
                    tracing::warn!(%owner_id, "status notice dropped: owner lookup failed: {err}");
                    return;
                }
            };

            let notice = StatusChangeNotice {
                recipient: owner.email,
                ..notice_base
            };

            if let Err(err) = notifier.status_changed(notice).await {
                tracing::warn!("unable to send status-change mail: {err}");
            }
        });
    }
}
