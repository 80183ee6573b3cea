//! Access-control policy.
//!
//! State-free: every check is a pure function over (actor, resource,
//! operation) deciding allow/deny. Callers resolve the resource first, so a
//! missing or soft-deleted record surfaces as the entity's `NotFound` error
//! *before* any permission check runs — a denied actor can still learn that
//! a record does not exist, never the other way around.
//!
//! Rule summary:
//! - Admins read and list everything but may not create projects or issues.
//! - Project/issue reads are open to the admin, the owner, and the assignee.
//! - Project/issue updates are open to the admin and the owner.
//! - Project/issue deletes are owner-only; admin is NOT sufficient.

use crate::entity::{Project, User};
use crate::error::{DomainResult, Error};

/// Project creation: any non-admin user; the creator becomes owner.
pub fn can_create_project(actor: &User) -> DomainResult<()> {
    if actor.is_admin {
        return Err(Error::PermissionDenied);
    }
    Ok(())
}

/// Project read: admin, owner, or assignee.
pub fn can_read_project(actor: &User, project: &Project) -> DomainResult<()> {
    if actor.is_admin || project.involves(actor.id) {
        return Ok(());
    }
    Err(Error::PermissionDenied)
}

/// Project update: admin or owner.
pub fn can_update_project(actor: &User, project: &Project) -> DomainResult<()> {
    if actor.is_admin || project.owner_id == actor.id {
        return Ok(());
    }
    Err(Error::PermissionDenied)
}

/// Project delete: owner only. Admin is deliberately not enough.
pub fn can_delete_project(actor: &User, project: &Project) -> DomainResult<()> {
    if project.owner_id == actor.id {
        return Ok(());
    }
    Err(Error::PermissionDenied)
}

/// Issue creation: only the parent project's owner, and never an admin.
pub fn can_create_issue(actor: &User, parent: &Project) -> DomainResult<()> {
    if actor.is_admin {
        return Err(Error::PermissionDenied);
    }
    if parent.owner_id != actor.id {
        return Err(Error::PermissionDenied);
    }
    Ok(())
}

/// Issue read: inherited from the parent project.
pub fn can_read_issue(actor: &User, parent: &Project) -> DomainResult<()> {
    if actor.is_admin || parent.involves(actor.id) {
        return Ok(());
    }
    Err(Error::PermissionDenied)
}

/// Issue update: admin or parent project owner.
pub fn can_update_issue(actor: &User, parent: &Project) -> DomainResult<()> {
    if actor.is_admin || parent.owner_id == actor.id {
        return Ok(());
    }
    Err(Error::PermissionDenied)
}

/// Issue delete: parent project owner only. Asymmetric with update on
/// purpose — admins may update issues but not delete them.
pub fn can_delete_issue(actor: &User, parent: &Project) -> DomainResult<()> {
    if parent.owner_id == actor.id {
        return Ok(());
    }
    Err(Error::PermissionDenied)
}

/// Gate for admin-only endpoints (user listing).
pub fn require_admin(actor: &User) -> DomainResult<()> {
    if actor.is_admin {
        return Ok(());
    }
    Err(Error::UserNotAdmin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ProjectId, UserId};

    fn user(id: i64, is_admin: bool) -> User {
        User {
            id: UserId::new(id),
            name: None,
            email: format!("user{id}@example.com"),
            password_hash: "x".to_string(),
            is_admin,
            is_deleted: false,
        }
    }

    fn project(owner: i64, assignee: Option<i64>) -> Project {
        Project {
            id: ProjectId::new(1),
            title: "Foo".to_string(),
            owner_id: UserId::new(owner),
            assigned_id: assignee.map(UserId::new),
            is_deleted: false,
        }
    }

    #[test]
    fn admin_cannot_create_projects_or_issues() {
        let admin = user(1, true);
        let parent = project(1, None);

        assert_eq!(can_create_project(&admin), Err(Error::PermissionDenied));
        assert_eq!(can_create_issue(&admin, &parent), Err(Error::PermissionDenied));
    }

    #[test]
    fn non_admin_can_create_project() {
        assert_eq!(can_create_project(&user(2, false)), Ok(()));
    }

    #[test]
    fn project_read_allows_owner_assignee_and_admin() {
        let p = project(1, Some(2));

        assert_eq!(can_read_project(&user(1, false), &p), Ok(()));
        assert_eq!(can_read_project(&user(2, false), &p), Ok(()));
        assert_eq!(can_read_project(&user(9, true), &p), Ok(()));
        assert_eq!(can_read_project(&user(3, false), &p), Err(Error::PermissionDenied));
    }

    #[test]
    fn project_update_excludes_assignee() {
        let p = project(1, Some(2));

        assert_eq!(can_update_project(&user(1, false), &p), Ok(()));
        assert_eq!(can_update_project(&user(9, true), &p), Ok(()));
        assert_eq!(can_update_project(&user(2, false), &p), Err(Error::PermissionDenied));
    }

    #[test]
    fn project_delete_is_owner_only_even_for_admin() {
        let p = project(1, Some(2));

        assert_eq!(can_delete_project(&user(1, false), &p), Ok(()));
        assert_eq!(can_delete_project(&user(9, true), &p), Err(Error::PermissionDenied));
        assert_eq!(can_delete_project(&user(2, false), &p), Err(Error::PermissionDenied));
    }

    #[test]
    fn issue_create_requires_project_ownership() {
        let p = project(1, Some(2));

        assert_eq!(can_create_issue(&user(1, false), &p), Ok(()));
        assert_eq!(can_create_issue(&user(2, false), &p), Err(Error::PermissionDenied));
        assert_eq!(can_create_issue(&user(3, false), &p), Err(Error::PermissionDenied));
    }

    #[test]
    fn issue_update_vs_delete_admin_asymmetry() {
        let p = project(1, None);
        let admin = user(9, true);

        assert_eq!(can_update_issue(&admin, &p), Ok(()));
        assert_eq!(can_delete_issue(&admin, &p), Err(Error::PermissionDenied));
    }

    #[test]
    fn issue_read_inherited_from_project() {
        let p = project(1, Some(2));

        assert_eq!(can_read_issue(&user(2, false), &p), Ok(()));
        assert_eq!(can_read_issue(&user(3, false), &p), Err(Error::PermissionDenied));
    }

    #[test]
    fn require_admin_maps_to_not_admin_error() {
        assert_eq!(require_admin(&user(1, true)), Ok(()));
        assert_eq!(require_admin(&user(2, false)), Err(Error::UserNotAdmin));
    }
}
