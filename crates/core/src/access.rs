//! Access-control evaluator for project, task, and user resources.
//!
//! A request is authorized by walking a fixed precedence ladder:
//!
//! 1. **Admin** principals are always authorized.
//! 2. **Owner** (creator of the project, or of the project a task lives in)
//!    holds every capability inside that project.
//! 3. **Member** rows grant member-tier capabilities: project membership
//!    grants reads and task creation, task membership grants task edits and
//!    time tracking.
//! 4. **Self** covers a user's own profile, and a project member acting on
//!    their own membership (reading their productivity, leaving).
//! 5. Everything else is denied.
//!
//! Ownership and membership are existence predicates answered by a
//! [`MembershipLookup`]. A missing row is `Ok(false)`; an `Err` means the
//! lookup itself failed and surfaces as [`AccessDecision::EvaluationFailed`],
//! which callers must keep distinct from [`AccessDecision::Denied`].

use std::future::Future;

use crate::types::DbId;

/// The authenticated identity making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    pub is_admin: bool,
}

/// The resource a request acts on, as resolved from the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A project as a whole (`/projects/{project_id}`).
    Project { project_id: DbId },
    /// One user's membership in a project (`/projects/{project_id}/users/{user_id}`).
    ProjectMember { project_id: DbId, user_id: DbId },
    /// A task inside a project (`/projects/{project_id}/tasks/{task_id}`).
    Task { project_id: DbId, task_id: DbId },
    /// A user profile (`/users/{user_id}`).
    User { user_id: DbId },
}

/// What the principal wants to do with the [`Target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Read,
    Modify,
    ManageMembership,
    /// Add a task to a project. Member tier.
    CreateTask,
    TrackTime,
}

/// The rung of the precedence ladder that authorized a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Admin,
    Owner,
    Member,
    SelfAccess,
}

/// Three-way result of an access check.
#[derive(Debug)]
pub enum AccessDecision<E> {
    Authorized(Grant),
    Denied,
    EvaluationFailed(E),
}

impl<E> AccessDecision<E> {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AccessDecision::Authorized(_))
    }
}

/// Existence queries the evaluator needs from the store.
pub trait MembershipLookup: Send + Sync {
    type Error: Send;

    /// Whether `user_id` created `project_id`.
    fn is_project_owner(
        &self,
        project_id: DbId,
        user_id: DbId,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Whether a project membership row exists for the pair.
    fn is_project_member(
        &self,
        project_id: DbId,
        user_id: DbId,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Whether a task membership row exists for the pair.
    fn is_task_member(
        &self,
        task_id: DbId,
        user_id: DbId,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

/// Decide whether `principal` may exercise `capability` on `target`.
pub async fn evaluate<L: MembershipLookup>(
    lookup: &L,
    principal: Principal,
    target: Target,
    capability: Capability,
) -> AccessDecision<L::Error> {
    match decide(lookup, principal, target, capability).await {
        Ok(Some(grant)) => AccessDecision::Authorized(grant),
        Ok(None) => AccessDecision::Denied,
        Err(err) => AccessDecision::EvaluationFailed(err),
    }
}

async fn decide<L: MembershipLookup>(
    lookup: &L,
    principal: Principal,
    target: Target,
    capability: Capability,
) -> Result<Option<Grant>, L::Error> {
    if principal.is_admin {
        return Ok(Some(Grant::Admin));
    }
    let me = principal.user_id;

    match target {
        Target::User { user_id } => Ok((user_id == me).then_some(Grant::SelfAccess)),

        Target::Project { project_id } => {
            if lookup.is_project_owner(project_id, me).await? {
                return Ok(Some(Grant::Owner));
            }
            let member_tier = matches!(capability, Capability::Read | Capability::CreateTask);
            if member_tier && lookup.is_project_member(project_id, me).await? {
                return Ok(Some(Grant::Member));
            }
            Ok(None)
        }

        Target::ProjectMember {
            project_id,
            user_id,
        } => {
            if lookup.is_project_owner(project_id, me).await? {
                return Ok(Some(Grant::Owner));
            }
            let own_membership = user_id == me
                && matches!(capability, Capability::Read | Capability::ManageMembership);
            if own_membership && lookup.is_project_member(project_id, me).await? {
                return Ok(Some(Grant::SelfAccess));
            }
            Ok(None)
        }

        Target::Task {
            project_id,
            task_id,
        } => {
            if lookup.is_project_owner(project_id, me).await? {
                return Ok(Some(Grant::Owner));
            }
            let member = match capability {
                Capability::Read => lookup.is_project_member(project_id, me).await?,
                Capability::Modify | Capability::TrackTime => {
                    lookup.is_task_member(task_id, me).await?
                }
                Capability::ManageMembership | Capability::CreateTask => false,
            };
            Ok(member.then_some(Grant::Member))
        }
    }
}
