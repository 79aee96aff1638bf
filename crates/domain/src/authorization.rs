//! Pure permission evaluation shared by advisory UI gating and server enforcement.

use std::collections::BTreeSet;

use crate::security::{PermissionGrant, PermissionKey, UserContext};

/// Returns whether the context holds the capability under the given grant snapshot.
///
/// Superuser roles are granted without consulting `grants`. Otherwise a grant must
/// match the context role and the key, and be either global or scoped to the
/// context department. Anything else is a denial.
#[must_use]
pub fn has_permission(
    context: &UserContext,
    permission: PermissionKey,
    grants: &[PermissionGrant],
) -> bool {
    if context.role.is_superuser() {
        return true;
    }

    let mut matching = grants
        .iter()
        .filter(|grant| grant.role == context.role && grant.permission == permission)
        .peekable();

    if matching.peek().is_none() {
        return false;
    }

    let mut department_match = false;
    for grant in matching {
        match grant.department_id {
            None => return true,
            Some(department_id) => {
                department_match |= context.department_id == Some(department_id);
            }
        }
    }

    department_match
}

/// Returns every permission key the context holds, for advisory UI gating.
#[must_use]
pub fn granted_permissions(
    context: &UserContext,
    grants: &[PermissionGrant],
) -> BTreeSet<PermissionKey> {
    PermissionKey::all()
        .iter()
        .copied()
        .filter(|permission| has_permission(context, *permission, grants))
        .collect()
}

/// Immutable grant snapshot bound to one evaluated principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSnapshot {
    context: UserContext,
    grants: Vec<PermissionGrant>,
}

impl PermissionSnapshot {
    /// Creates a snapshot from a context and the grant rows loaded for it.
    #[must_use]
    pub fn new(context: UserContext, grants: Vec<PermissionGrant>) -> Self {
        Self { context, grants }
    }

    /// Returns the evaluated principal context.
    #[must_use]
    pub fn context(&self) -> &UserContext {
        &self.context
    }

    /// Evaluates one permission key against the snapshot.
    #[must_use]
    pub fn allows(&self, permission: PermissionKey) -> bool {
        has_permission(&self.context, permission, &self.grants)
    }

    /// Returns every permission key the snapshot grants.
    #[must_use]
    pub fn granted(&self) -> BTreeSet<PermissionKey> {
        granted_permissions(&self.context, &self.grants)
    }
}

#[cfg(test)]
mod tests;
