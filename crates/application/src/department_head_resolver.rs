use std::sync::Arc;

use deskward_core::{DepartmentId, UserId};
use deskward_domain::{RoutingSelection, select_department_head};
use tracing::warn;

use crate::DirectoryRepository;

/// Finds the head-of-department user used for auto-assignment.
///
/// Lookup failures and missing heads both resolve to `None`; they never fail the
/// surrounding ticket mutation.
#[derive(Clone)]
pub struct DepartmentHeadResolver {
    directory_repository: Arc<dyn DirectoryRepository>,
}

impl DepartmentHeadResolver {
    /// Creates a resolver over the directory.
    #[must_use]
    pub fn new(directory_repository: Arc<dyn DirectoryRepository>) -> Self {
        Self {
            directory_repository,
        }
    }

    /// Returns the head of the department, if exactly one can be determined.
    pub async fn resolve_head(&self, department_id: DepartmentId) -> Option<UserId> {
        let head_ids = match self
            .directory_repository
            .list_department_head_ids(department_id)
            .await
        {
            Ok(head_ids) => head_ids,
            Err(error) => {
                warn!(%department_id, %error, "department head lookup failed; leaving ticket unassigned");
                return None;
            }
        };

        let selection = select_department_head(head_ids);
        if let RoutingSelection::Ambiguous { chosen, candidates } = selection {
            warn!(
                %department_id,
                %chosen,
                candidates,
                "department has several heads; picked the lowest user id"
            );
        }

        selection.into_option()
    }
}
