//! Routing rules for ticket ownership and service-level policies.

use deskward_core::{DepartmentId, NonEmptyString, SlaPolicyId, UserId};
use serde::{Deserialize, Serialize};

use crate::ticket::TicketPriority;

/// Department record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Stable department identifier.
    pub id: DepartmentId,
    /// Display name.
    pub name: NonEmptyString,
}

/// Service-level policy keyed by priority and optionally department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaPolicy {
    /// Stable policy identifier.
    pub id: SlaPolicyId,
    /// Display name.
    pub name: String,
    /// Priority the policy governs.
    pub priority: TicketPriority,
    /// Department scope; `None` is the fallback for the priority.
    pub department_id: Option<DepartmentId>,
    /// Target for the first response, in minutes.
    pub first_response_minutes: u32,
    /// Target for resolution, in minutes.
    pub resolution_minutes: u32,
}

/// Outcome of picking one value out of a candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingSelection<T> {
    /// No candidate qualified.
    Missing,
    /// Exactly one candidate qualified.
    Unique(T),
    /// Several candidates qualified; `chosen` is the deterministic pick.
    Ambiguous {
        /// Picked value.
        chosen: T,
        /// Number of qualifying candidates.
        candidates: usize,
    },
}

impl<T> RoutingSelection<T> {
    fn from_sorted(mut values: Vec<T>) -> Self {
        let candidates = values.len();
        match candidates {
            0 => Self::Missing,
            1 => values.pop().map_or(Self::Missing, Self::Unique),
            _ => {
                let chosen = values.swap_remove(0);
                Self::Ambiguous { chosen, candidates }
            }
        }
    }

    /// Returns the selected value, if any.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Missing => None,
            Self::Unique(value) | Self::Ambiguous { chosen: value, .. } => Some(value),
        }
    }
}

/// Picks the department head among users holding the role for one department.
///
/// Several heads is a data anomaly; the lowest user id wins.
#[must_use]
pub fn select_department_head(mut head_ids: Vec<UserId>) -> RoutingSelection<UserId> {
    head_ids.sort_unstable();
    head_ids.dedup();
    RoutingSelection::from_sorted(head_ids)
}

/// Picks the SLA policy for a priority and the ticket's primary department.
///
/// Department-specific policies win over the department-less fallback and policies
/// of other priorities never qualify. Competing policies on the same tier resolve to
/// the smallest policy id and are reported as ambiguous.
#[must_use]
pub fn select_sla_policy(
    priority: TicketPriority,
    primary_department_id: Option<DepartmentId>,
    policies: &[SlaPolicy],
) -> RoutingSelection<SlaPolicyId> {
    let tier = |department_id: Option<DepartmentId>| {
        let mut ids: Vec<SlaPolicyId> = policies
            .iter()
            .filter(|policy| policy.priority == priority && policy.department_id == department_id)
            .map(|policy| policy.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };

    if primary_department_id.is_some() {
        let department_specific = tier(primary_department_id);
        if !department_specific.is_empty() {
            return RoutingSelection::from_sorted(department_specific);
        }
    }

    RoutingSelection::from_sorted(tier(None))
}

/// Routing decision handed to the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentPlan {
    /// Owner of the ticket.
    pub assigned_to: Option<UserId>,
    /// Governing SLA policy.
    pub sla_policy_id: Option<SlaPolicyId>,
}

/// Signal raised when a mutation changes the ticket owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentChange {
    /// Owner before the mutation.
    pub previous_assignee: Option<UserId>,
    /// Owner after the mutation.
    pub new_assignee: Option<UserId>,
}

impl AssignmentChange {
    /// Returns the change between the stored owner and the planned owner, if any.
    #[must_use]
    pub fn detect(previous_assignee: Option<UserId>, plan: &AssignmentPlan) -> Option<Self> {
        (previous_assignee != plan.assigned_to).then_some(Self {
            previous_assignee,
            new_assignee: plan.assigned_to,
        })
    }
}
