use std::collections::HashSet;
use std::str::FromStr;

use deskward_core::{
    AppError, AppResult, DepartmentId, NonEmptyString, SlaPolicyId, TicketId, UserId,
};
use serde::{Deserialize, Serialize};

/// Sentinel transport value requesting department-head assignment.
pub const AUTO_ASSIGN_SENTINEL: &str = "auto-assign";

/// Ticket urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    /// No deadline pressure.
    Low,
    /// Default urgency.
    Medium,
    /// Needs attention within the working day.
    High,
    /// Blocks business operations.
    Critical,
}

impl TicketPriority {
    /// Returns a stable storage value for this priority.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Parses a transport value into a priority.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for TicketPriority {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(AppError::Validation(format!(
                "unknown ticket priority '{value}'"
            ))),
        }
    }
}

/// Requested owner of a ticket mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssigneeRequest {
    /// Assign to this user.
    Explicit(UserId),
    /// Assign to the head of the ticket's primary department.
    AutoAssign,
    /// Leave the ticket unassigned.
    Unassigned,
}

impl AssigneeRequest {
    /// Parses the `assigned_to` transport field.
    ///
    /// Absent and blank values mean unassigned; the sentinel means auto-assign.
    pub fn from_transport(value: Option<&str>) -> AppResult<Self> {
        let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(Self::Unassigned);
        };

        if value == AUTO_ASSIGN_SENTINEL {
            return Ok(Self::AutoAssign);
        }

        UserId::from_str(value).map(Self::Explicit)
    }
}

/// Ticket fields owned by the routing core plus the descriptive fields persisted with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    title: NonEmptyString,
    description: Option<String>,
    priority: TicketPriority,
    department_ids: Vec<DepartmentId>,
    assigned_to: Option<UserId>,
    sla_policy_id: Option<SlaPolicyId>,
    created_by: UserId,
}

impl Ticket {
    /// Creates a ticket, dropping repeated departments while keeping assignment order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TicketId,
        title: impl Into<String>,
        description: Option<String>,
        priority: TicketPriority,
        department_ids: Vec<DepartmentId>,
        assigned_to: Option<UserId>,
        sla_policy_id: Option<SlaPolicyId>,
        created_by: UserId,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            title: NonEmptyString::new(title)?,
            description: description.filter(|value| !value.trim().is_empty()),
            priority,
            department_ids: dedupe_in_order(department_ids),
            assigned_to,
            sla_policy_id,
            created_by,
        })
    }

    /// Returns the ticket identifier.
    #[must_use]
    pub fn id(&self) -> TicketId {
        self.id
    }

    /// Returns the ticket title.
    #[must_use]
    pub fn title(&self) -> &NonEmptyString {
        &self.title
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the ticket priority.
    #[must_use]
    pub fn priority(&self) -> TicketPriority {
        self.priority
    }

    /// Returns the departments in assignment order.
    #[must_use]
    pub fn department_ids(&self) -> &[DepartmentId] {
        self.department_ids.as_slice()
    }

    /// Returns the first department, which drives routing.
    #[must_use]
    pub fn primary_department_id(&self) -> Option<DepartmentId> {
        self.department_ids.first().copied()
    }

    /// Returns the current owner.
    #[must_use]
    pub fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the governing SLA policy.
    #[must_use]
    pub fn sla_policy_id(&self) -> Option<SlaPolicyId> {
        self.sla_policy_id
    }

    /// Returns the creator.
    #[must_use]
    pub fn created_by(&self) -> UserId {
        self.created_by
    }
}

/// Removes repeated departments, keeping the first occurrence of each.
#[must_use]
pub fn dedupe_in_order(department_ids: Vec<DepartmentId>) -> Vec<DepartmentId> {
    let mut seen = HashSet::with_capacity(department_ids.len());
    department_ids
        .into_iter()
        .filter(|department_id| seen.insert(*department_id))
        .collect()
}
