//! Department routing from a classification.

use tracing::instrument;

use supportdesk_shared::{Classification, Department, DepartmentMappings, Priority, Routing};

/// Fixed confidence reported for every routing decision.
pub const ROUTING_CONFIDENCE: f64 = 0.90;

/// Used when a category has no configured departments.
const FALLBACK_DEPARTMENT: Department = Department::CustomerSuccess;

/// Sentiment below which a high-priority ticket is flagged for escalation.
const HIGH_PRIORITY_SENTIMENT_FLOOR: f64 = -0.5;

/// Maps (category, priority) to departments.
#[derive(Debug, Clone, Default)]
pub struct Router {
    mappings: DepartmentMappings,
}

impl Router {
    pub fn new(mappings: DepartmentMappings) -> Self {
        Self { mappings }
    }

    #[instrument(skip_all, fields(ticket_id = %classification.ticket_id))]
    pub fn route(&self, classification: &Classification) -> Routing {
        let departments = self
            .mappings
            .departments_for(classification.category)
            .filter(|d| !d.is_empty());

        Routing {
            ticket_id: classification.ticket_id.clone(),
            primary_department: select_primary(departments, classification.priority),
            backup_departments: backups(departments),
            needs_escalation: router_escalation(classification),
            routing_confidence: ROUTING_CONFIDENCE,
        }
    }
}

/// Elevated tickets go to the escalation team when the category lists it;
/// otherwise the first listed department handles the ticket.
fn select_primary(departments: Option<&[Department]>, priority: Priority) -> Department {
    let Some(departments) = departments else {
        return FALLBACK_DEPARTMENT;
    };

    if priority.is_elevated() && departments.contains(&Department::EscalationTeam) {
        return Department::EscalationTeam;
    }

    departments[0]
}

/// Tail of the configured list. Computed independently of the primary
/// override, so it may contain the primary department.
fn backups(departments: Option<&[Department]>) -> Vec<Department> {
    match departments {
        Some([_, rest @ ..]) => rest.to_vec(),
        _ => Vec::new(),
    }
}

fn router_escalation(classification: &Classification) -> bool {
    match classification.priority {
        Priority::Urgent => true,
        Priority::High => classification.sentiment_score < HIGH_PRIORITY_SENTIMENT_FLOOR,
        Priority::Medium | Priority::Low => false,
    }
}
