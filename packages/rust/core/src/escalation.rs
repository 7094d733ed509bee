//! Escalation evaluation.
//!
//! Re-decides escalation independently of the router, with additional
//! keyword-count and legal-term rules. Its verdict determines the final status.

use tracing::instrument;

use supportdesk_shared::{Classification, Escalation, Priority, Routing, Ticket};

/// Escalation keywords that indicate a legal or compliance matter.
pub const LEGAL_KEYWORDS: [&str; 4] = ["legal", "lawsuit", "attorney", "lawyer"];

/// Keyword count at which a ticket escalates regardless of priority.
const MULTIPLE_KEYWORD_COUNT: usize = 2;

const HIGH_PRIORITY_SENTIMENT_FLOOR: f64 = -0.5;
const CRITICAL_SENTIMENT_FLOOR: f64 = -0.7;

const ACTION_STANDARD: &str = "Process through standard workflow";
const ACTION_LEVEL_3: &str = "Immediate human intervention required - Notify senior support manager";
const ACTION_LEVEL_2: &str = "Route to escalation team - Response required within 2 hours";
const ACTION_LEVEL_1: &str = "Flag for supervisor review - Response required within 24 hours";

/// Decides whether a human must intervene, and how urgently.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscalationEvaluator;

impl EscalationEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// The router's `needs_escalation` flag is not consulted.
    #[instrument(skip_all, fields(ticket_id = %ticket.id))]
    pub fn evaluate(
        &self,
        ticket: &Ticket,
        classification: &Classification,
        _routing: &Routing,
    ) -> Escalation {
        let priority = classification.priority;
        let sentiment = classification.sentiment_score;

        let (needs_escalation, reason) = check_criteria(
            priority,
            sentiment,
            &ticket.metadata.escalation_keywords_found,
        );
        let level = escalation_level(priority, sentiment);

        Escalation {
            ticket_id: ticket.id.clone(),
            needs_escalation,
            escalation_level: level,
            escalation_reason: reason,
            recommended_action: recommended_action(needs_escalation, level).to_string(),
            human_review_required: needs_escalation,
        }
    }
}

/// First matching rule wins.
fn check_criteria(priority: Priority, sentiment: f64, keywords: &[String]) -> (bool, String) {
    if priority == Priority::Urgent {
        return (true, "Urgent priority ticket".into());
    }

    if priority == Priority::High && sentiment < HIGH_PRIORITY_SENTIMENT_FLOOR {
        return (true, "High priority with negative sentiment".into());
    }

    if keywords.len() >= MULTIPLE_KEYWORD_COUNT {
        return (
            true,
            format!("Multiple escalation keywords found: {}", keywords.join(", ")),
        );
    }

    if keywords.iter().any(|k| LEGAL_KEYWORDS.contains(&k.as_str())) {
        return (true, "Legal/compliance issue detected".into());
    }

    (false, "No escalation criteria met".into())
}

/// 3 = critical, 2 = high, 1 = standard. Computed even when not escalating.
pub fn escalation_level(priority: Priority, sentiment: f64) -> u8 {
    match priority {
        Priority::Urgent if sentiment < CRITICAL_SENTIMENT_FLOOR => 3,
        Priority::Urgent => 2,
        Priority::High if sentiment < HIGH_PRIORITY_SENTIMENT_FLOOR => 2,
        _ => 1,
    }
}

pub fn recommended_action(needs_escalation: bool, level: u8) -> &'static str {
    match (needs_escalation, level) {
        (false, _) => ACTION_STANDARD,
        (true, 3) => ACTION_LEVEL_3,
        (true, 2) => ACTION_LEVEL_2,
        (true, _) => ACTION_LEVEL_1,
    }
}
