//! Core domain types for support ticket processing.
//!
//! Every record here is produced once by a pipeline stage and never mutated
//! afterwards. Records refer to each other only through the `ticket_id` string.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Subject-matter classification of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technical,
    Billing,
    General,
    Account,
    FeatureRequest,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 5] = [
        Self::Technical,
        Self::Billing,
        Self::General,
        Self::Account,
        Self::FeatureRequest,
    ];

    /// Snake-case name used in config keys and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Billing => "billing",
            Self::General => "general",
            Self::Account => "account",
            Self::FeatureRequest => "feature_request",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Urgency tier. Ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// `true` for `High` and `Urgent`.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::High | Self::Urgent)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A destination team for ticket handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    TechnicalSupport,
    BillingSupport,
    CustomerSuccess,
    ProductTeam,
    EscalationTeam,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TechnicalSupport => "technical_support",
            Self::BillingSupport => "billing_support",
            Self::CustomerSuccess => "customer_success",
            Self::ProductTeam => "product_team",
            Self::EscalationTeam => "escalation_team",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a ticket.
///
/// The pipeline only ever emits `Classified`, `Responded` and `Escalated`;
/// the remaining states belong to downstream handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    New,
    Classified,
    Routed,
    Responded,
    Escalated,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Classified => "classified",
            Self::Routed => "routed",
            Self::Responded => "responded",
            Self::Escalated => "escalated",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a drafted response can be sent as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Automated,
    HumanReviewNeeded,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Automated => "automated",
            Self::HumanReviewNeeded => "human_review_needed",
        }
    }
}

impl std::fmt::Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

/// Facts extracted from the ticket text at creation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketMetadata {
    /// Number of whitespace-separated tokens.
    pub word_count: usize,
    pub has_email: bool,
    pub has_phone: bool,
    pub has_url: bool,
    /// Escalation keywords present in the text, in keyword-list order, no duplicates.
    #[serde(default)]
    pub escalation_keywords_found: Vec<String>,
}

/// A validated support ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier (`TKT-…`).
    pub id: String,
    /// Raw customer text.
    pub content: String,
    /// Creation time (RFC 3339).
    pub timestamp: String,
    pub metadata: TicketMetadata,
}

/// Ticket as supplied from outside, before validation.
///
/// Every field is optional so that externally sourced tickets (e.g. a JSON
/// batch file) can be checked for completeness before processing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTicket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Recomputed from `content` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TicketMetadata>,
}

impl From<Ticket> for RawTicket {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: Some(ticket.id),
            content: Some(ticket.content),
            timestamp: Some(ticket.timestamp),
            metadata: Some(ticket.metadata),
        }
    }
}

// ---------------------------------------------------------------------------
// Stage outputs
// ---------------------------------------------------------------------------

/// Output of the classifier stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub ticket_id: String,
    pub category: Category,
    pub priority: Priority,
    /// In `[-1.0, 1.0]`.
    pub sentiment_score: f64,
    /// At most three sentence fragments from the ticket.
    pub key_issues: Vec<String>,
    pub status: TicketStatus,
    pub confidence: f64,
}

/// Output of the router stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routing {
    pub ticket_id: String,
    pub primary_department: Department,
    pub backup_departments: Vec<Department>,
    /// Router's own escalation verdict. Informational only.
    pub needs_escalation: bool,
    pub routing_confidence: f64,
}

/// Drafted customer-facing reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketResponse {
    pub ticket_id: String,
    pub response_text: String,
    pub department: Department,
    pub response_type: ResponseType,
    pub confidence: f64,
}

/// Output of the escalation evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Escalation {
    pub ticket_id: String,
    pub needs_escalation: bool,
    /// 1 (standard) to 3 (critical).
    pub escalation_level: u8,
    pub escalation_reason: String,
    pub recommended_action: String,
    pub human_review_required: bool,
}

/// Everything the pipeline produced for one ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedTicket {
    pub ticket: Ticket,
    pub classification: Classification,
    pub routing: Routing,
    pub response: TicketResponse,
    pub escalation: Escalation,
    /// `Escalated` or `Responded`.
    pub final_status: TicketStatus,
}
