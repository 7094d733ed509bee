//! Ticket classification: category by keyword precedence, priority by thresholds.

use tracing::instrument;

use supportdesk_shared::{
    Category, Classification, KeywordConfig, Priority, PriorityThresholds, Ticket, TicketStatus,
};

use crate::lexical::{Lexicon, lowercase_all};

/// Fixed confidence reported for every classification.
pub const CLASSIFIER_CONFIDENCE: f64 = 0.85;

/// Maximum number of key issues kept per ticket.
const MAX_KEY_ISSUES: usize = 3;

/// Fragments must be longer than this (in characters) to count as key issues.
const MIN_KEY_ISSUE_CHARS: usize = 20;

/// Assigns a category and priority to a ticket.
#[derive(Debug, Clone)]
pub struct Classifier {
    lexicon: Lexicon,
    thresholds: PriorityThresholds,
    /// Keyword groups in precedence order; the first group with a hit wins.
    category_groups: Vec<(Category, Vec<String>)>,
}

impl Classifier {
    pub fn new(lexicon: Lexicon, thresholds: PriorityThresholds, keywords: &KeywordConfig) -> Self {
        let category_groups = vec![
            (Category::Technical, lowercase_all(&keywords.technical)),
            (Category::Billing, lowercase_all(&keywords.billing)),
            (Category::Account, lowercase_all(&keywords.account)),
            (Category::FeatureRequest, lowercase_all(&keywords.feature_request)),
        ];

        Self {
            lexicon,
            thresholds,
            category_groups,
        }
    }

    /// Classify a validated ticket.
    #[instrument(skip_all, fields(ticket_id = %ticket.id))]
    pub fn classify(&self, ticket: &Ticket) -> Classification {
        let sentiment_score = self.lexicon.sentiment_score(&ticket.content);
        let keyword_count = ticket.metadata.escalation_keywords_found.len();

        Classification {
            ticket_id: ticket.id.clone(),
            category: self.determine_category(&ticket.content),
            priority: self.determine_priority(sentiment_score, keyword_count),
            sentiment_score,
            key_issues: extract_key_issues(&ticket.content),
            status: TicketStatus::Classified,
            confidence: CLASSIFIER_CONFIDENCE,
        }
    }

    /// First-match keyword search: technical > billing > account > feature_request,
    /// falling back to general.
    pub fn determine_category(&self, content: &str) -> Category {
        let content = content.to_lowercase();

        self.category_groups
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| content.contains(k.as_str())))
            .map(|(category, _)| *category)
            .unwrap_or(Category::General)
    }

    /// Threshold check in the order urgent → high → medium → low.
    pub fn determine_priority(&self, sentiment_score: f64, escalation_keyword_count: usize) -> Priority {
        let t = &self.thresholds;

        if sentiment_score <= t.urgent.sentiment_score
            || escalation_keyword_count >= t.urgent.escalation_keyword_count
        {
            return Priority::Urgent;
        }

        if sentiment_score <= t.high.sentiment_score
            || escalation_keyword_count >= t.high.escalation_keyword_count
        {
            return Priority::High;
        }

        if sentiment_score <= t.medium.sentiment_score {
            return Priority::Medium;
        }

        Priority::Low
    }
}

/// Period-separated fragments longer than 20 characters, first three in order.
pub fn extract_key_issues(content: &str) -> Vec<String> {
    content
        .split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_KEY_ISSUE_CHARS)
        .take(MAX_KEY_ISSUES)
        .map(String::from)
        .collect()
}
