//! Templated customer response drafting.
//!
//! Text is assembled as `greeting + "\n\n" + body + "\n\n" + closing` from
//! fixed fragments selected by category and priority.

use tracing::instrument;

use supportdesk_shared::{
    Category, Classification, Priority, ResponseType, Routing, Ticket, TicketResponse,
};

/// Fixed confidence reported for every drafted response.
pub const RESPONSE_CONFIDENCE: f64 = 0.88;

const GREETING: &str = "Thank you for contacting our support team.";

const TECHNICAL_URGENT_BODY: &str = "We understand you're experiencing a critical technical issue. \
Our technical team has been immediately notified and will investigate this with highest priority. \
We'll provide an update within the next 2 hours.";

const TECHNICAL_BODY: &str = "We've received your technical support request. \
Our technical team is reviewing the issue and will provide a solution shortly. \
In the meantime, please ensure you're using the latest version of our software.";

const BILLING_BODY: &str = "We've received your billing inquiry. \
Our billing team is reviewing your account and will provide a detailed response within 24 hours. \
If you have any immediate concerns, please don't hesitate to reach out.";

const ACCOUNT_BODY: &str = "We're here to help with your account issue. \
Our customer success team is looking into this and will assist you in resolving it. \
For security purposes, we may need to verify your identity before making any account changes.";

const FEATURE_REQUEST_BODY: &str = "Thank you for your feature suggestion! \
We truly value customer feedback as it helps us improve our product. \
Your request has been forwarded to our product team for consideration in future updates.";

const GENERAL_BODY: &str = "We've received your inquiry and our customer success team is reviewing it. \
We'll provide you with a comprehensive response shortly.";

const URGENT_CLOSING: &str = "This ticket has been marked as urgent and is receiving immediate attention.\n\n\
Best regards,\n\
Customer Support Team";

const STANDARD_CLOSING: &str = "If you have any additional questions, please feel free to reply to this ticket.\n\n\
Best regards,\n\
Customer Support Team";

/// Drafts the reply sent (or proposed) to the customer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseGenerator;

impl ResponseGenerator {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(ticket_id = %ticket.id))]
    pub fn generate(
        &self,
        ticket: &Ticket,
        classification: &Classification,
        routing: &Routing,
    ) -> TicketResponse {
        let priority = classification.priority;

        TicketResponse {
            ticket_id: ticket.id.clone(),
            response_text: compose(classification.category, priority),
            department: routing.primary_department,
            response_type: response_type(priority),
            confidence: RESPONSE_CONFIDENCE,
        }
    }
}

/// Full response text for a category/priority pair.
pub fn compose(category: Category, priority: Priority) -> String {
    format!("{GREETING}\n\n{}\n\n{}", body(category, priority), closing(priority))
}

fn body(category: Category, priority: Priority) -> &'static str {
    match category {
        Category::Technical if priority == Priority::Urgent => TECHNICAL_URGENT_BODY,
        Category::Technical => TECHNICAL_BODY,
        Category::Billing => BILLING_BODY,
        Category::Account => ACCOUNT_BODY,
        Category::FeatureRequest => FEATURE_REQUEST_BODY,
        Category::General => GENERAL_BODY,
    }
}

fn closing(priority: Priority) -> &'static str {
    if priority == Priority::Urgent {
        URGENT_CLOSING
    } else {
        STANDARD_CLOSING
    }
}

fn response_type(priority: Priority) -> ResponseType {
    match priority {
        Priority::Low | Priority::Medium => ResponseType::Automated,
        Priority::High | Priority::Urgent => ResponseType::HumanReviewNeeded,
    }
}
