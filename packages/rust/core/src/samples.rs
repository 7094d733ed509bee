//! Built-in demo tickets.

/// A named example ticket.
#[derive(Debug, Clone, Copy)]
pub struct SampleTicket {
    pub name: &'static str,
    pub content: &'static str,
}

pub const SAMPLE_TICKETS: [SampleTicket; 4] = [
    SampleTicket {
        name: "Technical Issue - Urgent",
        content: "URGENT: Our production system is completely down! We're losing money every minute. \
                  This is a critical emergency and we need immediate help. Our entire team cannot work!",
    },
    SampleTicket {
        name: "Billing Inquiry - Medium",
        content: "Hello, I noticed an unexpected charge on my invoice for this month. \
                  Can you please help me understand what this charge is for? \
                  I'd appreciate a detailed breakdown.",
    },
    SampleTicket {
        name: "Feature Request - Low",
        content: "Hi team, I really love your product! I was wondering if you could add a dark mode feature. \
                  It would be great for working late at night. Thanks for considering!",
    },
    SampleTicket {
        name: "Account Issue - High",
        content: "I'm very frustrated. I've been trying to reset my password for 3 days now and nothing works. \
                  I can't access my account and I have important work to do. This is unacceptable.",
    },
];
