//! Plain-text rendering of a processed ticket.

use std::fmt::Write;

use supportdesk_shared::ProcessedTicket;

const RULE_WIDTH: usize = 80;
const RESPONSE_RULE_WIDTH: usize = 40;

/// Render every field of a processed ticket as a human-readable report.
pub fn render(result: &ProcessedTicket) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, result);
    out
}

fn write_report(out: &mut String, r: &ProcessedTicket) -> std::fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    let thin = "-".repeat(RESPONSE_RULE_WIDTH);

    writeln!(out, "{rule}")?;
    writeln!(out, "Ticket ID:    {}", r.ticket.id)?;
    writeln!(out, "Created:      {}", r.ticket.timestamp)?;
    writeln!(out, "Final Status: {}", r.final_status)?;

    let meta = &r.ticket.metadata;
    writeln!(out, "\n--- TICKET ---")?;
    writeln!(out, "Content:    {}", preview(&r.ticket.content, 100))?;
    writeln!(out, "Words:      {}", meta.word_count)?;
    writeln!(
        out,
        "Contact:    email={} phone={} url={}",
        meta.has_email, meta.has_phone, meta.has_url
    )?;
    writeln!(out, "Keywords:   {}", join_or_none(&meta.escalation_keywords_found))?;

    let c = &r.classification;
    writeln!(out, "\n--- CLASSIFICATION ---")?;
    writeln!(out, "Category:   {}", c.category)?;
    writeln!(out, "Priority:   {}", c.priority)?;
    writeln!(out, "Sentiment:  {:.2}", c.sentiment_score)?;
    writeln!(out, "Status:     {}", c.status)?;
    writeln!(out, "Confidence: {:.2}", c.confidence)?;
    if c.key_issues.is_empty() {
        writeln!(out, "Key Issues: None")?;
    } else {
        writeln!(out, "Key Issues:")?;
        for issue in &c.key_issues {
            writeln!(out, "  - {issue}")?;
        }
    }

    let routing = &r.routing;
    let backups: Vec<&str> = routing.backup_departments.iter().map(|d| d.as_str()).collect();
    writeln!(out, "\n--- ROUTING ---")?;
    writeln!(out, "Department:         {}", routing.primary_department)?;
    writeln!(out, "Backup Departments: {}", join_or_none(&backups))?;
    writeln!(out, "Router Escalation:  {}", routing.needs_escalation)?;
    writeln!(out, "Confidence:         {:.2}", routing.routing_confidence)?;

    let response = &r.response;
    writeln!(out, "\n--- RESPONSE ---")?;
    writeln!(out, "Response Type: {}", response.response_type)?;
    writeln!(out, "Department:    {}", response.department)?;
    writeln!(out, "Confidence:    {:.2}", response.confidence)?;
    writeln!(out, "\nGenerated Response:\n{thin}")?;
    writeln!(out, "{}", response.response_text)?;
    writeln!(out, "{thin}")?;

    let e = &r.escalation;
    writeln!(out, "\n--- ESCALATION ---")?;
    writeln!(out, "Needed: {}", e.needs_escalation)?;
    if e.needs_escalation {
        writeln!(out, "Level:  {}", e.escalation_level)?;
        writeln!(out, "Reason: {}", e.escalation_reason)?;
        writeln!(out, "Recommended Action: {}", e.recommended_action)?;
        writeln!(out, "Human Review Required: {}", e.human_review_required)?;
    } else {
        writeln!(out, "Reason: {}", e.escalation_reason)?;
        writeln!(out, "Recommended Action: {}", e.recommended_action)?;
    }
    write!(out, "{rule}")?;

    Ok(())
}

/// First `max` characters, with an ellipsis when truncated.
fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max).collect();
    format!("{head}...")
}

fn join_or_none<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "None".to_string();
    }
    items.iter().map(|s| s.as_ref()).collect::<Vec<&str>>().join(", ")
}
