//! Pipeline event recording.
//!
//! Stages never configure or touch a global logger. The orchestrator reports
//! what happened through an injected [`EventSink`]; callers decide where the
//! events go (nowhere, `tracing`, a progress bar, a test buffer).

use std::fmt;

use tracing::{debug, info, warn};

use supportdesk_shared::{
    Classification, Escalation, ProcessedTicket, Routing, SupportDeskError, Ticket, TicketResponse,
};

/// Pipeline stage that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Orchestrator,
    Classifier,
    Router,
    ResponseGenerator,
    EscalationHandler,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orchestrator => "orchestrator",
            Self::Classifier => "classifier",
            Self::Router => "router",
            Self::ResponseGenerator => "response_generator",
            Self::EscalationHandler => "escalation_handler",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that happened while processing a ticket.
#[derive(Debug, Clone, Copy)]
pub enum PipelineEvent<'a> {
    TicketParsed(&'a Ticket),
    Classified(&'a Classification),
    Routed(&'a Routing),
    ResponseGenerated(&'a TicketResponse),
    EscalationEvaluated(&'a Escalation),
    Completed(&'a ProcessedTicket),
    /// Processing aborted. `ticket_id` is absent when the input had none.
    Failed {
        ticket_id: Option<&'a str>,
        error: &'a SupportDeskError,
    },
}

impl PipelineEvent<'_> {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Classified(_) => Stage::Classifier,
            Self::Routed(_) => Stage::Router,
            Self::ResponseGenerated(_) => Stage::ResponseGenerator,
            Self::EscalationEvaluated(_) => Stage::EscalationHandler,
            Self::TicketParsed(_) | Self::Completed(_) | Self::Failed { .. } => Stage::Orchestrator,
        }
    }

    pub fn ticket_id(&self) -> Option<&str> {
        match self {
            Self::TicketParsed(t) => Some(t.id.as_str()),
            Self::Classified(c) => Some(c.ticket_id.as_str()),
            Self::Routed(r) => Some(r.ticket_id.as_str()),
            Self::ResponseGenerated(r) => Some(r.ticket_id.as_str()),
            Self::EscalationEvaluated(e) => Some(e.ticket_id.as_str()),
            Self::Completed(p) => Some(p.ticket.id.as_str()),
            Self::Failed { ticket_id, .. } => *ticket_id,
        }
    }

    /// Short human-readable action name.
    pub fn action(&self) -> &'static str {
        match self {
            Self::TicketParsed(_) => "ticket parsed",
            Self::Classified(_) => "classification complete",
            Self::Routed(_) => "routing complete",
            Self::ResponseGenerated(_) => "response generated",
            Self::EscalationEvaluated(_) => "escalation evaluation complete",
            Self::Completed(_) => "ticket processing complete",
            Self::Failed { .. } => "ticket processing failed",
        }
    }
}

/// `[STAGE] action: details`.
impl fmt::Display for PipelineEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage().as_str().to_uppercase(), self.action())?;
        match self {
            Self::TicketParsed(t) => write!(f, ": id={}, words={}", t.id, t.metadata.word_count),
            Self::Classified(c) => write!(
                f,
                ": id={}, category={}, priority={}, sentiment={:.2}",
                c.ticket_id, c.category, c.priority, c.sentiment_score
            ),
            Self::Routed(r) => write!(
                f,
                ": id={}, department={}, needs_escalation={}",
                r.ticket_id, r.primary_department, r.needs_escalation
            ),
            Self::ResponseGenerated(r) => {
                write!(f, ": id={}, type={}", r.ticket_id, r.response_type)
            }
            Self::EscalationEvaluated(e) => write!(
                f,
                ": id={}, needs_escalation={}, level={}",
                e.ticket_id, e.needs_escalation, e.escalation_level
            ),
            Self::Completed(p) => write!(f, ": id={}, status={}", p.ticket.id, p.final_status),
            Self::Failed { ticket_id, error } => {
                write!(f, ": id={}, error={error}", ticket_id.unwrap_or("-"))
            }
        }
    }
}

/// Receives pipeline events.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &PipelineEvent<'_>);
}

/// No-op sink for headless/test usage.
pub struct SilentSink;

impl EventSink for SilentSink {
    fn record(&self, _event: &PipelineEvent<'_>) {}
}

/// Forwards events to `tracing` with structured fields.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &PipelineEvent<'_>) {
        let stage = event.stage().as_str();
        let ticket_id = event.ticket_id().unwrap_or("-");

        match event {
            PipelineEvent::Classified(c) => info!(
                stage,
                ticket_id,
                category = %c.category,
                priority = %c.priority,
                sentiment = c.sentiment_score,
                "{}",
                event.action()
            ),
            PipelineEvent::Routed(r) => info!(
                stage,
                ticket_id,
                department = %r.primary_department,
                needs_escalation = r.needs_escalation,
                "{}",
                event.action()
            ),
            PipelineEvent::EscalationEvaluated(e) => info!(
                stage,
                ticket_id,
                needs_escalation = e.needs_escalation,
                level = e.escalation_level,
                "{}",
                event.action()
            ),
            PipelineEvent::Completed(p) => info!(
                stage,
                ticket_id,
                status = %p.final_status,
                "{}",
                event.action()
            ),
            PipelineEvent::Failed { error, .. } => {
                warn!(stage, ticket_id, error = %error, "{}", event.action())
            }
            PipelineEvent::TicketParsed(_) | PipelineEvent::ResponseGenerated(_) => {
                debug!(stage, ticket_id, "{}", event.action())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;
    use std::sync::{Arc, Mutex};

    use supportdesk_shared::{Category, Priority, RawTicket, TicketStatus};
    use tracing_subscriber::fmt::MakeWriter;

    use crate::pipeline::SupportPipeline;

    /// In-memory log target.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().expect("log lock").clone()).expect("utf8 logs")
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn display_formats_stage_and_details() {
        let classification = Classification {
            ticket_id: "TKT-1".into(),
            category: Category::Billing,
            priority: Priority::High,
            sentiment_score: -0.5,
            key_issues: vec![],
            status: TicketStatus::Classified,
            confidence: 0.85,
        };
        let event = PipelineEvent::Classified(&classification);
        assert_eq!(event.stage(), Stage::Classifier);
        assert_eq!(event.ticket_id(), Some("TKT-1"));
        assert_eq!(
            event.to_string(),
            "[CLASSIFIER] classification complete: id=TKT-1, category=billing, priority=high, sentiment=-0.50"
        );
    }

    #[test]
    fn failed_event_without_ticket_id() {
        let error = SupportDeskError::validation("missing id");
        let event = PipelineEvent::Failed {
            ticket_id: None,
            error: &error,
        };
        assert_eq!(event.stage(), Stage::Orchestrator);
        assert!(event.ticket_id().is_none());
        assert_eq!(
            event.to_string(),
            "[ORCHESTRATOR] ticket processing failed: id=-, error=validation error: missing id"
        );
    }

    #[test]
    fn tracing_sink_logs_every_event() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let pipeline = SupportPipeline::default();
            pipeline
                .process("I was charged twice on my invoice.", &TracingSink)
                .expect("process");
            assert!(pipeline.process_ticket(RawTicket::default(), &TracingSink).is_err());
        });

        let output = logs.contents();
        for action in [
            "ticket parsed",
            "classification complete",
            "routing complete",
            "response generated",
            "escalation evaluation complete",
            "ticket processing complete",
        ] {
            assert!(output.contains(action), "missing {action:?} in:\n{output}");
        }
        assert!(output.contains("category=billing"));
        assert!(output.contains("status=responded"));
        assert!(
            output
                .lines()
                .any(|line| line.contains("WARN") && line.contains("ticket processing failed"))
        );
    }
}
