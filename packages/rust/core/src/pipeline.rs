//! End-to-end ticket pipeline: text → parse → validate → classify → route →
//! respond → evaluate escalation → [`ProcessedTicket`].

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use supportdesk_shared::{
    AppConfig, ProcessedTicket, RawTicket, Result, SupportDeskError, Ticket, TicketStatus,
};

use crate::classifier::Classifier;
use crate::escalation::EscalationEvaluator;
use crate::events::{EventSink, PipelineEvent};
use crate::lexical::Lexicon;
use crate::responder::ResponseGenerator;
use crate::router::Router;

/// Generate a unique, time-sortable ticket identifier.
pub fn generate_ticket_id() -> String {
    format!("TKT-{}", Uuid::now_v7().simple())
}

/// Outcome of one entry in a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Position of the input in the batch.
    pub index: usize,
    pub result: Result<ProcessedTicket>,
}

/// Parse a JSON array of raw tickets.
///
/// Only a document that is not a JSON array fails as a whole. A malformed
/// element becomes a parse error in its own slot.
pub fn parse_ticket_batch(json: &str) -> Result<Vec<Result<RawTicket>>> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| SupportDeskError::parse(format!("invalid ticket batch: {e}")))?;

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value(entry).map_err(|e| {
                SupportDeskError::parse(format!("invalid ticket at index {index}: {e}"))
            })
        })
        .collect())
}

/// The four-stage support pipeline, built once from configuration.
#[derive(Debug, Clone)]
pub struct SupportPipeline {
    lexicon: Lexicon,
    classifier: Classifier,
    router: Router,
    responder: ResponseGenerator,
    escalation: EscalationEvaluator,
}

impl SupportPipeline {
    pub fn new(config: &AppConfig) -> Self {
        let lexicon = Lexicon::new(&config.keywords);

        Self {
            classifier: Classifier::new(
                lexicon.clone(),
                config.priority_thresholds.clone(),
                &config.keywords,
            ),
            router: Router::new(config.department_mappings.clone()),
            responder: ResponseGenerator::new(),
            escalation: EscalationEvaluator::new(),
            lexicon,
        }
    }

    /// Wrap raw customer text in a complete raw ticket (new id, current time, metadata).
    pub fn parse_ticket(&self, text: &str) -> RawTicket {
        RawTicket {
            id: Some(generate_ticket_id()),
            content: Some(text.to_string()),
            timestamp: Some(Utc::now().to_rfc3339()),
            metadata: Some(self.lexicon.extract_metadata(text)),
        }
    }

    /// Require `id`, `content` and `timestamp`; compute metadata when absent.
    pub fn validate_ticket(&self, raw: RawTicket) -> Result<Ticket> {
        let missing: Vec<&str> = [
            ("id", raw.id.is_none()),
            ("content", raw.content.is_none()),
            ("timestamp", raw.timestamp.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        let (Some(id), Some(content), Some(timestamp)) = (raw.id, raw.content, raw.timestamp)
        else {
            return Err(SupportDeskError::validation(format!(
                "ticket is missing required field(s): {}",
                missing.join(", ")
            )));
        };

        let metadata = raw
            .metadata
            .unwrap_or_else(|| self.lexicon.extract_metadata(&content));

        Ok(Ticket {
            id,
            content,
            timestamp,
            metadata,
        })
    }

    /// Process raw customer text.
    pub fn process(&self, text: &str, sink: &dyn EventSink) -> Result<ProcessedTicket> {
        self.process_ticket(self.parse_ticket(text), sink)
    }

    /// Validate and run a raw ticket through every stage.
    ///
    /// Fails fast on validation errors; no partial result is produced.
    #[instrument(skip_all, fields(ticket_id = raw.id.as_deref().unwrap_or("-")))]
    pub fn process_ticket(&self, raw: RawTicket, sink: &dyn EventSink) -> Result<ProcessedTicket> {
        let raw_id = raw.id.clone();
        let ticket = match self.validate_ticket(raw) {
            Ok(ticket) => ticket,
            Err(error) => {
                sink.record(&PipelineEvent::Failed {
                    ticket_id: raw_id.as_deref(),
                    error: &error,
                });
                return Err(error);
            }
        };
        sink.record(&PipelineEvent::TicketParsed(&ticket));

        let classification = self.classifier.classify(&ticket);
        sink.record(&PipelineEvent::Classified(&classification));

        let routing = self.router.route(&classification);
        sink.record(&PipelineEvent::Routed(&routing));

        let response = self.responder.generate(&ticket, &classification, &routing);
        sink.record(&PipelineEvent::ResponseGenerated(&response));

        let escalation = self.escalation.evaluate(&ticket, &classification, &routing);
        sink.record(&PipelineEvent::EscalationEvaluated(&escalation));

        let final_status = if escalation.needs_escalation {
            TicketStatus::Escalated
        } else {
            TicketStatus::Responded
        };

        let processed = ProcessedTicket {
            ticket,
            classification,
            routing,
            response,
            escalation,
            final_status,
        };
        sink.record(&PipelineEvent::Completed(&processed));

        Ok(processed)
    }

    /// Process tickets in submission order. A failing ticket is reported in
    /// its outcome and does not stop the ones after it.
    /// Entries that already failed to parse are reported and kept in place.
    #[instrument(skip_all)]
    pub fn process_batch<I>(&self, entries: I, sink: &dyn EventSink) -> Vec<BatchOutcome>
    where
        I: IntoIterator<Item = Result<RawTicket>>,
    {
        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let result = match entry {
                    Ok(raw) => self.process_ticket(raw, sink),
                    Err(error) => {
                        sink.record(&PipelineEvent::Failed {
                            ticket_id: None,
                            error: &error,
                        });
                        Err(error)
                    }
                };
                BatchOutcome { index, result }
            })
            .collect()
    }
}

impl Default for SupportPipeline {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use supportdesk_shared::{Category, Department, Priority, ResponseType};

    use crate::events::{SilentSink, Stage};

    /// Collects rendered events for assertions.
    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<(Stage, String)>>,
    }

    impl EventSink for RecordingSink {
        fn record(&self, event: &PipelineEvent<'_>) {
            self.events
                .lock()
                .expect("sink lock")
                .push((event.stage(), event.to_string()));
        }
    }

    impl RecordingSink {
        fn stages(&self) -> Vec<Stage> {
            self.events
                .lock()
                .expect("sink lock")
                .iter()
                .map(|(stage, _)| *stage)
                .collect()
        }
    }

    const OUTAGE: &str = "URGENT: system is completely down! This is an emergency, we need help immediately";
    const DARK_MODE: &str = "I love this feature idea, could you add dark mode";

    #[test]
    fn ticket_ids_are_unique() {
        let a = generate_ticket_id();
        let b = generate_ticket_id();
        assert!(a.starts_with("TKT-"));
        assert_ne!(a, b);
    }

    #[test]
    fn parse_ticket_fills_every_field() {
        let pipeline = SupportPipeline::default();
        let raw = pipeline.parse_ticket("Refund please, ASAP");
        assert!(raw.id.is_some());
        assert!(raw.timestamp.is_some());
        assert_eq!(raw.content.as_deref(), Some("Refund please, ASAP"));
        let metadata = raw.metadata.expect("metadata");
        assert_eq!(metadata.escalation_keywords_found, vec!["asap", "refund"]);
        assert_eq!(metadata.word_count, 3);
    }

    #[test]
    fn urgent_outage_escalates() {
        let pipeline = SupportPipeline::default();
        let result = pipeline.process(OUTAGE, &SilentSink).expect("process");

        assert_eq!(
            result.ticket.metadata.escalation_keywords_found,
            vec!["urgent", "emergency", "immediately"]
        );
        // No technical keyword appears literally in the text.
        assert_eq!(result.classification.category, Category::General);
        assert_eq!(result.classification.priority, Priority::Urgent);
        assert_eq!(result.classification.sentiment_score, 0.0);

        assert_eq!(result.routing.primary_department, Department::EscalationTeam);
        assert!(result.routing.needs_escalation);

        assert_eq!(result.response.response_type, ResponseType::HumanReviewNeeded);
        assert!(result.response.response_text.contains("marked as urgent"));

        assert!(result.escalation.needs_escalation);
        assert_eq!(result.escalation.escalation_reason, "Urgent priority ticket");
        assert!((2..=3).contains(&result.escalation.escalation_level));
        assert_eq!(result.final_status, TicketStatus::Escalated);
    }

    #[test]
    fn overridden_primary_is_duplicated_in_backups() {
        let result = SupportPipeline::default()
            .process(OUTAGE, &SilentSink)
            .expect("process");
        assert_eq!(result.routing.primary_department, Department::EscalationTeam);
        assert_eq!(result.routing.backup_departments, vec![Department::EscalationTeam]);
    }

    #[test]
    fn friendly_feature_request_is_automated() {
        let result = SupportPipeline::default()
            .process(DARK_MODE, &SilentSink)
            .expect("process");

        assert_eq!(result.classification.category, Category::FeatureRequest);
        assert_eq!(result.classification.sentiment_score, 1.0);
        assert_eq!(result.classification.priority, Priority::Low);
        assert_eq!(result.routing.primary_department, Department::ProductTeam);
        assert!(!result.escalation.needs_escalation);
        assert_eq!(result.response.response_type, ResponseType::Automated);
        assert_eq!(result.final_status, TicketStatus::Responded);
    }

    #[test]
    fn escalation_can_disagree_with_router() {
        // Two escalation keywords: priority high (count >= 2) with neutral
        // sentiment. The router does not flag it, the evaluator does.
        let result = SupportPipeline::default()
            .process("I want to cancel and get a refund", &SilentSink)
            .expect("process");

        assert_eq!(result.classification.priority, Priority::High);
        assert!(!result.routing.needs_escalation);
        assert!(result.escalation.needs_escalation);
        assert_eq!(
            result.escalation.escalation_reason,
            "Multiple escalation keywords found: cancel, refund"
        );
        assert_eq!(result.final_status, TicketStatus::Escalated);
    }

    #[test]
    fn processing_is_deterministic_in_content() {
        let pipeline = SupportPipeline::default();
        for text in [OUTAGE, DARK_MODE, "Where is my invoice?"] {
            let a = pipeline.process(text, &SilentSink).expect("first run");
            let b = pipeline.process(text, &SilentSink).expect("second run");

            assert_ne!(a.ticket.id, b.ticket.id);
            assert_eq!(a.ticket.metadata, b.ticket.metadata);

            let mut b_classification = b.classification.clone();
            b_classification.ticket_id = a.ticket.id.clone();
            assert_eq!(a.classification, b_classification);

            assert_eq!(a.routing.primary_department, b.routing.primary_department);
            assert_eq!(a.routing.backup_departments, b.routing.backup_departments);
            assert_eq!(a.routing.needs_escalation, b.routing.needs_escalation);
            assert_eq!(a.response.response_text, b.response.response_text);
            assert_eq!(a.response.response_type, b.response.response_type);
            assert_eq!(a.escalation.escalation_reason, b.escalation.escalation_reason);
            assert_eq!(a.escalation.escalation_level, b.escalation.escalation_level);
            assert_eq!(a.final_status, b.final_status);
        }
    }

    #[test]
    fn missing_content_fails_fast() {
        let pipeline = SupportPipeline::default();
        let sink = RecordingSink::default();
        let raw = RawTicket {
            id: Some("TKT-no-content".into()),
            content: None,
            timestamp: Some("2026-01-01T00:00:00Z".into()),
            metadata: None,
        };

        let err = pipeline.process_ticket(raw, &sink).unwrap_err();
        assert!(matches!(err, SupportDeskError::Validation { .. }));
        assert!(err.to_string().contains("content"));
        // Only the failure is recorded; no stage ran.
        assert_eq!(sink.stages(), vec![Stage::Orchestrator]);
        let events = sink.events.lock().expect("sink lock");
        assert!(events[0].1.starts_with("[ORCHESTRATOR] ticket processing failed: id=TKT-no-content"));
    }

    #[test]
    fn validation_names_every_missing_field() {
        let err = SupportPipeline::default()
            .validate_ticket(RawTicket::default())
            .unwrap_err();
        assert!(err
            .to_string()
            .ends_with("missing required field(s): id, content, timestamp"));
    }

    #[test]
    fn validation_recomputes_missing_metadata() {
        let pipeline = SupportPipeline::default();
        let ticket = pipeline
            .validate_ticket(RawTicket {
                id: Some("TKT-x".into()),
                content: Some("legal action pending".into()),
                timestamp: Some("2026-01-01T00:00:00Z".into()),
                metadata: None,
            })
            .expect("valid");
        assert_eq!(ticket.metadata.escalation_keywords_found, vec!["legal"]);
        assert_eq!(ticket.metadata.word_count, 3);
    }

    #[test]
    fn processed_ticket_revalidates_unchanged() {
        let pipeline = SupportPipeline::default();
        let result = pipeline.process(DARK_MODE, &SilentSink).expect("process");
        let again = pipeline
            .validate_ticket(RawTicket::from(result.ticket.clone()))
            .expect("still valid");
        assert_eq!(again, result.ticket);
    }

    #[test]
    fn events_follow_stage_order() {
        let sink = RecordingSink::default();
        SupportPipeline::default()
            .process(DARK_MODE, &sink)
            .expect("process");
        assert_eq!(
            sink.stages(),
            vec![
                Stage::Orchestrator,
                Stage::Classifier,
                Stage::Router,
                Stage::ResponseGenerator,
                Stage::EscalationHandler,
                Stage::Orchestrator,
            ]
        );
    }

    #[test]
    fn batch_continues_after_failure() {
        let pipeline = SupportPipeline::default();
        let tickets = vec![
            pipeline.parse_ticket(DARK_MODE),
            RawTicket {
                content: Some("no id or timestamp".into()),
                ..RawTicket::default()
            },
            pipeline.parse_ticket(OUTAGE),
        ];

        let outcomes = pipeline.process_batch(tickets.into_iter().map(Ok), &SilentSink);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_err());
        assert_eq!(outcomes[1].index, 1);
        let last = outcomes[2].result.as_ref().expect("third ticket processed");
        assert_eq!(last.final_status, TicketStatus::Escalated);
    }

    #[test]
    fn custom_config_changes_routing() {
        let mut config = AppConfig::default();
        config
            .department_mappings
            .0
            .insert("feature_request".into(), vec![Department::CustomerSuccess]);
        let result = SupportPipeline::new(&config)
            .process(DARK_MODE, &SilentSink)
            .expect("process");
        assert_eq!(result.routing.primary_department, Department::CustomerSuccess);
        assert!(result.routing.backup_departments.is_empty());
    }

    #[test]
    fn batch_fixture_parses_and_processes() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/tickets.fixture.json")
            .expect("read fixture");
        let tickets = parse_ticket_batch(&fixture).expect("parse fixture");
        assert_eq!(tickets.len(), 4);

        let outcomes = SupportPipeline::default().process_batch(tickets, &SilentSink);
        let failures: Vec<usize> = outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.index)
            .collect();
        assert_eq!(failures, vec![3]);
    }

    #[test]
    fn malformed_batch_is_parse_error() {
        let err = parse_ticket_batch("{not json").unwrap_err();
        assert!(matches!(err, SupportDeskError::Parse { .. }));

        let err = parse_ticket_batch(r#"{"id": "TKT-1"}"#).unwrap_err();
        assert!(matches!(err, SupportDeskError::Parse { .. }));
    }

    #[test]
    fn malformed_entry_does_not_reject_batch() {
        let json = r#"[
            {"id": "TKT-a", "content": "Where can I find my invoice?", "timestamp": "2026-03-02T09:00:00Z"},
            {"id": "TKT-b", "content": "I will call my lawyer.", "timestamp": "2026-03-02T09:05:00Z",
             "metadata": {"escalation_keywords_found": ["legal"]}},
            {"id": 7, "content": "wrong id type", "timestamp": "2026-03-02T09:07:00Z"},
            {"id": "TKT-c", "content": "Please add dark mode.", "timestamp": "2026-03-02T09:10:00Z"}
        ]"#;
        let entries = parse_ticket_batch(json).expect("top level is an array");
        assert_eq!(entries.len(), 4);

        let sink = RecordingSink::default();
        let outcomes = SupportPipeline::default().process_batch(entries, &sink);
        assert_eq!(outcomes.len(), 4);

        for bad in [1, 2] {
            let err = outcomes[bad].result.as_ref().unwrap_err();
            assert!(matches!(err, SupportDeskError::Parse { .. }));
            assert!(err.to_string().contains(&format!("invalid ticket at index {bad}")));
        }
        let ids: Vec<&str> = [0, 3]
            .iter()
            .map(|&i| outcomes[i].result.as_ref().expect("valid entry processed"))
            .map(|r| r.ticket.id.as_str())
            .collect();
        assert_eq!(ids, vec!["TKT-a", "TKT-c"]);

        let failed = sink
            .events
            .lock()
            .expect("sink lock")
            .iter()
            .filter(|(_, msg)| msg.starts_with("[ORCHESTRATOR] ticket processing failed: id=-"))
            .count();
        assert_eq!(failed, 2);
    }
}
