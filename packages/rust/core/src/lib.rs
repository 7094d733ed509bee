//! Core pipeline orchestration and domain logic for SupportDesk.
//!
//! Tickets flow through four rule-based stages (classify, route, respond,
//! evaluate escalation), sequenced by [`pipeline::SupportPipeline`].

pub mod classifier;
pub mod escalation;
pub mod events;
pub mod lexical;
pub mod pipeline;
pub mod report;
pub mod responder;
pub mod router;
pub mod samples;

pub use events::{EventSink, PipelineEvent, SilentSink, Stage, TracingSink};
pub use pipeline::{BatchOutcome, SupportPipeline, parse_ticket_batch};
