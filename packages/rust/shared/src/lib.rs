//! Shared types, error model, and configuration for SupportDesk.
//!
//! This crate is the foundation depended on by all other SupportDesk crates.
//! It provides:
//! - [`SupportDeskError`], the unified error type
//! - Domain types ([`Ticket`], [`Classification`], [`Routing`], [`ProcessedTicket`], ...)
//! - Configuration ([`AppConfig`], [`PriorityThresholds`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DepartmentMappings, KeywordConfig, KeywordThreshold, PriorityThresholds,
    SentimentThreshold, config_dir, config_file_path, init_config, init_config_at, load_config,
    load_config_from, write_default_config,
};
pub use error::{Result, SupportDeskError};
pub use types::{
    Category, Classification, Department, Escalation, Priority, ProcessedTicket, RawTicket,
    ResponseType, Routing, Ticket, TicketMetadata, TicketResponse, TicketStatus,
};
