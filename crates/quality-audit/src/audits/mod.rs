//! Restaurant quality-control audits.
//!
//! A draft is built from the fixed checklist catalog, answered criterion by criterion, then
//! submitted: the service scores it, derives improvement suggestions for every failed
//! criterion, and persists the record, its answered items, and its suggestions together.

pub mod catalog;
pub mod dispatch;
pub mod domain;
pub mod memory;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod sqlite;
pub mod stats;
pub mod suggestions;

#[cfg(test)]
mod tests;

pub use dispatch::{
    AuditEmail, AuditSummary, DisabledDispatcher, DispatchError, EmailDispatcher,
    ResendDispatcher,
};
pub use domain::{
    AuditDraft, AuditId, AuditItem, AuditRecord, AuditStatus, Criterion, DraftError,
    ImprovementSuggestion, Priority, Section,
};
pub use memory::{MemoryAuditStore, MemoryOutbox, TableCounts};
pub use report::{AuditHistoryView, AuditReport, AuditReportView};
pub use repository::{AuditCommit, AuditStore, StoreError};
pub use router::{audit_router, AuditSubmission};
pub use service::{AuditService, AuditServiceError, SubmitOutcome, ValidationError};
pub use sqlite::SqliteAuditStore;
pub use stats::{AuditStats, HistorySummary, SuccessBand};
pub use suggestions::{generate_suggestions, suggest, MatchSource, Remediation};
