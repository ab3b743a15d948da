use serde::Serialize;

use super::domain::{AuditItem, AuditRecord, ImprovementSuggestion, Priority};
use super::stats::{group_by_section, HistorySummary, SectionResult, SuccessBand};

/// Record plus its line items and improvements, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub record: AuditRecord,
    pub items: Vec<AuditItem>,
    pub improvements: Vec<ImprovementSuggestion>,
}

impl AuditReport {
    pub fn band(&self) -> SuccessBand {
        SuccessBand::from_percentage(self.record.success_percentage)
    }

    pub fn sections(&self) -> Vec<SectionResult> {
        group_by_section(&self.items)
    }

    pub fn view(&self) -> AuditReportView {
        AuditReportView {
            audit: AuditRecordView::from(&self.record),
            sections: self.sections(),
            improvements: self
                .improvements
                .iter()
                .map(ImprovementView::from)
                .collect(),
        }
    }
}

/// Audit row enriched with display helpers.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecordView {
    #[serde(flatten)]
    pub record: AuditRecord,
    pub display_date: String,
    pub band: SuccessBand,
    pub badge: &'static str,
}

impl From<&AuditRecord> for AuditRecordView {
    fn from(record: &AuditRecord) -> Self {
        let band = SuccessBand::from_percentage(record.success_percentage);
        Self {
            record: record.clone(),
            display_date: record.audit_date.format("%d/%m/%Y").to_string(),
            band,
            badge: band.badge(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImprovementView {
    pub section: String,
    pub criteria: String,
    pub suggestion: String,
    pub priority: Priority,
    pub priority_label: &'static str,
    pub priority_badge: &'static str,
}

impl From<&ImprovementSuggestion> for ImprovementView {
    fn from(improvement: &ImprovementSuggestion) -> Self {
        Self {
            section: improvement.section.clone(),
            criteria: improvement.criteria.clone(),
            suggestion: improvement.suggestion.clone(),
            priority: improvement.priority,
            priority_label: improvement.priority.label(),
            priority_badge: improvement.priority.badge(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReportView {
    pub audit: AuditRecordView,
    pub sections: Vec<SectionResult>,
    pub improvements: Vec<ImprovementView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditHistoryView {
    pub summary: HistorySummary,
    pub audits: Vec<AuditRecordView>,
}

impl AuditHistoryView {
    pub fn from_records(records: &[AuditRecord]) -> Self {
        Self {
            summary: HistorySummary::from_records(records),
            audits: records.iter().map(AuditRecordView::from).collect(),
        }
    }
}
