use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog;
use super::stats::{compute_stats, AuditStats};

/// Identifier assigned by the store when an audit record is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditId(pub Uuid);

impl AuditId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AuditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AuditId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

/// A single yes/no checklist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub section_name: String,
    pub text: String,
    #[serde(default)]
    pub response: Option<bool>,
}

/// Named grouping of criteria, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("criterion '{0}' appears more than once")]
    DuplicateCriterion(String),
    #[error("section '{0}' appears more than once")]
    DuplicateSection(String),
    #[error("unknown criterion '{0}'")]
    UnknownCriterion(String),
    #[error("unknown section '{0}'")]
    UnknownSection(String),
}

/// In-progress audit owned by a single editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditDraft {
    pub restaurant_name: String,
    pub auditor_name: String,
    pub audit_date: NaiveDate,
    sections: Vec<Section>,
}

impl AuditDraft {
    /// Fresh draft seeded with the standard catalog and today's date.
    pub fn from_catalog() -> Self {
        Self {
            restaurant_name: String::new(),
            auditor_name: String::new(),
            audit_date: Local::now().date_naive(),
            sections: catalog::standard_sections(),
        }
    }

    /// Builds a draft from caller supplied sections, enforcing unique section names and
    /// criterion ids.
    pub fn with_sections(
        restaurant_name: impl Into<String>,
        auditor_name: impl Into<String>,
        audit_date: NaiveDate,
        sections: Vec<Section>,
    ) -> Result<Self, DraftError> {
        let mut names = HashSet::new();
        for section in &sections {
            if !names.insert(section.name.as_str()) {
                return Err(DraftError::DuplicateSection(section.name.clone()));
            }
        }

        let mut seen = HashSet::new();
        for criterion in sections.iter().flat_map(|section| &section.criteria) {
            if !seen.insert(criterion.id.as_str()) {
                return Err(DraftError::DuplicateCriterion(criterion.id.clone()));
            }
        }

        Ok(Self {
            restaurant_name: restaurant_name.into(),
            auditor_name: auditor_name.into(),
            audit_date,
            sections,
        })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn set_response(
        &mut self,
        criterion_id: &str,
        response: Option<bool>,
    ) -> Result<(), DraftError> {
        let criterion = self
            .sections
            .iter_mut()
            .flat_map(|section| section.criteria.iter_mut())
            .find(|criterion| criterion.id == criterion_id)
            .ok_or_else(|| DraftError::UnknownCriterion(criterion_id.to_string()))?;
        criterion.response = response;
        Ok(())
    }

    pub fn set_comment(
        &mut self,
        section_name: &str,
        comment: impl Into<String>,
    ) -> Result<(), DraftError> {
        let section = self
            .sections
            .iter_mut()
            .find(|section| section.name == section_name)
            .ok_or_else(|| DraftError::UnknownSection(section_name.to_string()))?;
        let comment = comment.into();
        section.comments = if comment.is_empty() {
            None
        } else {
            Some(comment)
        };
        Ok(())
    }

    pub fn stats(&self) -> AuditStats {
        compute_stats(&self.sections)
    }

    /// Answered criteria as they will be persisted, in display order.
    pub fn answered_items(&self) -> Vec<ItemEntry> {
        self.sections
            .iter()
            .flat_map(|section| {
                section.criteria.iter().filter_map(move |criterion| {
                    criterion.response.map(|response| ItemEntry {
                        section: section.name.clone(),
                        criteria: criterion.text.clone(),
                        response,
                    })
                })
            })
            .collect()
    }

    /// Back to a blank catalog draft after a successful submit.
    pub fn reset(&mut self) {
        *self = Self::from_catalog();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Draft,
    Completed,
}

impl AuditStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AuditStatus::Draft => "draft",
            AuditStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Audit summary row before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuditRecord {
    pub restaurant_name: String,
    pub auditor_name: String,
    pub audit_date: NaiveDate,
    pub total_items: usize,
    pub yes_count: usize,
    pub no_count: usize,
    pub success_percentage: u32,
    pub status: AuditStatus,
}

impl NewAuditRecord {
    pub fn into_record(self, id: AuditId, created_at: DateTime<Utc>) -> AuditRecord {
        AuditRecord {
            id,
            restaurant_name: self.restaurant_name,
            auditor_name: self.auditor_name,
            audit_date: self.audit_date,
            total_items: self.total_items,
            yes_count: self.yes_count,
            no_count: self.no_count,
            success_percentage: self.success_percentage,
            status: self.status,
            created_at,
        }
    }
}

/// Persisted summary of one completed audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: AuditId,
    pub restaurant_name: String,
    pub auditor_name: String,
    pub audit_date: NaiveDate,
    pub total_items: usize,
    pub yes_count: usize,
    pub no_count: usize,
    pub success_percentage: u32,
    pub status: AuditStatus,
    pub created_at: DateTime<Utc>,
}

/// Answered criterion not yet tied to an audit id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub section: String,
    pub criteria: String,
    pub response: bool,
}

impl ItemEntry {
    pub fn for_audit(self, audit_id: AuditId) -> AuditItem {
        AuditItem {
            audit_id,
            section: self.section,
            criteria: self.criteria,
            response: self.response,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditItem {
    pub audit_id: AuditId,
    pub section: String,
    pub criteria: String,
    pub response: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Priority::High => "Priorité haute",
            Priority::Medium => "Priorité moyenne",
            Priority::Low => "Priorité basse",
        }
    }

    pub const fn badge(self) -> &'static str {
        match self {
            Priority::High => "destructive",
            Priority::Medium => "secondary",
            Priority::Low => "outline",
        }
    }
}

/// Remediation derived for a failed criterion, before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedImprovement {
    pub section: String,
    pub criteria: String,
    pub suggestion: String,
    pub priority: Priority,
}

impl SuggestedImprovement {
    pub fn for_audit(self, audit_id: AuditId) -> ImprovementSuggestion {
        ImprovementSuggestion {
            audit_id,
            section: self.section,
            criteria: self.criteria,
            suggestion: self.suggestion,
            priority: self.priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprovementSuggestion {
    pub audit_id: AuditId,
    pub section: String,
    pub criteria: String,
    pub suggestion: String,
    pub priority: Priority,
}
