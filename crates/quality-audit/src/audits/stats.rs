use serde::Serialize;

use super::domain::{AuditItem, AuditRecord, Section};

/// Live counters for an audit in progress or at submit time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditStats {
    pub total_items: usize,
    pub yes_count: usize,
    pub no_count: usize,
    pub success_percentage: u32,
    pub answered_count: usize,
}

impl AuditStats {
    pub fn is_complete(&self) -> bool {
        self.answered_count >= self.total_items
    }

    pub fn unanswered(&self) -> usize {
        self.total_items - self.answered_count
    }
}

/// Whole-number share of `yes` over `total`, rounded half up. Zero when `total` is zero.
pub fn success_percentage(yes: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((yes * 100 + total / 2) / total) as u32
}

pub fn compute_stats(sections: &[Section]) -> AuditStats {
    let mut stats = AuditStats::default();

    for criterion in sections.iter().flat_map(|section| &section.criteria) {
        stats.total_items += 1;
        match criterion.response {
            Some(true) => stats.yes_count += 1,
            Some(false) => stats.no_count += 1,
            None => {}
        }
    }

    stats.answered_count = stats.yes_count + stats.no_count;
    stats.success_percentage = success_percentage(stats.yes_count, stats.total_items);
    stats
}

/// Colour band used by the history and report badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessBand {
    Excellent,
    Fair,
    Critical,
}

impl SuccessBand {
    pub const EXCELLENT_THRESHOLD: u32 = 80;
    pub const FAIR_THRESHOLD: u32 = 60;

    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= Self::EXCELLENT_THRESHOLD {
            Self::Excellent
        } else if percentage >= Self::FAIR_THRESHOLD {
            Self::Fair
        } else {
            Self::Critical
        }
    }

    pub const fn badge(self) -> &'static str {
        match self {
            SuccessBand::Excellent => "default",
            SuccessBand::Fair => "secondary",
            SuccessBand::Critical => "destructive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemResult {
    pub criteria: String,
    pub response: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionResult {
    pub section: String,
    pub items: Vec<ItemResult>,
    pub yes_count: usize,
    pub total: usize,
    pub percentage: u32,
    pub band: SuccessBand,
}

/// Groups persisted items by section, keeping the order in which sections first appear.
pub fn group_by_section(items: &[AuditItem]) -> Vec<SectionResult> {
    let mut grouped: Vec<(String, Vec<ItemResult>)> = Vec::new();

    for item in items {
        let row = ItemResult {
            criteria: item.criteria.clone(),
            response: item.response,
        };
        match grouped.iter_mut().find(|(name, _)| *name == item.section) {
            Some((_, rows)) => rows.push(row),
            None => grouped.push((item.section.clone(), vec![row])),
        }
    }

    grouped
        .into_iter()
        .map(|(section, items)| {
            let yes_count = items.iter().filter(|item| item.response).count();
            let total = items.len();
            let percentage = success_percentage(yes_count, total);
            SectionResult {
                section,
                items,
                yes_count,
                total,
                percentage,
                band: SuccessBand::from_percentage(percentage),
            }
        })
        .collect()
}

/// Headline figures shown above the audit history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    pub total_audits: usize,
    pub average_success: u32,
    pub excellent_audits: usize,
    pub critical_audits: usize,
}

impl HistorySummary {
    pub fn from_records(records: &[AuditRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let count = records.len();
        let sum: usize = records
            .iter()
            .map(|record| record.success_percentage as usize)
            .sum();

        Self {
            total_audits: count,
            average_success: ((sum + count / 2) / count) as u32,
            excellent_audits: records
                .iter()
                .filter(|record| {
                    SuccessBand::from_percentage(record.success_percentage)
                        == SuccessBand::Excellent
                })
                .count(),
            critical_audits: records
                .iter()
                .filter(|record| {
                    SuccessBand::from_percentage(record.success_percentage)
                        == SuccessBand::Critical
                })
                .count(),
        }
    }
}
