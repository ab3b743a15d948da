//! Improvement suggestions for failed criteria.
//!
//! Lookup runs in two stages: the curated table keyed by exact criterion text, then the
//! ordered keyword rules. Anything left over receives the generic remediation, so every
//! failed criterion yields exactly one suggestion.

mod curated;
mod rules;

pub use rules::RemediationTheme;

use serde::Serialize;
use tracing::trace;

use super::domain::{Priority, Section, SuggestedImprovement};

/// Which lookup stage produced a remediation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "stage", content = "theme")]
pub enum MatchSource {
    Curated,
    Keyword(RemediationTheme),
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Remediation {
    pub text: &'static str,
    pub priority: Priority,
    pub source: MatchSource,
}

/// Curated stage only.
pub fn curated_remediation(criteria: &str) -> Option<Remediation> {
    curated::lookup(criteria).map(|entry| Remediation {
        text: entry.text,
        priority: entry.priority,
        source: MatchSource::Curated,
    })
}

/// Keyword stage only, case-insensitive.
pub fn keyword_remediation(criteria: &str) -> Option<Remediation> {
    rules::first_match(criteria).map(|rule| Remediation {
        text: rule.text,
        priority: rule.priority,
        source: MatchSource::Keyword(rule.theme),
    })
}

pub fn fallback_remediation() -> Remediation {
    Remediation {
        text: rules::FALLBACK_TEXT,
        priority: rules::FALLBACK_PRIORITY,
        source: MatchSource::Fallback,
    }
}

pub fn suggest(section: &str, criteria: &str) -> Remediation {
    let remediation = curated_remediation(criteria)
        .or_else(|| keyword_remediation(criteria))
        .unwrap_or_else(fallback_remediation);

    trace!(
        section,
        criteria,
        source = ?remediation.source,
        priority = remediation.priority.as_str(),
        "remediation selected"
    );

    remediation
}

/// One suggestion per criterion answered `false`, in display order.
pub fn generate_suggestions(sections: &[Section]) -> Vec<SuggestedImprovement> {
    sections
        .iter()
        .flat_map(|section| {
            section
                .criteria
                .iter()
                .filter(|criterion| criterion.response == Some(false))
                .map(move |criterion| {
                    let remediation = suggest(&section.name, &criterion.text);
                    SuggestedImprovement {
                        section: section.name.clone(),
                        criteria: criterion.text.clone(),
                        suggestion: remediation.text.to_string(),
                        priority: remediation.priority,
                    }
                })
        })
        .collect()
}
