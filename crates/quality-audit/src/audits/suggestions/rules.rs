use serde::Serialize;

use super::super::domain::Priority;

/// Operational theme a keyword rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemediationTheme {
    Cleanliness,
    Temperature,
    Timing,
    Supply,
}

pub(crate) struct KeywordRule {
    pub theme: RemediationTheme,
    pub keywords: &'static [&'static str],
    pub text: &'static str,
    pub priority: Priority,
}

impl KeywordRule {
    /// `lowered` must already be lowercase.
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

// Evaluated top to bottom; the first rule whose keyword appears wins.
pub(crate) const RULES: &[KeywordRule] = &[
    KeywordRule {
        theme: RemediationTheme::Cleanliness,
        keywords: &["propre", "hygiène"],
        text: "Renforcer les procédures de nettoyage et d'hygiène. Formation de l'équipe recommandée.",
        priority: Priority::Medium,
    },
    KeywordRule {
        theme: RemediationTheme::Temperature,
        keywords: &["température", "cuisson"],
        text: "Vérifier et calibrer les équipements. Contrôler régulièrement les températures.",
        priority: Priority::High,
    },
    KeywordRule {
        theme: RemediationTheme::Timing,
        keywords: &["temps", "délai"],
        text: "Optimiser l'organisation et les processus. Former l'équipe à la gestion du temps.",
        priority: Priority::Medium,
    },
    KeywordRule {
        theme: RemediationTheme::Supply,
        keywords: &["stock", "approvisionnement"],
        text: "Améliorer la gestion des stocks. Mettre en place des procédures de réapprovisionnement.",
        priority: Priority::Low,
    },
];

pub(crate) const FALLBACK_TEXT: &str =
    "Revoir les procédures pour ce critère. Formation de l'équipe recommandée.";
pub(crate) const FALLBACK_PRIORITY: Priority = Priority::Medium;

pub(crate) fn first_match(criteria: &str) -> Option<&'static KeywordRule> {
    let lowered = criteria.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&lowered))
}
