use super::super::domain::Priority;

/// Hand-written remediation for criteria that deserve a specific action plan.
pub(crate) struct CuratedRemediation {
    pub criteria: &'static str,
    pub text: &'static str,
    pub priority: Priority,
}

// Keys are compared verbatim against the criterion text.
pub(crate) const CURATED: &[CuratedRemediation] = &[
    CuratedRemediation {
        criteria: "État de propreté général de l'espace terrasse",
        text: "Effectuer un nettoyage approfondi quotidien de la terrasse. Vérifier l'état des parasols et du mobilier.",
        priority: Priority::Medium,
    },
    CuratedRemediation {
        criteria: "Disposition et alignement correct du mobilier",
        text: "Réaligner le mobilier selon les standards établis. Former l'équipe sur la disposition optimale.",
        priority: Priority::Low,
    },
    CuratedRemediation {
        criteria: "Port systématique de la tenue réglementaire complète",
        text: "Rappel immédiat des règles d'hygiène. Vérification systématique avant prise de poste.",
        priority: Priority::High,
    },
    CuratedRemediation {
        criteria: "Respect scrupuleux de l'usage des gants",
        text: "Formation urgente sur l'hygiène des mains et l'usage des gants. Contrôle renforcé.",
        priority: Priority::High,
    },
    CuratedRemediation {
        criteria: "Lavage des mains systématique",
        text: "Installation de rappels visuels. Vérification des stocks de savon et papier.",
        priority: Priority::High,
    },
    CuratedRemediation {
        criteria: "Temps d'attente respectés en heure de pointe",
        text: "Optimiser l'organisation en cuisine. Ajouter du personnel aux heures de pointe si nécessaire.",
        priority: Priority::High,
    },
    CuratedRemediation {
        criteria: "Accueil client systématique dans les 30 secondes",
        text: "Formation service client. Mise en place d'un système d'alerte pour l'accueil.",
        priority: Priority::Medium,
    },
    CuratedRemediation {
        criteria: "Datage systématique des produits laitiers",
        text: "Formation HACCP renforcée. Mise en place d'un système de traçabilité strict.",
        priority: Priority::High,
    },
    CuratedRemediation {
        criteria: "Respect strict des DLC et application de la méthode FIFO",
        text: "Audit interne quotidien des DLC. Formation équipe sur la méthode FIFO.",
        priority: Priority::High,
    },
    CuratedRemediation {
        criteria: "Température friteuse optimale et contrôlée",
        text: "Calibrage immédiat des équipements. Contrôle horaire des températures.",
        priority: Priority::High,
    },
    CuratedRemediation {
        criteria: "Respect rigoureux du processus de panage",
        text: "Formation technique renforcée. Mise en place de fiches de procédures visuelles.",
        priority: Priority::Medium,
    },
];

pub(crate) fn lookup(criteria: &str) -> Option<&'static CuratedRemediation> {
    CURATED.iter().find(|entry| entry.criteria == criteria)
}
