//! Canonical audit checklist.
//!
//! The definitions are immutable; callers always receive owned copies so that editing one
//! draft never leaks into another draft or into the catalog itself.

use super::domain::{Criterion, Section};

/// Bumped whenever a section or criterion is added, removed, or reworded.
pub const CATALOG_VERSION: &str = "2024.1";

struct SectionDefinition {
    name: &'static str,
    criteria: &'static [(&'static str, &'static str)],
}

const SECTIONS: &[SectionDefinition] = &[
    SectionDefinition {
        name: "Zone Terrasse",
        criteria: &[
            ("terrasse_1", "État de propreté général de l'espace terrasse (sol, tables, chaises, pieds de parasols, vitres)"),
            ("terrasse_2", "Disposition et alignement correct du mobilier"),
            ("terrasse_3", "État et tension appropriée des parasols"),
            ("terrasse_4", "Fixation et stabilité du mobilier (bancs vissés)"),
            ("terrasse_5", "Approvisionnement correct des distributeurs de serviettes"),
            ("terrasse_6", "Remise en état systématique des tables (débarrassage)"),
            ("terrasse_7", "Présentation soignée des supports marketing (présentoirs menus propres et droits)"),
        ],
    },
    SectionDefinition {
        name: "Zone Salle",
        criteria: &[
            ("salle_1", "Agencement optimal et logique des tables"),
            ("salle_2", "Propreté irréprochable des surfaces de service"),
            ("salle_3", "Approvisionnement adéquat des distributeurs d'hygiène"),
            ("salle_4", "Respect des règles de sécurité (stockage bouteilles en verre)"),
            ("salle_5", "Propreté et organisation du poste de débarrassage"),
            ("salle_6", "Hygiène exemplaire des postes de service (sauces/couverts)"),
            ("salle_7", "Maintenance et propreté des équipements (bornes de commande)"),
            ("salle_8", "Fonctionnement optimal du matériel (imprimantes, écrans)"),
            ("salle_9", "Sécurité et propreté des sols (surfaces non glissantes)"),
            ("salle_10", "Rangement et organisation générale de l'espace"),
            ("salle_11", "Hygiène des sanitaires avec réserves complètes (savon, papier)"),
            ("salle_12", "Confort climatique approprié (chauffage/climatisation)"),
            ("salle_13", "Présentation soignée des produits (vitrine cookies propre)"),
            ("salle_14", "Merchandising et présentation attractive des produits"),
        ],
    },
    SectionDefinition {
        name: "Gestion et Service",
        criteria: &[
            ("gestion_1", "Organisation efficace de l'accueil et gestion fluide de la file d'attente"),
            ("gestion_2", "Gestion optimale du stress de l'équipe"),
            ("gestion_3", "Atmosphère chaleureuse et accueillante"),
            ("gestion_4", "Niveau sonore approprié pour le confort des clients"),
            ("gestion_5", "Diffusion musicale conforme aux standards de l'établissement"),
            ("gestion_6", "Gestion optimale des commandes en ligne (disponibilité, mode occupé)"),
        ],
    },
    SectionDefinition {
        name: "Service Client",
        criteria: &[
            ("service_1", "Temps d'attente respectés en heure de pointe (inférieur à 8 minutes)"),
            ("service_2", "Service des boissons dans les délais (moins de 2 minutes)"),
            ("service_3", "Service des burgers dans les délais (moins de 8 minutes)"),
            ("service_4", "Service des desserts dans les délais (moins de 3 minutes)"),
            ("service_5", "Accueil client systématique dans les 30 secondes"),
            ("service_6", "Politesse et remerciements systématiques aux clients"),
            ("service_7", "Débarrassage efficace des tables occupées"),
        ],
    },
    SectionDefinition {
        name: "Hygiène - Collaborateurs",
        criteria: &[
            ("hygiene_collab_1", "Port systématique de la tenue réglementaire complète (tablier, t-shirt propre, charlotte/casquette)"),
            ("hygiene_collab_2", "Propreté corporelle irréprochable et absence de bijoux"),
            ("hygiene_collab_3", "Respect scrupuleux de l'usage des gants"),
            ("hygiene_collab_4", "Pointage effectué par l'ensemble de l'équipe"),
            ("hygiene_collab_5", "Lavage des mains systématique (savon et papier à usage unique disponibles)"),
            ("hygiene_collab_6", "Téléphones personnels rangés dans les vestiaires"),
            ("hygiene_collab_7", "Propreté et rangement optimal des vestiaires du personnel"),
            ("hygiene_collab_8", "Stockage réglementaire des déchets dans les locaux alimentaires"),
            ("hygiene_collab_9", "Contrôles et enregistrements réglementaires à jour"),
        ],
    },
    SectionDefinition {
        name: "Hygiène - Salle",
        criteria: &[
            ("hygiene_salle_1", "Datage systématique des produits laitiers (chantilly, lait)"),
            ("hygiene_salle_2", "Propreté exemplaire de la zone cuisine visible par les clients"),
            ("hygiene_salle_3", "Datage rigoureux de tous les produits alimentaires"),
            ("hygiene_salle_4", "Propreté impeccable des sols et joints (absence de déchets)"),
            ("hygiene_salle_5", "Organisation et propreté rigoureuses des réfrigérateurs"),
            ("hygiene_salle_6", "Respect strict des DLC et application de la méthode FIFO"),
            ("hygiene_salle_7", "Contrôle des huiles réalisé et enregistrements à jour"),
        ],
    },
    SectionDefinition {
        name: "Poste Friture",
        criteria: &[
            ("friture_1", "Température friteuse optimale et contrôlée (190°C)"),
            ("friture_2", "Assaisonnement approprié et homogène des frites"),
            ("friture_3", "Quantités préparées optimales (maximum 5 minutes en chauffe-frites)"),
            ("friture_4", "Stock et conditionnement packaging appropriés"),
            ("friture_5", "Propreté exemplaire des bacs de packaging"),
            ("friture_6", "Niveau d'huile correct et contrôlé"),
            ("friture_7", "Cuisson conforme aux standards de qualité"),
            ("friture_8", "Préparation smash potatoes (écrasage, assaisonnement, coloration)"),
        ],
    },
    SectionDefinition {
        name: "Poste Poulet",
        criteria: &[
            ("poulet_1", "Qualité et fluidité optimale de la panure (eau froide)"),
            ("poulet_2", "Respect rigoureux du processus de panage"),
            ("poulet_3", "Assaisonnement correct et homogène (épices)"),
            ("poulet_4", "Temps de conservation respecté (maximum 8 minutes dans le bac)"),
            ("poulet_5", "Dosage sauce poulet coréen respecté selon les standards"),
            ("poulet_6", "Contrôle systématique du poids avant service (160-180g maximum)"),
            ("poulet_7", "Utilisation systématique des timers de cuisson"),
        ],
    },
    SectionDefinition {
        name: "Poste Grill",
        criteria: &[
            ("grill_1", "Technique de smash correcte et maîtrisée"),
            ("grill_2", "Cuisson optimale de la viande (bien colorée, non surcuite)"),
            ("grill_3", "Fonte appropriée du fromage (ni excessive, ni insuffisante)"),
            ("grill_4", "Cuisson steak végétarien conforme aux standards"),
            ("grill_5", "Respect des dosages sel et poivre selon les standards"),
            ("grill_6", "Nettoyage systématique de la plancha entre chaque session"),
            ("grill_7", "Cuisson appropriée du bacon avant service"),
        ],
    },
    SectionDefinition {
        name: "Poste Garniture",
        criteria: &[
            ("garniture_1", "Respect rigoureux des dosages de tous les ingrédients"),
            ("garniture_2", "Gestion précise des suppléments et retraits d'ingrédients"),
            ("garniture_3", "Respect du codage couleur des sauces (pistolets identifiés)"),
            ("garniture_4", "Température optimale des oignons confits"),
            ("garniture_5", "Toast du pain conforme aux standards de qualité"),
        ],
    },
];

/// Owned copy of every section with all responses unset.
pub fn standard_sections() -> Vec<Section> {
    SECTIONS
        .iter()
        .map(|definition| Section {
            name: definition.name.to_string(),
            criteria: definition
                .criteria
                .iter()
                .map(|(id, text)| Criterion {
                    id: (*id).to_string(),
                    section_name: definition.name.to_string(),
                    text: (*text).to_string(),
                    response: None,
                })
                .collect(),
            comments: None,
        })
        .collect()
}

pub fn section_names() -> Vec<&'static str> {
    SECTIONS.iter().map(|definition| definition.name).collect()
}

pub fn criteria_count() -> usize {
    SECTIONS
        .iter()
        .map(|definition| definition.criteria.len())
        .sum()
}
