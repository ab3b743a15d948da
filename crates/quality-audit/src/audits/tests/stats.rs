use chrono::{TimeZone, Utc};

use crate::audits::domain::{AuditId, AuditItem, AuditRecord, AuditStatus};
use crate::audits::stats::{
    compute_stats, group_by_section, success_percentage, HistorySummary, SuccessBand,
};

use super::common::*;

fn record(percentage: u32) -> AuditRecord {
    AuditRecord {
        id: AuditId::generate(),
        restaurant_name: "Le Bistrot".to_string(),
        auditor_name: "Claire".to_string(),
        audit_date: audit_date(),
        total_items: 10,
        yes_count: (percentage / 10) as usize,
        no_count: 10 - (percentage / 10) as usize,
        success_percentage: percentage,
        status: AuditStatus::Completed,
        created_at: Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap(),
    }
}

fn item(audit_id: AuditId, section: &str, criteria: &str, response: bool) -> AuditItem {
    AuditItem {
        audit_id,
        section: section.to_string(),
        criteria: criteria.to_string(),
        response,
    }
}

#[test]
fn all_yes_scores_one_hundred() {
    let sections = vec![section(
        "Zone Salle",
        vec![
            criterion("salle_1", "Zone Salle", "Agencement optimal", Some(true)),
            criterion("salle_2", "Zone Salle", "Surfaces propres", Some(true)),
        ],
    )];

    let stats = compute_stats(&sections);
    assert_eq!(stats.total_items, 2);
    assert_eq!(stats.yes_count, 2);
    assert_eq!(stats.no_count, 0);
    assert_eq!(stats.success_percentage, 100);
    assert!(stats.is_complete());
}

#[test]
fn zero_criteria_scores_zero() {
    let stats = compute_stats(&[]);
    assert_eq!(stats.total_items, 0);
    assert_eq!(stats.success_percentage, 0);
    assert_eq!(success_percentage(0, 0), 0);
}

#[test]
fn unanswered_criteria_count_towards_the_total() {
    let stats = mixed_draft().stats();
    assert_eq!(stats.total_items, 5);
    assert_eq!(stats.yes_count, 2);
    assert_eq!(stats.no_count, 2);
    assert_eq!(stats.answered_count, 4);
    assert_eq!(stats.unanswered(), 1);
    assert_eq!(stats.success_percentage, 40);
    assert!(!stats.is_complete());
}

#[test]
fn percentage_rounds_half_up() {
    assert_eq!(success_percentage(1, 3), 33);
    assert_eq!(success_percentage(2, 3), 67);
    assert_eq!(success_percentage(1, 8), 13);
    assert_eq!(success_percentage(65, 77), 84);
}

#[test]
fn stats_ignore_section_order() {
    let mut sections = mixed_sections();
    let forward = compute_stats(&sections);
    sections.reverse();
    for section in &mut sections {
        section.criteria.reverse();
    }
    assert_eq!(compute_stats(&sections), forward);
}

#[test]
fn bands_follow_thresholds() {
    assert_eq!(SuccessBand::from_percentage(80), SuccessBand::Excellent);
    assert_eq!(SuccessBand::from_percentage(79), SuccessBand::Fair);
    assert_eq!(SuccessBand::from_percentage(60), SuccessBand::Fair);
    assert_eq!(SuccessBand::from_percentage(59), SuccessBand::Critical);
    assert_eq!(SuccessBand::Critical.badge(), "destructive");
}

#[test]
fn group_by_section_keeps_first_seen_order() {
    let id = AuditId::generate();
    let items = vec![
        item(id, "Zone Salle", "Agencement", true),
        item(id, "Zone Terrasse", "Parasols", false),
        item(id, "Zone Salle", "Surfaces", false),
    ];

    let grouped = group_by_section(&items);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].section, "Zone Salle");
    assert_eq!(grouped[0].total, 2);
    assert_eq!(grouped[0].yes_count, 1);
    assert_eq!(grouped[0].percentage, 50);
    assert_eq!(grouped[0].band, SuccessBand::Critical);
    assert_eq!(grouped[1].section, "Zone Terrasse");
    assert_eq!(grouped[1].percentage, 0);
}

#[test]
fn history_summary_counts_bands_and_rounds_mean() {
    let records = vec![record(90), record(85), record(50), record(70)];
    let summary = HistorySummary::from_records(&records);
    assert_eq!(summary.total_audits, 4);
    assert_eq!(summary.average_success, 74);
    assert_eq!(summary.excellent_audits, 2);
    assert_eq!(summary.critical_audits, 1);
}

#[test]
fn history_summary_of_nothing_is_zero() {
    assert_eq!(HistorySummary::from_records(&[]), HistorySummary::default());
}
