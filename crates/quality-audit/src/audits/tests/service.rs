use std::sync::Arc;

use crate::audits::dispatch::{DisabledDispatcher, DispatchError};
use crate::audits::domain::{AuditDraft, AuditId, AuditStatus, Priority};
use crate::audits::memory::{MemoryAuditStore, MemoryOutbox, TableCounts};
use crate::audits::repository::{AuditStore, StoreError};
use crate::audits::service::{AuditService, AuditServiceError, IncompleteAudit, ValidationError};

use super::common::*;

#[tokio::test]
async fn submit_persists_record_items_and_improvements() {
    let (service, store, _) = build_service();

    let outcome = service.submit(&mixed_draft()).await.expect("submit succeeds");

    assert_eq!(outcome.stats.success_percentage, 40);
    assert_eq!(
        store.counts(),
        TableCounts {
            audits: 1,
            items: 4,
            improvements: 2,
        }
    );

    let record = store
        .fetch_audit(&outcome.audit_id)
        .await
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(record.status, AuditStatus::Completed);
    assert_eq!(record.total_items, 5);
    assert_eq!(record.yes_count, 2);
    assert_eq!(record.no_count, 2);
    assert_eq!(record.success_percentage, 40);
}

#[tokio::test]
async fn report_round_trips_submitted_audit() {
    let (service, _, _) = build_service();
    let draft = mixed_draft();

    let outcome = service.submit(&draft).await.expect("submit succeeds");
    let report = service.report(&outcome.audit_id).await.expect("report");

    assert_eq!(report.record.restaurant_name, "Le Bistrot");
    assert_eq!(report.record.auditor_name, "Claire Martin");
    assert_eq!(report.record.audit_date, audit_date());
    assert_eq!(report.items.len(), 4);
    assert!(report.items.iter().all(|item| item.audit_id == outcome.audit_id));
    assert_eq!(report.improvements.len(), 2);
    assert_eq!(report.improvements[0].priority, Priority::High);
    assert_eq!(report.improvements[1].priority, Priority::Medium);

    let sections = report.sections();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].section, "Hygiène collaborateurs");
    assert_eq!(sections[1].total, 2);
}

#[tokio::test]
async fn all_yes_audit_scores_full_marks_without_improvements() {
    let (service, store, _) = build_service();
    let sections = vec![section(
        "Zone Salle",
        vec![
            criterion("salle_1", "Zone Salle", "Agencement optimal", Some(true)),
            criterion("salle_2", "Zone Salle", "Surfaces propres", Some(true)),
        ],
    )];

    let outcome = service
        .submit(&draft("Le Bistrot", "Claire", sections))
        .await
        .expect("submit succeeds");

    assert_eq!(outcome.stats.success_percentage, 100);
    assert_eq!(outcome.warning, None);
    assert_eq!(store.counts().improvements, 0);
    assert_eq!(store.counts().items, 2);
}

#[tokio::test]
async fn incomplete_audit_is_saved_with_a_warning() {
    let (service, store, _) = build_service();

    let outcome = service.submit(&mixed_draft()).await.expect("submit succeeds");

    assert_eq!(
        outcome.warning,
        Some(IncompleteAudit {
            answered: 4,
            total: 5,
        })
    );
    assert_eq!(store.counts().audits, 1);
}

#[tokio::test]
async fn empty_auditor_name_is_rejected_before_any_write() {
    let (service, store, _) = build_service();

    match service.submit(&draft("Le Bistrot", "   ", mixed_sections())).await {
        Err(AuditServiceError::Validation(ValidationError::MissingAuditorName)) => {}
        other => panic!("expected missing auditor, got {other:?}"),
    }
    assert_eq!(store.counts(), TableCounts::default());
}

#[tokio::test]
async fn empty_restaurant_name_is_rejected() {
    let (service, store, _) = build_service();

    match service.submit(&draft("", "Claire", mixed_sections())).await {
        Err(AuditServiceError::Validation(ValidationError::MissingRestaurantName)) => {}
        other => panic!("expected missing restaurant, got {other:?}"),
    }
    assert_eq!(store.counts(), TableCounts::default());
}

#[tokio::test]
async fn names_are_stored_trimmed() {
    let (service, store, _) = build_service();

    let outcome = service
        .submit(&draft("  Le Bistrot ", " Claire", mixed_sections()))
        .await
        .expect("submit succeeds");

    let record = store
        .fetch_audit(&outcome.audit_id)
        .await
        .expect("fetch")
        .expect("present");
    assert_eq!(record.restaurant_name, "Le Bistrot");
    assert_eq!(record.auditor_name, "Claire");
}

#[tokio::test]
async fn submit_propagates_store_failures() {
    let service = AuditService::new(Arc::new(UnavailableStore), Arc::new(MemoryOutbox::default()));

    match service.submit(&mixed_draft()).await {
        Err(AuditServiceError::Persistence(StoreError::Unavailable(_))) => {}
        other => panic!("expected persistence error, got {other:?}"),
    }
}

#[tokio::test]
async fn report_propagates_store_failures() {
    let service = AuditService::new(Arc::new(UnavailableStore), Arc::new(MemoryOutbox::default()));

    match service.report(&AuditId::generate()).await {
        Err(AuditServiceError::Persistence(StoreError::Unavailable(reason))) => {
            assert_eq!(reason, "database offline")
        }
        other => panic!("expected persistence error, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_child_insert_leaves_the_record_behind() {
    let store = Arc::new(FlakyItemsStore::default());
    let service = AuditService::new(store.clone(), Arc::new(MemoryOutbox::default()));

    let result = service.submit(&mixed_draft()).await;

    assert!(matches!(result, Err(AuditServiceError::Persistence(_))));
    assert_eq!(
        store.inner.counts(),
        TableCounts {
            audits: 1,
            items: 0,
            improvements: 0,
        }
    );
}

#[tokio::test]
async fn submit_and_reset_clears_the_draft_only_on_success() {
    let (service, _, _) = build_service();

    let mut rejected = draft("Le Bistrot", "", mixed_sections());
    assert!(service.submit_and_reset(&mut rejected).await.is_err());
    assert_eq!(rejected.restaurant_name, "Le Bistrot");
    assert_eq!(rejected.stats().answered_count, 4);

    let mut accepted = mixed_draft();
    service
        .submit_and_reset(&mut accepted)
        .await
        .expect("submit succeeds");
    assert!(accepted.restaurant_name.is_empty());
    assert_eq!(accepted.stats().answered_count, 0);
    assert_eq!(accepted.stats().total_items, 77);
}

#[tokio::test]
async fn resubmitting_creates_a_second_audit() {
    let (service, store, _) = build_service();
    let draft = mixed_draft();

    let first = service.submit(&draft).await.expect("first submit");
    let second = service.submit(&draft).await.expect("second submit");

    assert_ne!(first.audit_id, second.audit_id);
    assert_eq!(store.counts().audits, 2);
}

#[tokio::test]
async fn history_lists_newest_first() {
    let (service, _, _) = build_service();

    let first = service
        .submit(&draft("Premier", "Claire", mixed_sections()))
        .await
        .expect("first");
    let second = service
        .submit(&draft("Second", "Claire", mixed_sections()))
        .await
        .expect("second");

    let history = service.history().await.expect("history");
    let ids: Vec<AuditId> = history.iter().map(|record| record.id).collect();
    assert_eq!(ids, vec![second.audit_id, first.audit_id]);
}

#[tokio::test]
async fn report_for_unknown_id_is_not_found() {
    let (service, _, _) = build_service();
    let missing = AuditId::generate();

    match service.report(&missing).await {
        Err(AuditServiceError::NotFound(id)) => assert_eq!(id, missing),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn email_audit_sends_the_stored_summary() {
    let (service, _, outbox) = build_service();
    let outcome = service.submit(&mixed_draft()).await.expect("submit");

    service
        .email_audit(&outcome.audit_id, " qualite@example.com ")
        .await
        .expect("email sent");

    let sent = outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient_email, "qualite@example.com");
    assert_eq!(sent[0].audit_summary.restaurant_name, "Le Bistrot");
    assert_eq!(sent[0].audit_summary.success_percentage, 40);
    assert_eq!(sent[0].subject(), "Rapport d'audit - Le Bistrot");
}

#[tokio::test]
async fn email_audit_requires_a_recipient() {
    let (service, _, outbox) = build_service();
    let outcome = service.submit(&mixed_draft()).await.expect("submit");

    match service.email_audit(&outcome.audit_id, "  ").await {
        Err(AuditServiceError::Validation(ValidationError::MissingRecipient)) => {}
        other => panic!("expected missing recipient, got {other:?}"),
    }
    assert!(outbox.sent().is_empty());
}

#[tokio::test]
async fn email_audit_for_unknown_id_is_not_found() {
    let (service, _, outbox) = build_service();

    let result = service
        .email_audit(&AuditId::generate(), "qualite@example.com")
        .await;

    assert!(matches!(result, Err(AuditServiceError::NotFound(_))));
    assert!(outbox.sent().is_empty());
}

#[tokio::test]
async fn email_audit_surfaces_dispatch_failures() {
    let store = Arc::new(MemoryAuditStore::default());
    let service = AuditService::new(store.clone(), Arc::new(RejectingDispatcher));
    let outcome = service.submit(&mixed_draft()).await.expect("submit");

    match service
        .email_audit(&outcome.audit_id, "qualite@example.com")
        .await
    {
        Err(AuditServiceError::Dispatch(DispatchError::Rejected { status, .. })) => {
            assert_eq!(status, 422)
        }
        other => panic!("expected dispatch rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn disabled_email_reports_not_configured() {
    let service = AuditService::new(
        Arc::new(MemoryAuditStore::default()),
        Arc::new(DisabledDispatcher),
    );
    let outcome = service.submit(&mixed_draft()).await.expect("submit");

    let result = service
        .email_audit(&outcome.audit_id, "qualite@example.com")
        .await;
    assert!(matches!(
        result,
        Err(AuditServiceError::Dispatch(DispatchError::NotConfigured))
    ));
}

#[tokio::test]
async fn catalog_draft_submission_scores_full_checklist() {
    let (service, store, _) = build_service();
    let mut draft = AuditDraft::from_catalog();
    draft.restaurant_name = "Le Bistrot".to_string();
    draft.auditor_name = "Claire".to_string();
    let ids: Vec<String> = draft
        .sections()
        .iter()
        .flat_map(|section| section.criteria.iter().map(|criterion| criterion.id.clone()))
        .collect();
    for (index, id) in ids.iter().enumerate() {
        draft
            .set_response(id, Some(index % 10 != 0))
            .expect("catalog id");
    }

    let outcome = service.submit(&draft).await.expect("submit");

    // 8 of 77 failed.
    assert_eq!(outcome.stats.no_count, 8);
    assert_eq!(outcome.stats.yes_count, 69);
    assert_eq!(outcome.stats.success_percentage, 90);
    assert_eq!(outcome.warning, None);
    assert_eq!(store.counts().items, 77);
    assert_eq!(store.counts().improvements, 8);
}
