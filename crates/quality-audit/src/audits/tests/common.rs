use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::audits::dispatch::{AuditEmail, DispatchError, EmailDispatcher};
use crate::audits::domain::{
    AuditDraft, AuditId, AuditItem, AuditRecord, Criterion, ImprovementSuggestion,
    NewAuditRecord, Section,
};
use crate::audits::memory::{MemoryAuditStore, MemoryOutbox};
use crate::audits::repository::{AuditStore, StoreError};
use crate::audits::{audit_router, AuditService};

pub(super) fn audit_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date")
}

pub(super) fn criterion(id: &str, section: &str, text: &str, response: Option<bool>) -> Criterion {
    Criterion {
        id: id.to_string(),
        section_name: section.to_string(),
        text: text.to_string(),
        response,
    }
}

pub(super) fn section(name: &str, criteria: Vec<Criterion>) -> Section {
    Section {
        name: name.to_string(),
        criteria,
        comments: None,
    }
}

/// Two sections, one failed criterion in each.
pub(super) fn mixed_sections() -> Vec<Section> {
    vec![
        section(
            "Hygiène collaborateurs",
            vec![
                criterion(
                    "hygiene_collab_3",
                    "Hygiène collaborateurs",
                    "Respect scrupuleux de l'usage des gants",
                    Some(false),
                ),
                criterion(
                    "hygiene_collab_4",
                    "Hygiène collaborateurs",
                    "Ongles courts et propres, absence de bijoux",
                    Some(true),
                ),
            ],
        ),
        section(
            "Zone Comptoir",
            vec![
                criterion(
                    "comptoir_1",
                    "Zone Comptoir",
                    "Vitrine produits propre",
                    Some(false),
                ),
                criterion(
                    "comptoir_2",
                    "Zone Comptoir",
                    "Caisse rangée",
                    Some(true),
                ),
                criterion("comptoir_3", "Zone Comptoir", "Menu affiché", None),
            ],
        ),
    ]
}

pub(super) fn draft(restaurant: &str, auditor: &str, sections: Vec<Section>) -> AuditDraft {
    AuditDraft::with_sections(restaurant, auditor, audit_date(), sections).expect("unique ids")
}

pub(super) fn mixed_draft() -> AuditDraft {
    draft("Le Bistrot", "Claire Martin", mixed_sections())
}

pub(super) fn build_service() -> (
    AuditService<MemoryAuditStore, MemoryOutbox>,
    Arc<MemoryAuditStore>,
    Arc<MemoryOutbox>,
) {
    let store = Arc::new(MemoryAuditStore::default());
    let outbox = Arc::new(MemoryOutbox::default());
    let service = AuditService::new(store.clone(), outbox.clone());
    (service, store, outbox)
}

pub(super) fn audit_router_with_service(
    service: AuditService<MemoryAuditStore, MemoryOutbox>,
) -> axum::Router {
    audit_router(Arc::new(service))
}

pub(super) struct UnavailableStore;

#[async_trait]
impl AuditStore for UnavailableStore {
    async fn insert_audit(&self, _record: NewAuditRecord) -> Result<AuditRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn insert_items(&self, _items: Vec<AuditItem>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn insert_improvements(
        &self,
        _improvements: Vec<ImprovementSuggestion>,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn list_audits(&self) -> Result<Vec<AuditRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn fetch_audit(&self, _id: &AuditId) -> Result<Option<AuditRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn items_for(&self, _id: &AuditId) -> Result<Vec<AuditItem>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn improvements_for(
        &self,
        _id: &AuditId,
    ) -> Result<Vec<ImprovementSuggestion>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Accepts the summary row but fails every child insert.
#[derive(Default)]
pub(super) struct FlakyItemsStore {
    pub(super) inner: MemoryAuditStore,
}

#[async_trait]
impl AuditStore for FlakyItemsStore {
    async fn insert_audit(&self, record: NewAuditRecord) -> Result<AuditRecord, StoreError> {
        self.inner.insert_audit(record).await
    }

    async fn insert_items(&self, _items: Vec<AuditItem>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("items table locked".to_string()))
    }

    async fn insert_improvements(
        &self,
        _improvements: Vec<ImprovementSuggestion>,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("improvements table locked".to_string()))
    }

    async fn list_audits(&self) -> Result<Vec<AuditRecord>, StoreError> {
        self.inner.list_audits().await
    }

    async fn fetch_audit(&self, id: &AuditId) -> Result<Option<AuditRecord>, StoreError> {
        self.inner.fetch_audit(id).await
    }

    async fn items_for(&self, id: &AuditId) -> Result<Vec<AuditItem>, StoreError> {
        self.inner.items_for(id).await
    }

    async fn improvements_for(
        &self,
        id: &AuditId,
    ) -> Result<Vec<ImprovementSuggestion>, StoreError> {
        self.inner.improvements_for(id).await
    }
}

pub(super) struct RejectingDispatcher;

#[async_trait]
impl EmailDispatcher for RejectingDispatcher {
    async fn send(&self, _email: AuditEmail) -> Result<(), DispatchError> {
        Err(DispatchError::Rejected {
            status: 422,
            message: "invalid recipient".to_string(),
        })
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
