use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use super::dispatch::{AuditEmail, DispatchError, EmailDispatcher};
use super::domain::{AuditId, AuditItem, AuditRecord, ImprovementSuggestion, NewAuditRecord};
use super::repository::{AuditStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    audits: Vec<AuditRecord>,
    items: Vec<AuditItem>,
    improvements: Vec<ImprovementSuggestion>,
}

/// Process-local store used by the demo, tests, and servers without a database.
#[derive(Debug, Default, Clone)]
pub struct MemoryAuditStore {
    tables: Arc<Mutex<Tables>>,
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub audits: usize,
    pub items: usize,
    pub improvements: usize,
}

impl MemoryAuditStore {
    pub fn counts(&self) -> TableCounts {
        let guard = self.tables.lock().expect("store mutex poisoned");
        TableCounts {
            audits: guard.audits.len(),
            items: guard.items.len(),
            improvements: guard.improvements.len(),
        }
    }
}

fn ensure_parents<'a>(
    tables: &Tables,
    mut ids: impl Iterator<Item = &'a AuditId>,
) -> Result<(), StoreError> {
    match ids.find(|id| !tables.audits.iter().any(|record| record.id == **id)) {
        Some(missing) => Err(StoreError::MissingParent(*missing)),
        None => Ok(()),
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn insert_audit(&self, record: NewAuditRecord) -> Result<AuditRecord, StoreError> {
        let stored = record.into_record(AuditId::generate(), Utc::now());
        let mut guard = self.tables.lock().expect("store mutex poisoned");
        guard.audits.push(stored.clone());
        Ok(stored)
    }

    async fn insert_items(&self, items: Vec<AuditItem>) -> Result<(), StoreError> {
        let mut guard = self.tables.lock().expect("store mutex poisoned");
        ensure_parents(&guard, items.iter().map(|item| &item.audit_id))?;
        guard.items.extend(items);
        Ok(())
    }

    async fn insert_improvements(
        &self,
        improvements: Vec<ImprovementSuggestion>,
    ) -> Result<(), StoreError> {
        let mut guard = self.tables.lock().expect("store mutex poisoned");
        ensure_parents(
            &guard,
            improvements.iter().map(|improvement| &improvement.audit_id),
        )?;
        guard.improvements.extend(improvements);
        Ok(())
    }

    async fn list_audits(&self) -> Result<Vec<AuditRecord>, StoreError> {
        let guard = self.tables.lock().expect("store mutex poisoned");
        // Newest insert first when timestamps tie.
        let mut audits: Vec<AuditRecord> = guard.audits.iter().rev().cloned().collect();
        audits.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(audits)
    }

    async fn fetch_audit(&self, id: &AuditId) -> Result<Option<AuditRecord>, StoreError> {
        let guard = self.tables.lock().expect("store mutex poisoned");
        Ok(guard.audits.iter().find(|record| record.id == *id).cloned())
    }

    async fn items_for(&self, id: &AuditId) -> Result<Vec<AuditItem>, StoreError> {
        let guard = self.tables.lock().expect("store mutex poisoned");
        Ok(guard
            .items
            .iter()
            .filter(|item| item.audit_id == *id)
            .cloned()
            .collect())
    }

    async fn improvements_for(
        &self,
        id: &AuditId,
    ) -> Result<Vec<ImprovementSuggestion>, StoreError> {
        let guard = self.tables.lock().expect("store mutex poisoned");
        Ok(guard
            .improvements
            .iter()
            .filter(|improvement| improvement.audit_id == *id)
            .cloned()
            .collect())
    }
}

/// Dispatcher that keeps every message instead of sending it.
#[derive(Debug, Default, Clone)]
pub struct MemoryOutbox {
    sent: Arc<Mutex<Vec<AuditEmail>>>,
}

impl MemoryOutbox {
    pub fn sent(&self) -> Vec<AuditEmail> {
        self.sent.lock().expect("outbox mutex poisoned").clone()
    }
}

#[async_trait]
impl EmailDispatcher for MemoryOutbox {
    async fn send(&self, email: AuditEmail) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .expect("outbox mutex poisoned")
            .push(email);
        Ok(())
    }
}
