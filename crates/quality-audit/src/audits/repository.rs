use async_trait::async_trait;

use super::domain::{
    AuditId, AuditItem, AuditRecord, ImprovementSuggestion, ItemEntry, NewAuditRecord,
    SuggestedImprovement,
};

/// Everything written for one submitted audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditCommit {
    pub record: NewAuditRecord,
    pub items: Vec<ItemEntry>,
    pub improvements: Vec<SuggestedImprovement>,
}

/// Record store backing the `audits`, `audit_items` and `audit_improvements` tables.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Inserts the summary row and returns it with its generated id and timestamp.
    async fn insert_audit(&self, record: NewAuditRecord) -> Result<AuditRecord, StoreError>;
    async fn insert_items(&self, items: Vec<AuditItem>) -> Result<(), StoreError>;
    async fn insert_improvements(
        &self,
        improvements: Vec<ImprovementSuggestion>,
    ) -> Result<(), StoreError>;
    /// All audits, newest first.
    async fn list_audits(&self) -> Result<Vec<AuditRecord>, StoreError>;
    async fn fetch_audit(&self, id: &AuditId) -> Result<Option<AuditRecord>, StoreError>;
    async fn items_for(&self, id: &AuditId) -> Result<Vec<AuditItem>, StoreError>;
    async fn improvements_for(
        &self,
        id: &AuditId,
    ) -> Result<Vec<ImprovementSuggestion>, StoreError>;

    /// Writes record, then items, then improvements.
    ///
    /// The default issues three independent writes; a failure part way leaves the earlier
    /// rows in place. Stores with transactions override this to make the unit atomic.
    async fn commit(&self, commit: AuditCommit) -> Result<AuditRecord, StoreError> {
        let AuditCommit {
            record,
            items,
            improvements,
        } = commit;

        let stored = self.insert_audit(record).await?;
        let audit_id = stored.id;

        if !items.is_empty() {
            let items = items
                .into_iter()
                .map(|item| item.for_audit(audit_id))
                .collect();
            self.insert_items(items).await?;
        }

        if !improvements.is_empty() {
            let improvements = improvements
                .into_iter()
                .map(|improvement| improvement.for_audit(audit_id))
                .collect();
            self.insert_improvements(improvements).await?;
        }

        Ok(stored)
    }
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("audit {0} does not exist")]
    MissingParent(AuditId),
    #[error("corrupt {column} value '{value}'")]
    Corrupt { column: &'static str, value: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
