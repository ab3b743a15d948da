use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use super::dispatch::{AuditEmail, AuditSummary, DispatchError, EmailDispatcher};
use super::domain::{AuditDraft, AuditId, AuditRecord, AuditStatus, NewAuditRecord};
use super::report::AuditReport;
use super::repository::{AuditCommit, AuditStore, StoreError};
use super::stats::AuditStats;
use super::suggestions::generate_suggestions;

/// Orchestrates submission, retrieval, and email delivery of audits.
pub struct AuditService<S: ?Sized, D: ?Sized> {
    store: Arc<S>,
    dispatcher: Arc<D>,
}

/// Advisory raised when some criteria were left unanswered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IncompleteAudit {
    pub answered: usize,
    pub total: usize,
}

impl fmt::Display for IncompleteAudit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "incomplete audit: {}/{} criteria answered",
            self.answered, self.total
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub audit_id: AuditId,
    pub stats: AuditStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<IncompleteAudit>,
}

impl<S, D> AuditService<S, D>
where
    S: AuditStore + ?Sized + 'static,
    D: EmailDispatcher + ?Sized + 'static,
{
    pub fn new(store: Arc<S>, dispatcher: Arc<D>) -> Self {
        Self { store, dispatcher }
    }

    /// Validate, score, and persist a draft as a completed audit.
    pub async fn submit(&self, draft: &AuditDraft) -> Result<SubmitOutcome, AuditServiceError> {
        let restaurant_name = draft.restaurant_name.trim();
        let auditor_name = draft.auditor_name.trim();
        if restaurant_name.is_empty() {
            return Err(ValidationError::MissingRestaurantName.into());
        }
        if auditor_name.is_empty() {
            return Err(ValidationError::MissingAuditorName.into());
        }

        let stats = draft.stats();
        let warning = (!stats.is_complete()).then_some(IncompleteAudit {
            answered: stats.answered_count,
            total: stats.total_items,
        });
        if let Some(incomplete) = &warning {
            warn!(
                restaurant = restaurant_name,
                answered = incomplete.answered,
                total = incomplete.total,
                "submitting incomplete audit"
            );
        }

        let commit = AuditCommit {
            record: NewAuditRecord {
                restaurant_name: restaurant_name.to_string(),
                auditor_name: auditor_name.to_string(),
                audit_date: draft.audit_date,
                total_items: stats.total_items,
                yes_count: stats.yes_count,
                no_count: stats.no_count,
                success_percentage: stats.success_percentage,
                status: AuditStatus::Completed,
            },
            items: draft.answered_items(),
            improvements: generate_suggestions(draft.sections()),
        };

        let stored = self.store.commit(commit).await.map_err(|err| {
            error!(error = %err, restaurant = restaurant_name, "failed to save audit");
            AuditServiceError::Persistence(err)
        })?;

        info!(
            audit_id = %stored.id,
            restaurant = %stored.restaurant_name,
            success_percentage = stored.success_percentage,
            "audit saved"
        );

        Ok(SubmitOutcome {
            audit_id: stored.id,
            stats,
            warning,
        })
    }

    /// Submit, then reset the draft to a blank catalog copy on success.
    pub async fn submit_and_reset(
        &self,
        draft: &mut AuditDraft,
    ) -> Result<SubmitOutcome, AuditServiceError> {
        let outcome = self.submit(draft).await?;
        draft.reset();
        Ok(outcome)
    }

    /// Every audit, newest first.
    pub async fn history(&self) -> Result<Vec<AuditRecord>, AuditServiceError> {
        self.store.list_audits().await.map_err(|err| {
            error!(error = %err, "failed to load audit history");
            AuditServiceError::Persistence(err)
        })
    }

    pub async fn report(&self, audit_id: &AuditId) -> Result<AuditReport, AuditServiceError> {
        let log_failure = |err: StoreError| {
            error!(error = %err, audit_id = %audit_id, "failed to load audit report");
            AuditServiceError::Persistence(err)
        };

        let record = self
            .store
            .fetch_audit(audit_id)
            .await
            .map_err(log_failure)?
            .ok_or(AuditServiceError::NotFound(*audit_id))?;
        let items = self.store.items_for(audit_id).await.map_err(log_failure)?;
        let improvements = self
            .store
            .improvements_for(audit_id)
            .await
            .map_err(log_failure)?;

        Ok(AuditReport {
            record,
            items,
            improvements,
        })
    }

    /// Re-reads the stored summary and hands it to the email dispatcher.
    pub async fn email_audit(
        &self,
        audit_id: &AuditId,
        recipient_email: &str,
    ) -> Result<(), AuditServiceError> {
        let recipient_email = recipient_email.trim();
        if recipient_email.is_empty() {
            return Err(ValidationError::MissingRecipient.into());
        }

        let record = self
            .store
            .fetch_audit(audit_id)
            .await?
            .ok_or(AuditServiceError::NotFound(*audit_id))?;

        let email = AuditEmail {
            recipient_email: recipient_email.to_string(),
            audit_summary: AuditSummary::from(&record),
        };

        self.dispatcher.send(email).await.map_err(|err| {
            warn!(error = %err, audit_id = %audit_id, "audit email failed");
            AuditServiceError::Dispatch(err)
        })?;

        info!(audit_id = %audit_id, "audit email sent");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("restaurant name is required")]
    MissingRestaurantName,
    #[error("auditor name is required")]
    MissingAuditorName,
    #[error("recipient email is required")]
    MissingRecipient,
}

/// Error raised by the audit service.
#[derive(Debug, thiserror::Error)]
pub enum AuditServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] StoreError),
    #[error("audit {0} not found")]
    NotFound(AuditId),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
