//! Outbound email delivery of audit summaries.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::domain::AuditRecord;
use crate::config::EmailConfig;

/// Headline figures included in the email body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub restaurant_name: String,
    pub auditor_name: String,
    pub audit_date: NaiveDate,
    pub success_percentage: u32,
    pub yes_count: usize,
    pub no_count: usize,
    pub total_items: usize,
}

impl From<&AuditRecord> for AuditSummary {
    fn from(record: &AuditRecord) -> Self {
        Self {
            restaurant_name: record.restaurant_name.clone(),
            auditor_name: record.auditor_name.clone(),
            audit_date: record.audit_date,
            success_percentage: record.success_percentage,
            yes_count: record.yes_count,
            no_count: record.no_count,
            total_items: record.total_items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEmail {
    pub recipient_email: String,
    pub audit_summary: AuditSummary,
}

impl AuditEmail {
    pub fn subject(&self) -> String {
        format!("Rapport d'audit - {}", self.audit_summary.restaurant_name)
    }

    pub fn html(&self) -> String {
        render_html(&self.audit_summary)
    }
}

/// Delivery hook; implementations send one message to one recipient.
#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    async fn send(&self, email: AuditEmail) -> Result<(), DispatchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("email delivery is not configured")]
    NotConfigured,
    #[error("email transport unavailable: {0}")]
    Transport(String),
    #[error("email provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },
}

pub fn render_html(summary: &AuditSummary) -> String {
    format!(
        "<h1>Rapport d'Audit de Qualité Restaurant</h1>\n\
         <h2>{restaurant}</h2>\n\
         <p><strong>Auditeur:</strong> {auditor}</p>\n\
         <p><strong>Date:</strong> {date}</p>\n\
         <h3>Résultats</h3>\n\
         <ul>\n\
         <li><strong>Score global:</strong> {percentage}%</li>\n\
         <li><strong>Critères validés:</strong> {yes}</li>\n\
         <li><strong>Critères non validés:</strong> {no}</li>\n\
         <li><strong>Total critères:</strong> {total}</li>\n\
         </ul>\n\
         <p>Consultez l'application pour voir le rapport détaillé et les recommandations d'amélioration.</p>\n",
        restaurant = escape_html(&summary.restaurant_name),
        auditor = escape_html(&summary.auditor_name),
        date = summary.audit_date.format("%Y-%m-%d"),
        percentage = summary.success_percentage,
        yes = summary.yes_count,
        no = summary.no_count,
        total = summary.total_items,
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Sends through the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendDispatcher {
    http_client: reqwest::Client,
    api_key: String,
    from_address: String,
    endpoint: String,
}

impl ResendDispatcher {
    /// Returns `None` when no API key is configured.
    pub fn from_config(config: &EmailConfig) -> Result<Option<Self>, DispatchError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|err| DispatchError::Transport(err.to_string()))?;

        Ok(Some(Self {
            http_client,
            api_key,
            from_address: config.from_address.clone(),
            endpoint: config.endpoint.clone(),
        }))
    }
}

#[async_trait]
impl EmailDispatcher for ResendDispatcher {
    async fn send(&self, email: AuditEmail) -> Result<(), DispatchError> {
        let payload = json!({
            "from": self.from_address,
            "to": [email.recipient_email],
            "subject": email.subject(),
            "html": email.html(),
        });

        debug!(endpoint = %self.endpoint, "posting audit email");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| DispatchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Stand-in used when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledDispatcher;

#[async_trait]
impl EmailDispatcher for DisabledDispatcher {
    async fn send(&self, _email: AuditEmail) -> Result<(), DispatchError> {
        Err(DispatchError::NotConfigured)
    }
}
