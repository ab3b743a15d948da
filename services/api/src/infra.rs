use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use quality_audit::audits::{
    AuditService, AuditStore, DisabledDispatcher, EmailDispatcher, MemoryAuditStore,
    ResendDispatcher, SqliteAuditStore,
};
use quality_audit::config::{EmailConfig, StorageConfig};
use quality_audit::error::AppError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Service wired against whichever store and dispatcher the configuration selects.
pub(crate) type ConfiguredAuditService = AuditService<dyn AuditStore, dyn EmailDispatcher>;

pub(crate) async fn build_store(config: &StorageConfig) -> Result<Arc<dyn AuditStore>, AppError> {
    match config.database_url.as_deref() {
        Some(url) => {
            let store = SqliteAuditStore::connect(url).await?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("AUDIT_DATABASE_URL is not set, audits will only live in memory");
            Ok(Arc::new(MemoryAuditStore::default()))
        }
    }
}

pub(crate) fn build_dispatcher(config: &EmailConfig) -> Result<Arc<dyn EmailDispatcher>, AppError> {
    match ResendDispatcher::from_config(config)? {
        Some(dispatcher) => Ok(Arc::new(dispatcher)),
        None => {
            info!("RESEND_API_KEY is not set, audit emails are disabled");
            Ok(Arc::new(DisabledDispatcher))
        }
    }
}

pub(crate) async fn build_service(
    storage: &StorageConfig,
    email: &EmailConfig,
) -> Result<Arc<ConfiguredAuditService>, AppError> {
    let store = build_store(storage).await?;
    let dispatcher = build_dispatcher(email)?;
    Ok(Arc::new(AuditService::new(store, dispatcher)))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
