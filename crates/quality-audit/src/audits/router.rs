use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::catalog::CATALOG_VERSION;
use super::dispatch::{DispatchError, EmailDispatcher};
use super::domain::{AuditDraft, AuditId, Section};
use super::report::AuditHistoryView;
use super::repository::AuditStore;
use super::service::{AuditService, AuditServiceError};
use super::stats::compute_stats;

pub const HISTORY_PATH: &str = "/api/v1/audits";

/// Form payload emitted when the auditor validates an audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSubmission {
    pub restaurant_name: String,
    pub auditor_name: String,
    #[serde(default)]
    pub audit_date: Option<NaiveDate>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsRequest {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub recipient_email: String,
}

/// Router builder exposing the form, history, report, and email endpoints.
pub fn audit_router<S, D>(service: Arc<AuditService<S, D>>) -> Router
where
    S: AuditStore + ?Sized + 'static,
    D: EmailDispatcher + ?Sized + 'static,
{
    Router::new()
        .route(
            HISTORY_PATH,
            get(history_handler::<S, D>).post(submit_handler::<S, D>),
        )
        .route("/api/v1/audits/catalog", get(catalog_handler))
        .route("/api/v1/audits/stats", post(stats_handler))
        .route("/api/v1/audits/:audit_id", get(report_handler::<S, D>))
        .route(
            "/api/v1/audits/:audit_id/email",
            post(email_handler::<S, D>),
        )
        .route("/api/v1/audits/:audit_id/pdf", get(pdf_handler))
        .with_state(service)
}

pub(crate) async fn catalog_handler() -> Response {
    let draft = AuditDraft::from_catalog();
    let stats = draft.stats();
    let payload = json!({
        "version": CATALOG_VERSION,
        "draft": draft,
        "stats": stats,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn stats_handler(
    request: Result<axum::Json<StatsRequest>, JsonRejection>,
) -> Response {
    let request = match request {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };
    let stats = compute_stats(&request.sections);
    (StatusCode::OK, axum::Json(stats)).into_response()
}

pub(crate) async fn submit_handler<S, D>(
    State(service): State<Arc<AuditService<S, D>>>,
    submission: Result<axum::Json<AuditSubmission>, JsonRejection>,
) -> Response
where
    S: AuditStore + ?Sized + 'static,
    D: EmailDispatcher + ?Sized + 'static,
{
    let submission = match submission {
        Ok(axum::Json(submission)) => submission,
        Err(rejection) => return rejection_response(rejection),
    };
    let AuditSubmission {
        restaurant_name,
        auditor_name,
        audit_date,
        sections,
    } = submission;
    let audit_date = audit_date.unwrap_or_else(|| Local::now().date_naive());

    let draft = match AuditDraft::with_sections(restaurant_name, auditor_name, audit_date, sections)
    {
        Ok(draft) => draft,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match service.submit(&draft).await {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn history_handler<S, D>(
    State(service): State<Arc<AuditService<S, D>>>,
) -> Response
where
    S: AuditStore + ?Sized + 'static,
    D: EmailDispatcher + ?Sized + 'static,
{
    match service.history().await {
        Ok(records) => {
            let view = AuditHistoryView::from_records(&records);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn report_handler<S, D>(
    State(service): State<Arc<AuditService<S, D>>>,
    Path(audit_id): Path<String>,
) -> Response
where
    S: AuditStore + ?Sized + 'static,
    D: EmailDispatcher + ?Sized + 'static,
{
    let Ok(id) = AuditId::from_str(&audit_id) else {
        return not_found_response();
    };

    match service.report(&id).await {
        Ok(report) => (StatusCode::OK, axum::Json(report.view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn email_handler<S, D>(
    State(service): State<Arc<AuditService<S, D>>>,
    Path(audit_id): Path<String>,
    request: Result<axum::Json<EmailRequest>, JsonRejection>,
) -> Response
where
    S: AuditStore + ?Sized + 'static,
    D: EmailDispatcher + ?Sized + 'static,
{
    let request = match request {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };
    let Ok(id) = AuditId::from_str(&audit_id) else {
        return not_found_response();
    };

    match service.email_audit(&id, &request.recipient_email).await {
        Ok(()) => {
            let payload = json!({ "audit_id": id, "status": "sent" });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn pdf_handler(Path(_audit_id): Path<String>) -> Response {
    let payload = json!({ "error": "PDF export is not available yet" });
    (StatusCode::NOT_IMPLEMENTED, axum::Json(payload)).into_response()
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({ "error": rejection.body_text() });
    (rejection.status(), axum::Json(payload)).into_response()
}

fn not_found_response() -> Response {
    let payload = json!({
        "error": "report not found",
        "history": HISTORY_PATH,
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn service_error_response(error: AuditServiceError) -> Response {
    match error {
        AuditServiceError::Validation(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        AuditServiceError::NotFound(_) => not_found_response(),
        AuditServiceError::Persistence(_) => {
            let payload = json!({ "error": "the audit store could not complete the request" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        AuditServiceError::Dispatch(DispatchError::NotConfigured) => {
            let payload = json!({ "error": "email delivery is not configured" });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        AuditServiceError::Dispatch(_) => {
            let payload = json!({ "error": "failed to send the audit email" });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}
