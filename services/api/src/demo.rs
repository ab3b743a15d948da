use crate::infra::parse_date;
use chrono::NaiveDate;
use clap::Args;
use quality_audit::audits::catalog::{self, CATALOG_VERSION};
use quality_audit::audits::{
    AuditDraft, AuditReport, AuditService, AuditStore, MemoryAuditStore, MemoryOutbox,
    SqliteAuditStore, SubmitOutcome,
};
use quality_audit::error::AppError;
use std::sync::Arc;

const DEFAULT_FAILURES: &[&str] = &[
    "hygiene_collab_3",
    "salle_13",
    "service_2",
    "friture_1",
    "grill_6",
];

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Print criterion ids next to each criterion
    #[arg(long)]
    pub(crate) with_ids: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Restaurant being audited
    #[arg(long, default_value = "Le Bistrot du Port")]
    pub(crate) restaurant: String,
    /// Auditor performing the visit
    #[arg(long, default_value = "Claire Martin")]
    pub(crate) auditor: String,
    /// Audit date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) audit_date: Option<NaiveDate>,
    /// Criterion id to answer "no" (repeatable). Defaults to a representative sample.
    #[arg(long = "fail")]
    pub(crate) fail: Vec<String>,
    /// Leave this many trailing criteria unanswered
    #[arg(long, default_value_t = 0)]
    pub(crate) skip: usize,
    /// Persist to this SQLite database instead of memory
    #[arg(long)]
    pub(crate) database_url: Option<String>,
    /// Preview the summary email for this recipient
    #[arg(long)]
    pub(crate) email: Option<String>,
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    println!(
        "Audit checklist v{} ({} criteria)",
        CATALOG_VERSION,
        catalog::criteria_count()
    );
    for section in catalog::standard_sections() {
        println!("\n{} ({})", section.name, section.criteria.len());
        for criterion in &section.criteria {
            if args.with_ids {
                println!("  [{}] {}", criterion.id, criterion.text);
            } else {
                println!("  - {}", criterion.text);
            }
        }
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store: Arc<dyn AuditStore> = match args.database_url.as_deref() {
        Some(url) => Arc::new(SqliteAuditStore::connect(url).await?),
        None => Arc::new(MemoryAuditStore::default()),
    };
    let outbox = Arc::new(MemoryOutbox::default());
    let service = AuditService::new(store, outbox.clone());

    let mut draft = sample_draft(&args)?;
    println!("Restaurant quality audit demo");
    println!(
        "  {} audited by {} on {}",
        draft.restaurant_name,
        draft.auditor_name,
        draft.audit_date.format("%d/%m/%Y")
    );

    let outcome = service.submit_and_reset(&mut draft).await?;
    render_outcome(&outcome);

    let report = service.report(&outcome.audit_id).await?;
    render_report(&report);

    if let Some(recipient) = args.email.as_deref() {
        service.email_audit(&outcome.audit_id, recipient).await?;
        for email in outbox.sent() {
            println!("\nEmail preview for {}", email.recipient_email);
            println!("  Subject: {}", email.subject());
            println!("{}", email.html());
        }
    }

    let history = service.history().await?;
    println!("\nAudits on record: {}", history.len());
    Ok(())
}

fn sample_draft(args: &DemoArgs) -> Result<AuditDraft, AppError> {
    let mut draft = AuditDraft::from_catalog();
    draft.restaurant_name = args.restaurant.clone();
    draft.auditor_name = args.auditor.clone();
    if let Some(date) = args.audit_date {
        draft.audit_date = date;
    }

    let failures: Vec<&str> = if args.fail.is_empty() {
        DEFAULT_FAILURES.to_vec()
    } else {
        args.fail.iter().map(String::as_str).collect()
    };

    let ids: Vec<String> = draft
        .sections()
        .iter()
        .flat_map(|section| section.criteria.iter().map(|criterion| criterion.id.clone()))
        .collect();
    let answered = ids.len().saturating_sub(args.skip);

    for id in ids.iter().take(answered) {
        let passed = !failures.contains(&id.as_str());
        draft.set_response(id, Some(passed)).map_err(invalid_input)?;
    }
    for id in &failures {
        if !ids.iter().any(|known| known.as_str() == *id) {
            return Err(invalid_input(format!("unknown criterion id '{id}'")));
        }
    }

    Ok(draft)
}

fn invalid_input(err: impl ToString) -> AppError {
    AppError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        err.to_string(),
    ))
}

fn render_outcome(outcome: &SubmitOutcome) {
    let stats = &outcome.stats;
    println!("\nSubmitted audit {}", outcome.audit_id);
    println!(
        "  Score {}% ({} yes / {} no / {} total)",
        stats.success_percentage, stats.yes_count, stats.no_count, stats.total_items
    );
    if let Some(warning) = &outcome.warning {
        println!("  Warning: {warning}");
    }
}

fn render_report(report: &AuditReport) {
    let view = report.view();
    println!(
        "\nReport for {} ({}), band {:?}",
        view.audit.record.restaurant_name, view.audit.display_date, view.audit.band
    );

    println!("\nResults by section");
    for section in &view.sections {
        println!(
            "  - {:<28} {:>3}% ({}/{})",
            section.section, section.percentage, section.yes_count, section.total
        );
    }

    if view.improvements.is_empty() {
        println!("\nNo improvements required.");
        return;
    }

    println!("\nImprovement plan");
    for improvement in &view.improvements {
        println!(
            "  - [{}] {} / {}",
            improvement.priority_label, improvement.section, improvement.criteria
        );
        println!("      {}", improvement.suggestion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> DemoArgs {
        DemoArgs {
            restaurant: "Le Bistrot".to_string(),
            auditor: "Claire".to_string(),
            audit_date: NaiveDate::from_ymd_opt(2024, 6, 3),
            fail: Vec::new(),
            skip: 0,
            database_url: None,
            email: None,
        }
    }

    #[test]
    fn sample_draft_fails_the_default_criteria() {
        let draft = sample_draft(&args()).expect("draft builds");
        let stats = draft.stats();
        assert_eq!(stats.total_items, 77);
        assert_eq!(stats.no_count, DEFAULT_FAILURES.len());
        assert!(stats.is_complete());
    }

    #[test]
    fn sample_draft_leaves_skipped_criteria_unanswered() {
        let mut args = args();
        args.skip = 7;
        let draft = sample_draft(&args).expect("draft builds");
        assert_eq!(draft.stats().answered_count, 70);
    }

    #[test]
    fn sample_draft_rejects_unknown_ids() {
        let mut args = args();
        args.fail = vec!["cuisine_42".to_string()];
        assert!(matches!(sample_draft(&args), Err(AppError::Io(_))));
    }

    #[tokio::test]
    async fn demo_runs_against_memory() {
        let mut args = args();
        args.email = Some("qualite@example.com".to_string());
        run_demo(args).await.expect("demo completes");
    }

    #[test]
    fn catalog_listing_succeeds() {
        run_catalog(CatalogArgs { with_ids: true }).expect("prints");
    }
}
