//! SQLite-backed audit store.
//!
//! Tables mirror the three logical record sets. `commit` wraps the record, item, and
//! improvement inserts in one transaction so a failed submit leaves no partial audit.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::domain::{
    AuditId, AuditItem, AuditRecord, AuditStatus, ImprovementSuggestion, NewAuditRecord, Priority,
};
use super::repository::{AuditCommit, AuditStore, StoreError};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS audits (
        id TEXT PRIMARY KEY,
        restaurant_name TEXT NOT NULL,
        auditor_name TEXT NOT NULL,
        audit_date TEXT NOT NULL,
        total_items INTEGER NOT NULL,
        yes_count INTEGER NOT NULL,
        no_count INTEGER NOT NULL,
        success_percentage INTEGER NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS audit_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        audit_id TEXT NOT NULL REFERENCES audits(id),
        section TEXT NOT NULL,
        criteria TEXT NOT NULL,
        response INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS audit_improvements (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        audit_id TEXT NOT NULL REFERENCES audits(id),
        section TEXT NOT NULL,
        criteria TEXT NOT NULL,
        suggestion TEXT NOT NULL,
        priority TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_audit_items_audit_id ON audit_items(audit_id)",
    "CREATE INDEX IF NOT EXISTS idx_audit_improvements_audit_id ON audit_improvements(audit_id)",
];

#[derive(Debug, Clone)]
pub struct SqliteAuditStore {
    pool: SqlitePool,
}

impl SqliteAuditStore {
    /// Opens (creating if needed) the database at `url` and ensures the tables exist.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` is its own database, and it dies with the connection.
        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        }
        .connect_with(options)
        .await?;

        let store = Self { pool };
        store.ensure_tables().await?;
        info!(url, "sqlite audit store ready");
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_tables(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

async fn write_audit(conn: &mut SqliteConnection, record: &AuditRecord) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO audits (
            id, restaurant_name, auditor_name, audit_date, total_items,
            yes_count, no_count, success_percentage, status, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(record.restaurant_name.as_str())
    .bind(record.auditor_name.as_str())
    .bind(record.audit_date.format("%Y-%m-%d").to_string())
    .bind(record.total_items as i64)
    .bind(record.yes_count as i64)
    .bind(record.no_count as i64)
    .bind(i64::from(record.success_percentage))
    .bind(record.status.label())
    .bind(timestamp(record.created_at))
    .execute(conn)
    .await?;
    Ok(())
}

async fn write_items(conn: &mut SqliteConnection, items: &[AuditItem]) -> Result<(), StoreError> {
    for item in items {
        sqlx::query(
            "INSERT INTO audit_items (audit_id, section, criteria, response) VALUES (?, ?, ?, ?)",
        )
        .bind(item.audit_id.to_string())
        .bind(item.section.as_str())
        .bind(item.criteria.as_str())
        .bind(item.response)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn write_improvements(
    conn: &mut SqliteConnection,
    improvements: &[ImprovementSuggestion],
) -> Result<(), StoreError> {
    for improvement in improvements {
        sqlx::query(
            r#"
            INSERT INTO audit_improvements (audit_id, section, criteria, suggestion, priority)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(improvement.audit_id.to_string())
        .bind(improvement.section.as_str())
        .bind(improvement.criteria.as_str())
        .bind(improvement.suggestion.as_str())
        .bind(improvement.priority.as_str())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn ensure_parent(conn: &mut SqliteConnection, audit_id: AuditId) -> Result<(), StoreError> {
    let found = sqlx::query("SELECT 1 FROM audits WHERE id = ?")
        .bind(audit_id.to_string())
        .fetch_optional(conn)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(StoreError::MissingParent(audit_id)),
    }
}

fn parse_audit_id(raw: String) -> Result<AuditId, StoreError> {
    AuditId::from_str(&raw).map_err(|_| StoreError::Corrupt {
        column: "audit_id",
        value: raw,
    })
}

fn parse_count(column: &'static str, raw: i64) -> Result<usize, StoreError> {
    usize::try_from(raw).map_err(|_| StoreError::Corrupt {
        column,
        value: raw.to_string(),
    })
}

fn audit_from_row(row: &SqliteRow) -> Result<AuditRecord, StoreError> {
    let id = parse_audit_id(row.try_get("id")?)?;

    let raw_date: String = row.try_get("audit_date")?;
    let audit_date =
        NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d").map_err(|_| StoreError::Corrupt {
            column: "audit_date",
            value: raw_date.clone(),
        })?;

    let raw_status: String = row.try_get("status")?;
    let status = AuditStatus::parse(&raw_status).ok_or(StoreError::Corrupt {
        column: "status",
        value: raw_status.clone(),
    })?;

    let raw_created: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&raw_created)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| StoreError::Corrupt {
            column: "created_at",
            value: raw_created.clone(),
        })?;

    let raw_percentage: i64 = row.try_get("success_percentage")?;
    let success_percentage = u32::try_from(raw_percentage).map_err(|_| StoreError::Corrupt {
        column: "success_percentage",
        value: raw_percentage.to_string(),
    })?;

    Ok(AuditRecord {
        id,
        restaurant_name: row.try_get("restaurant_name")?,
        auditor_name: row.try_get("auditor_name")?,
        audit_date,
        total_items: parse_count("total_items", row.try_get("total_items")?)?,
        yes_count: parse_count("yes_count", row.try_get("yes_count")?)?,
        no_count: parse_count("no_count", row.try_get("no_count")?)?,
        success_percentage,
        status,
        created_at,
    })
}

#[async_trait]
impl AuditStore for SqliteAuditStore {
    async fn insert_audit(&self, record: NewAuditRecord) -> Result<AuditRecord, StoreError> {
        let stored = record.into_record(AuditId::generate(), Utc::now());
        let mut conn = self.pool.acquire().await?;
        write_audit(&mut conn, &stored).await?;
        Ok(stored)
    }

    async fn insert_items(&self, items: Vec<AuditItem>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for audit_id in distinct_ids(items.iter().map(|item| item.audit_id)) {
            ensure_parent(&mut tx, audit_id).await?;
        }
        write_items(&mut tx, &items).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_improvements(
        &self,
        improvements: Vec<ImprovementSuggestion>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for audit_id in distinct_ids(improvements.iter().map(|improvement| improvement.audit_id)) {
            ensure_parent(&mut tx, audit_id).await?;
        }
        write_improvements(&mut tx, &improvements).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_audits(&self) -> Result<Vec<AuditRecord>, StoreError> {
        let rows = sqlx::query("SELECT * FROM audits ORDER BY created_at DESC, rowid DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(audit_from_row).collect()
    }

    async fn fetch_audit(&self, id: &AuditId) -> Result<Option<AuditRecord>, StoreError> {
        let row = sqlx::query("SELECT * FROM audits WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(audit_from_row).transpose()
    }

    async fn items_for(&self, id: &AuditId) -> Result<Vec<AuditItem>, StoreError> {
        let rows = sqlx::query(
            "SELECT section, criteria, response FROM audit_items WHERE audit_id = ? ORDER BY id",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<AuditItem, StoreError> {
                Ok(AuditItem {
                    audit_id: *id,
                    section: row.try_get("section")?,
                    criteria: row.try_get("criteria")?,
                    response: row.try_get("response")?,
                })
            })
            .collect()
    }

    async fn improvements_for(
        &self,
        id: &AuditId,
    ) -> Result<Vec<ImprovementSuggestion>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT section, criteria, suggestion, priority
            FROM audit_improvements
            WHERE audit_id = ?
            ORDER BY id
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<ImprovementSuggestion, StoreError> {
                let raw_priority: String = row.try_get("priority")?;
                let priority = Priority::parse(&raw_priority).ok_or(StoreError::Corrupt {
                    column: "priority",
                    value: raw_priority.clone(),
                })?;
                Ok(ImprovementSuggestion {
                    audit_id: *id,
                    section: row.try_get("section")?,
                    criteria: row.try_get("criteria")?,
                    suggestion: row.try_get("suggestion")?,
                    priority,
                })
            })
            .collect()
    }

    async fn commit(&self, commit: AuditCommit) -> Result<AuditRecord, StoreError> {
        let AuditCommit {
            record,
            items,
            improvements,
        } = commit;

        let stored = record.into_record(AuditId::generate(), Utc::now());
        let items: Vec<AuditItem> = items
            .into_iter()
            .map(|item| item.for_audit(stored.id))
            .collect();
        let improvements: Vec<ImprovementSuggestion> = improvements
            .into_iter()
            .map(|improvement| improvement.for_audit(stored.id))
            .collect();

        let mut tx = self.pool.begin().await?;
        write_audit(&mut tx, &stored).await?;
        write_items(&mut tx, &items).await?;
        write_improvements(&mut tx, &improvements).await?;
        tx.commit().await?;

        debug!(
            audit_id = %stored.id,
            items = items.len(),
            improvements = improvements.len(),
            "audit committed"
        );
        Ok(stored)
    }
}

fn distinct_ids(ids: impl Iterator<Item = AuditId>) -> Vec<AuditId> {
    let mut distinct: Vec<AuditId> = Vec::new();
    for id in ids {
        if !distinct.contains(&id) {
            distinct.push(id);
        }
    }
    distinct
}
