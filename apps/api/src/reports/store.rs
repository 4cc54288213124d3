//! Salary report persistence.
//!
//! `PgReportStore` is used when a database is configured; otherwise reports
//! live in `InMemoryReportStore` for the lifetime of the process.
//! `AppState` holds an `Arc<dyn ReportStore>` chosen at startup.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::reports::models::{SalaryReport, SalaryReportRow};
use crate::reports::verification::{Verification, VerificationStatus};

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn create(&self, report: &SalaryReport) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<SalaryReport>, AppError>;

    /// Newest first.
    async fn list_for_profile(&self, profile_id: i64) -> Result<Vec<SalaryReport>, AppError>;

    /// Persists new verification fields if the stored status is still
    /// `expected`. Fails with `NotFound` for unknown ids and `Conflict` when
    /// another request changed the status first.
    async fn update_verification(
        &self,
        id: Uuid,
        expected: VerificationStatus,
        verification: &Verification,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError>;
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Report {id} not found"))
}

fn stale_status(id: Uuid, expected: VerificationStatus, found: &str) -> AppError {
    AppError::Conflict(format!(
        "Report {id} is now {found}, expected {expected}"
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// PgReportStore
// ────────────────────────────────────────────────────────────────────────────

pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn from_row(row: SalaryReportRow) -> Result<SalaryReport, AppError> {
    Ok(SalaryReport::try_from(row)?)
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn create(&self, report: &SalaryReport) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO salary_reports
                (id, profile_id, target_job_id, current_salary, estimated_salary,
                 percentile, years_experience, stat_snapshot, status, proof_key,
                 rejection_reason, verified_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(report.id)
        .bind(report.profile_id)
        .bind(&report.target_job_id)
        .bind(report.current_salary)
        .bind(report.estimated_salary)
        .bind(i16::from(report.percentile))
        .bind(i32::try_from(report.years_experience).unwrap_or(i32::MAX))
        .bind(Json(report.stat_snapshot))
        .bind(report.verification.status.as_str())
        .bind(&report.verification.proof_key)
        .bind(&report.verification.rejection_reason)
        .bind(report.verification.verified_at)
        .bind(report.created_at)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<SalaryReport>, AppError> {
        sqlx::query_as::<_, SalaryReportRow>("SELECT * FROM salary_reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(from_row)
            .transpose()
    }

    async fn list_for_profile(&self, profile_id: i64) -> Result<Vec<SalaryReport>, AppError> {
        sqlx::query_as::<_, SalaryReportRow>(
            "SELECT * FROM salary_reports WHERE profile_id = $1 ORDER BY created_at DESC",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(from_row)
        .collect()
    }

    async fn update_verification(
        &self,
        id: Uuid,
        expected: VerificationStatus,
        verification: &Verification,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE salary_reports
            SET status = $2, proof_key = $3, rejection_reason = $4,
                verified_at = $5, updated_at = $6
            WHERE id = $1 AND status = $7
            "#,
        )
        .bind(id)
        .bind(verification.status.as_str())
        .bind(&verification.proof_key)
        .bind(&verification.rejection_reason)
        .bind(verification.verified_at)
        .bind(updated_at)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current: Option<String> =
                sqlx::query_scalar("SELECT status FROM salary_reports WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
            return Err(match current {
                Some(status) => stale_status(id, expected, &status),
                None => not_found(id),
            });
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// InMemoryReportStore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryReportStore {
    reports: RwLock<HashMap<Uuid, SalaryReport>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn create(&self, report: &SalaryReport) -> Result<(), AppError> {
        let mut reports = self.reports.write().await;
        if reports.contains_key(&report.id) {
            return Err(AppError::Conflict(format!("Report {} already exists", report.id)));
        }
        reports.insert(report.id, report.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<SalaryReport>, AppError> {
        Ok(self.reports.read().await.get(&id).cloned())
    }

    async fn list_for_profile(&self, profile_id: i64) -> Result<Vec<SalaryReport>, AppError> {
        let mut reports: Vec<SalaryReport> = self
            .reports
            .read()
            .await
            .values()
            .filter(|r| r.profile_id == profile_id)
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    async fn update_verification(
        &self,
        id: Uuid,
        expected: VerificationStatus,
        verification: &Verification,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut reports = self.reports.write().await;
        let report = reports.get_mut(&id).ok_or_else(|| not_found(id))?;
        if report.verification.status != expected {
            return Err(stale_status(
                id,
                expected,
                report.verification.status.as_str(),
            ));
        }
        report.verification = verification.clone();
        report.updated_at = updated_at;
        Ok(())
    }
}
