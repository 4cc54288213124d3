use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::catalog::models::StatVector;
use crate::reports::verification::{Verification, VerificationError};

/// A salary self-report against a target job. Only the verification fields
/// change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryReport {
    pub id: Uuid,
    pub profile_id: i64,
    pub target_job_id: String,
    pub current_salary: i64,
    pub estimated_salary: i64,
    pub percentile: u8,
    pub years_experience: u32,
    pub stat_snapshot: StatVector,
    #[serde(flatten)]
    pub verification: Verification,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SalaryReport {
    /// Positive when the estimate exceeds what the user is paid today.
    pub fn salary_gap(&self) -> i64 {
        self.estimated_salary - self.current_salary
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SalaryReportRow {
    pub id: Uuid,
    pub profile_id: i64,
    pub target_job_id: String,
    pub current_salary: i64,
    pub estimated_salary: i64,
    pub percentile: i16,
    pub years_experience: i32,
    pub stat_snapshot: Json<StatVector>,
    pub status: String,
    pub proof_key: Option<String>,
    pub rejection_reason: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SalaryReportRow> for SalaryReport {
    type Error = VerificationError;

    fn try_from(row: SalaryReportRow) -> Result<Self, Self::Error> {
        Ok(SalaryReport {
            id: row.id,
            profile_id: row.profile_id,
            target_job_id: row.target_job_id,
            current_salary: row.current_salary,
            estimated_salary: row.estimated_salary,
            percentile: row.percentile.clamp(0, 100) as u8,
            years_experience: row.years_experience.max(0) as u32,
            stat_snapshot: row.stat_snapshot.0,
            verification: Verification {
                status: row.status.parse()?,
                proof_key: row.proof_key,
                rejection_reason: row.rejection_reason,
                verified_at: row.verified_at,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
