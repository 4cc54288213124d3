// Salary reports: a snapshot of the user's pay against a target job, and the
// proof upload and review flow that verifies it.

pub mod handlers;
pub mod models;
pub mod proofs;
pub mod store;
pub mod verification;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::models::Job;
use crate::profile::models::UserProfile;
use crate::reports::models::SalaryReport;
use crate::reports::verification::Verification;
use crate::salary::distribution::percentile_rank;
use crate::salary::estimator::{derive_salary_parameters, estimate_salary};
use crate::salary::SalaryError;

/// Builds a report from the profile's current stats. The percentile places the
/// user's actual salary inside the job's band.
pub fn new_report(
    profile: &UserProfile,
    job: &Job,
    current_salary: i64,
    years_experience: u32,
    now: DateTime<Utc>,
) -> Result<SalaryReport, SalaryError> {
    let parameters = derive_salary_parameters(job);
    let estimated_salary = estimate_salary(&parameters, &profile.stats, years_experience);
    let percentile = percentile_rank(current_salary, job.salary_range.min, job.salary_range.max)?;

    Ok(SalaryReport {
        id: Uuid::new_v4(),
        profile_id: profile.id,
        target_job_id: job.id.clone(),
        current_salary,
        estimated_salary,
        percentile,
        years_experience,
        stat_snapshot: profile.stats,
        verification: Verification::default(),
        created_at: now,
        updated_at: now,
    })
}
