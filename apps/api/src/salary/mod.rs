// Salary estimation: projected pay for a job given stats and experience,
// the market distribution of its band, and percentile placement.
// Pure functions only; handlers wrap them for the HTTP layer.

pub mod distribution;
pub mod estimator;
pub mod handlers;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::models::{Job, StatVector};
use crate::salary::distribution::{
    build_distribution, percentile_rank, salary_tier, DistributionPoint, SalaryTier,
};
use crate::salary::estimator::{
    derive_salary_parameters, estimate_salary, project_salary_growth, GrowthPoint,
    SalaryParameters, DEFAULT_PROJECTION_YEARS,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SalaryError {
    #[error("invalid salary range {min}~{max}: max must exceed min")]
    InvalidRange { min: i64, max: i64 },
}

/// Everything the salary screen shows for one job, in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct SalarySimulation {
    pub job_id: String,
    pub years: u32,
    pub parameters: SalaryParameters,
    pub estimated_salary: i64,
    /// Placement of the estimate inside the job's band.
    pub percentile: u8,
    pub tier: SalaryTier,
    pub distribution: Vec<DistributionPoint>,
    pub projection: Vec<GrowthPoint>,
    pub current_salary: Option<i64>,
    pub current_percentile: Option<u8>,
    /// `estimated_salary - current_salary`; positive means underpaid.
    pub salary_gap: Option<i64>,
}

pub fn simulate(
    job: &Job,
    stats: &StatVector,
    years: u32,
    current_salary: Option<i64>,
) -> Result<SalarySimulation, SalaryError> {
    let (min, max) = (job.salary_range.min, job.salary_range.max);
    let parameters = derive_salary_parameters(job);
    let estimated_salary = estimate_salary(&parameters, stats, years);
    let percentile = percentile_rank(estimated_salary, min, max)?;
    let distribution = build_distribution(min, max, estimated_salary)?;
    let current_percentile = current_salary
        .map(|s| percentile_rank(s, min, max))
        .transpose()?;

    Ok(SalarySimulation {
        job_id: job.id.clone(),
        years,
        parameters,
        estimated_salary,
        percentile,
        tier: salary_tier(percentile),
        distribution,
        projection: project_salary_growth(&parameters, stats, DEFAULT_PROJECTION_YEARS),
        current_salary,
        current_percentile,
        salary_gap: current_salary.map(|s| estimated_salary - s),
    })
}
