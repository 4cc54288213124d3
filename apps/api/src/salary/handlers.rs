//! Axum route handlers for the salary simulator.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::catalog::models::{StatVector, STAT_MAX};
use crate::errors::AppError;
use crate::salary::{simulate, SalarySimulation};
use crate::state::AppState;

const MAX_YEARS: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    /// Explicit stats. When absent the stats of `profile_id` are used.
    pub stats: Option<StatVector>,
    pub profile_id: Option<i64>,
    pub years: u32,
    pub current_salary: Option<i64>,
}

/// POST /api/jobs/:id/salary-simulation
///
/// Estimated salary, market placement and 10-year projection for one job.
pub async fn handle_salary_simulation(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(request): Json<SimulationRequest>,
) -> Result<Json<SalarySimulation>, AppError> {
    let job = state
        .catalog
        .job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    if request.years > MAX_YEARS {
        return Err(AppError::Validation(format!(
            "years must be at most {MAX_YEARS}"
        )));
    }
    if request.current_salary.is_some_and(|s| s <= 0) {
        return Err(AppError::Validation(
            "current_salary must be positive".to_string(),
        ));
    }

    let stats = match (request.stats, request.profile_id) {
        (Some(stats), _) => stats,
        (None, Some(profile_id)) => {
            state
                .profiles
                .get(profile_id)
                .await
                .ok_or_else(|| AppError::NotFound(format!("Profile {profile_id} not found")))?
                .stats
        }
        (None, None) => {
            return Err(AppError::Validation(
                "either stats or profile_id is required".to_string(),
            ))
        }
    };
    if let Some((stat, value)) = stats.iter().find(|&(_, v)| v > STAT_MAX) {
        return Err(AppError::Validation(format!(
            "{} must be between 0 and {STAT_MAX}, got {value}",
            stat.as_str()
        )));
    }

    let simulation = simulate(job, &stats, request.years, request.current_salary)?;
    Ok(Json(simulation))
}
