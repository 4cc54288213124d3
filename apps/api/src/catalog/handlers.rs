//! Axum route handlers for the job catalog.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::filters::{
    format_salary_range, is_blue_ocean, is_starter, DEFAULT_STAT_TOLERANCE,
};
use crate::catalog::models::{Job, JobGroup, MarketDemand, Stat, STAT_MAX};
use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub group: Option<JobGroup>,
    pub demand: Option<MarketDemand>,
    /// Free-text search over title, description and tags.
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct StatMatchRequest {
    /// Only the listed stats are compared.
    pub stats: BTreeMap<Stat, u32>,
    pub tolerance: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct JobSummary {
    #[serde(flatten)]
    pub job: Job,
    pub salary_label: String,
    pub is_blue_ocean: bool,
    pub is_starter: bool,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        JobSummary {
            salary_label: format_salary_range(&job.salary_range),
            is_blue_ocean: is_blue_ocean(job),
            is_starter: is_starter(job),
            job: job.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub total: usize,
    pub jobs: Vec<JobSummary>,
}

impl JobListResponse {
    fn from_jobs(jobs: Vec<&Job>) -> Self {
        JobListResponse {
            total: jobs.len(),
            jobs: jobs.into_iter().map(JobSummary::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub job: JobSummary,
    pub prerequisites: Vec<JobSummary>,
    pub dependents: Vec<JobSummary>,
}

#[derive(Debug, Serialize)]
pub struct EvTransitionResponse {
    pub jobs: JobListResponse,
    /// Suggested order, engine work first.
    pub path: Vec<JobSummary>,
}

#[derive(Debug, Serialize)]
pub struct CareerPathResponse {
    pub target_job_id: String,
    /// Entry level first, target last.
    pub path: Vec<JobSummary>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/jobs
///
/// Lists the catalog. Filters combine with AND.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let catalog = &state.catalog;
    let mut jobs: Vec<&Job> = match query.group {
        Some(group) => catalog.jobs_by_group(group),
        None => catalog.jobs().iter().collect(),
    };
    if let Some(demand) = query.demand {
        let matching = catalog.jobs_by_demand(demand);
        jobs.retain(|j| matching.iter().any(|m| m.id == j.id));
    }
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let hits = catalog.search(q);
        jobs.retain(|j| hits.iter().any(|h| h.id == j.id));
    }

    Ok(Json(JobListResponse::from_jobs(jobs)))
}

/// GET /api/jobs/ev-transition
pub async fn handle_ev_transition_jobs(
    State(state): State<AppState>,
) -> Result<Json<EvTransitionResponse>, AppError> {
    let path = state.catalog.ev_transition_path()?;
    Ok(Json(EvTransitionResponse {
        jobs: JobListResponse::from_jobs(state.catalog.ev_transition_jobs()),
        path: path.into_iter().map(JobSummary::from).collect(),
    }))
}

/// GET /api/jobs/starters
pub async fn handle_starter_jobs(State(state): State<AppState>) -> Json<JobListResponse> {
    Json(JobListResponse::from_jobs(state.catalog.starter_jobs()))
}

/// GET /api/jobs/best-starters?limit=
///
/// Entry-friendly jobs, easiest requirements first.
pub async fn handle_best_starter_jobs(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<JobListResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    Json(JobListResponse::from_jobs(state.catalog.best_starter_jobs(limit)))
}

/// GET /api/jobs/blue-ocean
pub async fn handle_blue_ocean_jobs(State(state): State<AppState>) -> Json<JobListResponse> {
    Json(JobListResponse::from_jobs(state.catalog.blue_ocean_jobs()))
}

/// GET /api/jobs/top-salary?limit=
pub async fn handle_top_salary_jobs(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<JobListResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    Json(JobListResponse::from_jobs(state.catalog.top_salary_jobs(limit)))
}

/// GET /api/jobs/hot-trend?limit=
pub async fn handle_hot_trend_jobs(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<JobListResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    Json(JobListResponse::from_jobs(state.catalog.hot_trend_jobs(limit)))
}

/// POST /api/jobs/match
///
/// Jobs whose requirements sit within `tolerance` of every supplied stat.
pub async fn handle_match_jobs(
    State(state): State<AppState>,
    Json(request): Json<StatMatchRequest>,
) -> Result<Json<JobListResponse>, AppError> {
    if request.stats.is_empty() {
        return Err(AppError::Validation("stats cannot be empty".to_string()));
    }
    if let Some((stat, value)) = request.stats.iter().find(|&(_, &v)| v > STAT_MAX) {
        return Err(AppError::Validation(format!(
            "{} must be between 0 and {STAT_MAX}, got {value}",
            stat.as_str()
        )));
    }
    let tolerance = request.tolerance.unwrap_or(DEFAULT_STAT_TOLERANCE);

    Ok(Json(JobListResponse::from_jobs(
        state.catalog.filter_by_stats(&request.stats, tolerance),
    )))
}

/// GET /api/jobs/:id
///
/// One job with its direct prerequisites and the jobs it leads to.
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let catalog = &state.catalog;
    let job = catalog
        .job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let prerequisites = catalog.direct_prerequisites(&job_id)?;
    let dependents = catalog.dependents_of(&job_id)?;

    Ok(Json(JobDetailResponse {
        job: JobSummary::from(job),
        prerequisites: prerequisites.into_iter().map(JobSummary::from).collect(),
        dependents: dependents.into_iter().map(JobSummary::from).collect(),
    }))
}

/// GET /api/jobs/:id/career-path
pub async fn handle_career_path(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<CareerPathResponse>, AppError> {
    let path = state.catalog.full_career_path(&job_id)?;

    Ok(Json(CareerPathResponse {
        target_job_id: job_id,
        path: path.into_iter().map(JobSummary::from).collect(),
    }))
}
