//! Axum route handlers for salary reports and their proof review flow.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::reports::models::SalaryReport;
use crate::reports::new_report;
use crate::reports::proofs::{fetch_proof, read_proof_file, report_proof_key, StoredProof};
use crate::salary::distribution::{salary_tier, SalaryTier};
use crate::state::AppState;

const MAX_YEARS_EXPERIENCE: u32 = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub profile_id: i64,
    pub target_job_id: String,
    pub current_salary: i64,
    pub years_experience: u32,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub approve: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub report: SalaryReport,
    pub salary_gap: i64,
    pub tier: SalaryTier,
}

impl From<SalaryReport> for ReportResponse {
    fn from(report: SalaryReport) -> Self {
        ReportResponse {
            salary_gap: report.salary_gap(),
            tier: salary_tier(report.percentile),
            report,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_report(state: &AppState, report_id: Uuid) -> Result<SalaryReport, AppError> {
    state
        .reports
        .get(report_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {report_id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/reports/
///
/// Snapshots the profile's stats and scores the reported salary against the
/// target job. New reports start unverified.
pub async fn handle_create_report(
    State(state): State<AppState>,
    Json(request): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>), AppError> {
    if request.current_salary <= 0 {
        return Err(AppError::Validation(
            "current_salary must be positive".to_string(),
        ));
    }
    if request.years_experience > MAX_YEARS_EXPERIENCE {
        return Err(AppError::Validation(format!(
            "years_experience must be at most {MAX_YEARS_EXPERIENCE}"
        )));
    }

    let job = state.catalog.job(&request.target_job_id).ok_or_else(|| {
        AppError::NotFound(format!("Job {} not found", request.target_job_id))
    })?;
    let profile = state
        .profiles
        .get(request.profile_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", request.profile_id)))?;

    let report = new_report(
        &profile,
        job,
        request.current_salary,
        request.years_experience,
        Utc::now(),
    )?;
    state.reports.create(&report).await?;

    info!(
        "Created salary report {} for profile {} (job {}, percentile {})",
        report.id, report.profile_id, report.target_job_id, report.percentile
    );
    Ok((StatusCode::CREATED, Json(ReportResponse::from(report))))
}

/// GET /api/reports/:id
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<ReportResponse>, AppError> {
    let report = load_report(&state, report_id).await?;
    Ok(Json(ReportResponse::from(report)))
}

/// GET /api/profiles/:id/reports
///
/// Newest first.
pub async fn handle_list_profile_reports(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
) -> Result<Json<Vec<ReportResponse>>, AppError> {
    if state.profiles.get(profile_id).await.is_none() {
        return Err(AppError::NotFound(format!("Profile {profile_id} not found")));
    }
    let reports = state.reports.list_for_profile(profile_id).await?;
    Ok(Json(reports.into_iter().map(ReportResponse::from).collect()))
}

/// POST /api/reports/:id/upload_proof/
///
/// Stores the proof and queues the report for review. A pending proof is
/// replaced; a verified report accepts no new proof.
pub async fn handle_upload_report_proof(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ReportResponse>, AppError> {
    let mut report = load_report(&state, report_id).await?;
    let expected = report.verification.status;
    // Check the transition before paying for the upload.
    report.verification.clone().submit_proof(String::new())?;

    let file = read_proof_file(&mut multipart, state.config.max_upload_bytes).await?;
    let key = report_proof_key(report_id);
    state.proofs.put(&key, file.body, &file.content_type).await?;

    report.verification.submit_proof(key.clone())?;
    report.updated_at = Utc::now();
    state
        .reports
        .update_verification(report_id, expected, &report.verification, report.updated_at)
        .await?;

    info!("Report {report_id} received proof {key}");
    Ok(Json(ReportResponse::from(report)))
}

/// POST /api/reports/:id/review
///
/// Admin decision on a pending proof. Rejections need a reason.
pub async fn handle_review_report(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let mut report = load_report(&state, report_id).await?;
    let expected = report.verification.status;
    let now = Utc::now();

    report
        .verification
        .review(request.approve, request.reason.as_deref(), now)?;
    report.updated_at = now;
    // Loses to any review or upload that landed since the load.
    state
        .reports
        .update_verification(report_id, expected, &report.verification, now)
        .await?;

    info!(
        "Report {report_id} reviewed: {}",
        report.verification.status
    );
    Ok(Json(ReportResponse::from(report)))
}

/// GET /api/reports/:id/proof
///
/// The stored proof file, for reviewers.
pub async fn handle_get_report_proof(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
) -> Result<StoredProof, AppError> {
    let report = load_report(&state, report_id).await?;
    fetch_proof(
        state.proofs.as_ref(),
        report.verification.proof_key.as_deref(),
        &format!("Report {report_id}"),
    )
    .await
}
